//! Configuration loading

use crate::{ConfigFormat, TlsConfigFile};
use std::fs;
use std::path::Path;
use tlsconf_core::Result;
use tracing::debug;

/// Decoder that rejects fields the schema does not know about
pub trait StrictDecoder: Send + Sync {
    /// Decode a whole document
    fn decode_strict(&self, content: &[u8]) -> Result<TlsConfigFile>;
}

/// Strict YAML decoder
#[derive(Debug, Clone, Copy, Default)]
pub struct YamlDecoder;

impl StrictDecoder for YamlDecoder {
    fn decode_strict(&self, content: &[u8]) -> Result<TlsConfigFile> {
        // Empty and null documents are an empty mapping, not an error
        if content.iter().all(u8::is_ascii_whitespace) {
            return Ok(TlsConfigFile::default());
        }
        let config: Option<TlsConfigFile> = serde_yaml::from_slice(content)?;
        Ok(config.unwrap_or_default())
    }
}

/// Strict JSON decoder
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonDecoder;

impl StrictDecoder for JsonDecoder {
    fn decode_strict(&self, content: &[u8]) -> Result<TlsConfigFile> {
        Ok(serde_json::from_slice(content)?)
    }
}

/// Decode a document in the given format
pub fn decode_str(content: &str, format: ConfigFormat) -> Result<TlsConfigFile> {
    format.decoder().decode_strict(content.as_bytes())
}

/// Load a TLS configuration file
///
/// The format is picked from the extension before the file is read. Relative
/// certificate, key and CA paths are resolved against the directory holding
/// the file, and the result is validated.
pub fn load_tls_config_file<P: AsRef<Path>>(path: P) -> Result<TlsConfigFile> {
    let path = path.as_ref();

    let format = ConfigFormat::from_path(path)?;
    let content = fs::read(path)?;

    let mut config = format.decoder().decode_strict(&content)?;
    debug!(path = %path.display(), ?format, "Decoded TLS config file");

    if let Some(dir) = path.parent() {
        config.set_directory(dir);
    }

    crate::validator::validate_tls_config(&config)?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;
    use tlsconf_core::Error;

    const YAML_CONFIG: &str = r#"
insecure_skip_verify: true
min_version: TLS12
max_version: TLS13
server_name: "api.internal"
"#;

    fn write_temp(suffix: &str, content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_yaml() {
        let config = decode_str(YAML_CONFIG, ConfigFormat::Yaml).unwrap();

        assert!(config.insecure_skip_verify);
        assert_eq!(config.min_version.as_deref(), Some("TLS12"));
        assert_eq!(config.max_version.as_deref(), Some("TLS13"));
        assert_eq!(config.server_name.as_deref(), Some("api.internal"));
    }

    #[test]
    fn test_load_json() {
        let config = decode_str(r#"{"insecure_skip_verify": true}"#, ConfigFormat::Json).unwrap();
        assert_eq!(
            config,
            TlsConfigFile {
                insecure_skip_verify: true,
                ..Default::default()
            }
        );
    }

    #[test]
    fn test_empty_documents() {
        assert_eq!(
            decode_str("", ConfigFormat::Yaml).unwrap(),
            TlsConfigFile::default()
        );
        assert_eq!(
            decode_str("\n  \n", ConfigFormat::Yaml).unwrap(),
            TlsConfigFile::default()
        );
        for null in ["~", "null\n", "--- ~\n", "# nothing set\n"] {
            assert_eq!(
                decode_str(null, ConfigFormat::Yaml).unwrap(),
                TlsConfigFile::default(),
                "{null:?}"
            );
        }
        assert_eq!(
            decode_str("{}", ConfigFormat::Json).unwrap(),
            TlsConfigFile::default()
        );
    }

    #[test]
    fn test_unknown_yaml_field_rejected() {
        let err = decode_str("insecure_skip_verify: true\nverify: false\n", ConfigFormat::Yaml)
            .unwrap_err();
        assert!(matches!(err, Error::Yaml(_)));
        assert!(err.to_string().contains("verify"));
    }

    #[test]
    fn test_unknown_json_field_rejected() {
        let err = decode_str(r#"{"ciphers": ["x"]}"#, ConfigFormat::Json).unwrap_err();
        assert!(matches!(err, Error::Json(_)));
        assert!(err.to_string().contains("ciphers"));
    }

    #[test]
    fn test_invalid_yaml() {
        let result = decode_str("insecure_skip_verify: [yaml", ConfigFormat::Yaml);
        assert!(result.is_err());
    }

    #[test]
    fn test_wrong_field_type_rejected() {
        let err = decode_str(r#"{"insecure_skip_verify": "yes"}"#, ConfigFormat::Json).unwrap_err();
        assert!(err.is_decode());
    }

    #[test]
    fn test_load_file_resolves_relative_paths() {
        let file = write_temp(".yml", "cert_file: client.crt\nkey_file: /abs/client.key\n");
        let dir = file.path().parent().unwrap().to_path_buf();

        let config = load_tls_config_file(file.path()).unwrap();

        assert_eq!(config.cert_file, Some(dir.join("client.crt")));
        assert_eq!(config.key_file, Some(PathBuf::from("/abs/client.key")));
    }

    #[test]
    fn test_load_file_rejects_extension_before_reading() {
        let err = load_tls_config_file("/nonexistent/tls_config.txt").unwrap_err();
        assert!(matches!(err, Error::UnknownExtension(ref ext) if ext == ".txt"));
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_tls_config_file("/nonexistent/tls_config.yml").unwrap_err();
        assert!(matches!(err, Error::Io(ref e) if e.kind() == std::io::ErrorKind::NotFound));
    }

    #[test]
    fn test_load_file_validates() {
        let file = write_temp(".json", r#"{"cert_file": "client.crt"}"#);
        let err = load_tls_config_file(file.path()).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
