//! # tlsconf Configuration
//!
//! Decoding of TLS configuration files with support for:
//! - Multiple formats (YAML, JSON), picked by file extension
//! - Strict decoding (unknown fields are rejected)
//! - Inline or file-based PEM material
//! - Relative paths resolved against the config file directory
//! - Validation

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    missing_debug_implementations,
    rust_2018_idioms,
    unreachable_pub
)]

pub mod loader;
pub mod types;
pub mod validator;

pub use loader::{decode_str, load_tls_config_file, JsonDecoder, StrictDecoder, YamlDecoder};
pub use types::TlsConfigFile;
pub use validator::validate_tls_config;

use std::path::Path;
use tlsconf_core::{Error, Result};

/// Configuration format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// YAML format (`.yml`)
    Yaml,
    /// JSON format (`.json`)
    Json,
}

impl ConfigFormat {
    /// Detect format from file extension
    ///
    /// The error carries the rejected extension with its leading dot, or an
    /// empty string when the path has none.
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = extension_of(path);
        match ext.as_str() {
            ".yml" => Ok(ConfigFormat::Yaml),
            ".json" => Ok(ConfigFormat::Json),
            _ => Err(Error::UnknownExtension(ext)),
        }
    }

    /// Strict decoder registered for this format
    pub fn decoder(self) -> &'static dyn StrictDecoder {
        match self {
            ConfigFormat::Yaml => &YamlDecoder,
            ConfigFormat::Json => &JsonDecoder,
        }
    }
}

/// Suffix from the last dot of the file name, dot included
///
/// Unlike [`Path::extension`], a dotfile such as `.yml` counts as having the
/// extension `.yml`.
fn extension_of(path: &Path) -> String {
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy())
        .unwrap_or_default();
    name.rfind('.')
        .map(|idx| name[idx..].to_string())
        .unwrap_or_default()
}
