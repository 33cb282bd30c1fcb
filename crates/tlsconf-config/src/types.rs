//! Configuration types

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// TLS configuration as written in a config file
///
/// Every field is optional. Fields not listed here make decoding fail.
#[derive(Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct TlsConfigFile {
    /// Disable server certificate verification
    pub insecure_skip_verify: bool,

    /// Minimum protocol version (`TLS10`, `TLS11`, `TLS12`, `TLS13`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_version: Option<String>,

    /// Maximum protocol version
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_version: Option<String>,

    /// Inline CA bundle (PEM)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ca: Option<String>,

    /// CA bundle used to verify the peer (PEM file)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ca_file: Option<PathBuf>,

    /// Inline certificate chain (PEM)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cert: Option<String>,

    /// Certificate chain presented to the peer (PEM file)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cert_file: Option<PathBuf>,

    /// Inline private key (PEM)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,

    /// Private key matching the certificate (PEM file)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_file: Option<PathBuf>,

    /// Expected server name, overriding the dialed host
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server_name: Option<String>,
}

impl TlsConfigFile {
    /// Join relative file paths onto `dir`
    pub fn set_directory(&mut self, dir: &Path) {
        if dir.as_os_str().is_empty() {
            return;
        }
        for path in [&mut self.ca_file, &mut self.cert_file, &mut self.key_file]
            .into_iter()
            .flatten()
        {
            if path.is_relative() {
                *path = dir.join(&*path);
            }
        }
    }

    /// Whether a certificate is configured, inline or by file
    pub fn has_cert(&self) -> bool {
        self.cert.is_some() || self.cert_file.is_some()
    }

    /// Whether a private key is configured, inline or by file
    pub fn has_key(&self) -> bool {
        self.key.is_some() || self.key_file.is_some()
    }

    /// Whether a CA bundle is configured, inline or by file
    pub fn has_ca(&self) -> bool {
        self.ca.is_some() || self.ca_file.is_some()
    }
}

impl fmt::Debug for TlsConfigFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TlsConfigFile")
            .field("insecure_skip_verify", &self.insecure_skip_verify)
            .field("min_version", &self.min_version)
            .field("max_version", &self.max_version)
            .field("ca", &self.ca.as_ref().map(|_| "<inline>"))
            .field("ca_file", &self.ca_file)
            .field("cert", &self.cert.as_ref().map(|_| "<inline>"))
            .field("cert_file", &self.cert_file)
            .field("key", &self.key.as_ref().map(|_| "<secret>"))
            .field("key_file", &self.key_file)
            .field("server_name", &self.server_name)
            .finish()
    }
}
