//! Configuration validation

use crate::TlsConfigFile;
use std::path::PathBuf;
use tlsconf_core::{Error, Result};

/// Validate a decoded TLS configuration
///
/// Only checks the shape of the record. Version names and PEM contents are
/// checked when the record is resolved.
pub fn validate_tls_config(config: &TlsConfigFile) -> Result<()> {
    exclusive("ca", &config.ca, &config.ca_file)?;
    exclusive("cert", &config.cert, &config.cert_file)?;
    exclusive("key", &config.key, &config.key_file)?;

    validate_key_pair(config)
}

fn exclusive(name: &str, inline: &Option<String>, file: &Option<PathBuf>) -> Result<()> {
    if inline.is_some() && file.is_some() {
        return Err(Error::Config(format!(
            "at most one of {name} and {name}_file must be configured"
        )));
    }
    Ok(())
}

fn validate_key_pair(config: &TlsConfigFile) -> Result<()> {
    match (config.has_cert(), config.has_key()) {
        (true, false) => Err(Error::Config(match &config.cert_file {
            Some(path) => format!(
                "client cert file {:?} specified without client key file (must specify both or neither)",
                path.display().to_string()
            ),
            None => "client cert specified without client key (must specify both or neither)"
                .to_string(),
        })),
        (false, true) => Err(Error::Config(match &config.key_file {
            Some(path) => format!(
                "client key file {:?} specified without client cert file (must specify both or neither)",
                path.display().to_string()
            ),
            None => "client key specified without client cert (must specify both or neither)"
                .to_string(),
        })),
        _ => Ok(()),
    }
}
