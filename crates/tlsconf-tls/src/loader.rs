//! Certificate and key loading utilities

use rustls::pki_types::{CertificateDer, PrivateKeyDer};
use rustls_pemfile::{certs, private_key};
use std::fs;
use std::path::Path;
use tlsconf_core::{Error, Result};
use tracing::info;

/// Read a PEM file, naming it in the error
fn read_pem(path: &Path, what: &str) -> Result<Vec<u8>> {
    fs::read(path).map_err(|e| {
        Error::Config(format!(
            "Failed to open {what} file {}: {e}",
            path.display()
        ))
    })
}

/// Load certificates from a PEM file
pub fn load_certificates(path: &Path) -> Result<Vec<CertificateDer<'static>>> {
    let pem = read_pem(path, "certificate")?;
    let certs = parse_certificates(&pem, &path.display().to_string())?;

    info!(
        path = %path.display(),
        count = certs.len(),
        "Loaded TLS certificates"
    );

    Ok(certs)
}

/// Load private key from a PEM file
pub fn load_private_key(path: &Path) -> Result<PrivateKeyDer<'static>> {
    let pem = read_pem(path, "private key")?;
    let key = parse_private_key(&pem, &path.display().to_string())?;

    info!(path = %path.display(), "Loaded TLS private key");

    Ok(key)
}

/// Parse every certificate in a PEM buffer
///
/// `source` names the buffer in errors.
pub fn parse_certificates(pem: &[u8], source: &str) -> Result<Vec<CertificateDer<'static>>> {
    let mut reader = pem;
    let certs = certs(&mut reader)
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::Config(format!("Failed to parse certificates in {source}: {e}")))?;

    if certs.is_empty() {
        return Err(Error::Config(format!("No certificates found in {source}")));
    }

    Ok(certs)
}

/// Parse the first private key (PKCS#1, PKCS#8 or SEC1) in a PEM buffer
pub fn parse_private_key(pem: &[u8], source: &str) -> Result<PrivateKeyDer<'static>> {
    let mut reader = pem;
    private_key(&mut reader)
        .map_err(|e| Error::Config(format!("Failed to parse private key in {source}: {e}")))?
        .ok_or_else(|| Error::Config(format!("No private key found in {source}")))
}
