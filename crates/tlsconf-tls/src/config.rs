//! Resolved TLS configuration

use crate::loader::{load_certificates, load_private_key, parse_certificates, parse_private_key};
use crate::resolver::ClientCertResolver;
use crate::version::TlsVersion;
use rustls::crypto::CryptoProvider;
use rustls::pki_types::{CertificateDer, PrivateKeyDer};
use rustls::sign::CertifiedKey;
use rustls::RootCertStore;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tlsconf_config::TlsConfigFile;
use tlsconf_core::{Error, Result};
use tracing::{debug, info, warn};

/// Load a TLS config file and resolve it
///
/// Nothing is cached: every call reads the config file and the PEM material
/// it points at again.
pub fn load_tls_config<P: AsRef<Path>>(path: P) -> Result<ResolvedTlsConfig> {
    let path = path.as_ref();
    let file = tlsconf_config::load_tls_config_file(path)?;
    let resolved = ResolvedTlsConfig::from_validated(&file)?;

    debug!(path = %path.display(), config = ?resolved, "Resolved TLS config");

    Ok(resolved)
}

/// TLS configuration handed to listeners and dialers
///
/// `Default` leaves every setting unforced. The certificate callback is not
/// stored here; [`Identity::client_cert_resolver`] builds it on demand, which
/// keeps the value comparable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedTlsConfig {
    /// Skip verification of the peer certificate
    pub insecure_skip_verify: bool,

    /// Lowest protocol version to negotiate
    pub min_version: Option<TlsVersion>,

    /// Highest protocol version to negotiate
    pub max_version: Option<TlsVersion>,

    /// Server name override
    pub server_name: Option<String>,

    /// Certificate chain and key presented to the peer
    pub identity: Option<Identity>,

    /// Trust anchors for verifying the peer
    pub ca_pool: Option<CaPool>,
}

impl ResolvedTlsConfig {
    /// Validate and resolve a decoded config file
    pub fn from_file_config(file: &TlsConfigFile) -> Result<Self> {
        tlsconf_config::validate_tls_config(file)?;
        Self::from_validated(file)
    }

    /// Resolve a config file that already passed
    /// [`tlsconf_config::validate_tls_config`], as everything returned by
    /// [`tlsconf_config::load_tls_config_file`] has
    pub fn from_validated(file: &TlsConfigFile) -> Result<Self> {
        if file.insecure_skip_verify && file.has_ca() {
            warn!("insecure_skip_verify is set, the configured CA will not be used");
        }

        let min_version = file.min_version.as_deref().map(str::parse::<TlsVersion>).transpose()?;
        let max_version = file.max_version.as_deref().map(str::parse::<TlsVersion>).transpose()?;
        if let (Some(min), Some(max)) = (min_version, max_version) {
            if max < min {
                return Err(Error::Config(format!(
                    "max_version {max} must be greater than or equal to min_version {min}"
                )));
            }
        }

        let identity = Identity::from_file_config(file)?;
        let ca_pool = CaPool::from_file_config(file)?;

        Ok(Self {
            insecure_skip_verify: file.insecure_skip_verify,
            min_version,
            max_version,
            server_name: file.server_name.clone(),
            identity,
            ca_pool,
        })
    }

    /// Whether every field is still at its default
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }
}

/// Certificate chain plus matching private key
pub struct Identity {
    cert_chain: Vec<CertificateDer<'static>>,
    key: PrivateKeyDer<'static>,
}

impl Identity {
    /// Build an identity, checking the key signs for the leaf certificate
    pub fn new(
        cert_chain: Vec<CertificateDer<'static>>,
        key: PrivateKeyDer<'static>,
    ) -> Result<Self> {
        let identity = Self { cert_chain, key };
        identity.certified_key()?.keys_match()?;
        Ok(identity)
    }

    /// Load an identity from PEM files
    pub fn from_pem_files(cert_file: &Path, key_file: &Path) -> Result<Self> {
        let cert_chain = load_certificates(cert_file)?;
        let key = load_private_key(key_file)?;
        Self::new(cert_chain, key).map_err(|e| {
            Error::Config(format!(
                "Failed to load key pair {} / {}: {e}",
                cert_file.display(),
                key_file.display()
            ))
        })
    }

    fn from_file_config(file: &TlsConfigFile) -> Result<Option<Self>> {
        if !file.has_cert() && !file.has_key() {
            return Ok(None);
        }

        if let (Some(cert_file), Some(key_file)) = (&file.cert_file, &file.key_file) {
            return Self::from_pem_files(cert_file, key_file).map(Some);
        }

        let cert_chain = match (&file.cert, &file.cert_file) {
            (Some(pem), _) => parse_certificates(pem.as_bytes(), "inline cert")?,
            (None, Some(path)) => load_certificates(path)?,
            (None, None) => return Err(Error::config("client key specified without client cert")),
        };
        let key = match (&file.key, &file.key_file) {
            (Some(pem), _) => parse_private_key(pem.as_bytes(), "inline key")?,
            (None, Some(path)) => load_private_key(path)?,
            (None, None) => return Err(Error::config("client cert specified without client key")),
        };

        let source = |inline: &Option<String>, path: &Option<PathBuf>, what: &str| match path {
            Some(path) if inline.is_none() => path.display().to_string(),
            _ => format!("inline {what}"),
        };
        Self::new(cert_chain, key).map(Some).map_err(|e| {
            Error::Config(format!(
                "Failed to load key pair {} / {}: {e}",
                source(&file.cert, &file.cert_file, "cert"),
                source(&file.key, &file.key_file, "key")
            ))
        })
    }

    /// Certificate chain, leaf first
    pub fn cert_chain(&self) -> &[CertificateDer<'static>] {
        &self.cert_chain
    }

    /// Private key
    pub fn key(&self) -> &PrivateKeyDer<'static> {
        &self.key
    }

    /// Pair the chain with a signing key from the default crypto provider
    pub fn certified_key(&self) -> Result<Arc<CertifiedKey>> {
        let signing_key = crypto_provider()
            .key_provider
            .load_private_key(self.key.clone_key())?;
        Ok(Arc::new(CertifiedKey::new(
            self.cert_chain.clone(),
            signing_key,
        )))
    }

    /// Callback supplying this identity when a server asks for a client
    /// certificate
    pub fn client_cert_resolver(&self) -> Result<Arc<ClientCertResolver>> {
        Ok(Arc::new(ClientCertResolver::new(self.certified_key()?)))
    }
}

impl Clone for Identity {
    fn clone(&self) -> Self {
        Self {
            cert_chain: self.cert_chain.clone(),
            key: self.key.clone_key(),
        }
    }
}

impl PartialEq for Identity {
    fn eq(&self, other: &Self) -> bool {
        self.cert_chain == other.cert_chain && self.key.secret_der() == other.key.secret_der()
    }
}

impl Eq for Identity {}

impl fmt::Debug for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Identity")
            .field("certificates", &self.cert_chain.len())
            .field("key", &"<secret>")
            .finish()
    }
}

/// CA certificates trusted when verifying the peer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaPool {
    certs: Vec<CertificateDer<'static>>,
}

impl CaPool {
    /// Parse a PEM bundle; `source` names it in errors
    pub fn from_pem(pem: &[u8], source: &str) -> Result<Self> {
        let pool = Self {
            certs: parse_certificates(pem, source)?,
        };

        let (_, invalid) = pool.root_store_counts();
        if invalid > 0 {
            return Err(Error::Config(format!(
                "unable to use specified CA cert {source}: {invalid} certificate(s) could not be parsed"
            )));
        }

        Ok(pool)
    }

    /// Load a PEM bundle from disk
    pub fn from_pem_file(path: &Path) -> Result<Self> {
        let pem = std::fs::read(path).map_err(|e| {
            Error::Config(format!("Failed to open CA file {}: {e}", path.display()))
        })?;
        let pool = Self::from_pem(&pem, &path.display().to_string())?;

        info!(path = %path.display(), count = pool.certs.len(), "Loaded TLS CA bundle");

        Ok(pool)
    }

    fn from_file_config(file: &TlsConfigFile) -> Result<Option<Self>> {
        match (&file.ca, &file.ca_file) {
            (Some(pem), _) => Self::from_pem(pem.as_bytes(), "inline ca").map(Some),
            (None, Some(path)) => Self::from_pem_file(path).map(Some),
            (None, None) => Ok(None),
        }
    }

    /// Certificates in the bundle
    pub fn certificates(&self) -> &[CertificateDer<'static>] {
        &self.certs
    }

    /// Build a rustls root store from the bundle
    pub fn root_store(&self) -> RootCertStore {
        let mut roots = RootCertStore::empty();
        roots.add_parsable_certificates(self.certs.iter().cloned());
        roots
    }

    fn root_store_counts(&self) -> (usize, usize) {
        RootCertStore::empty().add_parsable_certificates(self.certs.iter().cloned())
    }
}

/// Paths of the PEM material referenced by a config file
pub fn referenced_files(file: &TlsConfigFile) -> Vec<PathBuf> {
    [&file.ca_file, &file.cert_file, &file.key_file]
        .into_iter()
        .flatten()
        .cloned()
        .collect()
}

/// Process-wide rustls crypto provider, falling back to ring
pub fn crypto_provider() -> Arc<CryptoProvider> {
    CryptoProvider::get_default()
        .cloned()
        .unwrap_or_else(|| Arc::new(rustls::crypto::ring::default_provider()))
}
