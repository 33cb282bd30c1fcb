//! rustls client and server configs built from a [`ResolvedTlsConfig`]

use crate::config::{crypto_provider, ResolvedTlsConfig};
use crate::version::supported_versions;
use rustls::client::danger::{HandshakeSignatureValid, ServerCertVerified, ServerCertVerifier};
use rustls::crypto::{verify_tls12_signature, verify_tls13_signature, CryptoProvider};
use rustls::pki_types::{CertificateDer, ServerName, UnixTime};
use rustls::server::WebPkiClientVerifier;
use rustls::{ClientConfig, DigitallySignedStruct, RootCertStore, ServerConfig, SignatureScheme};
use std::sync::Arc;
use tlsconf_core::{Error, Result};
use tracing::{info, warn};

impl ResolvedTlsConfig {
    /// Build a client config for dialing
    ///
    /// Peers are verified against the CA pool, or the platform roots when no
    /// pool is configured, unless `insecure_skip_verify` is set.
    pub fn client_config(&self) -> Result<ClientConfig> {
        let provider = crypto_provider();
        let versions = supported_versions(self.min_version, self.max_version)?;

        let builder = ClientConfig::builder_with_provider(Arc::clone(&provider))
            .with_protocol_versions(&versions)?;

        let builder = if self.insecure_skip_verify {
            warn!("TLS server certificate verification is disabled");
            builder
                .dangerous()
                .with_custom_certificate_verifier(Arc::new(NoServerVerification::new(provider)))
        } else {
            builder.with_root_certificates(self.root_store()?)
        };

        let config = match &self.identity {
            Some(identity) => builder.with_client_cert_resolver(identity.client_cert_resolver()?),
            None => builder.with_no_client_auth(),
        };

        Ok(config)
    }

    /// Build a server config for accepting connections
    ///
    /// Requires an identity. When a CA pool is configured, clients must
    /// present a certificate it verifies.
    pub fn server_config(&self) -> Result<ServerConfig> {
        let identity = self
            .identity
            .as_ref()
            .ok_or_else(|| Error::config("server TLS requires cert_file and key_file"))?;

        let provider = crypto_provider();
        let versions = supported_versions(self.min_version, self.max_version)?;

        let builder = ServerConfig::builder_with_provider(Arc::clone(&provider))
            .with_protocol_versions(&versions)?;

        let builder = match &self.ca_pool {
            Some(pool) => {
                let verifier =
                    WebPkiClientVerifier::builder_with_provider(Arc::new(pool.root_store()), provider)
                        .build()
                        .map_err(|e| {
                            Error::Config(format!("Failed to build client verifier: {e}"))
                        })?;
                builder.with_client_cert_verifier(verifier)
            }
            None => builder.with_no_client_auth(),
        };

        let mut server_config = builder
            .with_single_cert(identity.cert_chain().to_vec(), identity.key().clone_key())?;

        // Configure ALPN protocols (HTTP/1.1 and HTTP/2)
        server_config.alpn_protocols = vec![b"h2".to_vec(), b"http/1.1".to_vec()];

        info!(
            mtls = self.ca_pool.is_some(),
            versions = versions.len(),
            "Built TLS server config"
        );

        Ok(server_config)
    }

    /// Name to verify the server against, preferring the configured override
    pub fn server_name(&self, host: &str) -> Result<ServerName<'static>> {
        server_name(self.server_name.as_deref(), host)
    }

    fn root_store(&self) -> Result<RootCertStore> {
        if let Some(pool) = &self.ca_pool {
            return Ok(pool.root_store());
        }

        let mut roots = RootCertStore::empty();
        let (added, ignored) = roots.add_parsable_certificates(
            rustls_native_certs::load_native_certs()
                .map_err(|e| Error::Config(format!("Failed to load platform roots: {e}")))?,
        );
        if ignored > 0 {
            warn!(ignored, "Skipped unparsable platform root certificates");
        }
        info!(count = added, "Loaded platform root certificates");

        Ok(roots)
    }
}

pub(crate) fn server_name(configured: Option<&str>, host: &str) -> Result<ServerName<'static>> {
    let name = configured.unwrap_or(host);
    ServerName::try_from(name.to_string())
        .map_err(|e| Error::Config(format!("invalid server name {name:?}: {e}")))
}

/// Accepts any server certificate while still checking handshake signatures
#[derive(Debug)]
struct NoServerVerification(Arc<CryptoProvider>);

impl NoServerVerification {
    fn new(provider: Arc<CryptoProvider>) -> Self {
        Self(provider)
    }
}

impl ServerCertVerifier for NoServerVerification {
    fn verify_server_cert(
        &self,
        _end_entity: &CertificateDer<'_>,
        _intermediates: &[CertificateDer<'_>],
        _server_name: &ServerName<'_>,
        _ocsp_response: &[u8],
        _now: UnixTime,
    ) -> std::result::Result<ServerCertVerified, rustls::Error> {
        Ok(ServerCertVerified::assertion())
    }

    fn verify_tls12_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> std::result::Result<HandshakeSignatureValid, rustls::Error> {
        verify_tls12_signature(message, cert, dss, &self.0.signature_verification_algorithms)
    }

    fn verify_tls13_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> std::result::Result<HandshakeSignatureValid, rustls::Error> {
        verify_tls13_signature(message, cert, dss, &self.0.signature_verification_algorithms)
    }

    fn supported_verify_schemes(&self) -> Vec<SignatureScheme> {
        self.0.signature_verification_algorithms.supported_schemes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CaPool, Identity};
    use crate::version::TlsVersion;
    use rustls::ProtocolVersion;
    use std::path::PathBuf;

    fn testdata(name: &str) -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("testdata")
            .join(name)
    }

    fn server_identity() -> Identity {
        Identity::from_pem_files(&testdata("server.crt"), &testdata("server.key")).unwrap()
    }

    #[test]
    fn test_insecure_client_config() {
        let resolved = ResolvedTlsConfig {
            insecure_skip_verify: true,
            ..Default::default()
        };
        let config = resolved.client_config().unwrap();
        assert!(!config.client_auth_cert_resolver.has_certs());
    }

    #[test]
    fn test_client_config_with_identity() {
        let resolved = ResolvedTlsConfig {
            identity: Some(
                Identity::from_pem_files(&testdata("client.crt"), &testdata("client.key"))
                    .unwrap(),
            ),
            ca_pool: Some(CaPool::from_pem_file(&testdata("ca.crt")).unwrap()),
            ..Default::default()
        };
        let config = resolved.client_config().unwrap();
        assert!(config.client_auth_cert_resolver.has_certs());
    }

    #[test]
    fn test_client_config_rejects_legacy_only_bounds() {
        let resolved = ResolvedTlsConfig {
            insecure_skip_verify: true,
            max_version: Some(TlsVersion::Tls11),
            ..Default::default()
        };
        assert!(resolved.client_config().is_err());
    }

    #[test]
    fn test_client_config_honours_tls13_minimum() {
        let resolved = ResolvedTlsConfig {
            insecure_skip_verify: true,
            min_version: Some(TlsVersion::Tls13),
            ..Default::default()
        };
        let config = resolved.client_config().unwrap();
        assert!(config.supports_version(ProtocolVersion::TLSv1_3));
        assert!(!config.supports_version(ProtocolVersion::TLSv1_2));
    }

    #[test]
    fn test_client_config_from_tls11_minimum_keeps_both() {
        let resolved = ResolvedTlsConfig {
            insecure_skip_verify: true,
            min_version: Some(TlsVersion::Tls11),
            ..Default::default()
        };
        let config = resolved.client_config().unwrap();
        assert!(config.supports_version(ProtocolVersion::TLSv1_2));
        assert!(config.supports_version(ProtocolVersion::TLSv1_3));
    }

    #[test]
    fn test_server_config_requires_identity() {
        let err = ResolvedTlsConfig::default().server_config().unwrap_err();
        assert!(err.to_string().contains("cert_file and key_file"));
    }

    #[test]
    fn test_server_config() {
        let resolved = ResolvedTlsConfig {
            identity: Some(server_identity()),
            min_version: Some(TlsVersion::Tls13),
            ..Default::default()
        };
        let config = resolved.server_config().unwrap();
        assert_eq!(config.alpn_protocols, vec![b"h2".to_vec(), b"http/1.1".to_vec()]);
    }

    #[test]
    fn test_mtls_server_config() {
        let resolved = ResolvedTlsConfig {
            identity: Some(server_identity()),
            ca_pool: Some(CaPool::from_pem_file(&testdata("ca.crt")).unwrap()),
            ..Default::default()
        };
        assert!(resolved.server_config().is_ok());
    }

    #[test]
    fn test_server_name_override() {
        let resolved = ResolvedTlsConfig {
            server_name: Some("api.internal".to_string()),
            ..Default::default()
        };
        assert_eq!(
            resolved.server_name("10.0.0.1").unwrap(),
            ServerName::try_from("api.internal").unwrap()
        );
        assert_eq!(
            ResolvedTlsConfig::default().server_name("localhost").unwrap(),
            ServerName::try_from("localhost").unwrap()
        );
        assert!(ResolvedTlsConfig::default().server_name("not a host!").is_err());
    }
}
