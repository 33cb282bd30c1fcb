//! Client certificate callback

use rustls::client::ResolvesClientCert;
use rustls::sign::CertifiedKey;
use rustls::SignatureScheme;
use std::sync::Arc;
use tracing::debug;

/// Hands the configured certificate to rustls whenever a server requests one
#[derive(Debug)]
pub struct ClientCertResolver {
    certified_key: Arc<CertifiedKey>,
}

impl ClientCertResolver {
    /// Create a resolver that always offers `certified_key`
    pub fn new(certified_key: Arc<CertifiedKey>) -> Self {
        Self { certified_key }
    }
}

impl ResolvesClientCert for ClientCertResolver {
    fn resolve(
        &self,
        _root_hint_subjects: &[&[u8]],
        sigschemes: &[SignatureScheme],
    ) -> Option<Arc<CertifiedKey>> {
        if self.certified_key.key.choose_scheme(sigschemes).is_none() {
            debug!(?sigschemes, "Client certificate key cannot sign with any offered scheme");
            return None;
        }
        Some(Arc::clone(&self.certified_key))
    }

    fn has_certs(&self) -> bool {
        true
    }
}
