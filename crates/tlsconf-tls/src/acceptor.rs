//! TLS acceptor implementation

use crate::config::ResolvedTlsConfig;
use std::sync::Arc;
use tlsconf_core::Result;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio_rustls::TlsAcceptor as RustlsAcceptor;

/// TLS connection acceptor
#[derive(Clone)]
pub struct TlsAcceptor {
    inner: RustlsAcceptor,
}

impl TlsAcceptor {
    /// Create a new TLS acceptor from a resolved configuration
    pub fn new(config: &ResolvedTlsConfig) -> Result<Self> {
        let server_config = config.server_config()?;

        Ok(Self {
            inner: RustlsAcceptor::from(Arc::new(server_config)),
        })
    }

    /// Accept a TLS connection
    pub async fn accept<IO>(&self, stream: IO) -> Result<tokio_rustls::server::TlsStream<IO>>
    where
        IO: AsyncRead + AsyncWrite + Unpin,
    {
        Ok(self.inner.accept(stream).await?)
    }
}

impl std::fmt::Debug for TlsAcceptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TlsAcceptor").finish_non_exhaustive()
    }
}
