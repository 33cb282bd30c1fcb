//! TLS connector implementation

use crate::builder::server_name;
use crate::config::ResolvedTlsConfig;
use std::sync::Arc;
use tlsconf_core::Result;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio_rustls::TlsConnector as RustlsConnector;
use tracing::debug;

/// TLS connection dialer
#[derive(Clone)]
pub struct TlsConnector {
    inner: RustlsConnector,
    server_name: Option<String>,
}

impl TlsConnector {
    /// Create a new TLS connector from a resolved configuration
    pub fn new(config: &ResolvedTlsConfig) -> Result<Self> {
        let client_config = config.client_config()?;

        Ok(Self {
            inner: RustlsConnector::from(Arc::new(client_config)),
            server_name: config.server_name.clone(),
        })
    }

    /// Run the client handshake over `stream`
    ///
    /// `host` is the dialed host; a configured server name takes precedence.
    pub async fn connect<IO>(
        &self,
        host: &str,
        stream: IO,
    ) -> Result<tokio_rustls::client::TlsStream<IO>>
    where
        IO: AsyncRead + AsyncWrite + Unpin,
    {
        let server_name = server_name(self.server_name.as_deref(), host)?;

        debug!(server_name = ?server_name, "Starting TLS handshake");

        Ok(self.inner.connect(server_name, stream).await?)
    }
}

impl std::fmt::Debug for TlsConnector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TlsConnector")
            .field("server_name", &self.server_name)
            .finish_non_exhaustive()
    }
}
