//! TLS configuration loading for tlsconf
//!
//! Turns a YAML or JSON TLS config file into a [`ResolvedTlsConfig`] and from
//! there into rustls client and server configs:
//! - Strict decoding, picked by file extension
//! - Protocol version bounds (TLS 1.0 to TLS 1.3)
//! - Certificate and private key loading from PEM files or inline PEM
//! - CA bundles for peer verification and mutual TLS
//! - Server name override
//!
//! # Example
//!
//! ```no_run
//! let resolved = tlsconf_tls::load_tls_config("tls_config.yml")?;
//! let client = resolved.client_config()?;
//! # Ok::<(), tlsconf_core::Error>(())
//! ```

pub mod acceptor;
pub mod builder;
pub mod config;
pub mod connector;
pub mod loader;
pub mod resolver;
pub mod version;

pub use acceptor::TlsAcceptor;
pub use config::{load_tls_config, CaPool, Identity, ResolvedTlsConfig};
pub use connector::TlsConnector;
pub use loader::{load_certificates, load_private_key};
pub use resolver::ClientCertResolver;
pub use version::TlsVersion;
