//! Error types for tlsconf

/// Result type alias using [`Error`]
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Main error type for tlsconf
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// I/O error, passed through from the filesystem untouched
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Config file extension with no registered decoder
    #[error("Unknown extension: {0}")]
    UnknownExtension(String),

    /// Strict YAML decode failure
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Strict JSON decode failure
    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Semantic validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error reported by rustls while building a runtime config
    #[error("TLS error: {0}")]
    Tls(#[from] rustls::Error),
}

impl Error {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Error::Config(message.into())
    }

    /// Returns true if the error came from decoding the document
    pub fn is_decode(&self) -> bool {
        matches!(self, Error::Yaml(_) | Error::Json(_))
    }
}
