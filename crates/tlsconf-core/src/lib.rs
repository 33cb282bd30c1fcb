//! # tlsconf Core
//!
//! Shared error handling for the tlsconf crates.
//!
//! Every fallible operation in the workspace returns [`Result`], whose error
//! side distinguishes:
//! - I/O failures reading the config file or PEM material
//! - Unsupported config file extensions
//! - Strict decode failures (YAML and JSON)
//! - Semantic validation failures
//! - Errors raised by `rustls` while assembling runtime configs

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    missing_debug_implementations,
    rust_2018_idioms,
    unreachable_pub
)]

pub mod error;

pub use error::{Error, Result};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::error::{Error, Result};
}
