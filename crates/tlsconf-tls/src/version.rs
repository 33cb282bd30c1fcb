//! Protocol version table

use rustls::{ProtocolVersion, SupportedProtocolVersion};
use std::fmt;
use std::str::FromStr;
use tlsconf_core::{Error, Result};

/// TLS protocol version recognized in config files
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TlsVersion {
    /// TLS 1.0 (`TLS10`)
    Tls10,
    /// TLS 1.1 (`TLS11`)
    Tls11,
    /// TLS 1.2 (`TLS12`)
    Tls12,
    /// TLS 1.3 (`TLS13`)
    Tls13,
}

impl TlsVersion {
    /// All versions, oldest first
    pub const ALL: [TlsVersion; 4] = [
        TlsVersion::Tls10,
        TlsVersion::Tls11,
        TlsVersion::Tls12,
        TlsVersion::Tls13,
    ];

    /// Name used in config files
    pub fn name(self) -> &'static str {
        match self {
            TlsVersion::Tls10 => "TLS10",
            TlsVersion::Tls11 => "TLS11",
            TlsVersion::Tls12 => "TLS12",
            TlsVersion::Tls13 => "TLS13",
        }
    }

    /// Wire code of the version
    pub fn code(self) -> u16 {
        match self {
            TlsVersion::Tls10 => 0x0301,
            TlsVersion::Tls11 => 0x0302,
            TlsVersion::Tls12 => 0x0303,
            TlsVersion::Tls13 => 0x0304,
        }
    }

    /// Get the rustls protocol version
    pub fn protocol_version(self) -> ProtocolVersion {
        match self {
            TlsVersion::Tls10 => ProtocolVersion::TLSv1_0,
            TlsVersion::Tls11 => ProtocolVersion::TLSv1_1,
            TlsVersion::Tls12 => ProtocolVersion::TLSv1_2,
            TlsVersion::Tls13 => ProtocolVersion::TLSv1_3,
        }
    }

    /// rustls implementation of this version, if it has one
    ///
    /// rustls only speaks TLS 1.2 and TLS 1.3.
    pub fn supported(self) -> Option<&'static SupportedProtocolVersion> {
        match self {
            TlsVersion::Tls12 => Some(&rustls::version::TLS12),
            TlsVersion::Tls13 => Some(&rustls::version::TLS13),
            TlsVersion::Tls10 | TlsVersion::Tls11 => None,
        }
    }
}

impl FromStr for TlsVersion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        TlsVersion::ALL
            .into_iter()
            .find(|v| v.name() == s)
            .ok_or_else(|| Error::Config(format!("unknown TLS version: {s}")))
    }
}

impl fmt::Display for TlsVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// rustls versions allowed by optional `[min, max]` bounds, newest first
pub fn supported_versions(
    min: Option<TlsVersion>,
    max: Option<TlsVersion>,
) -> Result<Vec<&'static SupportedProtocolVersion>> {
    let versions: Vec<_> = TlsVersion::ALL
        .into_iter()
        .rev()
        .filter(|v| min.map_or(true, |min| *v >= min))
        .filter(|v| max.map_or(true, |max| *v <= max))
        .filter_map(TlsVersion::supported)
        .collect();

    if versions.is_empty() {
        return Err(Error::Config(format!(
            "no supported TLS version between {} and {}",
            min.map_or("any", TlsVersion::name),
            max.map_or("any", TlsVersion::name)
        )));
    }

    Ok(versions)
}
