//! HTTP protocol versions.

use std::fmt;
use std::str::FromStr;

use crate::message::error::Error;

/// Supported HTTP protocol versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HttpVersion {
    Http10,
    #[default]
    Http11,
    Http20,
}

impl HttpVersion {
    /// The bare version number (`1.0`, `1.1` or `2`).
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpVersion::Http10 => "1.0",
            HttpVersion::Http11 => "1.1",
            HttpVersion::Http20 => "2",
        }
    }

    /// Parse the version out of a protocol string such as `HTTP/1.1`.
    pub fn from_protocol(protocol: &str) -> Result<Self, Error> {
        match protocol.split_once('/') {
            Some((_, version)) => version.parse(),
            None => Err(Error::UnsupportedProtocolVersion(protocol.to_string())),
        }
    }
}

impl FromStr for HttpVersion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1.0" => Ok(HttpVersion::Http10),
            "1.1" => Ok(HttpVersion::Http11),
            "2" => Ok(HttpVersion::Http20),
            _ => Err(Error::UnsupportedProtocolVersion(s.to_string())),
        }
    }
}

impl fmt::Display for HttpVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
