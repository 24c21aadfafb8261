//! Error types for URI parsing and construction.

use thiserror::Error;

/// Errors that can occur while parsing or building a URI.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The string cannot be decomposed into URI components.
    #[error("Malformed URI string: `{0}`")]
    MalformedUri(String),

    /// The scheme is not one of the supported schemes.
    #[error("Unsupported scheme: {0}")]
    UnsupportedScheme(String),

    /// The port is outside of the 1-65535 range.
    #[error("Invalid port {0} - expected value in range <1-65535>")]
    InvalidPort(u32),
}
