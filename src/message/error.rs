//! Error types for HTTP messages.

use thiserror::Error;

/// Errors that can occur while constructing or deriving messages.
#[derive(Debug, Error)]
pub enum Error {
    /// The protocol version is not one of `1.0`, `1.1` or `2`.
    #[error("Unsupported HTTP protocol version: {0}")]
    UnsupportedProtocolVersion(String),

    /// The method name is not a valid token.
    #[error("Invalid HTTP method name, expected valid token: {0:?}")]
    InvalidMethodToken(String),

    /// The response status code is outside 100-599.
    #[error("Invalid status code: {0}")]
    InvalidStatusCode(u16),

    /// The parsed body is neither a structure nor empty.
    #[error("Parsed body must be an object, an array or null, found {0}")]
    InvalidParsedBody(String),

    #[error(transparent)]
    Header(#[from] crate::headers::Error),

    #[error(transparent)]
    Uri(#[from] crate::uri::Error),

    #[error(transparent)]
    Upload(#[from] crate::upload::Error),

    #[error(transparent)]
    Stream(#[from] crate::stream::Error),
}
