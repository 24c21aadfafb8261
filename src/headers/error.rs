//! Error types for header validation.

use thiserror::Error;

/// Errors that can occur when setting a header.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The header name is empty or contains characters outside of the token charset.
    #[error("Invalid header name: `{0}` - expected valid string token")]
    InvalidHeaderName(String),

    /// The header value contains illegal bytes or a line break not followed by whitespace.
    #[error("Invalid header value: {0:?}")]
    InvalidHeaderValue(String),
}
