//! Error types for stream operations.

use std::fmt;
use std::io;

use thiserror::Error;

/// A stream capability an operation depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    Readable,
    Writable,
    Seekable,
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Capability::Readable => write!(f, "readable"),
            Capability::Writable => write!(f, "writable"),
            Capability::Seekable => write!(f, "seekable"),
        }
    }
}

/// Errors that can occur during stream operations.
#[derive(Debug, Error)]
pub enum Error {
    /// The stream lacks the capability the operation requires.
    #[error("Stream is not {0}")]
    Unavailable(Capability),

    /// The underlying resource was detached or closed.
    #[error("No resource available; stream is detached")]
    Detached,

    /// The open mode string is not a valid mode.
    #[error("Invalid stream resource mode: {0}")]
    InvalidMode(String),

    /// The underlying resource call failed.
    #[error("Stream I/O failure: {0}")]
    IoFailure(#[from] io::Error),
}
