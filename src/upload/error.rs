//! Error types for uploaded files and the upload tree.

use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::upload::code::ErrorCode;

/// Why access to an uploaded file was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenialReason {
    /// The upload itself failed with this code.
    UploadError(ErrorCode),
    /// The file was already moved to its target.
    AlreadyMoved,
}

impl fmt::Display for DenialReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DenialReason::UploadError(code) => write!(f, "upload error ({})", code),
            DenialReason::AlreadyMoved => write!(f, "file already moved"),
        }
    }
}

/// Errors that can occur while building or consuming uploaded files.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Cannot access file: {0}")]
    FileAccessDenied(DenialReason),

    #[error("Invalid file data structure: {0}")]
    InvalidUploadStructure(String),

    #[error("Invalid target path: {0}")]
    InvalidTargetPath(PathBuf),

    #[error("Error code out of range, must be within 0-8: {0}")]
    InvalidErrorCode(i64),

    #[error("Uploaded stream is not readable")]
    UnreadableStream,

    #[error(transparent)]
    Stream(#[from] crate::stream::Error),

    #[error("Failed to move uploaded file: {0}")]
    Io(#[from] io::Error),
}
