//! Uploaded files and the upload tree normalizer.

mod code;
mod error;
mod file;
mod tests;
mod tree;

// Re-export public items
pub use code::ErrorCode;
pub use error::{DenialReason, Error};
pub use file::UploadedFile;
pub use tree::{normalize_files, FileInput, FileTree};
