//! Upload status codes.

use std::fmt;

use crate::upload::error::Error;

/// Status of a single file upload, as reported by the environment (0-8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ErrorCode(u8);

impl ErrorCode {
    pub const OK: ErrorCode = ErrorCode(0);
    pub const INI_SIZE: ErrorCode = ErrorCode(1);
    pub const FORM_SIZE: ErrorCode = ErrorCode(2);
    pub const PARTIAL: ErrorCode = ErrorCode(3);
    pub const NO_FILE: ErrorCode = ErrorCode(4);
    pub const NO_TMP_DIR: ErrorCode = ErrorCode(6);
    pub const CANT_WRITE: ErrorCode = ErrorCode(7);
    pub const EXTENSION: ErrorCode = ErrorCode(8);

    pub fn is_ok(self) -> bool {
        self == Self::OK
    }

    pub fn as_u8(self) -> u8 {
        self.0
    }

    /// Short description of the code.
    pub fn description(self) -> &'static str {
        match self.0 {
            0 => "upload successful",
            1 => "file exceeds the server size limit",
            2 => "file exceeds the form size limit",
            3 => "file was only partially uploaded",
            4 => "no file was uploaded",
            6 => "missing temporary directory",
            7 => "failed to write file to disk",
            8 => "upload stopped by an extension",
            _ => "unknown upload error",
        }
    }
}

impl TryFrom<i64> for ErrorCode {
    type Error = Error;

    fn try_from(code: i64) -> Result<Self, Self::Error> {
        match u8::try_from(code) {
            Ok(code) if code <= 8 => Ok(ErrorCode(code)),
            _ => Err(Error::InvalidErrorCode(code)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.0, self.description())
    }
}
