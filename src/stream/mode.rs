//! Stream open modes.

use std::fmt;
use std::fs::OpenOptions;
use std::str::FromStr;

use crate::stream::error::Error;

/// An fopen-style mode such as `r`, `w+b` or `ab+`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mode {
    raw: String,
    base: u8,
    plus: bool,
}

impl Mode {
    /// Mode of streams created in memory.
    pub fn read_write() -> Self {
        Self {
            raw: "w+b".to_string(),
            base: b'w',
            plus: true,
        }
    }

    /// Readable when opened for reading or with `+`.
    pub fn readable(&self) -> bool {
        self.base == b'r' || self.plus
    }

    /// Writable when opened with `w`, `a`, `x`, `c` or with `+`.
    pub fn writable(&self) -> bool {
        self.base != b'r' || self.plus
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// File open options equivalent to this mode.
    pub fn open_options(&self) -> OpenOptions {
        let mut options = OpenOptions::new();
        options.read(self.readable());
        match self.base {
            b'w' => options.write(true).create(true).truncate(true),
            b'a' => options.append(true).create(true),
            b'x' => options.write(true).create_new(true),
            b'c' => options.write(true).create(true),
            _ => options.write(self.plus),
        };
        options
    }
}

impl FromStr for Mode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = s.as_bytes();
        let valid_base = bytes.first().is_some_and(|b| b"acrwx".contains(b));
        let valid_flags = matches!(
            &bytes[bytes.len().min(1)..],
            b"" | b"+" | b"t" | b"b" | b"+t" | b"+b" | b"t+" | b"b+"
        );
        if !valid_base || !valid_flags {
            return Err(Error::InvalidMode(s.to_string()));
        }

        Ok(Self {
            raw: s.to_string(),
            base: bytes[0],
            plus: s.contains('+'),
        })
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
