//! Header name and value legality rules.

use crate::headers::error::Error;

/// Check that `token` is a non-empty HTTP token (RFC 7230).
pub fn is_token(token: &str) -> bool {
    !token.is_empty() && token.bytes().all(is_token_byte)
}

fn is_token_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b"'`#$%&*+.^_|~!-".contains(&b)
}

/// Validate a header name.
pub fn valid_name(name: &str) -> Result<&str, Error> {
    if is_token(name) {
        Ok(name)
    } else {
        Err(Error::InvalidHeaderName(name.to_string()))
    }
}

/// Validate a header value.
///
/// Allowed bytes are HT, CR, LF, 0x20-0x7E and 0x80-0xFE. CR and LF may only appear
/// together as CRLF, and every CRLF must be followed by a space or tab (obsolete
/// line folding).
pub fn valid_value(value: &str) -> Result<(), Error> {
    let bytes = value.as_bytes();
    let legal = bytes.iter().enumerate().all(|(i, &b)| match b {
        b'\t' | 0x20..=0x7E | 0x80..=0xFE => true,
        b'\r' => bytes.get(i + 1) == Some(&b'\n'),
        b'\n' => i > 0 && bytes[i - 1] == b'\r' && matches!(bytes.get(i + 1), Some(b' ' | b'\t')),
        _ => false,
    });

    if legal {
        Ok(())
    } else {
        Err(Error::InvalidHeaderValue(value.to_string()))
    }
}
