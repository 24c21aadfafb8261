//! Percent-encoding of URI components.
//!
//! Each component has its own [`AsciiSet`] listing the characters to encode. Every
//! character in the set is encoded byte-wise as an uppercase `%XY` escape, and the
//! characters removed from it are kept. Existing valid escapes are preserved, so
//! encoding an already encoded string is a no-op.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Encoded in host and user info. Unreserved characters, sub-delims and `%` are kept.
pub const HOST: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'.')
    .remove(b'-')
    .remove(b'_')
    .remove(b'~')
    .remove(b'&')
    .remove(b'=')
    .remove(b'+')
    .remove(b';')
    .remove(b',')
    .remove(b'$')
    .remove(b'!')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')')
    .remove(b'*')
    .remove(b'%');

/// Encoded in the user info password part, which also keeps `:`.
pub const PASSWORD: &AsciiSet = &HOST.remove(b':');

/// Encoded in paths. Keeps what the host set keeps plus `:`, `/` and `@`.
pub const PATH: &AsciiSet = &HOST.remove(b':').remove(b'/').remove(b'@');

/// Encoded in queries and fragments. Keeps what the path set keeps plus `?`.
pub const QUERY: &AsciiSet = &PATH.remove(b'?');

/// Percent-encode the characters of `text` that are in `charset`.
///
/// Any `%` that does not start a valid two-digit hex escape is encoded as `%25` first.
/// With `normalize_case` every escape is uppercased afterwards (`%2f` becomes `%2F`).
pub fn encode(text: &str, charset: &'static AsciiSet, normalize_case: bool) -> String {
    let escaped = escape_stray_percent(text);
    let encoded = utf8_percent_encode(&escaped, charset).to_string();
    if normalize_case {
        uppercase_escapes(&encoded)
    } else {
        encoded
    }
}

/// Uppercase both characters following every `%` escape.
pub fn uppercase_escapes(text: &str) -> String {
    let mut bytes = text.as_bytes().to_vec();
    let mut i = 0;
    while i + 2 < bytes.len() {
        if bytes[i] == b'%' && bytes[i + 1].is_ascii_alphanumeric() && bytes[i + 2].is_ascii_alphanumeric() {
            bytes[i + 1] = bytes[i + 1].to_ascii_uppercase();
            bytes[i + 2] = bytes[i + 2].to_ascii_uppercase();
            i += 3;
        } else {
            i += 1;
        }
    }

    // Only ASCII bytes were touched, so the buffer is still valid UTF-8
    String::from_utf8(bytes).unwrap_or_else(|_| text.to_string())
}

fn escape_stray_percent(text: &str) -> String {
    let bytes = text.as_bytes();
    let mut escaped = String::with_capacity(text.len());
    for (i, c) in text.char_indices() {
        let valid_escape = c == '%'
            && bytes.get(i + 1).is_some_and(u8::is_ascii_hexdigit)
            && bytes.get(i + 2).is_some_and(u8::is_ascii_hexdigit);
        if c == '%' && !valid_escape {
            escaped.push_str("%25");
        } else {
            escaped.push(c);
        }
    }
    escaped
}
