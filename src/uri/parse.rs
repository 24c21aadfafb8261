//! Decomposition of URI strings into raw segments.

use crate::uri::error::Error;

/// Raw URI segments, keyed the same way as standard URI-parse output.
///
/// Absent segments are `None`. The values are not validated or encoded yet;
/// [`Uri::from_segments`](crate::Uri::from_segments) does that.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Segments {
    pub scheme: Option<String>,
    pub user: Option<String>,
    pub pass: Option<String>,
    pub host: Option<String>,
    pub port: Option<u32>,
    pub path: Option<String>,
    pub query: Option<String>,
    pub fragment: Option<String>,
}

/// Split `input` into its segments.
///
/// The string is cut at the first `#` (fragment) and then at the first `?` (query).
/// A leading `name:` is a scheme when `name` follows the RFC 3986 scheme grammar,
/// except for the `host:port` shorthand where only digits follow the colon.
/// A `//` marker introduces an authority, which must contain a host.
pub fn parse(input: &str) -> Result<Segments, Error> {
    let mut segments = Segments::default();
    let malformed = || Error::MalformedUri(input.to_string());

    let (rest, fragment) = split_off(input, '#');
    segments.fragment = fragment.map(str::to_string);
    let (mut rest, query) = split_off(rest, '?');
    segments.query = query.map(str::to_string);

    if let Some((prefix, tail)) = rest.split_once(':') {
        if is_scheme(prefix) {
            if let Some((port, path)) = port_shorthand(tail) {
                segments.host = Some(prefix.to_string());
                segments.port = Some(port.parse().map_err(|_| malformed())?);
                segments.path = non_empty(path);
                return Ok(segments);
            }
            segments.scheme = Some(prefix.to_string());
            rest = tail;
        }
    }

    match rest.strip_prefix("//") {
        Some(hier) => {
            let (authority, path) = match hier.find('/') {
                Some(idx) => hier.split_at(idx),
                None => (hier, ""),
            };
            parse_authority(authority, &mut segments).ok_or_else(malformed)?;
            segments.path = non_empty(path);
        }
        None => segments.path = non_empty(rest),
    }

    Ok(segments)
}

fn parse_authority(authority: &str, segments: &mut Segments) -> Option<()> {
    let host_port = match authority.rsplit_once('@') {
        Some((user_info, host_port)) => {
            match user_info.split_once(':') {
                Some((user, pass)) => {
                    segments.user = Some(user.to_string());
                    segments.pass = Some(pass.to_string());
                }
                None => segments.user = Some(user_info.to_string()),
            }
            host_port
        }
        None => authority,
    };

    let (host, port) = if host_port.starts_with('[') {
        // IP literal: the port separator can only follow the closing bracket
        let end = host_port.find(']')? + 1;
        let (host, tail) = host_port.split_at(end);
        match tail {
            "" => (host, None),
            _ => (host, Some(tail.strip_prefix(':')?)),
        }
    } else {
        match host_port.rsplit_once(':') {
            Some((host, port)) => (host, Some(port)),
            None => (host_port, None),
        }
    };

    if host.is_empty() {
        return None;
    }
    segments.host = Some(host.to_string());

    match port {
        Some(port) if !port.is_empty() => {
            if !port.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            segments.port = Some(port.parse().ok()?);
        }
        _ => {}
    }

    Some(())
}

fn split_off(text: &str, delimiter: char) -> (&str, Option<&str>) {
    match text.split_once(delimiter) {
        Some((head, tail)) => (head, Some(tail)),
        None => (text, None),
    }
}

fn is_scheme(text: &str) -> bool {
    let mut chars = text.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

// `example.com:8080/path` reads as host and port, not as scheme and path
fn port_shorthand(tail: &str) -> Option<(&str, &str)> {
    let end = tail.find('/').unwrap_or(tail.len());
    let (port, path) = tail.split_at(end);
    let digits = !port.is_empty() && port.len() <= 5 && port.bytes().all(|b| b.is_ascii_digit());
    digits.then_some((port, path))
}

fn non_empty(text: &str) -> Option<String> {
    (!text.is_empty()).then(|| text.to_string())
}
