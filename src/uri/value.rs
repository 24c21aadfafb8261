//! Immutable URI value.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use crate::uri::encoding::{self, encode};
use crate::uri::error::Error;
use crate::uri::parse::{parse, Segments};
use crate::uri::scheme::Scheme;

/// An immutable URI made of seven components.
///
/// All components except the port are stored percent-encoded. Modifiers never change
/// the value in place: each `with_*` call returns a new `Uri` whose string form is
/// rebuilt on first use.
#[derive(Debug)]
pub struct Uri {
    scheme: Option<Scheme>,
    user_info: String,
    host: String,
    port: Option<u16>,
    path: String,
    query: String,
    fragment: String,
    rendered: OnceLock<String>,
}

impl Uri {
    /// Parse a URI string.
    ///
    /// # Arguments
    ///
    /// * `input` - The URI string, absolute or relative
    ///
    /// # Returns
    ///
    /// The parsed URI, or an error if the string is malformed, uses an unsupported
    /// scheme or carries an out-of-range port
    pub fn parse(input: &str) -> Result<Self, Error> {
        Self::from_segments(parse(input)?)
    }

    /// Build a URI from raw segments.
    ///
    /// Every present segment is validated and encoded independently; absent
    /// segments stay empty. A password is appended even without a user.
    pub fn from_segments(segments: Segments) -> Result<Self, Error> {
        let mut uri = Self::default();
        if let Some(scheme) = segments.scheme {
            uri.scheme = valid_scheme(&scheme)?;
        }
        if segments.user.is_some() || segments.pass.is_some() {
            uri.user_info = user_info(segments.user.as_deref().unwrap_or(""), segments.pass.as_deref());
        }
        if let Some(host) = segments.host {
            uri.host = normalized_host(&host);
        }
        if let Some(port) = segments.port {
            uri.port = Some(valid_port(port)?);
        }
        if let Some(path) = segments.path {
            uri.path = encode(&path, encoding::PATH, true);
        }
        if let Some(query) = segments.query {
            uri.query = encode(&query, encoding::QUERY, true);
        }
        if let Some(fragment) = segments.fragment {
            uri.fragment = encode(&fragment, encoding::QUERY, true);
        }
        Ok(uri)
    }

    /// Lowercase scheme name, or an empty string.
    pub fn scheme(&self) -> &str {
        self.scheme.map(|s| s.as_str()).unwrap_or("")
    }

    pub fn user_info(&self) -> &str {
        &self.user_info
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    /// The port, unless it is unset or equal to the default port of the scheme.
    pub fn port(&self) -> Option<u16> {
        match (self.port, self.scheme) {
            (Some(port), Some(scheme)) if scheme.default_port() == port => None,
            (port, _) => port,
        }
    }

    /// `[user_info@]host[:port]`, or an empty string when there is no host.
    pub fn authority(&self) -> String {
        if self.host.is_empty() {
            return String::new();
        }

        let mut authority = String::new();
        if !self.user_info.is_empty() {
            authority.push_str(&self.user_info);
            authority.push('@');
        }
        authority.push_str(&self.host);
        if let Some(port) = self.port() {
            authority.push(':');
            authority.push_str(&port.to_string());
        }
        authority
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn fragment(&self) -> &str {
        &self.fragment
    }

    /// The full URI string, computed once and cached.
    pub fn as_str(&self) -> &str {
        self.rendered.get_or_init(|| self.build())
    }

    /// Return a copy with the given scheme; an empty string removes it.
    pub fn with_scheme(&self, scheme: &str) -> Result<Self, Error> {
        let mut uri = self.derive();
        uri.scheme = valid_scheme(scheme)?;
        Ok(uri)
    }

    /// Return a copy with the given user and optional password.
    pub fn with_user_info(&self, user: &str, password: Option<&str>) -> Self {
        let mut uri = self.derive();
        uri.user_info = user_info(user, password);
        uri
    }

    pub fn with_host(&self, host: &str) -> Self {
        let mut uri = self.derive();
        uri.host = normalized_host(host);
        uri
    }

    /// Return a copy with the given port; `None` removes it.
    pub fn with_port(&self, port: Option<u16>) -> Result<Self, Error> {
        let mut uri = self.derive();
        uri.port = port.map(|port| valid_port(port.into())).transpose()?;
        Ok(uri)
    }

    pub fn with_path(&self, path: &str) -> Self {
        let mut uri = self.derive();
        uri.path = encode(path, encoding::PATH, true);
        uri
    }

    pub fn with_query(&self, query: &str) -> Self {
        let mut uri = self.derive();
        uri.query = encode(query, encoding::QUERY, true);
        uri
    }

    pub fn with_fragment(&self, fragment: &str) -> Self {
        let mut uri = self.derive();
        uri.fragment = encode(fragment, encoding::QUERY, true);
        uri
    }

    // Copy of all components with an empty string cache
    fn derive(&self) -> Self {
        Self {
            scheme: self.scheme,
            user_info: self.user_info.clone(),
            host: self.host.clone(),
            port: self.port,
            path: self.path.clone(),
            query: self.query.clone(),
            fragment: self.fragment.clone(),
            rendered: OnceLock::new(),
        }
    }

    fn build(&self) -> String {
        let mut uri = String::new();
        if let Some(scheme) = self.scheme {
            uri.push_str(scheme.as_str());
            uri.push(':');
        }

        if !self.host.is_empty() {
            uri.push_str("//");
            uri.push_str(&self.authority());
            if !self.path.is_empty() && !self.path.starts_with('/') {
                uri.push('/');
            }
            uri.push_str(&self.path);
        } else if self.path.starts_with('/') {
            // Without an authority, `//` would start a new one
            uri.push('/');
            uri.push_str(self.path.trim_start_matches('/'));
        } else {
            uri.push_str(&self.path);
        }

        if !self.query.is_empty() {
            uri.push('?');
            uri.push_str(&self.query);
        }
        if !self.fragment.is_empty() {
            uri.push('#');
            uri.push_str(&self.fragment);
        }

        if uri.is_empty() {
            uri.push('/');
        }
        uri
    }
}

impl Default for Uri {
    fn default() -> Self {
        Self {
            scheme: None,
            user_info: String::new(),
            host: String::new(),
            port: None,
            path: String::new(),
            query: String::new(),
            fragment: String::new(),
            rendered: OnceLock::new(),
        }
    }
}

impl Clone for Uri {
    fn clone(&self) -> Self {
        self.derive()
    }
}

// Equality is defined on the observable components
impl PartialEq for Uri {
    fn eq(&self, other: &Self) -> bool {
        self.scheme == other.scheme
            && self.user_info == other.user_info
            && self.host == other.host
            && self.port() == other.port()
            && self.path == other.path
            && self.query == other.query
            && self.fragment == other.fragment
    }
}

impl Eq for Uri {}

impl FromStr for Uri {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Uri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn valid_scheme(scheme: &str) -> Result<Option<Scheme>, Error> {
    if scheme.is_empty() {
        return Ok(None);
    }
    scheme.parse().map(Some)
}

fn valid_port(port: u32) -> Result<u16, Error> {
    match u16::try_from(port) {
        Ok(port) if port >= 1 => Ok(port),
        _ => Err(Error::InvalidPort(port)),
    }
}

// Lowercasing runs after encoding, then escapes are uppercased again
fn normalized_host(host: &str) -> String {
    let encoded = encode(host, encoding::HOST, false);
    encoding::uppercase_escapes(&encoded.to_ascii_lowercase())
}

fn user_info(user: &str, password: Option<&str>) -> String {
    let mut info = encode(user, encoding::HOST, true);
    if let Some(password) = password.filter(|p| !p.is_empty()) {
        info.push(':');
        info.push_str(&encode(password, encoding::PASSWORD, true));
    }
    info
}
