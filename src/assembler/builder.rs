//! Assembly of server requests from environment data.

use indexmap::IndexMap;
use log::debug;
use serde_json::Value;

use crate::assembler::environment::Environment;
use crate::assembler::source::HeaderSource;
use crate::headers::{Error as HeaderError, HeaderMap};
use crate::message::{Error, HttpVersion, ServerRequest, ServerRequestParams};
use crate::stream::Stream;
use crate::upload::normalize_files;
use crate::uri::{Error as UriError, Segments, Uri};

/// Builds a [`ServerRequest`] from an [`Environment`].
///
/// The body defaults to an empty memory stream. A [`HeaderSource`] can supply the
/// `Authorization` header when the environment lacks it.
pub struct RequestAssembler {
    environment: Environment,
    body: Stream,
    header_source: Option<Box<dyn HeaderSource>>,
}

impl RequestAssembler {
    pub fn new(environment: Environment) -> Self {
        Self {
            environment,
            body: Stream::memory(),
            header_source: None,
        }
    }

    pub fn with_body(mut self, body: Stream) -> Self {
        self.body = body;
        self
    }

    pub fn with_header_source(mut self, source: impl HeaderSource + 'static) -> Self {
        self.header_source = Some(Box::new(source));
        self
    }

    /// `REQUEST_METHOD`, or `GET`.
    pub fn method(&self) -> &str {
        self.server("REQUEST_METHOD").unwrap_or("GET")
    }

    /// Resolve the request URI from the server variables.
    ///
    /// The scheme is `https` when `HTTPS` is set to anything but `0` or `off`. The host
    /// comes from `HTTP_HOST` (`localhost` by default), the port from `SERVER_PORT`
    /// or else from a port suffix of `HTTP_HOST`, and the rest from `REQUEST_URI`.
    pub fn uri(&self) -> Result<Uri, UriError> {
        let https = self.server("HTTPS").is_some_and(|flag| is_set(flag) && flag != "off");
        let (host, host_port) = split_host_port(self.server("HTTP_HOST").unwrap_or("localhost"));
        let port = match self.server("SERVER_PORT").or(host_port) {
            Some(port) => Some(
                port.parse::<u32>()
                    .map_err(|_| UriError::MalformedUri(format!("{}:{}", host, port)))?,
            ),
            None => None,
        };

        let request_uri = self.server("REQUEST_URI").unwrap_or("/");
        let (rest, fragment) = request_uri.split_once('#').unwrap_or((request_uri, ""));
        let (path, query) = rest.split_once('?').unwrap_or((rest, ""));

        Uri::from_segments(Segments {
            scheme: Some((if https { "https" } else { "http" }).to_string()),
            host: Some(host.to_string()),
            port,
            path: Some(path.to_string()),
            query: Some(query.to_string()),
            fragment: Some(fragment.to_string()),
            ..Default::default()
        })
    }

    /// Synthesize headers from `HTTP_*` and `CONTENT_*` server variables.
    ///
    /// Variables whose value is empty or `0` are skipped. A missing `Authorization` header is
    /// looked up in the header source, as `Authorization` and then `authorization`.
    pub fn headers(&self) -> Result<HeaderMap, HeaderError> {
        let mut headers = HeaderMap::new();
        for (key, value) in &self.environment.server {
            match header_name(key) {
                Some(name) if is_set(value) => headers.insert(&name, value)?,
                _ => continue,
            }
        }

        if !headers.contains("Authorization") {
            let fallback = self.header_source.as_ref().and_then(|source| {
                source
                    .header("Authorization")
                    .or_else(|| source.header("authorization"))
            });
            if let Some(value) = fallback.filter(|value| is_set(value)) {
                headers.insert("Authorization", value)?;
            }
        }

        Ok(headers)
    }

    /// Protocol version from `SERVER_PROTOCOL` (`HTTP/2` gives `2`), or `1.1`.
    pub fn protocol_version(&self) -> Result<HttpVersion, Error> {
        match self.server("SERVER_PROTOCOL") {
            Some(protocol) => HttpVersion::from_protocol(protocol),
            None => Ok(HttpVersion::default()),
        }
    }

    /// Server request parameters, with upload data normalized into file trees.
    pub fn params(&self) -> Result<ServerRequestParams, Error> {
        let env = &self.environment;
        let parsed_body = (!env.post.is_empty()).then(|| Value::Object(env.post.clone().into_iter().collect()));

        Ok(ServerRequestParams {
            version: self.protocol_version()?,
            target: None,
            server: env.server.clone(),
            cookie: env.cookie.clone(),
            query: env.get.clone(),
            parsed_body,
            files: normalize_files(env.files.clone())?,
        })
    }

    /// Build the server request, attaching `attributes`.
    pub fn assemble(&self, attributes: IndexMap<String, Value>) -> Result<ServerRequest, Error> {
        let uri = self.uri()?;
        let headers = self.headers()?;
        let params = self.params()?;
        debug!("Assembling {} request for {}", self.method(), uri);

        let request = ServerRequest::new(self.method(), uri, self.body.clone(), headers, params)?;
        Ok(request.with_attributes(attributes))
    }

    fn server(&self, key: &str) -> Option<&str> {
        self.environment
            .server
            .get(key)
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }
}

// `0` counts as unset, like an empty value
fn is_set(value: &str) -> bool {
    !value.is_empty() && value != "0"
}

// `example.com:8080` carries a port, `[::1]` is a bare IP literal
fn split_host_port(host: &str) -> (&str, Option<&str>) {
    if host.ends_with(']') {
        return (host, None);
    }
    match host.rsplit_once(':') {
        Some((name, port)) if !port.is_empty() && port.bytes().all(|b| b.is_ascii_digit()) => (name, Some(port)),
        _ => (host, None),
    }
}

fn header_name(key: &str) -> Option<String> {
    let name = match key.strip_prefix("HTTP_") {
        Some(_) if key == "HTTP_CONTENT_MD5" => return Some("Content-MD5".to_string()),
        Some(name) => name,
        None if key.starts_with("CONTENT_") => key,
        None => return None,
    };
    (!name.is_empty()).then(|| title_case(name))
}

/// `ACCEPT_LANGUAGE` becomes `Accept-Language`.
fn title_case(name: &str) -> String {
    name.to_ascii_lowercase()
        .split('_')
        .map(|segment| {
            let mut chars = segment.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join("-")
}
