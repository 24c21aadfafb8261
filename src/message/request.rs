//! Client-side requests and the behavior shared with server requests.

use std::sync::Arc;

use log::trace;

use crate::headers::HeaderMap;
use crate::message::base::{Message, MessageCore};
use crate::message::error::Error;
use crate::message::method::Method;
use crate::message::version::HttpVersion;
use crate::stream::Stream;
use crate::uri::Uri;

/// Method, URI and explicit request target of a request.
#[derive(Debug, Clone)]
pub struct RequestCore {
    method: Method,
    uri: Arc<Uri>,
    target: Option<String>,
}

impl RequestCore {
    pub fn new(method: &str, uri: Uri, target: Option<&str>) -> Result<Self, Error> {
        Ok(Self {
            method: method.parse()?,
            uri: Arc::new(uri),
            target: target.and_then(valid_target),
        })
    }

    pub fn uri(&self) -> &Uri {
        &self.uri
    }
}

/// Set a Host header from the URI host, skipping URIs without a host.
///
/// With `preserve_host` an existing Host header is kept. Otherwise any case variant
/// of it is replaced.
pub(crate) fn resolve_host(core: &mut MessageCore, uri: &Uri, preserve_host: bool) {
    let host = uri.host();
    if host.is_empty() || (preserve_host && core.headers().contains("host")) {
        return;
    }
    trace!("Setting Host header from URI host {}", host);
    core.headers_mut().insert_trusted("Host", vec![host.to_string()]);
}

// Only `*` or anything that parses as a URI is kept as an explicit target
fn valid_target(target: &str) -> Option<String> {
    let valid = target == "*" || (!target.is_empty() && Uri::parse(target).is_ok());
    valid.then(|| target.to_string())
}

/// Operations common to client and server requests.
pub trait RequestMessage: Message {
    fn request_core(&self) -> &RequestCore;

    fn request_core_mut(&mut self) -> &mut RequestCore;

    fn method(&self) -> &Method {
        &self.request_core().method
    }

    /// Derive a request with another method. Any valid token is accepted.
    fn with_method(&self, method: &str) -> Result<Self, Error> {
        let method: Method = method.parse()?;
        let mut request = self.clone();
        request.request_core_mut().method = method;
        Ok(request)
    }

    fn uri(&self) -> &Uri {
        &self.request_core().uri
    }

    /// Derive a request with another URI.
    ///
    /// The Host header is updated from the URI host unless `preserve_host` is set
    /// and the request already has one.
    fn with_uri(&self, uri: Uri, preserve_host: bool) -> Self {
        let mut request = self.clone();
        resolve_host(request.core_mut(), &uri, preserve_host);
        request.request_core_mut().uri = Arc::new(uri);
        request
    }

    /// The explicit target, or the URI path and query, or `/` when both are empty.
    fn request_target(&self) -> String {
        let core = self.request_core();
        if let Some(target) = &core.target {
            return target.clone();
        }

        let (path, query) = (core.uri.path(), core.uri.query());
        match (path.is_empty(), query.is_empty()) {
            (true, true) => "/".to_string(),
            (_, true) => path.to_string(),
            _ => format!("{}?{}", path, query),
        }
    }

    /// Derive a request with an explicit target.
    ///
    /// An invalid target resets the request to deriving its target from the URI.
    fn with_request_target(&self, target: &str) -> Self {
        let mut request = self.clone();
        request.request_core_mut().target = valid_target(target);
        request
    }
}

/// Optional request construction parameters.
#[derive(Debug, Clone, Default)]
pub struct RequestParams {
    /// Protocol version, `1.1` by default.
    pub version: HttpVersion,
    /// Explicit request target.
    pub target: Option<String>,
}

/// An outgoing, client-side HTTP request.
#[derive(Debug, Clone)]
pub struct Request {
    core: MessageCore,
    request: RequestCore,
}

impl Request {
    /// Create a new request.
    ///
    /// # Arguments
    ///
    /// * `method` - Method token, fails with `InvalidMethodToken` if invalid
    /// * `uri` - Request URI, a missing Host header is derived from its host
    /// * `body` - Body stream
    /// * `headers` - Initial headers
    /// * `params` - Protocol version and request target
    pub fn new(method: &str, uri: Uri, body: Stream, headers: HeaderMap, params: RequestParams) -> Result<Self, Error> {
        let request = RequestCore::new(method, uri, params.target.as_deref())?;
        let mut core = MessageCore::new(params.version, headers, body);
        resolve_host(&mut core, &request.uri, true);
        Ok(Self { core, request })
    }
}

impl Message for Request {
    fn core(&self) -> &MessageCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut MessageCore {
        &mut self.core
    }
}

impl RequestMessage for Request {
    fn request_core(&self) -> &RequestCore {
        &self.request
    }

    fn request_core_mut(&mut self) -> &mut RequestCore {
        &mut self.request
    }
}
