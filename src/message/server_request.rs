//! Server-side requests carrying environment data.

use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::Value;

use crate::headers::HeaderMap;
use crate::message::base::{Message, MessageCore};
use crate::message::error::Error;
use crate::message::request::{resolve_host, RequestCore, RequestMessage};
use crate::message::version::HttpVersion;
use crate::stream::Stream;
use crate::upload::FileTree;
use crate::uri::Uri;

/// Server request construction parameters.
#[derive(Debug, Clone, Default)]
pub struct ServerRequestParams {
    /// Protocol version, `1.1` by default.
    pub version: HttpVersion,
    /// Explicit request target.
    pub target: Option<String>,
    pub server: IndexMap<String, String>,
    pub cookie: IndexMap<String, String>,
    pub query: IndexMap<String, Value>,
    /// Deserialized body, an object or an array. Empty structures become `None`.
    pub parsed_body: Option<Value>,
    pub files: IndexMap<String, FileTree>,
}

/// An incoming request as seen by a server.
///
/// Besides the request itself it exposes the server environment, cookies, query
/// parameters, the parsed body, uploaded files and free-form attributes. Collections
/// are shared between derived requests until one of them replaces a collection.
#[derive(Debug, Clone)]
pub struct ServerRequest {
    core: MessageCore,
    request: RequestCore,
    server: Arc<IndexMap<String, String>>,
    cookie: Arc<IndexMap<String, String>>,
    query: Arc<IndexMap<String, Value>>,
    parsed_body: Option<Arc<Value>>,
    files: Arc<IndexMap<String, FileTree>>,
    attributes: Arc<IndexMap<String, Value>>,
}

impl ServerRequest {
    /// Create a new server request.
    ///
    /// # Arguments
    ///
    /// * `method` - Method token, fails with `InvalidMethodToken` if invalid
    /// * `uri` - Request URI, a missing Host header is derived from its host
    /// * `body` - Body stream
    /// * `headers` - Initial headers
    /// * `params` - Protocol version, target and environment collections
    pub fn new(
        method: &str,
        uri: Uri,
        body: Stream,
        headers: HeaderMap,
        params: ServerRequestParams,
    ) -> Result<Self, Error> {
        let request = RequestCore::new(method, uri, params.target.as_deref())?;
        let mut core = MessageCore::new(params.version, headers, body);
        resolve_host(&mut core, request.uri(), true);

        Ok(Self {
            core,
            request,
            server: Arc::new(params.server),
            cookie: Arc::new(params.cookie),
            query: Arc::new(params.query),
            parsed_body: valid_parsed_body(params.parsed_body)?.map(Arc::new),
            files: Arc::new(params.files),
            attributes: Arc::default(),
        })
    }

    pub fn server_params(&self) -> &IndexMap<String, String> {
        &self.server
    }

    pub fn cookie_params(&self) -> &IndexMap<String, String> {
        &self.cookie
    }

    pub fn with_cookie_params(&self, cookies: IndexMap<String, String>) -> Self {
        let mut request = self.clone();
        request.cookie = Arc::new(cookies);
        request
    }

    pub fn query_params(&self) -> &IndexMap<String, Value> {
        &self.query
    }

    pub fn with_query_params(&self, query: IndexMap<String, Value>) -> Self {
        let mut request = self.clone();
        request.query = Arc::new(query);
        request
    }

    pub fn parsed_body(&self) -> Option<&Value> {
        self.parsed_body.as_deref()
    }

    /// Derive a request with another parsed body.
    ///
    /// Fails with `InvalidParsedBody` for anything but an object, an array or null.
    pub fn with_parsed_body(&self, data: Option<Value>) -> Result<Self, Error> {
        let parsed_body = valid_parsed_body(data)?.map(Arc::new);
        let mut request = self.clone();
        request.parsed_body = parsed_body;
        Ok(request)
    }

    pub fn uploaded_files(&self) -> &IndexMap<String, FileTree> {
        &self.files
    }

    pub fn with_uploaded_files(&self, files: IndexMap<String, FileTree>) -> Self {
        let mut request = self.clone();
        request.files = Arc::new(files);
        request
    }

    pub fn attributes(&self) -> &IndexMap<String, Value> {
        &self.attributes
    }

    pub fn attribute(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }

    pub fn with_attribute(&self, name: &str, value: impl Into<Value>) -> Self {
        let mut request = self.clone();
        Arc::make_mut(&mut request.attributes).insert(name.to_string(), value.into());
        request
    }

    pub fn without_attribute(&self, name: &str) -> Self {
        let mut request = self.clone();
        if self.attributes.contains_key(name) {
            Arc::make_mut(&mut request.attributes).shift_remove(name);
        }
        request
    }

    pub(crate) fn with_attributes(mut self, attributes: IndexMap<String, Value>) -> Self {
        self.attributes = Arc::new(attributes);
        self
    }
}

impl Message for ServerRequest {
    fn core(&self) -> &MessageCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut MessageCore {
        &mut self.core
    }
}

impl RequestMessage for ServerRequest {
    fn request_core(&self) -> &RequestCore {
        &self.request
    }

    fn request_core_mut(&mut self) -> &mut RequestCore {
        &mut self.request
    }
}

fn valid_parsed_body(data: Option<Value>) -> Result<Option<Value>, Error> {
    match data {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Object(map)) if map.is_empty() => Ok(None),
        Some(Value::Array(items)) if items.is_empty() => Ok(None),
        Some(data @ (Value::Object(_) | Value::Array(_))) => Ok(Some(data)),
        Some(other) => Err(Error::InvalidParsedBody(other.to_string())),
    }
}
