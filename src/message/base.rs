//! State and behavior shared by every message type.

use std::sync::Arc;

use crate::headers::{HeaderMap, IntoHeaderValues};
use crate::message::error::Error;
use crate::message::version::HttpVersion;
use crate::stream::Stream;

/// Protocol version, headers and body of a message.
///
/// Headers sit behind an [`Arc`] and are copied only when a derived message
/// changes them. The body stream is shared between all derived messages.
#[derive(Debug, Clone)]
pub struct MessageCore {
    version: HttpVersion,
    headers: Arc<HeaderMap>,
    body: Stream,
}

impl MessageCore {
    pub fn new(version: HttpVersion, headers: HeaderMap, body: Stream) -> Self {
        Self {
            version,
            headers: Arc::new(headers),
            body,
        }
    }

    pub fn version(&self) -> HttpVersion {
        self.version
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> &Stream {
        &self.body
    }

    /// Whether both cores share the same header storage.
    pub fn shares_headers(&self, other: &MessageCore) -> bool {
        Arc::ptr_eq(&self.headers, &other.headers)
    }

    pub(crate) fn headers_mut(&mut self) -> &mut HeaderMap {
        Arc::make_mut(&mut self.headers)
    }
}

/// Operations common to requests and responses.
///
/// Every `with_*` method leaves `self` untouched and returns a new message.
pub trait Message: Clone {
    fn core(&self) -> &MessageCore;

    fn core_mut(&mut self) -> &mut MessageCore;

    fn protocol_version(&self) -> HttpVersion {
        self.core().version
    }

    /// Derive a message with another protocol version (`1.0`, `1.1` or `2`).
    fn with_protocol_version(&self, version: &str) -> Result<Self, Error> {
        let version: HttpVersion = version.parse()?;
        let mut message = self.clone();
        message.core_mut().version = version;
        Ok(message)
    }

    fn headers(&self) -> &HeaderMap {
        self.core().headers()
    }

    fn has_header(&self, name: &str) -> bool {
        self.headers().contains(name)
    }

    /// Values of a header, empty if absent.
    fn header(&self, name: &str) -> &[String] {
        self.headers().get(name)
    }

    /// Values of a header joined with `", "`.
    fn header_line(&self, name: &str) -> String {
        self.headers().get_line(name)
    }

    /// Derive a message with `name` replaced by `values`.
    fn with_header(&self, name: &str, values: impl IntoHeaderValues) -> Result<Self, Error> {
        let mut message = self.clone();
        message.core_mut().headers_mut().insert(name, values)?;
        Ok(message)
    }

    /// Derive a message with `values` appended to `name`.
    fn with_added_header(&self, name: &str, values: impl IntoHeaderValues) -> Result<Self, Error> {
        let mut message = self.clone();
        message.core_mut().headers_mut().append(name, values)?;
        Ok(message)
    }

    fn without_header(&self, name: &str) -> Self {
        let mut message = self.clone();
        if self.has_header(name) {
            message.core_mut().headers_mut().remove(name);
        }
        message
    }

    fn body(&self) -> &Stream {
        self.core().body()
    }

    fn with_body(&self, body: Stream) -> Self {
        let mut message = self.clone();
        message.core_mut().body = body;
        message
    }
}
