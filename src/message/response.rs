//! HTTP responses.

use crate::headers::HeaderMap;
use crate::message::base::{Message, MessageCore};
use crate::message::error::Error;
use crate::message::status::reason_phrase;
use crate::message::version::HttpVersion;
use crate::stream::Stream;

/// Optional response construction parameters.
#[derive(Debug, Clone, Default)]
pub struct ResponseParams {
    /// Protocol version, `1.1` by default.
    pub version: HttpVersion,
    /// Reason phrase, the standard phrase of the status code by default.
    pub reason: Option<String>,
}

/// An HTTP response.
#[derive(Debug, Clone)]
pub struct Response {
    core: MessageCore,
    status: u16,
    reason: String,
}

impl Response {
    /// Create a new response.
    ///
    /// # Arguments
    ///
    /// * `status` - Status code within 100-599
    /// * `body` - Body stream
    /// * `headers` - Initial headers
    /// * `params` - Protocol version and reason phrase
    pub fn new(status: u16, body: Stream, headers: HeaderMap, params: ResponseParams) -> Result<Self, Error> {
        let status = valid_status(status)?;
        Ok(Self {
            core: MessageCore::new(params.version, headers, body),
            status,
            reason: resolve_reason(status, params.reason.as_deref()),
        })
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn reason_phrase(&self) -> &str {
        &self.reason
    }

    /// Derive a response with another status.
    ///
    /// Without a reason (or with an empty one) the standard phrase is used.
    pub fn with_status(&self, status: u16, reason: Option<&str>) -> Result<Self, Error> {
        let status = valid_status(status)?;
        let mut response = self.clone();
        response.status = status;
        response.reason = resolve_reason(status, reason);
        Ok(response)
    }
}

impl Message for Response {
    fn core(&self) -> &MessageCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut MessageCore {
        &mut self.core
    }
}

fn valid_status(status: u16) -> Result<u16, Error> {
    match status {
        100..=599 => Ok(status),
        _ => Err(Error::InvalidStatusCode(status)),
    }
}

fn resolve_reason(status: u16, reason: Option<&str>) -> String {
    match reason {
        Some(reason) if !reason.is_empty() => reason.to_string(),
        _ => reason_phrase(status).to_string(),
    }
}
