//! HTTP message value objects.
//!
//! Requests, responses and server requests all embed a [`MessageCore`] and share
//! its operations through the [`Message`] trait. Request types add the
//! [`RequestMessage`] operations. Every mutator returns a new message and leaves
//! the original unchanged.

mod base;
mod error;
mod method;
mod request;
mod response;
mod server_request;
mod status;
mod version;

// Re-export public items
pub use base::{Message, MessageCore};
pub use error::Error;
pub use method::Method;
pub use request::{Request, RequestCore, RequestMessage, RequestParams};
pub use response::{Response, ResponseParams};
pub use server_request::{ServerRequest, ServerRequestParams};
pub use status::reason_phrase;
pub use version::HttpVersion;
