//! HTTP header storage.
//!
//! This module provides the header multimap shared by every message type, together
//! with the byte-level legality rules for header names and values.

mod error;
mod map;
mod validate;
mod tests;

// Re-export public items
pub use error::Error;
pub use map::{HeaderMap, IntoHeaderValues};
pub use validate::{is_token, valid_value};
