//! URI values.
//!
//! This module provides an immutable seven-component URI with RFC 3986 percent-encoding
//! of its components and scheme default port elision.

mod encoding;
mod error;
mod parse;
mod scheme;
mod value;

// Re-export public items
pub use encoding::{encode, HOST, PASSWORD, PATH, QUERY};
pub use error::Error;
pub use parse::Segments;
pub use scheme::Scheme;
pub use value::Uri;
