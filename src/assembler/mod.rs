//! Server request assembly.
//!
//! Turns raw environment data (server variables, query, form, cookie and upload
//! data) into a [`ServerRequest`](crate::ServerRequest).

mod builder;
mod environment;
mod source;

// Re-export public items
pub use builder::RequestAssembler;
pub use environment::Environment;
pub use source::HeaderSource;
