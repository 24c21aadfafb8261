//! Byte streams backing message bodies.
//!
//! A [`Stream`] wraps a [`Resource`] (an in-memory buffer or an opened file) and
//! checks every operation against the capabilities reported by its open mode.

mod error;
mod handle;
mod mode;
mod resource;
mod tests;

// Re-export public items
pub use error::{Capability, Error};
pub use handle::Stream;
pub use mode::Mode;
pub use resource::{FileResource, Memory, Metadata, Resource};
