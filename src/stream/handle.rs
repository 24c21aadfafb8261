//! Shared handle over a byte resource.

use std::fmt;
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use log::{debug, warn};

use crate::stream::error::{Capability, Error};
use crate::stream::mode::Mode;
use crate::stream::resource::{FileResource, Memory, Metadata, Resource};

struct State {
    resource: Option<Box<dyn Resource>>,
    metadata: Option<Metadata>,
    readable: Option<bool>,
    writable: Option<bool>,
    seekable: Option<bool>,
    eof: bool,
}

impl State {
    fn metadata(&mut self) -> Option<&Metadata> {
        if self.metadata.is_none() {
            self.metadata = self.resource.as_ref().map(|resource| resource.metadata());
        }
        self.metadata.as_ref()
    }

    fn capability(&mut self, capability: Capability) -> bool {
        let cached = match capability {
            Capability::Readable => self.readable,
            Capability::Writable => self.writable,
            Capability::Seekable => self.seekable,
        };
        if let Some(value) = cached {
            return value;
        }

        let value = self.metadata().is_some_and(|meta| match capability {
            Capability::Readable => meta.mode.readable(),
            Capability::Writable => meta.mode.writable(),
            Capability::Seekable => meta.seekable,
        });
        match capability {
            Capability::Readable => self.readable = Some(value),
            Capability::Writable => self.writable = Some(value),
            Capability::Seekable => self.seekable = Some(value),
        }
        value
    }

    /// The attached resource, provided it has `capability`.
    fn require(&mut self, capability: Capability) -> Result<&mut Box<dyn Resource>, Error> {
        if self.resource.is_none() {
            return Err(Error::Detached);
        }
        if !self.capability(capability) {
            return Err(Error::Unavailable(capability));
        }
        self.resource.as_mut().ok_or(Error::Detached)
    }

    fn detach(&mut self) -> Option<Box<dyn Resource>> {
        self.metadata = None;
        self.readable = Some(false);
        self.writable = Some(false);
        self.seekable = Some(false);
        self.resource.take()
    }
}

/// A cloneable handle to a byte stream.
///
/// Clones share the same resource and position, so a message and its derived copies
/// all observe reads and writes made through any of them. Once detached or closed,
/// every operation that needs the resource fails with [`Error::Detached`].
#[derive(Clone)]
pub struct Stream {
    inner: Arc<Mutex<State>>,
}

impl Stream {
    /// Wrap an open resource.
    pub fn new(resource: impl Resource + 'static) -> Self {
        Self {
            inner: Arc::new(Mutex::new(State {
                resource: Some(Box::new(resource)),
                metadata: None,
                readable: None,
                writable: None,
                seekable: None,
                eof: false,
            })),
        }
    }

    /// Open a file with an fopen-style mode (`r`, `w+`, `ab` ...).
    ///
    /// # Arguments
    ///
    /// * `path` - The file to open
    /// * `mode` - Open mode, fails with [`Error::InvalidMode`] if malformed
    pub fn open(path: impl AsRef<Path>, mode: &str) -> Result<Self, Error> {
        let resource = FileResource::open(path.as_ref(), mode)?;
        debug!("Opened stream {:?} with mode {}", path.as_ref(), mode);
        Ok(Self::new(resource))
    }

    /// An empty read-write stream held in memory.
    pub fn memory() -> Self {
        Self::new(Memory::new())
    }

    /// A memory stream holding `body`, positioned at the start.
    pub fn from_body_string(body: &str) -> Self {
        Self::new(Memory::with_contents(body, Mode::read_write()))
    }

    /// Whether both handles refer to the same underlying stream.
    pub fn ptr_eq(&self, other: &Stream) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Close the stream, releasing its resource.
    pub fn close(&self) {
        if let Some(mut resource) = self.detach() {
            if let Err(e) = resource.flush() {
                warn!("Failed to flush stream on close: {}", e);
            }
        }
    }

    /// Separate the resource from the stream.
    ///
    /// Returns the resource on the first call and `None` afterwards. The stream is
    /// left unusable.
    pub fn detach(&self) -> Option<Box<dyn Resource>> {
        self.state().detach()
    }

    pub fn is_detached(&self) -> bool {
        self.state().resource.is_none()
    }

    /// Size in bytes, or `None` when detached or unknown.
    pub fn size(&self) -> Option<u64> {
        let state = self.state();
        state.resource.as_ref().and_then(|resource| resource.size().ok())
    }

    /// Current position of the read/write pointer.
    pub fn tell(&self) -> Result<u64, Error> {
        let mut state = self.state();
        let resource = state.resource.as_mut().ok_or(Error::Detached)?;
        Ok(resource.stream_position()?)
    }

    /// Whether a read has hit the end of the stream.
    ///
    /// The flag is set by a read that returned fewer bytes than requested and is
    /// cleared by seeking. A detached stream is always at its end.
    pub fn eof(&self) -> bool {
        let state = self.state();
        state.resource.is_none() || state.eof
    }

    pub fn is_readable(&self) -> bool {
        self.state().capability(Capability::Readable)
    }

    pub fn is_writable(&self) -> bool {
        self.state().capability(Capability::Writable)
    }

    pub fn is_seekable(&self) -> bool {
        self.state().capability(Capability::Seekable)
    }

    /// Move the pointer.
    pub fn seek(&self, position: SeekFrom) -> Result<(), Error> {
        let mut state = self.state();
        state.require(Capability::Seekable)?.seek(position)?;
        state.eof = false;
        Ok(())
    }

    /// Seek back to the start.
    pub fn rewind(&self) -> Result<(), Error> {
        self.seek(SeekFrom::Start(0))
    }

    /// Write `bytes` at the current position, returning the number of bytes written.
    pub fn write(&self, bytes: &[u8]) -> Result<usize, Error> {
        let mut state = self.state();
        state.require(Capability::Writable)?.write_all(bytes)?;
        Ok(bytes.len())
    }

    /// Read up to `length` bytes from the current position.
    ///
    /// The buffer grows with the data actually read, so `length` may exceed the
    /// remaining size by any amount.
    pub fn read(&self, length: usize) -> Result<Vec<u8>, Error> {
        let mut state = self.state();
        let resource = state.require(Capability::Readable)?;
        let limit = u64::try_from(length).unwrap_or(u64::MAX);
        let mut buffer = Vec::new();
        Read::take(&mut **resource, limit).read_to_end(&mut buffer)?;
        if buffer.len() < length {
            state.eof = true;
        }
        Ok(buffer)
    }

    /// Read everything from the current position to the end.
    pub fn contents(&self) -> Result<Vec<u8>, Error> {
        let mut state = self.state();
        let mut buffer = Vec::new();
        state.require(Capability::Readable)?.read_to_end(&mut buffer)?;
        state.eof = true;
        Ok(buffer)
    }

    /// Metadata of the attached resource.
    pub fn metadata(&self) -> Option<Metadata> {
        self.state().metadata().cloned()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for Stream {
    fn default() -> Self {
        Self::memory()
    }
}

impl PartialEq for Stream {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for Stream {}

/// Renders the whole stream from the start, or an empty string when that fails.
impl fmt::Display for Stream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.rewind().and_then(|_| self.contents()) {
            Ok(bytes) => f.write_str(&String::from_utf8_lossy(&bytes)),
            Err(e) => {
                warn!("Failed to render stream contents: {}", e);
                Ok(())
            }
        }
    }
}

impl fmt::Debug for Stream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut debug = f.debug_struct("Stream");
        match self.inner.try_lock() {
            Ok(state) => debug
                .field("attached", &state.resource.is_some())
                .field("metadata", &state.metadata)
                .field("eof", &state.eof),
            Err(_) => debug.field("state", &"<locked>"),
        };
        debug.finish()
    }
}
