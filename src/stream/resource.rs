//! Byte resources a stream can be backed by.

use std::fs::File;
use std::io::{self, Cursor, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use crate::stream::error::Error;
use crate::stream::mode::Mode;

/// Metadata describing an open resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Metadata {
    pub mode: Mode,
    pub seekable: bool,
    /// Filesystem path of file-backed resources.
    pub uri: Option<PathBuf>,
}

/// A readable, writable and seekable byte resource.
///
/// Whether a particular operation is permitted is decided by the stream from
/// [`Metadata`], not by the resource.
pub trait Resource: Read + Write + Seek + Send {
    fn metadata(&self) -> Metadata;

    /// Total size in bytes, if it can be determined.
    fn size(&self) -> io::Result<u64>;
}

/// A growable in-memory buffer.
#[derive(Debug)]
pub struct Memory {
    buffer: Cursor<Vec<u8>>,
    mode: Mode,
}

impl Memory {
    /// An empty, read-write buffer.
    pub fn new() -> Self {
        Self::with_contents(Vec::new(), Mode::read_write())
    }

    /// A buffer holding `contents`, positioned at the start.
    pub fn with_contents(contents: impl Into<Vec<u8>>, mode: Mode) -> Self {
        Self {
            buffer: Cursor::new(contents.into()),
            mode,
        }
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

impl Read for Memory {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.buffer.read(buf)
    }
}

impl Write for Memory {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Seek for Memory {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.buffer.seek(pos)
    }
}

impl Resource for Memory {
    fn metadata(&self) -> Metadata {
        Metadata {
            mode: self.mode.clone(),
            seekable: true,
            uri: None,
        }
    }

    fn size(&self) -> io::Result<u64> {
        Ok(self.buffer.get_ref().len() as u64)
    }
}

/// A file opened from the filesystem.
#[derive(Debug)]
pub struct FileResource {
    file: File,
    mode: Mode,
    path: PathBuf,
}

impl FileResource {
    /// Open `path` with an fopen-style `mode`.
    pub fn open(path: impl AsRef<Path>, mode: &str) -> Result<Self, Error> {
        let mode: Mode = mode.parse()?;
        let path = path.as_ref().to_path_buf();
        let file = mode.open_options().open(&path)?;
        Ok(Self { file, mode, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Read for FileResource {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.file.read(buf)
    }
}

impl Write for FileResource {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.file.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}

impl Seek for FileResource {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.file.seek(pos)
    }
}

impl Resource for FileResource {
    fn metadata(&self) -> Metadata {
        Metadata {
            mode: self.mode.clone(),
            seekable: true,
            uri: Some(self.path.clone()),
        }
    }

    fn size(&self) -> io::Result<u64> {
        Ok(self.file.metadata()?.len())
    }
}
