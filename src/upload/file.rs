//! A single uploaded file.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use log::debug;

use crate::stream::Stream;
use crate::upload::code::ErrorCode;
use crate::upload::error::{DenialReason, Error};

const CHUNK_SIZE: usize = 4096;

#[derive(Debug)]
enum Source {
    /// Temporary file written by the environment.
    Path(PathBuf),
    Stream(Stream),
}

/// Metadata and content access for one uploaded file.
///
/// A file whose upload failed, or that was already moved, refuses both
/// [`stream`](Self::stream) and [`move_to`](Self::move_to). Moving happens at most
/// once.
#[derive(Debug)]
pub struct UploadedFile {
    source: Source,
    size: Option<u64>,
    error: ErrorCode,
    client_filename: Option<String>,
    client_media_type: Option<String>,
    moved: AtomicBool,
}

impl UploadedFile {
    /// Create an uploaded file backed by a readable stream.
    ///
    /// # Arguments
    ///
    /// * `stream` - File contents, must be readable
    /// * `size` - Declared size, [`size`](Self::size) falls back to the stream size
    /// * `error` - Upload status
    /// * `client_filename` - Filename sent by the client
    /// * `client_media_type` - Media type sent by the client
    pub fn new(
        stream: Stream,
        size: Option<u64>,
        error: ErrorCode,
        client_filename: Option<String>,
        client_media_type: Option<String>,
    ) -> Result<Self, Error> {
        if !stream.is_readable() {
            return Err(Error::UnreadableStream);
        }
        Ok(Self::with_source(
            Source::Stream(stream),
            size,
            error,
            client_filename,
            client_media_type,
        ))
    }

    /// Create an uploaded file stored at a temporary path.
    pub fn from_path(
        path: impl Into<PathBuf>,
        size: Option<u64>,
        error: ErrorCode,
        client_filename: Option<String>,
        client_media_type: Option<String>,
    ) -> Self {
        Self::with_source(
            Source::Path(path.into()),
            size,
            error,
            client_filename,
            client_media_type,
        )
    }

    fn with_source(
        source: Source,
        size: Option<u64>,
        error: ErrorCode,
        client_filename: Option<String>,
        client_media_type: Option<String>,
    ) -> Self {
        Self {
            source,
            size,
            error,
            client_filename,
            client_media_type,
            moved: AtomicBool::new(false),
        }
    }

    /// A stream over the file contents.
    ///
    /// Temporary files are opened read-only.
    pub fn stream(&self) -> Result<Stream, Error> {
        self.check_access()?;
        match &self.source {
            Source::Path(path) => Ok(Stream::open(path, "r")?),
            Source::Stream(stream) => Ok(stream.clone()),
        }
    }

    /// Move the file to `target`.
    ///
    /// The directory of `target` must already exist. A temporary file is renamed
    /// (or copied and removed when renaming fails, as across filesystems). A stream
    /// source is copied, closed, and its backing file, if any, is removed.
    ///
    /// The file counts as moved once `target` is written. A failure to clean up the
    /// source after that is still returned, but the file stays moved.
    pub fn move_to(&self, target: impl AsRef<Path>) -> Result<(), Error> {
        self.check_access()?;
        let target = target.as_ref();
        if !valid_target(target) {
            return Err(Error::InvalidTargetPath(target.to_path_buf()));
        }

        match &self.source {
            Source::Path(path) => {
                if fs::rename(path, target).is_ok() {
                    self.moved.store(true, Ordering::SeqCst);
                } else {
                    fs::copy(path, target)?;
                    self.moved.store(true, Ordering::SeqCst);
                    remove_source(path)?;
                }
                debug!("Moved uploaded file {:?} to {:?}", path, target);
            }
            Source::Stream(stream) => {
                copy_stream(stream, target)?;
                let backing = stream.metadata().and_then(|meta| meta.uri);
                stream.close();
                self.moved.store(true, Ordering::SeqCst);
                if let Some(path) = backing {
                    remove_source(&path)?;
                }
                debug!("Copied uploaded stream to {:?}", target);
            }
        }
        Ok(())
    }

    /// Declared size, or the size of the contents when none was declared.
    pub fn size(&self) -> Option<u64> {
        self.size.or_else(|| match &self.source {
            Source::Path(path) => fs::metadata(path).ok().map(|meta| meta.len()),
            Source::Stream(stream) => stream.size(),
        })
    }

    pub fn error(&self) -> ErrorCode {
        self.error
    }

    pub fn client_filename(&self) -> Option<&str> {
        self.client_filename.as_deref()
    }

    pub fn client_media_type(&self) -> Option<&str> {
        self.client_media_type.as_deref()
    }

    pub fn is_moved(&self) -> bool {
        self.moved.load(Ordering::SeqCst)
    }

    fn check_access(&self) -> Result<(), Error> {
        if !self.error.is_ok() {
            return Err(Error::FileAccessDenied(DenialReason::UploadError(self.error)));
        }
        if self.is_moved() {
            return Err(Error::FileAccessDenied(DenialReason::AlreadyMoved));
        }
        Ok(())
    }
}

fn valid_target(target: &Path) -> bool {
    if target.as_os_str().is_empty() || target.is_dir() {
        return false;
    }
    match target.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.is_dir(),
        _ => true,
    }
}

// A source that is already gone needs no cleanup
fn remove_source(path: &Path) -> Result<(), Error> {
    match fs::remove_file(path) {
        Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e.into()),
        _ => Ok(()),
    }
}

fn copy_stream(stream: &Stream, target: &Path) -> Result<(), Error> {
    if stream.is_seekable() {
        stream.rewind()?;
    }
    let mut file = File::create(target)?;
    loop {
        let chunk = stream.read(CHUNK_SIZE)?;
        if chunk.is_empty() {
            break;
        }
        file.write_all(&chunk)?;
    }
    file.flush()?;
    Ok(())
}
