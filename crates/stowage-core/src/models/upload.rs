//! Inbound file payload.

use bytes::Bytes;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Cursor, Seek};
use std::path::{Path, PathBuf};
use validator::Validate;

/// Readable, seekable view over a payload body.
///
/// Image decoders need both buffered reads and seeking, so the reader handed
/// out by [`UploadFile::open`] is boxed behind this trait.
pub trait PayloadRead: BufRead + Seek + Send {}

impl<T: BufRead + Seek + Send> PayloadRead for T {}

/// Where the bytes of an upload live.
#[derive(Debug, Clone)]
pub enum FileBody {
    /// Fully buffered in memory
    Memory(Bytes),
    /// Spooled to a temporary file by the HTTP layer
    Disk(PathBuf),
}

/// File payload supplied by the caller.
///
/// The pipeline only ever reads it; the caller owns any spooled file.
#[derive(Debug, Clone, Validate)]
pub struct UploadFile {
    #[validate(length(
        min = 1,
        max = 255,
        message = "Filename must be between 1 and 255 characters"
    ))]
    pub filename: String,
    #[validate(length(
        min = 1,
        max = 255,
        message = "Content type must be between 1 and 255 characters"
    ))]
    pub content_type: Option<String>,
    pub body: FileBody,
}

impl UploadFile {
    pub fn from_bytes(
        filename: impl Into<String>,
        content_type: Option<String>,
        data: impl Into<Bytes>,
    ) -> Self {
        Self {
            filename: filename.into(),
            content_type,
            body: FileBody::Memory(data.into()),
        }
    }

    pub fn from_path(
        filename: impl Into<String>,
        content_type: Option<String>,
        path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            filename: filename.into(),
            content_type,
            body: FileBody::Disk(path.into()),
        }
    }

    /// Declared MIME type, if the caller sent one
    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    /// Lowercased extension of the original filename, empty when there is none
    pub fn suffix(&self) -> String {
        Path::new(&self.filename)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default()
    }

    /// Original filename without directory components or extension
    pub fn stem(&self) -> String {
        Path::new(&self.filename)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_string()
    }

    /// Open a blocking reader over the body.
    ///
    /// The reader is released when dropped.
    pub fn open(&self) -> io::Result<Box<dyn PayloadRead>> {
        match &self.body {
            FileBody::Memory(data) => Ok(Box::new(Cursor::new(data.clone()))),
            FileBody::Disk(path) => Ok(Box::new(BufReader::new(File::open(path)?))),
        }
    }

    /// Read the whole body
    pub async fn read_bytes(&self) -> io::Result<Bytes> {
        match &self.body {
            FileBody::Memory(data) => Ok(data.clone()),
            FileBody::Disk(path) => tokio::fs::read(path).await.map(Bytes::from),
        }
    }

    /// Body size in bytes
    pub async fn size(&self) -> io::Result<u64> {
        match &self.body {
            FileBody::Memory(data) => Ok(data.len() as u64),
            FileBody::Disk(path) => tokio::fs::metadata(path).await.map(|m| m.len()),
        }
    }
}
