//! Upload pipeline types.

use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::PathBuf;

use tempfile::SpooledTempFile;

/// Bytes kept in memory before a received file spills to a temp file.
const SPOOL_IN_MEMORY: usize = 1024 * 1024;

/// The file part of an upload request, as received.
#[derive(Debug)]
pub struct IncomingImage {
    /// Client-supplied filename.
    pub filename: String,
    /// `Content-Type` declared on the part (empty if absent).
    pub content_type: String,
    /// Total bytes received.
    pub size: u64,
    retain_limit: u64,
    body: SpooledTempFile,
}

impl IncomingImage {
    /// Start receiving a file. At most `retain_limit` bytes are kept; anything
    /// past that is only counted toward [`size`](Self::size).
    pub fn new(filename: impl Into<String>, content_type: impl Into<String>, retain_limit: u64) -> Self {
        Self {
            filename: filename.into(),
            content_type: content_type.into(),
            size: 0,
            retain_limit,
            body: SpooledTempFile::new(SPOOL_IN_MEMORY),
        }
    }

    /// Build a fully received file from an in-memory buffer.
    pub fn from_bytes(
        filename: impl Into<String>,
        content_type: impl Into<String>,
        data: &[u8],
    ) -> io::Result<Self> {
        let mut image = Self::new(filename, content_type, data.len() as u64);
        image.write_chunk(data)?;
        image.finish()?;
        Ok(image)
    }

    /// Append a received chunk.
    pub fn write_chunk(&mut self, chunk: &[u8]) -> io::Result<()> {
        let room = self.retain_limit.saturating_sub(self.size);
        let kept = room.min(chunk.len() as u64) as usize;
        if kept > 0 {
            self.body.write_all(&chunk[..kept])?;
        }
        self.size += chunk.len() as u64;
        Ok(())
    }

    /// Mark the file complete and rewind its body to the start.
    pub fn finish(&mut self) -> io::Result<()> {
        self.body.flush()?;
        self.body.seek(SeekFrom::Start(0))?;
        Ok(())
    }

    /// Readable, seekable body.
    pub fn body_mut(&mut self) -> &mut (impl Read + Seek) {
        &mut self.body
    }

    /// Whether the body spilled from memory to a temp file.
    pub fn is_spilled(&self) -> bool {
        self.body.is_rolled()
    }
}

/// An upload that passed token, type and size checks.
///
/// Only [`UploadValidator`](super::validate::UploadValidator) constructs this.
#[derive(Debug)]
pub struct ValidatedImage(IncomingImage);

impl ValidatedImage {
    pub(super) const fn new(image: IncomingImage) -> Self {
        Self(image)
    }

    pub fn filename(&self) -> &str {
        &self.0.filename
    }

    pub fn content_type(&self) -> &str {
        &self.0.content_type
    }

    pub const fn size(&self) -> u64 {
        self.0.size
    }

    pub fn body_mut(&mut self) -> &mut (impl Read + Seek) {
        self.0.body_mut()
    }
}

/// A file written by the [`FileStore`](super::store::FileStore).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredImage {
    /// Destination path.
    pub path: PathBuf,
    /// Bytes copied to the destination.
    pub bytes_written: u64,
}
