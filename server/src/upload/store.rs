//! File Store
//!
//! Writes validated uploads into the upload directory under the client's
//! filename.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use super::error::UploadError;
use super::types::{StoredImage, ValidatedImage};

/// Upload directory on the local filesystem.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Use `root` as the upload directory. It is not created here.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Destination for a client-supplied filename.
    ///
    /// Only the final path component is kept, so directory parts cannot
    /// escape the upload directory.
    pub fn destination(&self, filename: &str) -> Result<PathBuf, UploadError> {
        let name = Path::new(filename)
            .file_name()
            .filter(|n| !n.is_empty())
            .ok_or(UploadError::InvalidFilename)?;
        Ok(self.root.join(name))
    }

    /// Create or truncate the destination and copy the whole body into it.
    ///
    /// A failed copy leaves whatever was written so far in place.
    pub fn store(&self, image: &mut ValidatedImage) -> Result<StoredImage, UploadError> {
        let path = self.destination(image.filename())?;
        let bytes_written = copy_to(&path, image)?;

        tracing::debug!(path = %path.display(), bytes_written, "Stored upload");
        Ok(StoredImage {
            path,
            bytes_written,
        })
    }
}

fn copy_to(path: &Path, image: &mut ValidatedImage) -> io::Result<u64> {
    let mut dst = BufWriter::new(File::create(path)?);
    let written = io::copy(image.body_mut(), &mut dst)?;
    dst.flush()?;
    Ok(written)
}
