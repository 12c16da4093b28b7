//! Upload Validation
//!
//! Token, content type and size checks that run before anything touches the
//! upload directory.

use std::io::{Read, Seek};
use std::sync::Arc;

use super::error::UploadError;
use super::sniff::sniff;
use super::types::{IncomingImage, ValidatedImage};

/// Image types accepted by content sniffing.
pub const ALLOWED_IMAGE_TYPES: &[&str] = &["image/jpeg", "image/png", "image/gif"];

/// Checks uploads against the shared secret, the image allow-list and the
/// size ceiling.
#[derive(Clone)]
pub struct UploadValidator {
    secret: Arc<str>,
    max_size: u64,
}

impl std::fmt::Debug for UploadValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadValidator")
            .field("secret", &"<redacted>")
            .field("max_size", &self.max_size)
            .finish()
    }
}

impl UploadValidator {
    /// Create a validator for `secret` and a size ceiling in bytes.
    pub fn new(secret: impl Into<Arc<str>>, max_size: u64) -> Self {
        Self {
            secret: secret.into(),
            max_size,
        }
    }

    /// Size ceiling in bytes.
    pub const fn max_size(&self) -> u64 {
        self.max_size
    }

    /// Compare `token` against the configured secret.
    pub fn check_token(&self, token: &str) -> Result<(), UploadError> {
        if token == &*self.secret {
            Ok(())
        } else {
            Err(UploadError::Forbidden)
        }
    }

    /// Sniff `body` and require an allow-listed image type.
    ///
    /// The body is left at offset 0. A stream that cannot be read or rewound
    /// counts as unsupported content.
    pub fn check_content<R: Read + Seek>(body: &mut R) -> Result<&'static str, UploadError> {
        let sniffed = sniff(body).map_err(|e| {
            tracing::warn!(error = %e, "Failed to sniff upload");
            UploadError::UnsupportedType
        })?;
        if !ALLOWED_IMAGE_TYPES.contains(&sniffed) {
            tracing::warn!(sniffed, "Rejected upload with unsupported content");
            return Err(UploadError::UnsupportedType);
        }
        Ok(sniffed)
    }

    /// Run every check in order: token, sniffed type, size.
    ///
    /// On success the image is handed back unchanged with its body at offset 0.
    #[tracing::instrument(
        skip_all,
        fields(filename = %image.filename, declared = %image.content_type)
    )]
    pub fn validate(
        &self,
        token: &str,
        mut image: IncomingImage,
    ) -> Result<ValidatedImage, UploadError> {
        self.check_token(token)?;
        Self::check_content(image.body_mut())?;

        if image.size > self.max_size {
            tracing::warn!(
                size = image.size,
                max_size = self.max_size,
                "Rejected oversized upload"
            );
            return Err(UploadError::TooLarge {
                max_size: self.max_size,
            });
        }

        Ok(ValidatedImage::new(image))
    }
}
