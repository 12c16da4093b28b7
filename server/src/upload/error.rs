//! Upload Errors

use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Errors that can occur while accepting an upload.
#[derive(Debug, Error)]
pub enum UploadError {
    /// Token missing or not equal to the configured secret.
    #[error("Forbidden")]
    Forbidden,

    /// Content does not sniff as an allowed image type.
    #[error("Only images are allowed")]
    UnsupportedType,

    /// Upload exceeds the size ceiling.
    #[error("Image size exceeds {}MB limit", .max_size / (1024 * 1024))]
    TooLarge {
        /// Maximum allowed size in bytes.
        max_size: u64,
    },

    /// No `data` file part in the form.
    #[error("No file provided")]
    NoFile,

    /// Filename has no usable final component.
    #[error("Invalid filename")]
    InvalidFilename,

    /// Malformed or over-limit multipart body.
    #[error("Invalid multipart body: {}", .0.body_text())]
    Multipart(#[from] MultipartError),

    /// File open, create or copy failure.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Metadata table creation or insert failure.
    #[error(transparent)]
    Database(#[from] sqlx::Error),

    /// The blocking pipeline task panicked or was cancelled.
    #[error(transparent)]
    Task(#[from] tokio::task::JoinError),
}

impl UploadError {
    /// HTTP status for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Forbidden | Self::UnsupportedType | Self::TooLarge { .. } => {
                StatusCode::FORBIDDEN
            }
            Self::NoFile | Self::InvalidFilename => StatusCode::BAD_REQUEST,
            Self::Multipart(e) => e.status(),
            Self::Io(_) | Self::Database(_) | Self::Task(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for UploadError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "Upload failed");
        }
        // Internal error text is passed through to the client unchanged.
        (status, self.to_string()).into_response()
    }
}
