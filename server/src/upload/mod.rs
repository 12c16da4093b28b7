//! Upload Service
//!
//! Validates image uploads and persists them to the upload directory.

mod error;
mod handlers;
pub mod sniff;
pub mod store;
mod types;
pub mod validate;

use axum::{routing::get, routing::post, Router};

use crate::api::AppState;

pub use error::UploadError;
pub use handlers::{AUTH_FIELD, FILE_FIELD, UPLOAD_OK};
pub use store::FileStore;
pub use types::{IncomingImage, StoredImage, ValidatedImage};
pub use validate::{UploadValidator, ALLOWED_IMAGE_TYPES};

/// Create upload router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::upload_form))
        .route("/upload", post(handlers::upload_image))
}
