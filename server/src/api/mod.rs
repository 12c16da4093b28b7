//! API Router and Application State
//!
//! Central routing configuration and shared state.

use std::sync::Arc;

use axum::{extract::DefaultBodyLimit, routing::get, Json, Router};
use serde::Serialize;
use sqlx::SqlitePool;
use tower_http::trace::TraceLayer;

use crate::config::{Config, MAX_IMAGE_SIZE};
use crate::db::MetadataRecorder;
use crate::upload::{self, FileStore, UploadValidator};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Server configuration
    pub config: Arc<Config>,
    /// Token, type and size checks
    pub validator: UploadValidator,
    /// Upload directory
    pub files: FileStore,
    /// `images` table writer
    pub metadata: MetadataRecorder,
}

impl AppState {
    /// Create new application state.
    #[must_use]
    pub fn new(db: SqlitePool, config: Config) -> Self {
        Self {
            validator: UploadValidator::new(config.auth_token.as_str(), MAX_IMAGE_SIZE),
            files: FileStore::new(config.upload_dir.clone()),
            metadata: MetadataRecorder::new(db),
            config: Arc::new(config),
        }
    }
}

/// Create the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health_check))
        .merge(upload::router())
        // Middleware
        .layer(TraceLayer::new_for_http())
        // Upload size is enforced by the validator, which counts past the
        // image ceiling without buffering
        .layer(DefaultBodyLimit::disable())
        // State
        .with_state(state)
}

/// Health check response.
#[derive(Serialize)]
struct HealthResponse {
    /// Service status
    status: &'static str,
}

/// Health check endpoint.
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}
