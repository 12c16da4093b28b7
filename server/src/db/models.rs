//! Database Models

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

/// One successfully stored upload.
///
/// Rows are linked to files only by insertion order; there is no foreign key
/// or hash tying a row to the file it describes.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct ImageMetadata {
    pub id: i64,
    /// `Content-Type` declared by the client, not the sniffed type.
    pub content_type: String,
    pub size: i64,
    pub uploaded_at: DateTime<Utc>,
}
