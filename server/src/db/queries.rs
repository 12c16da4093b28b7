//! Metadata Recorder
//!
//! Runtime queries (no compile-time `DATABASE_URL` required).

use std::sync::Arc;

use chrono::Utc;
use sqlx::SqlitePool;
use tokio::sync::OnceCell;
use tracing::error;

use super::models::ImageMetadata;

/// Log and return a database error with context.
macro_rules! db_error {
    ($query:expr) => {
        |e| {
            error!(query = $query, error = %e, "Database query failed");
            e
        }
    };
    ($query:expr, $($field:tt)*) => {
        |e| {
            error!(query = $query, $($field)*, error = %e, "Database query failed");
            e
        }
    };
}

const CREATE_IMAGES_TABLE: &str = "CREATE TABLE IF NOT EXISTS images (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    content_type TEXT NOT NULL,
    size INTEGER NOT NULL,
    uploaded_at DATETIME NOT NULL
)";

/// Appends one `images` row per stored upload.
///
/// The table is created on first use. Clones share the same pool and the
/// same "table exists" flag.
#[derive(Debug, Clone)]
pub struct MetadataRecorder {
    pool: SqlitePool,
    schema: Arc<OnceCell<()>>,
}

impl MetadataRecorder {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            schema: Arc::new(OnceCell::new()),
        }
    }

    pub const fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Create the `images` table if it does not exist yet.
    ///
    /// Runs once per recorder; a failed attempt is retried on the next call.
    pub async fn ensure_schema(&self) -> sqlx::Result<()> {
        self.schema
            .get_or_try_init(|| async {
                sqlx::query(CREATE_IMAGES_TABLE)
                    .execute(&self.pool)
                    .await
                    .map_err(db_error!("create_images_table"))?;
                Ok::<_, sqlx::Error>(())
            })
            .await?;
        Ok(())
    }

    /// Insert a row for a stored upload, stamped with the current time.
    pub async fn record(&self, content_type: &str, size: u64) -> sqlx::Result<ImageMetadata> {
        self.ensure_schema().await?;

        sqlx::query_as::<_, ImageMetadata>(
            "INSERT INTO images (content_type, size, uploaded_at) VALUES (?, ?, ?)
             RETURNING id, content_type, size, uploaded_at",
        )
        .bind(content_type)
        .bind(size as i64)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(db_error!("record_image", content_type = %content_type, size))
    }

    /// All rows, oldest first.
    pub async fn list(&self) -> sqlx::Result<Vec<ImageMetadata>> {
        self.ensure_schema().await?;

        sqlx::query_as::<_, ImageMetadata>(
            "SELECT id, content_type, size, uploaded_at FROM images ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(db_error!("list_images"))
    }

    /// Number of rows.
    pub async fn count(&self) -> sqlx::Result<i64> {
        self.ensure_schema().await?;

        sqlx::query_scalar("SELECT COUNT(*) FROM images")
            .fetch_one(&self.pool)
            .await
            .map_err(db_error!("count_images"))
    }
}
