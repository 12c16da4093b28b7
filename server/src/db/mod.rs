//! Database Layer
//!
//! `SQLite` connection pool and the `images` metadata table.

mod models;
mod queries;


use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};
pub use models::*;
pub use queries::*;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use tracing::info;

/// Create `SQLite` connection pool, creating the database file if needed.
pub async fn create_pool(database_url: &str) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(database_url)
        .with_context(|| format!("invalid DATABASE_URL: {database_url}"))?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .synchronous(SqliteSynchronous::Normal);

    let pool = SqlitePoolOptions::new()
        .max_connections(8)
        // Prevent hanging requests on pool exhaustion
        .acquire_timeout(Duration::from_secs(5))
        .connect_with(options)
        .await
        .context("failed to open SQLite database")?;

    info!("Connected to SQLite");
    Ok(pool)
}
