//! Server Configuration
//!
//! Loads configuration from environment variables (optionally seeded from a
//! `.env` file by [`load_dotenv`]).

use std::env;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};

/// Largest accepted image, in bytes (8 MiB).
pub const MAX_IMAGE_SIZE: u64 = 8 * 1024 * 1024;

/// Server configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address (e.g., "0.0.0.0:8080")
    pub bind_address: String,

    /// `SQLite` connection URL
    pub database_url: String,

    /// Directory uploaded files are written into. Must already exist.
    pub upload_dir: PathBuf,

    /// Shared secret every upload must present in its `auth` field
    pub auth_token: String,

    /// Value pre-filled into the hidden `auth` input of the upload form (optional)
    pub form_auth_token: Option<String>,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let auth_token = env::var("AUTH_TOKEN").context("AUTH_TOKEN must be set")?;
        if auth_token.is_empty() {
            bail!("AUTH_TOKEN must not be empty");
        }

        Ok(Self {
            bind_address: env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:8080".into()),
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://images.db".into()),
            upload_dir: env::var("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("uploads")),
            auth_token,
            form_auth_token: env::var("FORM_AUTH_TOKEN").ok().filter(|t| !t.is_empty()),
        })
    }

    /// Create a default configuration for testing.
    ///
    /// Points the database and upload directory at relative paths; tests that
    /// touch disk override both with temporary locations.
    #[must_use]
    pub fn default_for_test() -> Self {
        Self {
            bind_address: "127.0.0.1:8080".into(),
            database_url: "sqlite://images-test.db".into(),
            upload_dir: PathBuf::from("uploads"),
            auth_token: "test-secret".into(),
            form_auth_token: None,
        }
    }
}

/// Seed the process environment from a `.env` file.
///
/// A missing file is not an error; an unreadable or malformed one is.
pub fn load_dotenv() -> Result<()> {
    match dotenvy::dotenv() {
        Ok(path) => {
            tracing::debug!(path = %path.display(), "Loaded environment file");
            Ok(())
        }
        Err(e) if e.not_found() => Ok(()),
        Err(e) => Err(e).context("failed to load .env file"),
    }
}
