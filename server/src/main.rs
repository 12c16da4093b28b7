//! imagedrop Server - Main Entry Point

use anyhow::{Context, Result};
use tracing::{info, warn};

use imagedrop_server::{api, config, db};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "imagedrop_server=debug,tower_http=debug".into()),
        )
        .json()
        .init();

    // Load configuration
    config::load_dotenv()?;
    let config = config::Config::from_env()?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        "Starting imagedrop server"
    );

    if !config.upload_dir.is_dir() {
        warn!(
            upload_dir = %config.upload_dir.display(),
            "Upload directory does not exist; uploads will fail until it is created"
        );
    }

    // Initialize database
    let db_pool = db::create_pool(&config.database_url).await?;

    // Build application state
    let state = api::AppState::new(db_pool, config.clone());
    state
        .metadata
        .ensure_schema()
        .await
        .context("failed to create images table")?;

    // Build router
    let app = api::create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_address)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_address))?;
    info!(address = %config.bind_address, "Server listening");

    // Graceful shutdown handler
    let shutdown_signal = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for shutdown signal");
            std::future::pending::<()>().await;
        }
        info!("Received shutdown signal, cleaning up...");
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await?;

    info!("Server shutdown complete");

    Ok(())
}
