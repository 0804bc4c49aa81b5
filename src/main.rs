//! puzzle-tracker server entry point.
//!
//! Loads configuration, selects the storage backend, and starts the Axum
//! HTTP server.

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use puzzle_tracker::config::{LogFormat, TrackerConfig};
use puzzle_tracker::server::{build_app, build_state};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = TrackerConfig::from_env().context("invalid configuration")?;

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match config.log_format {
        LogFormat::Json => tracing_subscriber::fmt().json().with_env_filter(filter).init(),
        LogFormat::Text => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }

    // Build application state and router
    let state = build_state(&config);
    tracing::info!(
        addr = %config.listen_addr,
        storage = state.tracker.store().backend_name(),
        "starting puzzle-tracker"
    );
    let app = build_app(state, &config);

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.listen_addr))?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app).await.context("server error")?;

    Ok(())
}
