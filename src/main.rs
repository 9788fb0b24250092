//! presence-gateway server entry point.
//!
//! Starts the Axum HTTP server with the WebSocket endpoint, the auxiliary
//! HTTP routes, and the static client bundle.

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use presence_gateway::api;
use presence_gateway::app_state::AppState;
use presence_gateway::config::{GatewayConfig, LogFormat};
use presence_gateway::ws::ConnectionSettings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = GatewayConfig::from_env().context("loading configuration")?;

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match config.log_format {
        LogFormat::Json => tracing_subscriber::fmt().json().with_env_filter(filter).init(),
        LogFormat::Text => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }
    tracing::info!(addr = %config.listen_addr, "starting presence-gateway");

    // Build application state
    let settings = ConnectionSettings::from(&config);
    let app_state = AppState::new(settings);

    // Build router
    let app = api::build_app(app_state, &config.static_dir);

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("binding {}", config.listen_addr))?;
    tracing::info!(
        addr = %config.listen_addr,
        static_dir = %config.static_dir.display(),
        ping_interval_secs = config.ping_interval_secs,
        ping_timeout_secs = config.ping_timeout_secs,
        "server listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving")?;

    tracing::info!("server stopped");
    Ok(())
}

/// Resolves on Ctrl-C.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
