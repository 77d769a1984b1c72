//! # chitty-api — Binary Entry Point
//!
//! Starts the Axum HTTP server. Binds to `PORT` (default 8080) and
//! advertises `CHITTY_ID_SERVICE_URL` to callers without an identifier.

use chitty_api::{AppConfig, AppState};
use metrics_exporter_prometheus::PrometheusBuilder;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::from_env();
    let port = config.port;
    tracing::info!(issuance_url = %config.issuance_url, "configuration loaded");

    let handle = PrometheusBuilder::new().install_recorder().map_err(|e| {
        tracing::error!("Prometheus recorder installation failed: {e}");
        e
    })?;

    let state = AppState::new(config).with_metrics(handle);
    let app = chitty_api::app(state);

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("ChittySchema API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
