//! Startup orchestration.
//!
//! Ordered: metrics exporter, then the listener, then traffic. Any startup
//! error is fatal.

use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::AppConfig;
use crate::http::HttpServer;
use crate::lifecycle::{signals, Shutdown};
use crate::observability::metrics;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to bind listener: {0}")]
    Bind(#[source] std::io::Error),

    #[error("failed to start metrics exporter: {0}")]
    Metrics(#[from] metrics_exporter_prometheus::BuildError),

    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),

    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),
}

/// Start every subsystem and serve until a shutdown signal arrives.
pub async fn start(config: AppConfig) -> Result<(), StartupError> {
    if config.gemini.api_key.is_none() {
        tracing::warn!("GEMINI_API_KEY is not set; extraction requests will fail");
    }
    if config.notion.token.is_none() || config.notion.database_id.is_none() {
        tracing::warn!("NOTION_TOKEN or NOTION_DATABASE_ID is not set; extraction requests will fail");
    }

    if config.observability.metrics_enabled {
        // Validation guarantees the address parses when metrics are enabled.
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr)?;
        }
    }

    let listener = TcpListener::bind(&config.server.bind_address)
        .await
        .map_err(StartupError::Bind)?;
    let local_addr = listener.local_addr().map_err(StartupError::Bind)?;
    tracing::info!(address = %local_addr, "Listening for connections");

    let shutdown = Shutdown::new();
    tokio::spawn(signals::listen(shutdown.clone()));

    let server = HttpServer::new(config)?;
    server
        .run(listener, shutdown.subscribe())
        .await
        .map_err(StartupError::Serve)
}
