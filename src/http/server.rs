//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the API handlers and static files
//! - Wire up middleware (request ID, tracing, timeout, body limit, CORS)
//! - Bind server to listener and serve until shutdown

use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    services::ServeDir,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::{AppConfig, ServerConfig};
use crate::http::extract::{extract_recipe, health};
use crate::http::request::{make_span, propagate_request_id_layer, set_request_id_layer};
use crate::importer::RecipeImporter;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub importer: Arc<RecipeImporter>,
}

/// HTTP server for the importer.
pub struct HttpServer {
    router: Router,
    config: AppConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: AppConfig) -> Result<Self, reqwest::Error> {
        let importer = Arc::new(RecipeImporter::from_config(&config)?);
        let state = AppState { importer };
        let router = Self::build_router(&config, state);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &AppConfig, state: AppState) -> Router {
        let middleware = ServiceBuilder::new()
            .layer(set_request_id_layer())
            .layer(TraceLayer::new_for_http().make_span_with(make_span))
            .layer(propagate_request_id_layer())
            .layer(cors_layer(&config.server))
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)));

        Router::new()
            .route("/extract", post(extract_recipe))
            .route("/health", get(health))
            // Oversized uploads fail while the form is read, so they get the JSON error body.
            .layer(DefaultBodyLimit::max(config.limits.max_body_bytes))
            .with_state(state)
            .fallback_service(ServeDir::new(&config.server.static_dir))
            .layer(middleware)
    }

    /// Run the server, accepting connections until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            static_dir = %self.config.server.static_dir,
            model = %self.config.gemini.model,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Draining in-flight requests");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}

fn cors_layer(config: &ServerConfig) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    if config.cors_origins.is_empty() {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    layer.allow_origin(AllowOrigin::list(origins))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_keeps_config() {
        let mut config = AppConfig::default();
        config.server.static_dir = "public".into();
        let server = HttpServer::new(config).unwrap();
        assert_eq!(server.config().server.static_dir, "public");
    }

    #[test]
    fn test_cors_skips_invalid_origins() {
        let config = ServerConfig {
            cors_origins: vec!["https://cook.example".into(), "bad\norigin".into()],
            ..Default::default()
        };
        // Building must not panic on the invalid entry.
        let _ = cors_layer(&config);
    }
}
