//! Metrics collection and exposition.
//!
//! # Metrics
//! - `recipe_imports_total` (counter): imports by outcome
//! - `recipe_import_duration_seconds` (histogram): end-to-end import latency
//! - `upstream_requests_total` (counter): calls by upstream, status (0 = no response)
//! - `upstream_request_duration_seconds` (histogram): per-call latency by upstream
//!
//! Recording is a no-op until [`init_metrics`] installs the exporter.

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};
use std::net::SocketAddr;
use std::time::Instant;

/// Install the Prometheus exporter and its scrape endpoint.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

/// Record the end of one import.
pub fn record_import(outcome: &'static str, start: Instant) {
    counter!("recipe_imports_total", "outcome" => outcome).increment(1);
    histogram!("recipe_import_duration_seconds").record(start.elapsed().as_secs_f64());
}

/// Record one upstream call.
pub fn record_upstream(upstream: &'static str, status: u16, start: Instant) {
    counter!("upstream_requests_total", "upstream" => upstream, "status" => status.to_string())
        .increment(1);
    histogram!("upstream_request_duration_seconds", "upstream" => upstream)
        .record(start.elapsed().as_secs_f64());
}
