//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, limits > 0)
//! - Check addresses and upstream URLs parse
//!
//! Credentials are not checked here: a server without them still serves the
//! form and reports the missing upstream per request.

use std::net::SocketAddr;
use thiserror::Error;
use url::Url;

use crate::config::schema::AppConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Validate a configuration, returning every problem found.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.server.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "server.bind_address",
            format!("'{}' is not a socket address", config.server.bind_address),
        ));
    }
    if config.server.static_dir.trim().is_empty() {
        errors.push(ValidationError::new("server.static_dir", "must not be empty"));
    }

    if config.limits.max_body_bytes == 0 {
        errors.push(ValidationError::new("limits.max_body_bytes", "must be greater than 0"));
    }
    if config.limits.max_images == 0 {
        errors.push(ValidationError::new("limits.max_images", "must be greater than 0"));
    }
    if config.limits.max_text_chars == 0 {
        errors.push(ValidationError::new("limits.max_text_chars", "must be greater than 0"));
    }

    if config.timeouts.connect_secs == 0 {
        errors.push(ValidationError::new("timeouts.connect_secs", "must be greater than 0"));
    }
    if config.timeouts.upstream_secs == 0 {
        errors.push(ValidationError::new("timeouts.upstream_secs", "must be greater than 0"));
    }
    let budget = upstream_budget_secs(config);
    if config.timeouts.request_secs < budget {
        errors.push(ValidationError::new(
            "timeouts.request_secs",
            format!(
                "must be at least {} (upstream_secs for every model attempt plus the page creation call)",
                budget
            ),
        ));
    }

    if config.retries.max_attempts == 0 {
        errors.push(ValidationError::new("retries.max_attempts", "must be at least 1"));
    }
    if config.retries.base_delay_ms > config.retries.max_delay_ms {
        errors.push(ValidationError::new(
            "retries.base_delay_ms",
            "must not exceed retries.max_delay_ms",
        ));
    }

    if config.gemini.model.trim().is_empty() {
        errors.push(ValidationError::new("gemini.model", "must not be empty"));
    }
    if !(0.0..=2.0).contains(&config.gemini.temperature) {
        errors.push(ValidationError::new("gemini.temperature", "must be between 0.0 and 2.0"));
    }
    check_url(&mut errors, "gemini.base_url", &config.gemini.base_url);

    check_url(&mut errors, "notion.base_url", &config.notion.base_url);
    if config.notion.api_version.trim().is_empty() {
        errors.push(ValidationError::new("notion.api_version", "must not be empty"));
    }
    let props = &config.notion.properties;
    for (field, name) in [
        ("notion.properties.title", &props.title),
        ("notion.properties.ingredients", &props.ingredients),
        ("notion.properties.steps", &props.steps),
        ("notion.properties.cook_time", &props.cook_time),
        ("notion.properties.servings", &props.servings),
    ] {
        if name.trim().is_empty() {
            errors.push(ValidationError::new(field, "must not be empty"));
        }
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!("'{}' is not a socket address", config.observability.metrics_address),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Worst-case upstream time of one import: every model attempt and one page
/// creation call. Backoff delays are not included.
fn upstream_budget_secs(config: &AppConfig) -> u64 {
    let attempts = if config.retries.enabled {
        u64::from(config.retries.max_attempts.max(1))
    } else {
        1
    };
    config.timeouts.upstream_secs.saturating_mul(attempts + 1)
}

fn check_url(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    match Url::parse(value) {
        Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {}
        Ok(url) => errors.push(ValidationError::new(
            field,
            format!("unsupported scheme '{}'", url.scheme()),
        )),
        Err(e) => errors.push(ValidationError::new(field, format!("invalid URL '{}': {}", value, e))),
    }
}
