//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the importer.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the recipe importer.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP server settings (bind address, static files, CORS).
    pub server: ServerConfig,

    /// Request size limits.
    pub limits: LimitsConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Retry configuration for upstream calls.
    pub retries: RetryConfig,

    /// Generative model settings.
    pub gemini: GeminiConfig,

    /// Unit and language normalization requested from the model.
    pub normalization: NormalizationConfig,

    /// Notion workspace settings.
    pub notion: NotionConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address (e.g., "0.0.0.0:5000").
    pub bind_address: String,

    /// Directory served for every path not handled by the API.
    pub static_dir: String,

    /// Allowed CORS origins. Empty allows any origin.
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:5000".to_string(),
            static_dir: "static".to_string(),
            cors_origins: Vec::new(),
        }
    }
}

/// Limits applied to the extract form.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum request body size in bytes.
    pub max_body_bytes: usize,

    /// Maximum number of images per request.
    pub max_images: usize,

    /// Maximum pasted text length in characters.
    pub max_text_chars: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_body_bytes: 20 * 1024 * 1024, // 20MB, the inline data cap of the model API
            max_images: 10,
            max_text_chars: 50_000,
        }
    }
}

/// Timeout configuration for various operations.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Upstream connection establishment timeout in seconds.
    pub connect_secs: u64,

    /// Timeout for a single upstream call in seconds.
    pub upstream_secs: u64,

    /// Request timeout (total time for request/response) in seconds. Must
    /// cover `upstream_secs` for every model attempt plus the page creation.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect_secs: 10,
            upstream_secs: 60,
            request_secs: 300,
        }
    }
}

/// Retry configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Enable retries.
    pub enabled: bool,

    /// Maximum number of attempts, including the first one.
    pub max_attempts: u32,

    /// Base delay for exponential backoff in milliseconds.
    pub base_delay_ms: u64,

    /// Maximum delay for exponential backoff in milliseconds.
    pub max_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_attempts: 3,
            base_delay_ms: 500,
            max_delay_ms: 5000,
        }
    }
}

/// Generative model configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GeminiConfig {
    /// API key. Usually supplied through `GEMINI_API_KEY`.
    pub api_key: Option<String>,

    /// Model name.
    pub model: String,

    /// API base URL.
    pub base_url: String,

    /// Sampling temperature.
    pub temperature: f32,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: "gemini-2.0-flash".to_string(),
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            temperature: 0.2,
        }
    }
}

/// Unit system the model converts quantities into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UnitSystem {
    #[default]
    Metric,
    Imperial,
    /// Keep quantities as written.
    Original,
}

/// Normalization requested from the model.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct NormalizationConfig {
    /// Unit system for ingredient quantities and temperatures.
    pub units: UnitSystem,

    /// Language the recipe is written in (e.g. "English", "fr").
    /// When unset the recipe keeps its source language.
    pub target_language: Option<String>,
}

/// Notion workspace configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct NotionConfig {
    /// Integration token. Usually supplied through `NOTION_TOKEN`.
    pub token: Option<String>,

    /// Target database. Usually supplied through `NOTION_DATABASE_ID`.
    pub database_id: Option<String>,

    /// API base URL.
    pub base_url: String,

    /// Value of the `Notion-Version` header.
    pub api_version: String,

    /// Database property names.
    pub properties: PropertyNames,
}

impl Default for NotionConfig {
    fn default() -> Self {
        Self {
            token: None,
            database_id: None,
            base_url: "https://api.notion.com".to_string(),
            api_version: "2022-06-28".to_string(),
            properties: PropertyNames::default(),
        }
    }
}

/// Names of the database properties a page fills in.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PropertyNames {
    pub title: String,
    pub ingredients: String,
    pub steps: String,
    pub cook_time: String,
    pub servings: String,

    /// `url` property receiving the source link. Skipped when unset.
    pub source: Option<String>,

    /// `rich_text` property receiving the language code. Skipped when unset.
    pub language: Option<String>,
}

impl Default for PropertyNames {
    fn default() -> Self {
        Self {
            title: "Name".to_string(),
            ingredients: "Ingredients".to_string(),
            steps: "Steps".to_string(),
            cook_time: "Cook Time".to_string(),
            servings: "Servings".to_string(),
            source: None,
            language: None,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

impl AppConfig {
    /// Apply the environment variables the service has always honored.
    ///
    /// `lookup` is `std::env::var` in production; tests pass a closure.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(key) = non_empty("GEMINI_API_KEY") {
            self.gemini.api_key = Some(key);
        }
        if let Some(token) = non_empty("NOTION_TOKEN") {
            self.notion.token = Some(token);
        }
        if let Some(db) = non_empty("NOTION_DATABASE_ID") {
            self.notion.database_id = Some(db);
        }
        if let Some(port) = non_empty("PORT") {
            let host = self
                .server
                .bind_address
                .rsplit_once(':')
                .map(|(host, _)| host.to_string())
                .unwrap_or_else(|| "0.0.0.0".to_string());
            self.server.bind_address = format!("{}:{}", host, port.trim());
        }
    }
}
