//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → schema.rs (environment overrides: GEMINI_API_KEY, NOTION_TOKEN, ...)
//!     → validation.rs (semantic checks)
//!     → AppConfig (validated, immutable)
//!     → shared via Arc with the handlers
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - All fields have defaults to allow running from environment alone
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, resolve_config, ConfigError};
pub use schema::AppConfig;
pub use schema::{
    GeminiConfig, LimitsConfig, LogFormat, NormalizationConfig, NotionConfig,
    ObservabilityConfig, PropertyNames, RetryConfig, ServerConfig, TimeoutConfig, UnitSystem,
};
