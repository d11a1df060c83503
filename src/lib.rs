//! Recipe importer library.
//!
//! Turns recipe photographs or pasted text into structured recipes with a
//! generative model and publishes them as Notion database pages.

pub mod config;
pub mod gemini;
pub mod http;
pub mod importer;
pub mod lifecycle;
pub mod notion;
pub mod observability;
pub mod recipe;
pub mod resilience;

pub use config::AppConfig;
pub use http::HttpServer;
pub use importer::{ImportError, ImportOutcome, RecipeImporter};
pub use lifecycle::Shutdown;
pub use recipe::Recipe;
