//! Generative model integration.
//!
//! # Data Flow
//! ```text
//! ExtractInput + NormalizationConfig
//!     → prompt.rs (instruction text)
//!     → client.rs (generateContent with inline images)
//!     → raw reply text, parsed by recipe::model
//! ```

pub mod client;
pub mod prompt;
pub mod types;

pub use client::GeminiClient;
pub use prompt::build_prompt;
pub use types::{GeminiError, GeminiResult};
