//! Import orchestration.
//!
//! # Data Flow
//! ```text
//! ExtractInput
//!     → validate against limits
//!     → gemini (prompt + images → reply text)
//!     → recipe (sanitize, parse, normalize)
//!     → notion (page)
//!     → ImportOutcome | ImportError
//! ```

pub mod pipeline;
pub mod types;

pub use pipeline::RecipeImporter;
pub use types::{ErrorBody, ImportError, ImportOutcome, MALFORMED_RECIPE_MESSAGE};
