//! Recipe data and request input.
//!
//! # Data Flow
//! ```text
//! multipart form → input.rs (ExtractInput, validation)
//! model reply    → sanitize.rs (strip fences) → model.rs (Recipe, normalize)
//! ```

pub mod input;
pub mod model;
pub mod sanitize;

pub use input::{ExtractInput, ImageInput};
pub use model::{IngredientCategory, Ingredients, Recipe, Step};
