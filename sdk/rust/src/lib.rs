//! Client SDK for the recipe importer HTTP API.

pub mod client;

pub use client::{ExtractRequest, ExtractResponse, ImageUpload, PageInfo, RecipeClient};
