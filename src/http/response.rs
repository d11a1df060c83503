//! Response bodies.

use serde::Serialize;

use crate::importer::ImportOutcome;
use crate::notion::PageRef;
use crate::recipe::Recipe;

/// `{"success": true, "recipe": {...}, "page": {...}}`
#[derive(Debug, Serialize)]
pub struct ExtractResponse {
    pub success: bool,
    pub recipe: Recipe,
    pub page: PageRef,
}

impl From<ImportOutcome> for ExtractResponse {
    fn from(outcome: ImportOutcome) -> Self {
        Self {
            success: true,
            recipe: outcome.recipe,
            page: outcome.page,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub gemini_configured: bool,
    pub notion_configured: bool,
}
