//! Import outcome and the top-level error type.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::gemini::GeminiError;
use crate::notion::{NotionError, PageRef};
use crate::recipe::Recipe;

/// Message shown when the model reply is not a usable recipe.
pub const MALFORMED_RECIPE_MESSAGE: &str =
    "Could not parse recipe from image. Try a clearer screenshot.";

/// A published recipe.
#[derive(Debug, Clone, Serialize)]
pub struct ImportOutcome {
    pub recipe: Recipe,
    pub page: PageRef,
}

/// Errors that can occur during an import.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("No images or text provided")]
    NoInput,

    #[error("Too many images: {count} (max {max})")]
    TooManyImages { count: usize, max: usize },

    #[error("Text too long: {chars} characters (max {max})")]
    TextTooLong { chars: usize, max: usize },

    #[error("Unsupported file type: {0}")]
    UnsupportedMedia(String),

    #[error("Invalid source link: {0}")]
    InvalidSource(String),

    #[error("Invalid form data: {0}")]
    InvalidForm(String),

    #[error("Upload too large")]
    PayloadTooLarge,

    #[error("{}", MALFORMED_RECIPE_MESSAGE)]
    MalformedRecipe(#[source] serde_json::Error),

    #[error(transparent)]
    Gemini(#[from] GeminiError),

    #[error(transparent)]
    Notion(#[from] NotionError),
}

impl ImportError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::NoInput
            | Self::TooManyImages { .. }
            | Self::TextTooLong { .. }
            | Self::UnsupportedMedia(_)
            | Self::InvalidSource(_)
            | Self::InvalidForm(_) => StatusCode::BAD_REQUEST,
            Self::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            Self::MalformedRecipe(_)
            | Self::Gemini(GeminiError::NotConfigured)
            | Self::Notion(NotionError::NotConfigured) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Gemini(_) | Self::Notion(_) => StatusCode::BAD_GATEWAY,
        }
    }

    /// Label used for the outcome metric.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NoInput
            | Self::TooManyImages { .. }
            | Self::TextTooLong { .. }
            | Self::UnsupportedMedia(_)
            | Self::InvalidSource(_)
            | Self::InvalidForm(_)
            | Self::PayloadTooLarge => "invalid_input",
            Self::MalformedRecipe(_) => "malformed_recipe",
            Self::Gemini(_) => "gemini_error",
            Self::Notion(_) => "notion_error",
        }
    }
}

/// `{"success": false, "error": "..."}`
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub success: bool,
    pub error: String,
}

impl IntoResponse for ImportError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, kind = self.kind(), "Import failed");
        } else {
            tracing::info!(error = %self, "Rejected import request");
        }
        let body = ErrorBody {
            success: false,
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ImportError::NoInput.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ImportError::Gemini(GeminiError::NotConfigured).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ImportError::Gemini(GeminiError::Blocked("SAFETY".into())).status(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            ImportError::Notion(NotionError::NotConfigured).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_messages() {
        let parse_err = serde_json::from_str::<serde_json::Value>("nope").unwrap_err();
        assert_eq!(
            ImportError::MalformedRecipe(parse_err).to_string(),
            MALFORMED_RECIPE_MESSAGE
        );
        assert_eq!(ImportError::NoInput.to_string(), "No images or text provided");
        assert_eq!(
            ImportError::Notion(NotionError::NotConfigured).to_string(),
            "Notion not configured"
        );
    }
}
