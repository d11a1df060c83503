//! Wire types for the pages API and client errors.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::notion::blocks::Block;

#[derive(Debug, Serialize)]
pub struct CreatePageRequest<'a> {
    pub parent: Parent<'a>,
    pub properties: serde_json::Map<String, serde_json::Value>,
    #[serde(skip_serializing_if = "<[Block]>::is_empty")]
    pub children: &'a [Block],
}

#[derive(Debug, Serialize)]
pub struct Parent<'a> {
    pub database_id: &'a str,
}

#[derive(Debug, Serialize)]
pub struct AppendChildrenRequest<'a> {
    pub children: &'a [Block],
}

/// The created page, as returned to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRef {
    pub id: String,
    #[serde(default)]
    pub url: Option<String>,
}

/// Error object returned by the API.
#[derive(Debug, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub message: String,
}

/// Errors that can occur while publishing a page.
#[derive(Debug, Error)]
pub enum NotionError {
    /// Token or database id missing.
    #[error("Notion not configured")]
    NotConfigured,

    #[error("Notion request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success status from the API.
    #[error("Notion API error ({status} {code}): {message}")]
    Api {
        status: u16,
        code: String,
        message: String,
    },

    /// The page exists but part of its body could not be appended.
    /// `page` is the page URL, or its id when the API returned no URL.
    #[error("Notion page {page} was created but its body is incomplete: {source}")]
    Incomplete {
        page: String,
        source: Box<NotionError>,
    },
}

/// Result type for workspace operations.
pub type NotionResult<T> = Result<T, NotionError>;
