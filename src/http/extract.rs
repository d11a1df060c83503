//! `POST /extract` handler.

use axum::{
    extract::{
        multipart::{Field, MultipartError, MultipartRejection},
        Multipart, State,
    },
    http::StatusCode,
    Json,
};
use url::Url;

use crate::http::response::{ExtractResponse, HealthResponse};
use crate::http::server::AppState;
use crate::importer::ImportError;
use crate::recipe::{ExtractInput, ImageInput};

/// Extract a recipe from the submitted form and publish it.
pub async fn extract_recipe(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<ExtractResponse>, ImportError> {
    let multipart = multipart.map_err(|e| ImportError::InvalidForm(e.body_text()))?;
    let input = read_form(multipart).await?;
    let outcome = state.importer.import(input).await?;
    Ok(Json(outcome.into()))
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        gemini_configured: state.importer.gemini_configured(),
        notion_configured: state.importer.notion_configured(),
    })
}

/// Collect the form fields into an [`ExtractInput`].
///
/// Fields: `images` (repeated files), `text`, and `source_url` (or `link`,
/// `url`). Unknown fields are ignored.
pub async fn read_form(mut multipart: Multipart) -> Result<ExtractInput, ImportError> {
    let mut input = ExtractInput::default();

    while let Some(field) = multipart.next_field().await.map_err(form_error)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "images" | "images[]" | "image" => {
                if let Some(image) = read_image(field).await? {
                    input.images.push(image);
                }
            }
            "text" => {
                let text = field.text().await.map_err(form_error)?;
                if !text.trim().is_empty() {
                    input.text = Some(match input.text.take() {
                        Some(previous) => format!("{previous}\n\n{text}"),
                        None => text,
                    });
                }
            }
            "source_url" | "link" | "url" => {
                let value = field.text().await.map_err(form_error)?;
                input.source_url = parse_source(&value)?;
            }
            other => tracing::debug!(field = other, "Ignoring unknown form field"),
        }
    }

    Ok(input)
}

async fn read_image(field: Field<'_>) -> Result<Option<ImageInput>, ImportError> {
    let file_name = field.file_name().map(str::to_string);
    let content_type = field.content_type().map(str::to_string);
    let data = field.bytes().await.map_err(form_error)?;

    // Browsers send an empty part when no file was chosen.
    if data.is_empty() {
        return Ok(None);
    }
    Ok(Some(ImageInput::new(file_name, content_type, data)))
}

/// Parse the optional source link. Blank means none.
pub fn parse_source(value: &str) -> Result<Option<Url>, ImportError> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    let url = Url::parse(value).map_err(|e| ImportError::InvalidSource(format!("{value}: {e}")))?;
    match url.scheme() {
        "http" | "https" => Ok(Some(url)),
        scheme => Err(ImportError::InvalidSource(format!(
            "{value}: unsupported scheme '{scheme}'"
        ))),
    }
}

fn form_error(e: MultipartError) -> ImportError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ImportError::PayloadTooLarge
    } else {
        ImportError::InvalidForm(e.body_text())
    }
}
