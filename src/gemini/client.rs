//! Client for the hosted generative model.
//!
//! # Responsibilities
//! - Encode images as inline base64 parts
//! - Call `generateContent` with retries on transient failures
//! - Decode API errors, safety blocks and empty candidates

use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::Client;
use std::time::Duration;

use crate::config::{GeminiConfig, RetryConfig};
use crate::gemini::types::{
    Content, ErrorEnvelope, GeminiError, GeminiResult, GenerateContentRequest,
    GenerateContentResponse, GenerationConfig, Part,
};
use crate::recipe::ImageInput;
use crate::resilience::send_with_retry;

/// Model client. Cheap to clone.
#[derive(Clone)]
pub struct GeminiClient {
    http: Client,
    config: GeminiConfig,
    retries: RetryConfig,
    timeout: Duration,
}

impl GeminiClient {
    pub fn new(http: Client, config: GeminiConfig, retries: RetryConfig, timeout: Duration) -> Self {
        Self {
            http,
            config,
            retries,
            timeout,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.config.api_key.is_some()
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }

    /// Build the request body for a prompt and its images.
    pub fn build_request(&self, prompt: &str, images: &[ImageInput]) -> GenerateContentRequest {
        let mut parts = Vec::with_capacity(images.len() + 1);
        parts.push(Part::text(prompt));
        parts.extend(
            images
                .iter()
                .map(|img| Part::inline(img.mime_type.clone(), STANDARD.encode(&img.data))),
        );

        GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts,
            }],
            generation_config: GenerationConfig {
                temperature: self.config.temperature,
                response_mime_type: "application/json".to_string(),
            },
        }
    }

    /// Send a prompt with images and return the model's text reply.
    pub async fn generate(&self, prompt: &str, images: &[ImageInput]) -> GeminiResult<String> {
        let api_key = self.config.api_key.as_deref().ok_or(GeminiError::NotConfigured)?;
        let body = self.build_request(prompt, images);
        let url = self.endpoint();

        tracing::debug!(model = %self.config.model, images = images.len(), "Calling Gemini");

        let response = send_with_retry(&self.retries, "gemini", true, || {
            self.http
                .post(&url)
                .header("x-goog-api-key", api_key)
                .timeout(self.timeout)
                .json(&body)
        })
        .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorEnvelope>(&text)
                .map(|e| match e.error.status {
                    Some(code) => format!("{}: {}", code, e.error.message),
                    None => e.error.message,
                })
                .unwrap_or(text);
            return Err(GeminiError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let reply: GenerateContentResponse = response.json().await?;
        if let Some(reason) = reply.prompt_feedback.as_ref().and_then(|f| f.block_reason.clone()) {
            return Err(GeminiError::Blocked(reason));
        }
        match reply.text() {
            Some(text) => Ok(text),
            None => Err(GeminiError::EmptyResponse(
                reply.candidates.first().and_then(|c| c.finish_reason.clone()),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    fn client(base_url: &str) -> GeminiClient {
        GeminiClient::new(
            Client::new(),
            GeminiConfig {
                base_url: base_url.to_string(),
                ..Default::default()
            },
            RetryConfig::default(),
            Duration::from_secs(5),
        )
    }

    #[test]
    fn test_endpoint() {
        assert_eq!(
            client("https://generativelanguage.googleapis.com/").endpoint(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.0-flash:generateContent"
        );
    }

    #[test]
    fn test_images_become_inline_parts() {
        let images = vec![ImageInput::new(None, Some("image/png".into()), Bytes::from_static(b"abc"))];
        let request = client("http://localhost").build_request("prompt", &images);
        let parts = &request.contents[0].parts;
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0].text.as_deref(), Some("prompt"));
        let blob = parts[1].inline_data.as_ref().unwrap();
        assert_eq!(blob.mime_type, "image/png");
        assert_eq!(blob.data, "YWJj");
    }

    #[tokio::test]
    async fn test_missing_key_fails_fast() {
        let err = client("http://localhost").generate("p", &[]).await.unwrap_err();
        assert!(matches!(err, GeminiError::NotConfigured));
    }
}
