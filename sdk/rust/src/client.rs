use reqwest::multipart::{Form, Part};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

/// One photograph to upload.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

/// Everything `/extract` accepts. All fields are optional on the wire; the
/// server rejects a request with neither images nor text.
#[derive(Debug, Clone, Default)]
pub struct ExtractRequest {
    pub images: Vec<ImageUpload>,
    pub text: Option<String>,
    pub source_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageInfo {
    pub id: String,
    pub url: Option<String>,
}

/// Body of every `/extract` response, success or failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractResponse {
    pub success: bool,
    #[serde(default)]
    pub recipe: Option<serde_json::Value>,
    #[serde(default)]
    pub page: Option<PageInfo>,
    #[serde(default)]
    pub error: Option<String>,
}

pub struct RecipeClient {
    client: Client,
    base_url: String,
}

impl RecipeClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Submit a recipe. Returns the status and the decoded body, so callers
    /// can inspect error responses too.
    pub async fn extract(
        &self,
        req: ExtractRequest,
    ) -> Result<(StatusCode, ExtractResponse), Box<dyn std::error::Error>> {
        let mut form = Form::new();
        for image in req.images {
            let part = Part::bytes(image.bytes)
                .file_name(image.file_name)
                .mime_str(&image.mime_type)?;
            form = form.part("images", part);
        }
        if let Some(text) = req.text {
            form = form.text("text", text);
        }
        if let Some(source) = req.source_url {
            form = form.text("source_url", source);
        }

        let resp = self
            .client
            .post(format!("{}/extract", self.base_url))
            .multipart(form)
            .send()
            .await?;

        let status = resp.status();
        let text = resp.text().await?;

        match serde_json::from_str::<ExtractResponse>(&text) {
            Ok(body) => Ok((status, body)),
            Err(_) => Err(format!("Server returned status {}: {}", status, text).into()),
        }
    }

    /// Fetch `/health`.
    pub async fn health(&self) -> Result<serde_json::Value, reqwest::Error> {
        self.client
            .get(format!("{}/health", self.base_url))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
    }
}
