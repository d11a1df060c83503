//! Client for the workspace pages API.

use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;
use url::Url;

use crate::config::{NotionConfig, RetryConfig};
use crate::notion::blocks::{page_children, page_properties, Block, MAX_BLOCKS_PER_REQUEST};
use crate::notion::types::{
    AppendChildrenRequest, ApiErrorBody, CreatePageRequest, NotionError, NotionResult, PageRef,
    Parent,
};
use crate::recipe::Recipe;
use crate::resilience::send_with_retry;

/// Workspace client. Cheap to clone.
#[derive(Clone)]
pub struct NotionClient {
    http: Client,
    config: NotionConfig,
    retries: RetryConfig,
    timeout: Duration,
}

impl NotionClient {
    pub fn new(http: Client, config: NotionConfig, retries: RetryConfig, timeout: Duration) -> Self {
        Self {
            http,
            config,
            retries,
            timeout,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.credentials().is_ok()
    }

    fn credentials(&self) -> NotionResult<(&str, &str)> {
        match (&self.config.token, &self.config.database_id) {
            (Some(token), Some(db)) => Ok((token.as_str(), db.as_str())),
            _ => Err(NotionError::NotConfigured),
        }
    }

    fn request(&self, method: Method, path: &str, token: &str) -> RequestBuilder {
        let url = format!("{}{}", self.config.base_url.trim_end_matches('/'), path);
        self.http
            .request(method, url)
            .bearer_auth(token)
            .header("Notion-Version", &self.config.api_version)
            .timeout(self.timeout)
    }

    /// Create a database page for the recipe.
    ///
    /// Bodies longer than one request allows are appended in batches after
    /// the page exists.
    pub async fn create_page(&self, recipe: &Recipe, source: Option<&Url>) -> NotionResult<PageRef> {
        let (token, database_id) = self.credentials()?;

        let blocks = page_children(recipe, source);
        let (first, rest) = blocks.split_at(blocks.len().min(MAX_BLOCKS_PER_REQUEST));

        let body = CreatePageRequest {
            parent: Parent { database_id },
            properties: page_properties(recipe, source, &self.config.properties),
            children: first,
        };

        let response = send_with_retry(&self.retries, "notion", false, || {
            self.request(Method::POST, "/v1/pages", token).json(&body)
        })
        .await?;
        let page: PageRef = decode(response).await?;

        tracing::info!(page_id = %page.id, blocks = blocks.len(), "Notion page created");

        for batch in rest.chunks(MAX_BLOCKS_PER_REQUEST) {
            if let Err(e) = self.append_children(token, &page.id, batch).await {
                tracing::warn!(
                    page_id = %page.id,
                    page_url = page.url.as_deref().unwrap_or("-"),
                    error = %e,
                    "Page created but appending its body failed"
                );
                return Err(NotionError::Incomplete {
                    page: page.url.unwrap_or(page.id),
                    source: Box::new(e),
                });
            }
        }

        Ok(page)
    }

    async fn append_children(&self, token: &str, block_id: &str, children: &[Block]) -> NotionResult<()> {
        let path = format!("/v1/blocks/{}/children", block_id);
        let body = AppendChildrenRequest { children };

        let response = send_with_retry(&self.retries, "notion", false, || {
            self.request(Method::PATCH, &path, token).json(&body)
        })
        .await?;
        let _: serde_json::Value = decode(response).await?;

        tracing::debug!(block_id, appended = children.len(), "Appended page blocks");
        Ok(())
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> NotionResult<T> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json().await?);
    }

    let text = response.text().await.unwrap_or_default();
    let (code, message) = match serde_json::from_str::<ApiErrorBody>(&text) {
        Ok(body) => (body.code, body.message),
        Err(_) => (String::new(), text),
    };
    Err(NotionError::Api {
        status: status.as_u16(),
        code,
        message,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(token: Option<&str>, database_id: Option<&str>) -> NotionClient {
        NotionClient::new(
            Client::new(),
            NotionConfig {
                token: token.map(str::to_string),
                database_id: database_id.map(str::to_string),
                ..Default::default()
            },
            RetryConfig::default(),
            Duration::from_secs(5),
        )
    }

    #[test]
    fn test_requires_both_credentials() {
        assert!(!client(None, None).is_configured());
        assert!(!client(Some("secret"), None).is_configured());
        assert!(!client(None, Some("db")).is_configured());
        assert!(client(Some("secret"), Some("db")).is_configured());
    }

    #[tokio::test]
    async fn test_create_page_without_credentials() {
        let err = client(None, None)
            .create_page(&Recipe::default(), None)
            .await
            .unwrap_err();
        assert!(matches!(err, NotionError::NotConfigured));
    }

    #[test]
    fn test_request_headers() {
        let request = client(Some("secret"), Some("db"))
            .request(Method::POST, "/v1/pages", "secret")
            .build()
            .unwrap();
        assert_eq!(request.url().as_str(), "https://api.notion.com/v1/pages");
        assert_eq!(request.headers()["authorization"], "Bearer secret");
        assert_eq!(request.headers()["notion-version"], "2022-06-28");
    }
}
