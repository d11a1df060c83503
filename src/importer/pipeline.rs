//! The import pipeline: model extraction, then page publication.

use std::time::{Duration, Instant};

use crate::config::{AppConfig, LimitsConfig, NormalizationConfig};
use crate::gemini::{build_prompt, GeminiClient, GeminiError};
use crate::importer::types::{ImportError, ImportOutcome};
use crate::notion::{NotionClient, NotionError};
use crate::observability::metrics;
use crate::recipe::{ExtractInput, Recipe};

/// Runs one extraction end to end.
pub struct RecipeImporter {
    gemini: GeminiClient,
    notion: NotionClient,
    limits: LimitsConfig,
    normalization: NormalizationConfig,
}

impl RecipeImporter {
    pub fn new(
        gemini: GeminiClient,
        notion: NotionClient,
        limits: LimitsConfig,
        normalization: NormalizationConfig,
    ) -> Self {
        Self {
            gemini,
            notion,
            limits,
            normalization,
        }
    }

    /// Build both upstream clients over one shared connection pool.
    pub fn from_config(config: &AppConfig) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(config.timeouts.connect_secs))
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;
        let upstream_timeout = Duration::from_secs(config.timeouts.upstream_secs);

        Ok(Self::new(
            GeminiClient::new(
                http.clone(),
                config.gemini.clone(),
                config.retries.clone(),
                upstream_timeout,
            ),
            NotionClient::new(
                http,
                config.notion.clone(),
                config.retries.clone(),
                upstream_timeout,
            ),
            config.limits.clone(),
            config.normalization.clone(),
        ))
    }

    pub fn gemini_configured(&self) -> bool {
        self.gemini.is_configured()
    }

    pub fn notion_configured(&self) -> bool {
        self.notion.is_configured()
    }

    /// Extract the recipe and publish it.
    pub async fn import(&self, input: ExtractInput) -> Result<ImportOutcome, ImportError> {
        let start = Instant::now();
        let result = self.run(&input).await;
        match &result {
            Ok(outcome) => {
                metrics::record_import("success", start);
                tracing::info!(
                    title = %outcome.recipe.title,
                    page_id = %outcome.page.id,
                    imaginary = outcome.recipe.imaginary,
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "Recipe imported"
                );
            }
            Err(e) => metrics::record_import(e.kind(), start),
        }
        result
    }

    async fn run(&self, input: &ExtractInput) -> Result<ImportOutcome, ImportError> {
        input.validate(&self.limits)?;

        // Both upstreams must be usable before spending a model call.
        if !self.gemini.is_configured() {
            return Err(GeminiError::NotConfigured.into());
        }
        if !self.notion.is_configured() {
            return Err(NotionError::NotConfigured.into());
        }

        tracing::info!(
            images = input.images.len(),
            has_text = input.text().is_some(),
            source = input.source_url.as_ref().map(|u| u.as_str()).unwrap_or("-"),
            "Extracting recipe"
        );

        let prompt = build_prompt(input, &self.normalization);
        let reply = self.gemini.generate(&prompt, &input.images).await?;

        let recipe = Recipe::from_model_output(&reply).map_err(|e| {
            tracing::warn!(error = %e, reply_len = reply.len(), "Model reply is not a recipe");
            ImportError::MalformedRecipe(e)
        })?;
        tracing::debug!(
            title = %recipe.title,
            steps = recipe.steps.len(),
            language = recipe.language.as_deref().unwrap_or("-"),
            "Recipe parsed"
        );

        let page = self.notion.create_page(&recipe, input.source_url.as_ref()).await?;

        Ok(ImportOutcome { recipe, page })
    }
}
