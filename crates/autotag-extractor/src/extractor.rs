//! Core MetadataExtractor implementation

use crate::config::ExtractorConfig;
use crate::error::ExtractorError;
use crate::parser::{model_result_from_mapping, parse_response};
use crate::prompt::{PromptBuilder, SYSTEM_PROMPT};
use autotag_domain::traits::LlmProvider;
use autotag_domain::ModelResult;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// The MetadataExtractor turns a document body into a [`ModelResult`]
///
/// It owns the prompt, the provider call and the response parsing. It does
/// not limit concurrency itself; callers gate access to [`query`](Self::query).
pub struct MetadataExtractor<L>
where
    L: LlmProvider,
{
    llm_provider: Arc<L>,
    config: ExtractorConfig,
}

impl<L> MetadataExtractor<L>
where
    L: LlmProvider + Send + Sync + 'static,
    L::Error: std::fmt::Display,
{
    /// Create a new MetadataExtractor
    pub fn new(llm_provider: L, config: ExtractorConfig) -> Self {
        Self {
            llm_provider: Arc::new(llm_provider),
            config,
        }
    }

    /// Get the extractor configuration
    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Query the model for a document's metadata
    ///
    /// Never fails: any transport, timeout, status or parsing error yields
    /// [`ModelResult::empty`]. With `debug` enabled the error is logged.
    pub async fn query(&self, body: &str) -> ModelResult {
        match self.try_query(body).await {
            Ok(result) => result,
            Err(e) => {
                if self.config.debug {
                    warn!("LLM query error: {}", e);
                } else {
                    debug!("LLM query error: {}", e);
                }
                ModelResult::empty()
            }
        }
    }

    /// Query the model, reporting why no metadata could be produced
    pub async fn try_query(&self, body: &str) -> Result<ModelResult, ExtractorError> {
        let prompt = PromptBuilder::new(body).build();
        debug!("Prompt length: {} chars", prompt.len());

        let raw_output = self.call_llm(prompt).await?;

        if self.config.debug {
            info!("--- RAW LLM OUTPUT START ---\n{}\n--- RAW LLM OUTPUT END ---", raw_output);
        } else {
            debug!("LLM response length: {} chars", raw_output.len());
        }

        let mapping = parse_response(&raw_output)?;
        Ok(model_result_from_mapping(
            &mapping,
            self.config.max_summary_words,
            self.config.max_tags,
        ))
    }

    /// Call the LLM provider
    async fn call_llm(&self, prompt: String) -> Result<String, ExtractorError> {
        let llm = Arc::clone(&self.llm_provider);

        // Call in a blocking context since LlmProvider is not async
        tokio::task::spawn_blocking(move || {
            llm.generate(SYSTEM_PROMPT, &prompt)
                .map_err(|e| ExtractorError::Llm(e.to_string()))
        })
        .await
        .map_err(|e| ExtractorError::Task(e.to_string()))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use autotag_llm::MockProvider;

    #[tokio::test]
    async fn test_query_empty_object() {
        let extractor = MetadataExtractor::new(MockProvider::new("{}"), ExtractorConfig::default());
        let result = extractor.query("Some text").await;
        assert_eq!(result, ModelResult::empty());
    }

    #[tokio::test]
    async fn test_try_query_reports_llm_error() {
        let extractor = MetadataExtractor::new(MockProvider::failing(), ExtractorConfig::default());
        let result = extractor.try_query("Some text").await;
        assert!(matches!(result, Err(ExtractorError::Llm(_))));
    }

    #[tokio::test]
    async fn test_try_query_reports_non_mapping() {
        let extractor = MetadataExtractor::new(
            MockProvider::new("Sorry, I can't help with that."),
            ExtractorConfig::default(),
        );
        let result = extractor.try_query("Some text").await;
        assert!(matches!(result, Err(ExtractorError::InvalidFormat(_))));
    }
}
