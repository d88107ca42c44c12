//! Menu extraction: one vision model call per photo.
//!
//! The extractor turns an encoded photo into a validated `MenuAnalysis`.
//! Upstream failures and unparseable replies both surface as
//! `MenuError::AnalysisFailed`; a missing payload is `InvalidInput`.

use super::prompt::menu_prompt;
use super::provider::{ImageInput, LlmRequest, VisionProvider};
use super::reply::parse_analysis;
use super::retry::RetryPolicy;
use crate::config::Config;
use crate::error::{MenuError, UpstreamError};
use crate::types::MenuAnalysis;
use std::sync::Arc;
use std::time::Duration;

/// Settings for the extractor.
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Default translation target
    pub target_language: String,
    /// Maximum tokens to generate
    pub max_tokens: u32,
    /// Sampling temperature
    pub temperature: f32,
    /// Per-call timeout in milliseconds
    pub timeout_ms: u64,
    /// Retries after the first attempt (0 disables retrying)
    pub retry_attempts: u32,
    /// Base backoff delay in milliseconds
    pub retry_delay_ms: u64,
    /// Largest accepted decoded image, in bytes
    pub max_image_bytes: usize,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            target_language: "Japanese".to_string(),
            max_tokens: 8192,
            temperature: 0.2,
            timeout_ms: 60_000,
            retry_attempts: 0,
            retry_delay_ms: 1000,
            max_image_bytes: 20 * 1024 * 1024,
        }
    }
}

impl ExtractOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            target_language: config.analysis.target_language.clone(),
            max_tokens: config.analysis.max_tokens,
            temperature: config.analysis.temperature,
            timeout_ms: config.limits.llm_timeout_ms,
            retry_attempts: config.pipeline.retry_attempts,
            retry_delay_ms: config.pipeline.retry_delay_ms,
            max_image_bytes: (config.limits.max_image_mb as usize).saturating_mul(1024 * 1024),
        }
    }
}

/// Turns menu photos into structured dish lists.
pub struct MenuExtractor {
    provider: Arc<dyn VisionProvider>,
    options: ExtractOptions,
}

impl MenuExtractor {
    pub fn new(provider: Box<dyn VisionProvider>, options: ExtractOptions) -> Self {
        Self {
            provider: Arc::from(provider),
            options,
        }
    }

    /// Name of the underlying vision provider.
    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Analyze a photo sent as a data URI or bare base64 string.
    ///
    /// `target_language` overrides the configured translation target.
    pub async fn analyze_payload(
        &self,
        payload: &str,
        target_language: Option<&str>,
    ) -> Result<MenuAnalysis, MenuError> {
        let image = ImageInput::from_payload(payload)?;
        self.analyze(image, target_language).await
    }

    /// Analyze an already-encoded image.
    pub async fn analyze(
        &self,
        image: ImageInput,
        target_language: Option<&str>,
    ) -> Result<MenuAnalysis, MenuError> {
        if image.decoded_len() > self.options.max_image_bytes {
            return Err(MenuError::InvalidInput(format!(
                "Image too large ({} bytes > {} bytes)",
                image.decoded_len(),
                self.options.max_image_bytes
            )));
        }

        let language = target_language
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .unwrap_or(self.options.target_language.as_str());

        let request = LlmRequest {
            image,
            prompt: menu_prompt(language),
            max_tokens: self.options.max_tokens,
            temperature: self.options.temperature,
        };

        let response = self
            .generate_with_retry(&request)
            .await
            .map_err(|e| MenuError::AnalysisFailed(e.to_string()))?;

        tracing::debug!(
            provider = self.provider.name(),
            model = %response.model,
            latency_ms = response.latency_ms,
            tokens = ?response.tokens_used,
            "Vision model replied"
        );
        tracing::trace!(reply = %response.text, "Raw vision model reply");

        let analysis = parse_analysis(&response.text).map_err(MenuError::AnalysisFailed)?;
        tracing::info!(
            "Extracted {} dish(es), menu language '{}'",
            analysis.dishes.len(),
            analysis.detected_language
        );
        Ok(analysis)
    }

    async fn generate_with_retry(
        &self,
        request: &LlmRequest,
    ) -> Result<super::provider::LlmResponse, UpstreamError> {
        let timeout = Duration::from_millis(self.options.timeout_ms);
        let policy = RetryPolicy {
            attempts: self.options.retry_attempts,
            base_delay_ms: self.options.retry_delay_ms,
        };
        let mut retries = 0;
        loop {
            let error = match tokio::time::timeout(timeout, self.provider.generate(request)).await {
                Ok(Ok(response)) => return Ok(response),
                Ok(Err(e)) => e,
                Err(_) => UpstreamError::Timeout {
                    stage: "analysis".to_string(),
                    timeout_ms: self.options.timeout_ms,
                },
            };

            if !policy.should_retry(retries, &error) {
                return Err(error);
            }
            retries += 1;
            let delay = policy.delay(retries);
            tracing::warn!(
                "Menu analysis failed ({error}); retry {retries}/{} in {delay:?}",
                policy.attempts
            );
            tokio::time::sleep(delay).await;
        }
    }
}
