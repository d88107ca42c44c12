//! Two-tier image resolution.
//!
//! The primary provider is tried only when configured. Any primary error,
//! timeout, or empty answer falls through to the secondary provider, whose
//! answer is final: a hit, an empty result, or `SearchFailed`. The first
//! usable hit wins; there is no ranking and no caching.

use super::google::GoogleImageSearch;
use super::provider::ImageSearchProvider;
use super::unsplash::UnsplashSearch;
use crate::config::{resolve_env_var, Config};
use crate::error::{MenuError, UpstreamError};
use crate::types::{ImageHit, ImageResult};
use std::sync::Arc;
use std::time::Duration;

/// Resolves dish search queries to a single image.
pub struct ImageResolver {
    primary: Option<Arc<dyn ImageSearchProvider>>,
    secondary: Arc<dyn ImageSearchProvider>,
    timeout: Duration,
}

impl ImageResolver {
    pub fn new(
        primary: Option<Box<dyn ImageSearchProvider>>,
        secondary: Box<dyn ImageSearchProvider>,
        timeout: Duration,
    ) -> Self {
        Self {
            primary: primary.map(Arc::from),
            secondary: Arc::from(secondary),
            timeout,
        }
    }

    /// Build the resolver from config.
    ///
    /// Google is used only when both its API key and engine id resolve; the
    /// key falls back to `GEMINI_API_KEY`. Unsplash is always present.
    pub fn from_config(config: &Config) -> Self {
        let google = &config.search.google;
        let api_key = resolve_env_var(&google.api_key)
            .or_else(|| resolve_env_var("${GEMINI_API_KEY}"));
        let engine_id = resolve_env_var(&google.engine_id);

        let primary: Option<Box<dyn ImageSearchProvider>> = match (api_key, engine_id) {
            (Some(key), Some(cx)) => Some(Box::new(GoogleImageSearch::new(
                &key,
                &cx,
                &google.endpoint,
            ))),
            _ => {
                tracing::info!(
                    "Google image search not configured; all searches go to Unsplash"
                );
                None
            }
        };

        let unsplash = &config.search.unsplash;
        let access_key = resolve_env_var(&unsplash.access_key).unwrap_or_else(|| {
            tracing::warn!("UNSPLASH_ACCESS_KEY not set; fallback searches will fail");
            String::new()
        });
        let secondary = Box::new(UnsplashSearch::new(&access_key, &unsplash.endpoint));

        Self::new(
            primary,
            secondary,
            Duration::from_millis(config.limits.search_timeout_ms),
        )
    }

    /// Whether a primary provider is configured.
    pub fn has_primary(&self) -> bool {
        self.primary.is_some()
    }

    /// Resolve one query to an image.
    pub async fn resolve(&self, query: &str) -> Result<ImageResult, MenuError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(MenuError::InvalidInput("No query provided".to_string()));
        }

        if let Some(primary) = &self.primary {
            match self.search_with_timeout(primary.as_ref(), query).await {
                Ok(Some(hit)) => {
                    tracing::debug!("{} found an image for '{query}'", primary.name());
                    return Ok(hit.into());
                }
                Ok(None) => {
                    tracing::debug!(
                        "{} found nothing for '{query}', falling back",
                        primary.name()
                    );
                }
                Err(e) => {
                    tracing::warn!("Primary image search failed, falling back: {e}");
                }
            }
        }

        match self.search_with_timeout(self.secondary.as_ref(), query).await {
            Ok(Some(hit)) => Ok(hit.into()),
            Ok(None) => {
                tracing::debug!("No image found for '{query}'");
                Ok(ImageResult::empty())
            }
            Err(e) => Err(MenuError::SearchFailed(e.to_string())),
        }
    }

    async fn search_with_timeout(
        &self,
        provider: &dyn ImageSearchProvider,
        query: &str,
    ) -> Result<Option<ImageHit>, UpstreamError> {
        match tokio::time::timeout(self.timeout, provider.search(query)).await {
            Ok(result) => result,
            Err(_) => Err(UpstreamError::Timeout {
                stage: format!("{} search", provider.name()),
                timeout_ms: self.timeout.as_millis() as u64,
            }),
        }
    }
}
