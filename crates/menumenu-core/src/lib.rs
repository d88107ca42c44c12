//! MenuMenu Core - menu photo analysis and dish image lookup.
//!
//! Takes a photo of a restaurant menu, asks a vision model for a structured
//! dish list (translated, described, and paired with an image-search query),
//! then finds one representative photo per dish.
//!
//! # Architecture
//!
//! ```text
//! Photo → MenuExtractor (vision LLM) → Dishes → ImageFanOut → ImageResolver
//!                                                              ├─ Google CSE
//!                                                              └─ Unsplash
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use menumenu_core::{Config, MenuMenu};
//!
//! #[tokio::main]
//! async fn main() -> menumenu_core::Result<()> {
//!     let menu = MenuMenu::new(Config::load()?)?;
//!     let analysis = menu.extractor().analyze_payload(&payload, None).await?;
//!     for dish in &analysis.dishes {
//!         let image = menu.resolver().resolve(&dish.search_query).await?;
//!         println!("{}: {:?}", dish.translated_name, image.image_url);
//!     }
//!     Ok(())
//! }
//! ```

// Module declarations
pub mod config;
pub mod error;
pub mod fanout;
pub mod llm;
pub mod output;
pub mod search;
pub mod types;

#[cfg(test)]
pub(crate) mod stub_upstream;

// Re-exports for convenient access
pub use config::Config;
pub use error::{ConfigError, MenuError, Result, UpstreamError};
pub use fanout::{FanOutOptions, FanOutStats, ImageFanOut};
pub use llm::{ExtractOptions, ImageInput, MenuExtractor, VisionProvider, VisionProviderFactory};
pub use output::{OutputFormat, OutputRecord, OutputWriter, ScanReport};
pub use search::{ImageResolver, ImageSearchProvider};
pub use types::{
    Credit, Dish, DishId, DishImage, ImageHit, ImageOutcome, ImageResult, MenuAnalysis,
};

use std::sync::Arc;
use std::time::Duration;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// The assembled service: one extractor and one resolver sharing a config.
///
/// Cheap to clone; both halves are reference counted.
#[derive(Clone)]
pub struct MenuMenu {
    config: Arc<Config>,
    extractor: Arc<MenuExtractor>,
    resolver: Arc<ImageResolver>,
}

impl MenuMenu {
    /// Build the configured providers.
    ///
    /// Fails if the selected vision provider has no API key. Missing search
    /// credentials are not fatal: Google is skipped and Unsplash reports its
    /// own failure per request.
    pub fn new(config: Config) -> Result<Self> {
        tracing::debug!("Initializing MenuMenu v{}", VERSION);
        let provider = VisionProviderFactory::create(
            &config.analysis.provider,
            &config.llm,
            Duration::from_millis(config.limits.llm_timeout_ms),
        )?;
        let extractor = MenuExtractor::new(provider, ExtractOptions::from_config(&config));
        let resolver = ImageResolver::from_config(&config);
        Ok(Self::from_parts(config, extractor, resolver))
    }

    /// Assemble from already-built parts.
    pub fn from_parts(config: Config, extractor: MenuExtractor, resolver: ImageResolver) -> Self {
        Self {
            config: Arc::new(config),
            extractor: Arc::new(extractor),
            resolver: Arc::new(resolver),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn extractor(&self) -> &MenuExtractor {
        &self.extractor
    }

    pub fn resolver(&self) -> &ImageResolver {
        &self.resolver
    }

    /// A fan-out over this service's resolver.
    ///
    /// `max_concurrent` overrides the configured bound when given.
    pub fn fanout(&self, max_concurrent: Option<usize>) -> ImageFanOut {
        let max_concurrent = max_concurrent.unwrap_or(self.config.fanout.max_concurrent);
        ImageFanOut::new(self.resolver.clone(), FanOutOptions { max_concurrent })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_new_without_vision_key_fails() {
        let mut config = Config::default();
        config.analysis.provider = "openai".to_string();
        config.llm.openai = Some(config::OpenAiConfig {
            api_key: "${DEFINITELY_NOT_SET_MENU_OPENAI_KEY}".to_string(),
            ..Default::default()
        });
        let err = MenuMenu::new(config).err().unwrap();
        assert!(matches!(err, MenuError::Config(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_new_with_literal_key() {
        let mut config = Config::default();
        config.llm.gemini = Some(config::GeminiConfig {
            api_key: "literal-key".to_string(),
            ..Default::default()
        });
        config.fanout.max_concurrent = 3;
        let menu = MenuMenu::new(config).unwrap();
        assert_eq!(menu.extractor().provider_name(), "gemini");
        assert_eq!(menu.config().fanout.max_concurrent, 3);
    }
}
