//! Configuration validation with range checks.

use crate::error::ConfigError;

use super::Config;

const PROVIDERS: &[&str] = &["gemini", "openai"];

impl Config {
    /// Validate configuration values are within acceptable ranges.
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if !PROVIDERS.contains(&self.analysis.provider.as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "analysis.provider must be one of {PROVIDERS:?}, got '{}'",
                self.analysis.provider
            )));
        }
        if self.analysis.target_language.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "analysis.target_language must not be empty".into(),
            ));
        }
        if self.analysis.max_tokens == 0 {
            return Err(ConfigError::ValidationError(
                "analysis.max_tokens must be > 0".into(),
            ));
        }
        if !(0.0..=2.0).contains(&self.analysis.temperature) {
            return Err(ConfigError::ValidationError(
                "analysis.temperature must be between 0.0 and 2.0".into(),
            ));
        }
        if self.fanout.max_concurrent == 0 {
            return Err(ConfigError::ValidationError(
                "fanout.max_concurrent must be > 0".into(),
            ));
        }
        if self.limits.llm_timeout_ms == 0 {
            return Err(ConfigError::ValidationError(
                "limits.llm_timeout_ms must be > 0".into(),
            ));
        }
        if self.limits.search_timeout_ms == 0 {
            return Err(ConfigError::ValidationError(
                "limits.search_timeout_ms must be > 0".into(),
            ));
        }
        if self.limits.max_image_mb == 0 {
            return Err(ConfigError::ValidationError(
                "limits.max_image_mb must be > 0".into(),
            ));
        }
        if self.server.port == 0 {
            return Err(ConfigError::ValidationError(
                "server.port must be > 0".into(),
            ));
        }
        Ok(())
    }
}
