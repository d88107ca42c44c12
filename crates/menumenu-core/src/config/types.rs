//! Sub-configuration structs with their defaults.

use serde::{Deserialize, Serialize};

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind
    pub host: String,

    /// Port to listen on
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

/// Menu analysis settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Vision provider: "gemini" or "openai"
    pub provider: String,

    /// Language dish names and descriptions are translated into
    pub target_language: String,

    /// Maximum tokens the model may generate
    pub max_tokens: u32,

    /// Sampling temperature
    pub temperature: f32,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            provider: "gemini".to_string(),
            target_language: "Japanese".to_string(),
            max_tokens: 8192,
            temperature: 0.2,
        }
    }
}

/// Image fan-out settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FanOutConfig {
    /// Maximum simultaneous image searches per menu
    pub max_concurrent: usize,
}

impl Default for FanOutConfig {
    fn default() -> Self {
        Self { max_concurrent: 6 }
    }
}

/// Retry settings for the vision model call.
///
/// Retries are off by default: a transient upstream failure ends the request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Max retry attempts for transient failures
    pub retry_attempts: u32,

    /// Base delay between retries in milliseconds
    pub retry_delay_ms: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            retry_attempts: 0,
            retry_delay_ms: 1000,
        }
    }
}

/// Resource limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Vision model call timeout in milliseconds
    pub llm_timeout_ms: u64,

    /// Per-provider image search timeout in milliseconds
    pub search_timeout_ms: u64,

    /// Maximum decoded image size in megabytes
    pub max_image_mb: u64,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            llm_timeout_ms: 60_000,
            search_timeout_ms: 10_000,
            max_image_mb: 20,
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: error, warn, info, debug, trace
    pub level: String,

    /// Log format: "pretty" or "json"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

/// Vision LLM provider configurations.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct LlmConfig {
    /// Google Gemini configuration
    pub gemini: Option<GeminiConfig>,

    /// OpenAI (or compatible) configuration
    pub openai: Option<OpenAiConfig>,
}

/// Gemini configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeminiConfig {
    /// API key (supports ${ENV_VAR} syntax)
    pub api_key: String,

    /// Model name
    pub model: String,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: "${GEMINI_API_KEY}".to_string(),
            model: "gemini-1.5-pro-latest".to_string(),
        }
    }
}

/// OpenAI configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenAiConfig {
    /// API key (supports ${ENV_VAR} syntax)
    pub api_key: String,

    /// Model name
    pub model: String,

    /// Chat Completions endpoint; change it for OpenAI-compatible hosts
    pub endpoint: String,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: "${OPENAI_API_KEY}".to_string(),
            model: "gpt-4o-mini".to_string(),
            endpoint: "https://api.openai.com/v1/chat/completions".to_string(),
        }
    }
}

/// Image search provider configurations.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SearchConfig {
    /// Primary provider: Google Custom Search
    pub google: GoogleSearchConfig,

    /// Secondary provider: Unsplash
    pub unsplash: UnsplashConfig,
}

/// Google Custom Search configuration.
///
/// Both values must resolve for the primary provider to be used at all.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GoogleSearchConfig {
    /// API key (supports ${ENV_VAR} syntax). Falls back to GEMINI_API_KEY.
    pub api_key: String,

    /// Programmable search engine id (the `cx` parameter)
    pub engine_id: String,

    /// Search endpoint
    pub endpoint: String,
}

impl Default for GoogleSearchConfig {
    fn default() -> Self {
        Self {
            api_key: "${GOOGLE_API_KEY}".to_string(),
            engine_id: "${GOOGLE_CSE_ID}".to_string(),
            endpoint: "https://customsearch.googleapis.com/customsearch/v1".to_string(),
        }
    }
}

/// Unsplash configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UnsplashConfig {
    /// Access key (supports ${ENV_VAR} syntax)
    pub access_key: String,

    /// Search endpoint
    pub endpoint: String,
}

impl Default for UnsplashConfig {
    fn default() -> Self {
        Self {
            access_key: "${UNSPLASH_ACCESS_KEY}".to_string(),
            endpoint: "https://api.unsplash.com/search/photos".to_string(),
        }
    }
}
