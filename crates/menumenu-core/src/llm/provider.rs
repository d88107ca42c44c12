//! Vision provider trait and request/response types.
//!
//! Defines the interface that all vision LLM providers implement, plus the
//! factory that creates the right provider from config.

use crate::config::{resolve_env_var, LlmConfig};
use crate::error::{ConfigError, MenuError, UpstreamError};
use async_trait::async_trait;
use base64::Engine;
use std::time::Duration;

const DEFAULT_MEDIA_TYPE: &str = "image/jpeg";

/// Base64-encoded image ready to send to a vision API.
#[derive(Debug, Clone)]
pub struct ImageInput {
    /// Base64-encoded image bytes, no whitespace
    pub data: String,
    /// MIME type (e.g., "image/jpeg", "image/png")
    pub media_type: String,
}

impl ImageInput {
    /// Create an `ImageInput` from raw bytes and a format string.
    ///
    /// The format is a file extension or format identifier ("jpeg", "png", ...).
    pub fn from_bytes(bytes: &[u8], format: &str) -> Self {
        let media_type = match format.to_ascii_lowercase().as_str() {
            "jpeg" | "jpg" => "image/jpeg",
            "png" => "image/png",
            "webp" => "image/webp",
            "gif" => "image/gif",
            "heic" => "image/heic",
            other => {
                tracing::warn!(
                    "Unknown image format '{other}', defaulting to {DEFAULT_MEDIA_TYPE}"
                );
                DEFAULT_MEDIA_TYPE
            }
        };

        Self {
            data: base64::engine::general_purpose::STANDARD.encode(bytes),
            media_type: media_type.to_string(),
        }
    }

    /// Parse an image payload as sent by the browser client.
    ///
    /// Accepts either a data URI (`data:image/png;base64,....`) or a bare
    /// base64 string. The `data:` header is stripped and all whitespace
    /// removed. An `image/*` type named in the header is kept; anything else
    /// is assumed to be JPEG.
    pub fn from_payload(payload: &str) -> Result<Self, MenuError> {
        let payload = payload.trim();
        let (media_type, body) = match payload.strip_prefix("data:") {
            Some(rest) => {
                let (header, body) = rest.split_once(',').unwrap_or((rest, ""));
                let mime = header.split(';').next().unwrap_or_default().trim();
                let media_type = if mime.starts_with("image/") && mime.len() > "image/".len() {
                    mime.to_ascii_lowercase()
                } else {
                    DEFAULT_MEDIA_TYPE.to_string()
                };
                (media_type, body)
            }
            None => (DEFAULT_MEDIA_TYPE.to_string(), payload),
        };

        let data: String = body.chars().filter(|c| !c.is_whitespace()).collect();
        if data.is_empty() {
            return Err(MenuError::InvalidInput("No image provided".to_string()));
        }

        Ok(Self { data, media_type })
    }

    /// Approximate size of the decoded image in bytes.
    pub fn decoded_len(&self) -> usize {
        let padding = self.data.bytes().rev().take_while(|b| *b == b'=').count();
        (self.data.len() / 4 * 3 + (self.data.len() % 4) * 3 / 4).saturating_sub(padding)
    }

    /// Return a data URL suitable for OpenAI-style APIs.
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.media_type, self.data)
    }
}

/// A request to analyze one image.
#[derive(Debug, Clone)]
pub struct LlmRequest {
    /// The menu photo
    pub image: ImageInput,
    /// Instruction prompt for the model
    pub prompt: String,
    /// Maximum tokens to generate
    pub max_tokens: u32,
    /// Sampling temperature
    pub temperature: f32,
}

/// The raw reply of a vision model call.
#[derive(Debug, Clone)]
pub struct LlmResponse {
    /// Generated text
    pub text: String,
    /// Model identifier used
    pub model: String,
    /// Number of tokens used (input + output), if reported
    pub tokens_used: Option<u32>,
    /// Round-trip latency in milliseconds
    pub latency_ms: u64,
}

/// Trait that all vision providers implement.
///
/// Uses `async_trait` because native async fn in trait is not object-safe
/// (we need `Box<dyn VisionProvider>` for dynamic dispatch).
#[async_trait]
pub trait VisionProvider: Send + Sync {
    /// Provider name for logging (e.g., "gemini", "openai").
    fn name(&self) -> &str;

    /// Send the image and prompt, returning the model's text reply.
    async fn generate(&self, request: &LlmRequest) -> Result<LlmResponse, UpstreamError>;

    /// Per-request timeout for this provider.
    fn timeout(&self) -> Duration;
}

/// Factory that creates the configured vision provider.
pub struct VisionProviderFactory;

impl VisionProviderFactory {
    /// Create a vision provider by name.
    ///
    /// # Arguments
    /// * `provider` - Provider identifier ("gemini", "openai")
    /// * `config` - The full LLM config section
    /// * `timeout` - Per-request timeout applied by the provider
    pub fn create(
        provider: &str,
        config: &LlmConfig,
        timeout: Duration,
    ) -> Result<Box<dyn VisionProvider>, MenuError> {
        match provider {
            "gemini" => {
                let cfg = config.gemini.clone().unwrap_or_default();
                let api_key = resolve_env_var(&cfg.api_key).ok_or_else(|| {
                    ConfigError::ValidationError(
                        "Gemini API key not set. Set GEMINI_API_KEY env var.".to_string(),
                    )
                })?;
                Ok(Box::new(super::gemini::GeminiProvider::new(
                    &api_key, &cfg.model, timeout,
                )))
            }
            "openai" => {
                let cfg = config.openai.clone().unwrap_or_default();
                let api_key = resolve_env_var(&cfg.api_key).ok_or_else(|| {
                    ConfigError::ValidationError(
                        "OpenAI API key not set. Set OPENAI_API_KEY env var.".to_string(),
                    )
                })?;
                Ok(Box::new(super::openai::OpenAiProvider::with_endpoint(
                    &api_key,
                    &cfg.model,
                    &cfg.endpoint,
                    timeout,
                )))
            }
            other => Err(ConfigError::ValidationError(format!(
                "Unknown vision provider: {other}"
            ))
            .into()),
        }
    }
}
