//! Error types for menumenu.
//!
//! Upstream call failures (`UpstreamError`) carry full diagnostic detail and
//! are classified into the three request-level kinds of `MenuError` before
//! they reach a caller. The HTTP layer maps those kinds to status codes and
//! generic messages; the detail is only ever logged.

use thiserror::Error;

/// Top-level error type for menumenu operations.
#[derive(Error, Debug)]
pub enum MenuError {
    /// A required request field is missing or unusable (client error)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The vision model call failed or its reply could not be parsed
    #[error("Menu analysis failed: {0}")]
    AnalysisFailed(String),

    /// Every configured image provider failed
    #[error("Image search failed: {0}")]
    SearchFailed(String),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// General I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// A failed call to an external service.
#[derive(Error, Debug)]
pub enum UpstreamError {
    /// Vision model call failed
    #[error("LLM error: {message}")]
    Llm {
        message: String,
        status_code: Option<u16>,
    },

    /// Image search provider call failed
    #[error("{provider} search error: {message}")]
    Search {
        provider: String,
        message: String,
        status_code: Option<u16>,
    },

    /// Call did not finish in time
    #[error("Timeout in {stage} after {timeout_ms}ms")]
    Timeout { stage: String, timeout_ms: u64 },
}

/// Convenience type alias for menumenu results.
pub type Result<T> = std::result::Result<T, MenuError>;
