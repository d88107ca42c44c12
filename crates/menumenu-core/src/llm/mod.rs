//! Menu extraction via vision-capable language models.
//!
//! Provides a provider abstraction over vision LLM backends (Gemini, OpenAI)
//! and the extractor that turns a menu photo into a validated dish list.

pub(crate) mod extractor;
pub(crate) mod gemini;
pub(crate) mod openai;
pub(crate) mod prompt;
pub(crate) mod provider;
pub(crate) mod reply;
pub(crate) mod retry;

pub use extractor::{ExtractOptions, MenuExtractor};
pub use provider::{ImageInput, LlmRequest, LlmResponse, VisionProvider, VisionProviderFactory};
pub use reply::strip_code_fences;
