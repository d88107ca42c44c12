//! Image search provider trait.

use crate::error::UpstreamError;
use crate::types::ImageHit;
use async_trait::async_trait;

/// Trait that all image search providers implement.
///
/// `Ok(None)` means the provider answered but found nothing; only transport,
/// HTTP, and decoding failures are errors.
#[async_trait]
pub trait ImageSearchProvider: Send + Sync {
    /// Provider name for logging (e.g., "google", "unsplash").
    fn name(&self) -> &str;

    /// Search for the single best image matching `query`.
    async fn search(&self, query: &str) -> Result<Option<ImageHit>, UpstreamError>;
}
