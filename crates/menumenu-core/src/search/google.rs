//! Google Custom Search (image mode), the primary provider.
//!
//! Requests a single safe-search-filtered image result.

use super::provider::ImageSearchProvider;
use crate::error::UpstreamError;
use crate::types::{Credit, ImageHit};
use async_trait::async_trait;
use serde::Deserialize;

/// Google Custom Search JSON API client.
pub struct GoogleImageSearch {
    api_key: String,
    engine_id: String,
    endpoint: String,
    client: reqwest::Client,
}

impl GoogleImageSearch {
    pub fn new(api_key: &str, engine_id: &str, endpoint: &str) -> Self {
        Self {
            api_key: api_key.to_string(),
            engine_id: engine_id.to_string(),
            endpoint: endpoint.to_string(),
            client: reqwest::Client::new(),
        }
    }
}

// --- Response types ---

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Deserialize)]
struct SearchItem {
    link: String,
    image: Option<ItemImage>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ItemImage {
    context_link: Option<String>,
}

/// First item as a hit, credited to Google and linking to the page the
/// image appears on (or the image itself when that is unknown).
fn first_hit(resp: SearchResponse) -> Option<ImageHit> {
    let item = resp.items.into_iter().next()?;
    let link = item
        .image
        .and_then(|i| i.context_link)
        .filter(|l| !l.is_empty())
        .unwrap_or_else(|| item.link.clone());
    Some(ImageHit {
        url: item.link,
        credit: Credit {
            name: "Google".to_string(),
            link,
        },
    })
}

#[async_trait]
impl ImageSearchProvider for GoogleImageSearch {
    fn name(&self) -> &str {
        "google"
    }

    async fn search(&self, query: &str) -> Result<Option<ImageHit>, UpstreamError> {
        let resp = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("key", self.api_key.as_str()),
                ("cx", self.engine_id.as_str()),
                ("q", query),
                ("searchType", "image"),
                ("num", "1"),
                ("safe", "active"),
            ])
            .send()
            .await
            .map_err(|e| UpstreamError::Search {
                provider: "google".to_string(),
                // Strip the URL: it carries the API key
                message: format!("request failed: {}", e.without_url()),
                status_code: None,
            })?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(UpstreamError::Search {
                provider: "google".to_string(),
                message: format!("HTTP {status}: {text}"),
                status_code: Some(status.as_u16()),
            });
        }

        let search_resp: SearchResponse =
            resp.json().await.map_err(|e| UpstreamError::Search {
                provider: "google".to_string(),
                message: format!("failed to parse response: {}", e.without_url()),
                status_code: None,
            })?;

        Ok(first_hit(search_resp))
    }
}
