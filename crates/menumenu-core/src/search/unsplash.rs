//! Unsplash photo search, the secondary provider.
//!
//! Requests one landscape photo and credits its photographer.

use super::provider::ImageSearchProvider;
use crate::error::UpstreamError;
use crate::types::{Credit, ImageHit};
use async_trait::async_trait;
use serde::Deserialize;

/// Unsplash `search/photos` client.
pub struct UnsplashSearch {
    access_key: String,
    endpoint: String,
    client: reqwest::Client,
}

impl UnsplashSearch {
    pub fn new(access_key: &str, endpoint: &str) -> Self {
        Self {
            access_key: access_key.to_string(),
            endpoint: endpoint.to_string(),
            client: reqwest::Client::new(),
        }
    }
}

// --- Response types ---

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<Photo>,
    #[serde(default)]
    errors: Vec<String>,
}

#[derive(Deserialize)]
struct Photo {
    urls: PhotoUrls,
    user: Photographer,
}

#[derive(Deserialize)]
struct PhotoUrls {
    regular: String,
}

#[derive(Deserialize)]
struct Photographer {
    name: String,
    links: PhotographerLinks,
}

#[derive(Deserialize)]
struct PhotographerLinks {
    html: String,
}

/// Interpret a decoded response: reported errors fail, an empty result
/// list is a valid "nothing found".
fn first_hit(resp: SearchResponse) -> Result<Option<ImageHit>, UpstreamError> {
    if !resp.errors.is_empty() {
        return Err(UpstreamError::Search {
            provider: "unsplash".to_string(),
            message: resp.errors.join("; "),
            status_code: None,
        });
    }

    Ok(resp.results.into_iter().next().map(|photo| ImageHit {
        url: photo.urls.regular,
        credit: Credit {
            name: photo.user.name,
            link: photo.user.links.html,
        },
    }))
}

#[async_trait]
impl ImageSearchProvider for UnsplashSearch {
    fn name(&self) -> &str {
        "unsplash"
    }

    async fn search(&self, query: &str) -> Result<Option<ImageHit>, UpstreamError> {
        let resp = self
            .client
            .get(&self.endpoint)
            .header("Authorization", format!("Client-ID {}", self.access_key))
            .header("Accept-Version", "v1")
            .query(&[
                ("query", query),
                ("page", "1"),
                ("per_page", "1"),
                ("orientation", "landscape"),
            ])
            .send()
            .await
            .map_err(|e| UpstreamError::Search {
                provider: "unsplash".to_string(),
                message: format!("request failed: {e}"),
                status_code: None,
            })?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(UpstreamError::Search {
                provider: "unsplash".to_string(),
                message: format!("HTTP {status}: {text}"),
                status_code: Some(status.as_u16()),
            });
        }

        let search_resp: SearchResponse =
            resp.json().await.map_err(|e| UpstreamError::Search {
                provider: "unsplash".to_string(),
                message: format!("failed to parse response: {e}"),
                status_code: None,
            })?;

        first_hit(search_resp)
    }
}
