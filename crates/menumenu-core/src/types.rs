//! Core data types: dishes, menu analyses, and image results.
//!
//! Everything here lives for a single request. Field names serialize in
//! camelCase because that is what the browser client reads.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identifier assigned to a dish at extraction time.
///
/// Image results are joined back to their dish by this id, never by the
/// dish's position in a list.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DishId(String);

impl DishId {
    /// Generate a fresh random id.
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for DishId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for DishId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DishId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// One menu item extracted from a photo.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dish {
    /// Join key for image results
    pub id: DishId,

    /// Dish name as printed on the menu
    pub original_name: String,

    /// Dish name in the target language
    pub translated_name: String,

    /// Short appetizing description in the target language
    pub description: String,

    /// Price as printed, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,

    /// Image-search query with cuisine and photography context
    pub search_query: String,
}

/// The structured result of analyzing one menu photo.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuAnalysis {
    /// Dishes in menu order
    pub dishes: Vec<Dish>,

    /// Language the menu is written in
    #[serde(rename = "language")]
    pub detected_language: String,

    /// Currency shown on the menu, if detected
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,

    /// Inferred restaurant style (e.g. "Traditional Spanish Taberna")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub restaurant_vibe: Option<String>,
}

impl MenuAnalysis {
    /// Look up a dish by id.
    pub fn dish(&self, id: &DishId) -> Option<&Dish> {
        self.dishes.iter().find(|d| &d.id == id)
    }
}

/// Attribution for a found image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credit {
    /// Photographer or provider name
    pub name: String,

    /// Profile or source page
    pub link: String,
}

/// A single image found by a search provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageHit {
    pub url: String,
    pub credit: Credit,
}

/// The outcome of resolving one query to an image.
///
/// An empty result is a valid "no image found" answer, not an error.
/// Both fields serialize as `null` when absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageResult {
    pub image_url: Option<String>,
    pub credit: Option<Credit>,
}

impl ImageResult {
    /// A result with no image.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.image_url.is_none()
    }
}

impl From<ImageHit> for ImageResult {
    fn from(hit: ImageHit) -> Self {
        Self {
            image_url: Some(hit.url),
            credit: Some(hit.credit),
        }
    }
}

/// One fan-out outcome, keyed by the dish it belongs to.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DishImage {
    pub dish_id: DishId,

    #[serde(flatten)]
    pub outcome: ImageOutcome,
}

/// Whether a dish's image lookup produced a result or failed.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ImageOutcome {
    Resolved(ImageResult),
    Failed { error: String },
}
