//! Dish image search.
//!
//! Two providers sit behind one trait: Google Custom Search (primary,
//! credential-gated) and Unsplash (secondary, always attempted). The
//! resolver walks them in order and stops at the first usable answer.

pub(crate) mod google;
pub(crate) mod provider;
pub(crate) mod resolver;
pub(crate) mod unsplash;

pub use google::GoogleImageSearch;
pub use provider::ImageSearchProvider;
pub use resolver::ImageResolver;
pub use unsplash::UnsplashSearch;
