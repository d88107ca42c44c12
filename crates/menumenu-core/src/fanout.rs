//! Concurrent image lookup for every dish of a menu.
//!
//! One resolver call per dish, bounded by a semaphore. Results are delivered
//! through a callback as they complete, each keyed by its `DishId`, so a slow
//! lookup never holds back the others and completion order is irrelevant.
//! Dropping the returned future aborts lookups still in flight.

use crate::search::ImageResolver;
use crate::types::{Dish, DishImage, ImageOutcome};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// Configuration for the fan-out.
#[derive(Debug, Clone)]
pub struct FanOutOptions {
    /// Maximum simultaneous resolver calls
    pub max_concurrent: usize,
}

impl Default for FanOutOptions {
    fn default() -> Self {
        Self { max_concurrent: 6 }
    }
}

/// Tally of one fan-out run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FanOutStats {
    /// Dishes that got an image
    pub found: usize,
    /// Dishes for which no image exists
    pub empty: usize,
    /// Dishes whose lookup failed
    pub failed: usize,
}

/// Runs image lookups for a dish list.
pub struct ImageFanOut {
    resolver: Arc<ImageResolver>,
    options: FanOutOptions,
}

impl ImageFanOut {
    pub fn new(resolver: Arc<ImageResolver>, options: FanOutOptions) -> Self {
        Self { resolver, options }
    }

    /// Resolve an image for every dish.
    ///
    /// Spawns one task per dish; at most `max_concurrent` run a lookup at a
    /// time. Calls `on_result` once per dish as soon as that dish's lookup
    /// finishes.
    pub async fn resolve_all<F>(&self, dishes: &[Dish], on_result: F) -> FanOutStats
    where
        F: Fn(DishImage) + Send + Sync + 'static,
    {
        let semaphore = Arc::new(Semaphore::new(self.options.max_concurrent.max(1)));
        let on_result = Arc::new(on_result);
        let mut tasks = JoinSet::new();

        for dish in dishes {
            let semaphore = semaphore.clone();
            let resolver = self.resolver.clone();
            let on_result = on_result.clone();
            let dish_id = dish.id.clone();
            let query = dish.search_query.clone();

            tasks.spawn(async move {
                let outcome = match semaphore.acquire_owned().await {
                    Ok(_permit) => match resolver.resolve(&query).await {
                        Ok(result) => ImageOutcome::Resolved(result),
                        Err(e) => {
                            tracing::error!("Image lookup failed for dish {dish_id}: {e}");
                            ImageOutcome::Failed {
                                error: e.to_string(),
                            }
                        }
                    },
                    Err(_) => ImageOutcome::Failed {
                        error: "fan-out semaphore closed".to_string(),
                    },
                };
                let stat = match &outcome {
                    ImageOutcome::Resolved(r) if r.is_empty() => Stat::Empty,
                    ImageOutcome::Resolved(_) => Stat::Found,
                    ImageOutcome::Failed { .. } => Stat::Failed,
                };
                on_result(DishImage { dish_id, outcome });
                stat
            });
        }

        let mut stats = FanOutStats::default();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(Stat::Found) => stats.found += 1,
                Ok(Stat::Empty) => stats.empty += 1,
                Ok(Stat::Failed) => stats.failed += 1,
                Err(e) => {
                    tracing::error!("Image lookup task panicked: {e}");
                    stats.failed += 1;
                }
            }
        }
        stats
    }
}

enum Stat {
    Found,
    Empty,
    Failed,
}
