//! Application state shared across handlers.

use dashboard_core::Pipeline;
use event_source::{load_event_table, EventSource, LoadOutcome};
use moka::future::Cache;
use std::sync::Arc;
use telemetry::metrics;
use tracing::{debug, info};

use crate::settings::DashboardSettings;
use crate::theme::Theme;

/// The loaded event table, memoized for the life of the process.
///
/// A failed load is memoized too (as an empty table with its error), so a
/// broken source is not hammered by every request. `refresh` drops the
/// entry and loads again.
#[derive(Clone)]
pub struct DatasetCache {
    source: Arc<dyn EventSource>,
    pipeline: Arc<Pipeline>,
    cache: Cache<(), Arc<LoadOutcome>>,
}

impl DatasetCache {
    pub fn new(source: Arc<dyn EventSource>) -> Self {
        Self {
            source,
            pipeline: Arc::new(Pipeline::new()),
            cache: Cache::builder().max_capacity(1).build(),
        }
    }

    /// Returns the cached outcome, loading it on first use.
    ///
    /// Concurrent callers on a cold cache share a single load.
    pub async fn get(&self) -> Arc<LoadOutcome> {
        if let Some(cached) = self.cache.get(&()).await {
            metrics().cache_hits.inc();
            debug!("dataset cache hit");
            return cached;
        }

        self.cache
            .get_with((), async {
                Arc::new(load_event_table(self.source.as_ref(), &self.pipeline).await)
            })
            .await
    }

    /// Drops the cached outcome and loads a fresh one.
    pub async fn refresh(&self) -> Arc<LoadOutcome> {
        self.cache.invalidate(&()).await;
        info!(source = %self.source.describe(), "dataset cache invalidated");
        self.get().await
    }
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub dataset: DatasetCache,
    pub settings: Arc<DashboardSettings>,
    pub theme: Arc<Theme>,
}

impl AppState {
    pub fn new(source: Arc<dyn EventSource>, settings: DashboardSettings) -> Self {
        Self {
            dataset: DatasetCache::new(source),
            settings: Arc::new(settings),
            theme: Arc::new(Theme::brand()),
        }
    }
}
