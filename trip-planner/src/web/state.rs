//! Application state for the web layer.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::info;

use crate::cache::{CacheError, LegCache};
use crate::legs::{LegStore, load_from_cache};
use crate::planner::SearchConfig;

/// Shared application state.
///
/// Searches run against an immutable leg store snapshot; reloading builds a
/// new snapshot and swaps it in without disturbing searches in flight.
#[derive(Clone)]
pub struct AppState {
    /// Current leg store snapshot
    pub legs: Arc<RwLock<Arc<LegStore>>>,

    /// Fare cache the snapshot is built from
    pub cache: Arc<LegCache>,

    /// Trip planner configuration
    pub config: Arc<SearchConfig>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(legs: LegStore, cache: LegCache, config: SearchConfig) -> Self {
        Self {
            legs: Arc::new(RwLock::new(Arc::new(legs))),
            cache: Arc::new(cache),
            config: Arc::new(config),
        }
    }

    /// The current snapshot.
    pub async fn snapshot(&self) -> Arc<LegStore> {
        self.legs.read().await.clone()
    }

    /// Rebuild the snapshot from the cache.
    ///
    /// Returns the number of legs loaded and records rejected.
    pub async fn reload(&self) -> Result<(usize, usize), ReloadError> {
        let cache = self.cache.clone();
        let ingestion = tokio::task::spawn_blocking(move || load_from_cache(&cache)).await??;

        let counts = (ingestion.store.len(), ingestion.rejected.len());
        *self.legs.write().await = Arc::new(ingestion.store);

        info!(legs = counts.0, rejected = counts.1, "Reloaded leg store");
        Ok(counts)
    }
}

/// Errors from rebuilding the snapshot.
#[derive(Debug, thiserror::Error)]
pub enum ReloadError {
    #[error(transparent)]
    Cache(#[from] CacheError),

    #[error("reload task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}
