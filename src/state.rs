use std::sync::Arc;
use std::time::Duration;

use crate::cache::HistoryCache;
use crate::config::FeedConfig;
use crate::provider::BarSource;

/// Shared application state, passed to all route handlers via
/// `axum::extract::State`.
pub struct AppState {
    pub config: FeedConfig,
    pub cache: HistoryCache,
    pub source: Arc<dyn BarSource>,
}

impl AppState {
    pub fn new(config: FeedConfig, source: Arc<dyn BarSource>) -> Arc<Self> {
        let cache = HistoryCache::new(Duration::from_secs(config.cache_ttl_secs));
        Arc::new(Self {
            config,
            cache,
            source,
        })
    }
}
