use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use crate::history::HistoryResponse;

/// Identity of one history query.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    symbol: String,
    resolution: String,
    from_ts: i64,
    to_ts: i64,
}

impl CacheKey {
    pub fn new(symbol: &str, resolution: &str, from_ts: i64, to_ts: i64) -> Self {
        Self {
            symbol: symbol.to_string(),
            resolution: resolution.to_string(),
            from_ts,
            to_ts,
        }
    }
}

struct CacheEntry {
    value: HistoryResponse,
    expires_at: Instant,
}

/// Time-bounded memo of normalized history responses.
///
/// Expired entries are bypassed on read, never swept, so the map grows with
/// the number of distinct query windows. A stale entry is only replaced when
/// a refetch for its key completes.
///
/// Handlers run concurrently, so the map sits behind a mutex; the lock is
/// never held across an await.
pub struct HistoryCache {
    ttl: Duration,
    entries: Mutex<HashMap<CacheKey, CacheEntry>>,
}

impl HistoryCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn get(&self, key: &CacheKey) -> Option<HistoryResponse> {
        self.get_at(key, Instant::now())
    }

    /// `get` against an explicit clock reading. A hit requires `now` to be
    /// strictly before the entry's expiry.
    pub fn get_at(&self, key: &CacheKey, now: Instant) -> Option<HistoryResponse> {
        let entries = self.entries.lock().unwrap_or_else(|p| p.into_inner());
        entries
            .get(key)
            .filter(|e| now < e.expires_at)
            .map(|e| e.value.clone())
    }

    pub fn put(&self, key: CacheKey, value: HistoryResponse) {
        self.put_at(key, value, Instant::now());
    }

    /// `put` against an explicit clock reading. Unconditionally overwrites
    /// any existing entry and re-arms its expiry to `now + ttl`.
    pub fn put_at(&self, key: CacheKey, value: HistoryResponse, now: Instant) {
        let mut entries = self.entries.lock().unwrap_or_else(|p| p.into_inner());
        entries.insert(
            key,
            CacheEntry {
                value,
                expires_at: now + self.ttl,
            },
        );
    }
}
