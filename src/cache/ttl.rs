use regex::Regex;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};
use tracing::trace;

use super::{CacheError, ResponseCache};

/// Default lifetime of a cached response.
pub const DEFAULT_TTL: Duration = Duration::from_secs(300);

#[derive(Debug)]
struct CacheEntry {
    value: Value,
    stored_at: Instant,
}

/// In-memory cache whose entries expire `ttl` after they were stored.
#[derive(Debug)]
pub struct TtlCache {
    ttl: Duration,
    entries: Mutex<HashMap<String, CacheEntry>>,
}

impl Default for TtlCache {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

impl TtlCache {
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<String, CacheEntry>> {
        // A panic while holding the lock cannot leave a half-written entry.
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn is_fresh(&self, entry: &CacheEntry) -> bool {
        entry.stored_at.elapsed() < self.ttl
    }

    /// Number of stored entries, expired ones included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }

    fn purge_expired(&self, entries: &mut HashMap<String, CacheEntry>) {
        let before = entries.len();
        entries.retain(|_, entry| self.is_fresh(entry));
        let purged = before.saturating_sub(entries.len());
        if purged > 0 {
            trace!(purged, "Expired cache entries dropped");
        }
    }
}

impl ResponseCache for TtlCache {
    fn get(&self, key: &str) -> Option<Value> {
        let mut entries = self.entries();
        let fresh = entries.get(key).map(|entry| self.is_fresh(entry))?;
        if fresh {
            trace!(key, "Cache hit");
            entries.get(key).map(|entry| entry.value.clone())
        } else {
            trace!(key, "Cache entry expired");
            entries.remove(key);
            None
        }
    }

    /// Stores `value` and drops every other expired entry.
    fn set(&self, key: String, value: Value) {
        let mut entries = self.entries();
        self.purge_expired(&mut entries);
        entries.insert(
            key,
            CacheEntry {
                value,
                stored_at: Instant::now(),
            },
        );
    }

    fn invalidate(&self, pattern: &str) -> Result<usize, CacheError> {
        let matcher = Regex::new(pattern)?;
        let mut entries = self.entries();
        let before = entries.len();
        entries.retain(|key, _| !matcher.is_match(key));
        let evicted = before.saturating_sub(entries.len());
        trace!(pattern, evicted, "Cache invalidated");
        Ok(evicted)
    }
}
