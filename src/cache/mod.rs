//! Response cache keyed by request signature.
//!
//! The cache is an injected service: [`TtlCache`] for real use, [`NoopCache`]
//! where caching must be off. Keys look like `GET /timeline` and are evicted
//! by regular-expression pattern when the collection they describe changes.

mod ttl;

pub use ttl::TtlCache;

use serde_json::Value;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CacheError {
    #[error("Invalid invalidation pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
}

pub trait ResponseCache: Send + Sync {
    /// Cached value for `key`, if present and not expired.
    fn get(&self, key: &str) -> Option<Value>;

    fn set(&self, key: String, value: Value);

    /// Evict every key matching `pattern`. Returns how many were evicted.
    fn invalidate(&self, pattern: &str) -> Result<usize, CacheError>;
}

/// Cache that stores nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopCache;

impl ResponseCache for NoopCache {
    fn get(&self, _key: &str) -> Option<Value> {
        None
    }

    fn set(&self, _key: String, _value: Value) {}

    fn invalidate(&self, pattern: &str) -> Result<usize, CacheError> {
        regex::Regex::new(pattern)?;
        Ok(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_noop_cache_never_hits() {
        let cache = NoopCache;
        cache.set("GET /timeline".to_string(), json!([]));
        assert!(cache.get("GET /timeline").is_none());
        assert_eq!(cache.invalidate("^GET /").unwrap(), 0);
    }

    #[test]
    fn test_noop_cache_still_validates_pattern() {
        assert!(NoopCache.invalidate("(").is_err());
    }
}
