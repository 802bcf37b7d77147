//! Read-through cache in front of another store.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, warn};

use super::{OrderedStore, StoreError};
use crate::cache::ResponseCache;
use crate::collection::Collection;
use crate::order::{NewItem, OrderableItem};

/// Memoises reads of the wrapped store and evicts a collection's entries on
/// every write to it, successful or not.
pub struct CachedStore<S> {
    inner: S,
    cache: Arc<dyn ResponseCache>,
}

impl<S: std::fmt::Debug> std::fmt::Debug for CachedStore<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CachedStore")
            .field("inner", &self.inner)
            .finish_non_exhaustive()
    }
}

impl<S: OrderedStore> CachedStore<S> {
    #[must_use]
    pub fn new(inner: S, cache: Arc<dyn ResponseCache>) -> Self {
        Self { inner, cache }
    }

    #[must_use]
    pub fn inner(&self) -> &S {
        &self.inner
    }

    #[must_use]
    pub fn list_key(collection: Collection) -> String {
        format!("GET /{}", collection.name())
    }

    #[must_use]
    pub fn item_key(collection: Collection, id: &str) -> String {
        format!("GET /{}/{id}", collection.name())
    }

    fn invalidate(&self, collection: Collection) {
        let pattern = format!("^GET /{}(/|$)", regex::escape(collection.name()));
        match self.cache.invalidate(&pattern) {
            Ok(evicted) => debug!(collection = %collection, evicted, "Invalidated cached reads"),
            Err(e) => warn!(collection = %collection, error = %e, "Cache invalidation failed"),
        }
    }

    fn cached<T: serde::de::DeserializeOwned>(&self, key: &str) -> Option<T> {
        let value = self.cache.get(key)?;
        match serde_json::from_value(value) {
            Ok(hit) => {
                debug!(key, "Serving from cache");
                Some(hit)
            }
            Err(e) => {
                warn!(key, error = %e, "Discarding undecodable cache entry");
                None
            }
        }
    }

    fn remember<T: serde::Serialize>(&self, key: String, value: &T) {
        match serde_json::to_value(value) {
            Ok(json) => self.cache.set(key, json),
            Err(e) => warn!(key = %key, error = %e, "Skipping cache write"),
        }
    }
}

#[async_trait]
impl<S: OrderedStore> OrderedStore for CachedStore<S> {
    async fn fetch_all(&self, collection: Collection) -> Result<Vec<OrderableItem>, StoreError> {
        let key = Self::list_key(collection);
        if let Some(items) = self.cached(&key) {
            return Ok(items);
        }
        let items = self.inner.fetch_all(collection).await?;
        self.remember(key, &items);
        Ok(items)
    }

    async fn fetch(&self, collection: Collection, id: &str) -> Result<OrderableItem, StoreError> {
        let key = Self::item_key(collection, id);
        if let Some(item) = self.cached(&key) {
            return Ok(item);
        }
        let item = self.inner.fetch(collection, id).await?;
        self.remember(key, &item);
        Ok(item)
    }

    async fn create(
        &self,
        collection: Collection,
        item: &NewItem,
    ) -> Result<OrderableItem, StoreError> {
        let result = self.inner.create(collection, item).await;
        self.invalidate(collection);
        result
    }

    async fn replace(
        &self,
        collection: Collection,
        id: &str,
        item: &OrderableItem,
    ) -> Result<(), StoreError> {
        let result = self.inner.replace(collection, id, item).await;
        self.invalidate(collection);
        result
    }

    async fn delete(&self, collection: Collection, id: &str) -> Result<(), StoreError> {
        let result = self.inner.delete(collection, id).await;
        self.invalidate(collection);
        result
    }
}
