//! Ordered collection stores.
//!
//! A store is a plain document collection: it hands out snapshots and applies
//! single-item writes. It never enforces the ordering invariant; that is the
//! job of [`crate::order`].

pub mod cached;
pub mod error;
pub mod http;
pub mod memory;

use async_trait::async_trait;

use crate::collection::Collection;
use crate::order::{NewItem, OrderableItem};

pub use cached::CachedStore;
pub use error::StoreError;
pub use http::HttpStore;
pub use memory::{MemoryStore, RecordedWrite};

/// Document collection keyed by collection and item id.
#[async_trait]
pub trait OrderedStore: Send + Sync {
    /// Every item in the collection, in storage order.
    async fn fetch_all(&self, collection: Collection) -> Result<Vec<OrderableItem>, StoreError>;

    async fn fetch(&self, collection: Collection, id: &str) -> Result<OrderableItem, StoreError>;

    /// Create an item and return it with its store-assigned id.
    async fn create(
        &self,
        collection: Collection,
        item: &NewItem,
    ) -> Result<OrderableItem, StoreError>;

    /// Full-resource replace of the item with the given id.
    async fn replace(
        &self,
        collection: Collection,
        id: &str,
        item: &OrderableItem,
    ) -> Result<(), StoreError>;

    async fn delete(&self, collection: Collection, id: &str) -> Result<(), StoreError>;
}
