//! In-process store used by tests and dry runs.
//!
//! Records every write in issue order so callers can check the sequence a
//! plan produced, and can be told to reject writes for chosen ids.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use tokio::sync::RwLock;

use super::{OrderedStore, StoreError};
use crate::collection::Collection;
use crate::order::{NewItem, OrderableItem};

/// A write that reached the store, in the order it was issued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedWrite {
    Create {
        collection: Collection,
        id: String,
        order: i64,
    },
    Replace {
        collection: Collection,
        id: String,
        order: i64,
    },
    Delete {
        collection: Collection,
        id: String,
    },
}

#[derive(Debug, Default)]
struct MemoryState {
    collections: HashMap<Collection, Vec<OrderableItem>>,
    writes: Vec<RecordedWrite>,
    rejected_ids: HashSet<String>,
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<MemoryState>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a collection before the store is shared.
    #[must_use]
    pub fn with_items(mut self, collection: Collection, items: Vec<OrderableItem>) -> Self {
        self.state.get_mut().collections.insert(collection, items);
        self
    }

    /// Replace a collection's contents without recording writes.
    pub async fn seed(&self, collection: Collection, items: Vec<OrderableItem>) {
        self.state.write().await.collections.insert(collection, items);
    }

    /// Make every later replace or delete of `id` fail.
    pub async fn reject_writes_for(&self, id: impl Into<String>) {
        self.state.write().await.rejected_ids.insert(id.into());
    }

    pub async fn writes(&self) -> Vec<RecordedWrite> {
        self.state.read().await.writes.clone()
    }

    pub async fn clear_writes(&self) {
        self.state.write().await.writes.clear();
    }

    /// `(id, order)` pairs in storage order.
    pub async fn orders(&self, collection: Collection) -> Vec<(String, i64)> {
        self.state
            .read()
            .await
            .collections
            .get(&collection)
            .map(|items| {
                items
                    .iter()
                    .map(|item| (item.id.clone(), item.order))
                    .collect()
            })
            .unwrap_or_default()
    }
}

fn rejected(id: &str) -> StoreError {
    StoreError::custom(format!("write to {id} rejected"))
}

#[async_trait]
impl OrderedStore for MemoryStore {
    async fn fetch_all(&self, collection: Collection) -> Result<Vec<OrderableItem>, StoreError> {
        Ok(self
            .state
            .read()
            .await
            .collections
            .get(&collection)
            .cloned()
            .unwrap_or_default())
    }

    async fn fetch(&self, collection: Collection, id: &str) -> Result<OrderableItem, StoreError> {
        self.state
            .read()
            .await
            .collections
            .get(&collection)
            .and_then(|items| items.iter().find(|item| item.id == id))
            .cloned()
            .ok_or_else(|| StoreError::not_found(collection, id))
    }

    async fn create(
        &self,
        collection: Collection,
        item: &NewItem,
    ) -> Result<OrderableItem, StoreError> {
        let id = uuid::Uuid::new_v4().simple().to_string();
        let mut state = self.state.write().await;
        let created = OrderableItem {
            id: id.clone(),
            order: item.order,
            fields: item.fields.clone(),
        };
        state
            .collections
            .entry(collection)
            .or_default()
            .push(created.clone());
        state.writes.push(RecordedWrite::Create {
            collection,
            id,
            order: item.order,
        });
        Ok(created)
    }

    async fn replace(
        &self,
        collection: Collection,
        id: &str,
        item: &OrderableItem,
    ) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        if state.rejected_ids.contains(id) {
            return Err(rejected(id));
        }

        let slot = state
            .collections
            .get_mut(&collection)
            .and_then(|items| items.iter_mut().find(|existing| existing.id == id))
            .ok_or_else(|| StoreError::not_found(collection, id))?;
        *slot = OrderableItem {
            id: id.to_string(),
            ..item.clone()
        };
        state.writes.push(RecordedWrite::Replace {
            collection,
            id: id.to_string(),
            order: item.order,
        });
        Ok(())
    }

    async fn delete(&self, collection: Collection, id: &str) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        if state.rejected_ids.contains(id) {
            return Err(rejected(id));
        }

        let items = state
            .collections
            .get_mut(&collection)
            .ok_or_else(|| StoreError::not_found(collection, id))?;
        let position = items
            .iter()
            .position(|existing| existing.id == id)
            .ok_or_else(|| StoreError::not_found(collection, id))?;
        items.remove(position);
        state.writes.push(RecordedWrite::Delete {
            collection,
            id: id.to_string(),
        });
        Ok(())
    }
}
