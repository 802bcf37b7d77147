//! Admin actions on ordered collections.
//!
//! Each flow reads a fresh snapshot, runs the ordering protocol around the
//! write the admin asked for, and returns the re-fetched collection. Failed
//! neighbour updates only show up in the returned report; a failed fetch or a
//! failed write of the item itself ends the flow with an error.

use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{info, instrument};

use crate::collection::Collection;
use crate::metrics::{generate_request_id, OperationTimer};
use crate::order::{
    compact_after_deletion, repair_contiguity, shift_for_insertion, shift_for_move,
    sort_by_order, ApplyReport, NewItem, OrderableItem, RESERVED_FIELDS,
};
use crate::store::{OrderedStore, StoreError};

#[derive(Error, Debug)]
pub enum FlowError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("No item with id '{id}' in {collection}")]
    NotFound { collection: Collection, id: String },

    #[error("Invalid item fields: {0}")]
    InvalidFields(String),
}

/// Collection state after a flow, plus what happened to the planned updates.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlowOutcome {
    /// Re-fetched items, sorted by order.
    pub items: Vec<OrderableItem>,
    pub report: ApplyReport,
}

fn slot_count(items: &[OrderableItem]) -> i64 {
    i64::try_from(items.len()).unwrap_or(i64::MAX)
}

/// The collection sorted by order. Ties keep storage order.
pub async fn list_items<S>(
    store: &S,
    collection: Collection,
) -> Result<Vec<OrderableItem>, FlowError>
where
    S: OrderedStore + ?Sized,
{
    let mut items = store.fetch_all(collection).await?;
    sort_by_order(&mut items);
    Ok(items)
}

async fn finish<S>(
    store: &S,
    collection: Collection,
    mut report: ApplyReport,
) -> Result<FlowOutcome, FlowError>
where
    S: OrderedStore + ?Sized,
{
    let fresh = store.fetch_all(collection).await?;
    report.merge(repair_contiguity(store, collection, &fresh).await);
    let items = list_items(store, collection).await?;
    Ok(FlowOutcome { items, report })
}

/// Create an item at `order`, shifting the items at or after it.
///
/// `order` is clamped to `1..=N+1`. `fields` must not carry `_id`, `id` or
/// `order`.
#[instrument(
    skip_all,
    fields(collection = %collection, order = order, request_id = %generate_request_id())
)]
pub async fn insert_item<S>(
    store: &S,
    collection: Collection,
    fields: Map<String, Value>,
    order: i64,
) -> Result<FlowOutcome, FlowError>
where
    S: OrderedStore + ?Sized,
{
    let _timer = OperationTimer::new("insert_item", collection);

    if let Some(key) = RESERVED_FIELDS.iter().find(|key| fields.contains_key(**key)) {
        return Err(FlowError::InvalidFields(format!(
            "'{key}' is assigned by the store or the ordering protocol"
        )));
    }

    let items = store.fetch_all(collection).await?;
    let order = order.clamp(1, slot_count(&items).saturating_add(1));

    let report = shift_for_insertion(store, collection, &items, order).await;
    let created = store.create(collection, &NewItem { order, fields }).await?;
    info!(id = %created.id, order, "Item created");

    finish(store, collection, report).await
}

/// Move an item to `new_order`, shifting the items in between.
///
/// `new_order` is clamped to `1..=N`.
#[instrument(
    skip_all,
    fields(
        collection = %collection,
        id = id,
        new_order = new_order,
        request_id = %generate_request_id()
    )
)]
pub async fn move_item<S>(
    store: &S,
    collection: Collection,
    id: &str,
    new_order: i64,
) -> Result<FlowOutcome, FlowError>
where
    S: OrderedStore + ?Sized,
{
    let _timer = OperationTimer::new("move_item", collection);

    let items = store.fetch_all(collection).await?;
    let Some(moving) = items.iter().find(|item| item.id == id).cloned() else {
        return Err(FlowError::NotFound {
            collection,
            id: id.to_string(),
        });
    };
    let new_order = new_order.clamp(1, slot_count(&items).max(1));

    let report = shift_for_move(store, collection, &items, id, new_order).await;
    if moving.order != new_order {
        store
            .replace(collection, id, &moving.with_order(new_order))
            .await?;
        info!(from = moving.order, to = new_order, "Item moved");
    }

    finish(store, collection, report).await
}

/// Delete an item and close the gap it leaves.
#[instrument(
    skip_all,
    fields(collection = %collection, id = id, request_id = %generate_request_id())
)]
pub async fn remove_item<S>(
    store: &S,
    collection: Collection,
    id: &str,
) -> Result<FlowOutcome, FlowError>
where
    S: OrderedStore + ?Sized,
{
    let _timer = OperationTimer::new("remove_item", collection);

    let mut items = store.fetch_all(collection).await?;
    let Some(position) = items.iter().position(|item| item.id == id) else {
        return Err(FlowError::NotFound {
            collection,
            id: id.to_string(),
        });
    };
    // Compaction drops the first holder of the deleted order, so the item
    // being deleted goes first.
    let removed = items.remove(position);
    let deleted_order = removed.order;
    items.insert(0, removed);

    store.delete(collection, id).await?;
    info!(order = deleted_order, "Item deleted");

    let report = compact_after_deletion(store, collection, &items, deleted_order).await;
    let items = list_items(store, collection).await?;
    Ok(FlowOutcome { items, report })
}

/// Renumber the collection to `1..=N`.
#[instrument(skip_all, fields(collection = %collection, request_id = %generate_request_id()))]
pub async fn repair_collection<S>(
    store: &S,
    collection: Collection,
) -> Result<FlowOutcome, FlowError>
where
    S: OrderedStore + ?Sized,
{
    let _timer = OperationTimer::new("repair_collection", collection);
    finish(store, collection, ApplyReport::default()).await
}

#[cfg(test)]
#[path = "flows_tests.rs"]
mod flows_tests;
