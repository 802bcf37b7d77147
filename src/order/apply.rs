//! Sequential, best-effort application of a reorder plan.

use tracing::{debug, info, warn};

use super::item::{OrderUpdate, OrderableItem};
use super::plan::{plan_deletion, plan_insertion, plan_move, plan_repair};
use crate::collection::Collection;
use crate::store::OrderedStore;

/// An update the store did not accept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedUpdate {
    pub update: OrderUpdate,
    pub error: String,
}

/// What happened to each update of a plan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplyReport {
    pub applied: Vec<OrderUpdate>,
    pub failed: Vec<FailedUpdate>,
}

impl ApplyReport {
    /// True when every planned update was written.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }

    /// Number of updates attempted.
    #[must_use]
    pub fn attempted(&self) -> usize {
        self.applied.len().saturating_add(self.failed.len())
    }

    pub fn merge(&mut self, other: ApplyReport) {
        self.applied.extend(other.applied);
        self.failed.extend(other.failed);
    }
}

/// Write each update of `plan` in order, one awaited `replace` at a time.
///
/// The full item from `items` is sent with its new order. A failed write is
/// logged and recorded, and the remaining updates are still issued. Updates
/// naming an id absent from `items` are recorded as failed without a call.
pub async fn apply_plan<S>(
    store: &S,
    collection: Collection,
    items: &[OrderableItem],
    plan: &[OrderUpdate],
) -> ApplyReport
where
    S: OrderedStore + ?Sized,
{
    let mut report = ApplyReport::default();

    for update in plan {
        let Some(item) = items.iter().find(|item| item.id == update.id) else {
            warn!(
                collection = %collection,
                id = %update.id,
                "Planned update targets an item missing from the snapshot"
            );
            report.failed.push(FailedUpdate {
                update: update.clone(),
                error: "item not in snapshot".to_string(),
            });
            continue;
        };

        match store
            .replace(collection, &update.id, &item.with_order(update.to))
            .await
        {
            Ok(()) => {
                debug!(collection = %collection, update = %update, "Order updated");
                report.applied.push(update.clone());
            }
            Err(e) => {
                warn!(
                    collection = %collection,
                    id = %update.id,
                    from = update.from,
                    to = update.to,
                    error = %e,
                    "Failed to update order, continuing with remaining updates"
                );
                report.failed.push(FailedUpdate {
                    update: update.clone(),
                    error: e.to_string(),
                });
            }
        }
    }

    report
}

/// Shift items at or after `target_order` up by one so a new item can be
/// created there.
pub async fn shift_for_insertion<S>(
    store: &S,
    collection: Collection,
    items: &[OrderableItem],
    target_order: i64,
) -> ApplyReport
where
    S: OrderedStore + ?Sized,
{
    let plan = plan_insertion(items, target_order);
    info!(
        collection = %collection,
        target_order,
        updates = plan.len(),
        "Making room for insertion"
    );
    apply_plan(store, collection, items, &plan).await
}

/// Renumber the rest of a pre-delete snapshot after the item at
/// `deleted_order` is gone.
pub async fn compact_after_deletion<S>(
    store: &S,
    collection: Collection,
    items: &[OrderableItem],
    deleted_order: i64,
) -> ApplyReport
where
    S: OrderedStore + ?Sized,
{
    let plan = plan_deletion(items, deleted_order);
    info!(
        collection = %collection,
        deleted_order,
        updates = plan.len(),
        "Compacting after deletion"
    );
    apply_plan(store, collection, items, &plan).await
}

/// Displace the neighbours of `item_id` for a move to `new_order`.
pub async fn shift_for_move<S>(
    store: &S,
    collection: Collection,
    items: &[OrderableItem],
    item_id: &str,
    new_order: i64,
) -> ApplyReport
where
    S: OrderedStore + ?Sized,
{
    let plan = plan_move(items, item_id, new_order);
    info!(
        collection = %collection,
        id = item_id,
        new_order,
        updates = plan.len(),
        "Shifting neighbours for move"
    );
    apply_plan(store, collection, items, &plan).await
}

/// Renumber the whole snapshot to `1..=N`.
pub async fn repair_contiguity<S>(
    store: &S,
    collection: Collection,
    items: &[OrderableItem],
) -> ApplyReport
where
    S: OrderedStore + ?Sized,
{
    let plan = plan_repair(items);
    if plan.is_empty() {
        debug!(collection = %collection, "Order already contiguous");
    } else {
        info!(collection = %collection, updates = plan.len(), "Repairing order contiguity");
    }
    apply_plan(store, collection, items, &plan).await
}

#[cfg(test)]
#[path = "apply_tests.rs"]
mod apply_tests;
