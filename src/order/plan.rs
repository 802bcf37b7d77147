//! Pure planners for the ordering protocol.
//!
//! Each planner reads a snapshot and returns the writes that keep the
//! collection's `order` values contiguous from 1. The returned sequence is
//! the issue order:
//! - increments are issued highest order first
//! - decrements and renumbering are issued lowest order first
//!
//! so no write lands on an order still held by a neighbour that is itself
//! about to move.

use super::item::{OrderUpdate, OrderableItem};
use std::cmp::Reverse;

/// Ordered list of writes produced by a planner.
pub type ReorderPlan = Vec<OrderUpdate>;

/// Make room for a new item at `target_order`.
///
/// Every item with `order >= target_order` moves up by one. Targets below 1
/// are treated as 1. The new item itself is not part of the plan.
#[must_use]
pub fn plan_insertion(items: &[OrderableItem], target_order: i64) -> ReorderPlan {
    let target = target_order.max(1);
    increments_descending(items.iter().filter(|item| item.order >= target).collect())
}

/// Close the gap left by the item holding `deleted_order`.
///
/// The first item with that order is dropped from the working set and the
/// remainder is renumbered `1..` by current order. Items whose order does not
/// change get no write.
#[must_use]
pub fn plan_deletion(items: &[OrderableItem], deleted_order: i64) -> ReorderPlan {
    let removed = items.iter().position(|item| item.order == deleted_order);
    let remaining = items
        .iter()
        .enumerate()
        .filter(|(index, _)| Some(*index) != removed)
        .map(|(_, item)| item)
        .collect();
    renumber(remaining)
}

/// Displace the neighbours of `item_id` so it can take `new_order`.
///
/// The moved item's own write is left to the caller. Unknown ids and moves
/// onto the current order produce an empty plan. `new_order` is not clamped.
#[must_use]
pub fn plan_move(items: &[OrderableItem], item_id: &str, new_order: i64) -> ReorderPlan {
    let Some(old_order) = items
        .iter()
        .find(|item| item.id == item_id)
        .map(|item| item.order)
    else {
        return ReorderPlan::new();
    };

    let others = items.iter().filter(|item| item.id != item_id);

    if new_order > old_order {
        // Moving down: (old, new] slides back by one.
        decrements_ascending(
            others
                .filter(|item| item.order > old_order && item.order <= new_order)
                .collect(),
        )
    } else if new_order < old_order {
        // Moving up: [new, old) slides forward by one.
        increments_descending(
            others
                .filter(|item| item.order >= new_order && item.order < old_order)
                .collect(),
        )
    } else {
        ReorderPlan::new()
    }
}

/// Renumber the whole snapshot to `1..=N` by current order.
///
/// Ties keep their snapshot position. Running the plan and planning again
/// yields nothing.
#[must_use]
pub fn plan_repair(items: &[OrderableItem]) -> ReorderPlan {
    renumber(items.iter().collect())
}

fn increments_descending(mut shifted: Vec<&OrderableItem>) -> ReorderPlan {
    shifted.sort_by_key(|item| Reverse(item.order));
    shifted
        .into_iter()
        .map(|item| OrderUpdate::new(&item.id, item.order, item.order.saturating_add(1)))
        .collect()
}

fn decrements_ascending(mut shifted: Vec<&OrderableItem>) -> ReorderPlan {
    shifted.sort_by_key(|item| item.order);
    shifted
        .into_iter()
        .map(|item| OrderUpdate::new(&item.id, item.order, item.order.saturating_sub(1)))
        .collect()
}

fn renumber(mut sorted: Vec<&OrderableItem>) -> ReorderPlan {
    sorted.sort_by_key(|item| item.order);
    (1_i64..)
        .zip(sorted)
        .filter(|(position, item)| item.order != *position)
        .map(|(position, item)| OrderUpdate::new(&item.id, item.order, position))
        .collect()
}

#[cfg(test)]
#[path = "plan_tests.rs"]
mod plan_tests;
