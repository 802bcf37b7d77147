//! Contiguous ordering for order-carrying collections.
//!
//! Planners in [`plan`] are pure: they read a snapshot and return the writes
//! needed to keep orders at `1..=N`. The entry points in [`apply`] run a
//! planner and issue its writes against an [`crate::store::OrderedStore`],
//! one at a time. Neither keeps any state between calls; callers re-fetch the
//! collection afterwards for the authoritative order.

pub mod apply;
pub mod item;
pub mod plan;

pub use apply::{
    apply_plan, compact_after_deletion, repair_contiguity, shift_for_insertion, shift_for_move,
    ApplyReport, FailedUpdate,
};
pub use item::{sort_by_order, NewItem, OrderUpdate, OrderableItem, RESERVED_FIELDS};
pub use plan::{plan_deletion, plan_insertion, plan_move, plan_repair, ReorderPlan};
