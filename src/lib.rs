// Allow panic/unwrap/expect in tests (denied globally via Cargo.toml lints)
#![cfg_attr(
    test,
    allow(
        clippy::panic,
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic_in_result_fn,
        clippy::unwrap_in_result,
        clippy::arithmetic_side_effects,
        clippy::indexing_slicing
    )
)]

pub mod cache;
pub mod collection;
pub mod flows;
pub mod logging;
pub mod metrics;
pub mod order;
pub mod store;
pub mod user_config;

// Re-export commonly used types
pub use cache::{CacheError, NoopCache, ResponseCache, TtlCache};
pub use collection::{Collection, Endpoints, UnknownCollection};
pub use flows::{
    insert_item, list_items, move_item, remove_item, repair_collection, FlowError, FlowOutcome,
};
pub use order::{
    compact_after_deletion, plan_deletion, plan_insertion, plan_move, plan_repair,
    repair_contiguity, shift_for_insertion, shift_for_move, ApplyReport, FailedUpdate, NewItem,
    OrderUpdate, OrderableItem, ReorderPlan,
};
pub use store::{CachedStore, HttpStore, MemoryStore, OrderedStore, StoreError};
pub use user_config::{load_user_config, load_user_config_from, UserConfig, UserConfigError};
