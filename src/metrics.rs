use std::time::Instant;
use tracing::info;

use crate::collection::Collection;

/// Logs how long an admin flow took when dropped.
///
/// ```ignore
/// let _timer = OperationTimer::new("move_item", Collection::Timeline);
/// ```
pub struct OperationTimer {
    operation: &'static str,
    collection: Collection,
    start: Instant,
}

impl OperationTimer {
    #[must_use]
    pub fn new(operation: &'static str, collection: Collection) -> Self {
        Self {
            operation,
            collection,
            start: Instant::now(),
        }
    }
}

impl Drop for OperationTimer {
    fn drop(&mut self) {
        info!(
            operation = %self.operation,
            collection = %self.collection,
            duration_ms = %self.start.elapsed().as_millis(),
            "Flow finished"
        );
    }
}

/// Short id to correlate the log lines of one flow.
#[must_use]
pub fn generate_request_id() -> String {
    let uuid_str = uuid::Uuid::new_v4().simple().to_string();
    uuid_str.get(..8).unwrap_or(&uuid_str).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_timer_keeps_labels() {
        let timer = OperationTimer::new("repair_collection", Collection::Interests);
        assert_eq!(timer.operation, "repair_collection");
        assert_eq!(timer.collection, Collection::Interests);
    }

    #[test]
    fn test_request_id_is_eight_hex_chars() {
        let id = generate_request_id();
        assert_eq!(id.len(), 8);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_request_ids_differ() {
        assert_ne!(generate_request_id(), generate_request_id());
    }
}
