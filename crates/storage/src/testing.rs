//! Fault injection for exercising retention failure paths
//!
//! Lets tests fail the aggregate usage query, inventory enumeration, or the
//! deletion of specific snapshots, so callers can verify they distinguish a
//! failed query from an empty one and converge after partial deletions.
//!
//! # Example
//!
//! ```
//! use keepsake_core::SnapshotId;
//! use keepsake_storage::testing::FaultInjector;
//!
//! let faults = FaultInjector::new();
//! let id = SnapshotId::new();
//! faults.fail_deletion_of(id);
//! assert!(faults.should_fail_deletion(&id));
//! faults.clear();
//! assert!(!faults.should_fail_deletion(&id));
//! ```

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};

use keepsake_core::SnapshotId;
use parking_lot::Mutex;

/// Reason reported for injected deletion failures
pub const INJECTED_DELETE_FAILURE: &str = "injected deletion failure";

/// Switchable failure points for an in-memory store
#[derive(Debug, Default)]
pub struct FaultInjector {
    usage_unavailable: AtomicBool,
    inventory_unavailable: AtomicBool,
    failing_deletions: Mutex<HashSet<SnapshotId>>,
}

impl FaultInjector {
    /// Create an injector with every fault disabled
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the aggregate usage query fail
    pub fn set_usage_unavailable(&self, unavailable: bool) {
        self.usage_unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Make inventory enumeration fail
    pub fn set_inventory_unavailable(&self, unavailable: bool) {
        self.inventory_unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Make deletion of one snapshot fail until cleared
    pub fn fail_deletion_of(&self, id: SnapshotId) {
        self.failing_deletions.lock().insert(id);
    }

    /// Disable every fault
    pub fn clear(&self) {
        self.usage_unavailable.store(false, Ordering::SeqCst);
        self.inventory_unavailable.store(false, Ordering::SeqCst);
        self.failing_deletions.lock().clear();
    }

    /// Check if the usage query should fail
    pub fn usage_unavailable(&self) -> bool {
        self.usage_unavailable.load(Ordering::SeqCst)
    }

    /// Check if inventory enumeration should fail
    pub fn inventory_unavailable(&self) -> bool {
        self.inventory_unavailable.load(Ordering::SeqCst)
    }

    /// Check if deleting `id` should fail
    pub fn should_fail_deletion(&self, id: &SnapshotId) -> bool {
        self.failing_deletions.lock().contains(id)
    }
}
