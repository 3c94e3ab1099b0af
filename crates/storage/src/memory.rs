//! In-memory snapshot store
//!
//! Reference implementation of [`SnapshotStore`] holding only metadata.
//! Per-user inventories live behind one `RwLock`, so `consistent_view`
//! reads usage and inventory from the same point in time.

use std::collections::{BTreeMap, HashMap};

use keepsake_core::{
    DeletionOutcome, Error, Result, SnapshotId, SnapshotMetadata, SnapshotStore, UsageSnapshot,
    UserId,
};
use parking_lot::RwLock;
use tracing::debug;

use crate::testing::{FaultInjector, INJECTED_DELETE_FAILURE};

#[derive(Debug, Default)]
struct UserShelf {
    snapshots: BTreeMap<SnapshotId, SnapshotMetadata>,
    /// Quota reported in the usage row; 0 when not tracked
    quota_bytes: u64,
}

impl UserShelf {
    fn usage(&self) -> Option<UsageSnapshot> {
        if self.snapshots.is_empty() {
            return None;
        }
        let total = self
            .snapshots
            .values()
            .fold(0u64, |acc, s| acc.saturating_add(s.size_bytes));
        Some(UsageSnapshot::new(total, self.quota_bytes))
    }

    fn inventory(&self) -> Vec<SnapshotMetadata> {
        self.snapshots.values().cloned().collect()
    }
}

/// Metadata-only snapshot store
///
/// # Example
///
/// ```
/// use keepsake_core::{SnapshotId, SnapshotMetadata, SnapshotStore, Timestamp, UserId};
/// use keepsake_storage::InMemorySnapshotStore;
///
/// let store = InMemorySnapshotStore::new();
/// let user = UserId::new();
/// assert!(store.usage(&user).unwrap().is_none());
///
/// store.insert(user, SnapshotMetadata::new(SnapshotId::new(), Timestamp::from_secs(1), 42));
/// assert_eq!(store.usage(&user).unwrap().unwrap().total_bytes, 42);
/// ```
#[derive(Debug, Default)]
pub struct InMemorySnapshotStore {
    users: RwLock<HashMap<UserId, UserShelf>>,
    faults: FaultInjector,
}

impl InMemorySnapshotStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a committed snapshot
    pub fn insert(&self, user: UserId, snapshot: SnapshotMetadata) {
        self.users
            .write()
            .entry(user)
            .or_default()
            .snapshots
            .insert(snapshot.id, snapshot);
    }

    /// Record many snapshots under one lock
    pub fn insert_all(&self, user: UserId, snapshots: impl IntoIterator<Item = SnapshotMetadata>) {
        let mut users = self.users.write();
        let shelf = users.entry(user).or_default();
        for snapshot in snapshots {
            shelf.snapshots.insert(snapshot.id, snapshot);
        }
    }

    /// Set the quota reported in the user's usage row
    pub fn set_quota(&self, user: UserId, quota_bytes: u64) {
        self.users.write().entry(user).or_default().quota_bytes = quota_bytes;
    }

    /// Check if a snapshot is still stored
    pub fn contains(&self, user: &UserId, id: &SnapshotId) -> bool {
        self.users
            .read()
            .get(user)
            .map(|shelf| shelf.snapshots.contains_key(id))
            .unwrap_or(false)
    }

    /// Number of snapshots stored for a user
    pub fn snapshot_count(&self, user: &UserId) -> usize {
        self.users
            .read()
            .get(user)
            .map(|shelf| shelf.snapshots.len())
            .unwrap_or(0)
    }

    /// Fault injection switches
    pub fn faults(&self) -> &FaultInjector {
        &self.faults
    }

    fn usage_unavailable(&self, user: &UserId) -> Error {
        Error::QuotaDataUnavailable {
            user: *user,
            reason: "usage query failed".to_string(),
        }
    }
}

impl SnapshotStore for InMemorySnapshotStore {
    fn usage(&self, user: &UserId) -> Result<Option<UsageSnapshot>> {
        if self.faults.usage_unavailable() {
            return Err(self.usage_unavailable(user));
        }
        Ok(self.users.read().get(user).and_then(UserShelf::usage))
    }

    fn inventory(&self, user: &UserId) -> Result<Vec<SnapshotMetadata>> {
        if self.faults.inventory_unavailable() {
            return Err(Error::storage("inventory enumeration failed"));
        }
        Ok(self
            .users
            .read()
            .get(user)
            .map(UserShelf::inventory)
            .unwrap_or_default())
    }

    fn delete(&self, user: &UserId, ids: &[SnapshotId]) -> Result<DeletionOutcome> {
        let mut outcome = DeletionOutcome::default();
        let mut users = self.users.write();
        let shelf = users.get_mut(user);

        match shelf {
            Some(shelf) => {
                for id in ids {
                    if self.faults.should_fail_deletion(id) {
                        outcome.failed.push((*id, INJECTED_DELETE_FAILURE.to_string()));
                    } else {
                        shelf.snapshots.remove(id);
                        outcome.deleted.push(*id);
                    }
                }
            }
            // Nothing stored: every ID is already gone.
            None => outcome.deleted.extend_from_slice(ids),
        }

        debug!(
            target: "keepsake::storage",
            user = %user,
            deleted = outcome.deleted.len(),
            failed = outcome.failed.len(),
            "Deleted snapshots"
        );
        Ok(outcome)
    }

    fn consistent_view(
        &self,
        user: &UserId,
    ) -> Result<(Option<UsageSnapshot>, Vec<SnapshotMetadata>)> {
        if self.faults.usage_unavailable() {
            return Err(self.usage_unavailable(user));
        }
        if self.faults.inventory_unavailable() {
            return Err(Error::storage("inventory enumeration failed"));
        }
        let users = self.users.read();
        Ok(match users.get(user) {
            Some(shelf) => (shelf.usage(), shelf.inventory()),
            None => (None, Vec::new()),
        })
    }
}
