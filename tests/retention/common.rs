//! Shared fixtures for retention tests

#![allow(dead_code)]

use std::sync::Arc;

use keepsake::limits::days;
use keepsake::{InMemorySnapshotStore, SnapshotId, SnapshotMetadata, Timestamp, UserId};

/// Fixed evaluation time so ages are exact
pub fn now() -> Timestamp {
    Timestamp::from_secs(1_700_000_000)
}

/// Ordinary snapshot `age_days` old
pub fn ordinary(age_days: u64, size_bytes: u64) -> SnapshotMetadata {
    SnapshotMetadata::new(
        SnapshotId::new(),
        now().saturating_sub(days(age_days)),
        size_bytes,
    )
}

/// Major checkpoint `age_days` old
pub fn major(age_days: u64, size_bytes: u64) -> SnapshotMetadata {
    SnapshotMetadata::major(
        SnapshotId::new(),
        now().saturating_sub(days(age_days)),
        size_bytes,
    )
}

/// Store holding `snapshots` for a fresh user
pub fn seeded_store(snapshots: &[SnapshotMetadata]) -> (Arc<InMemorySnapshotStore>, UserId) {
    let store = Arc::new(InMemorySnapshotStore::new());
    let user = UserId::new();
    store.insert_all(user, snapshots.iter().cloned());
    (store, user)
}
