//! Staleness evaluation
//!
//! A routine snapshot is stale once its age exceeds the policy's `max_age`.
//! A major snapshot gets twice the grace period. The boundary itself is not
//! stale. Ages are supplied by the caller, so evaluation never reads the clock.

use std::time::Duration;

use keepsake_core::{SnapshotMetadata, Timestamp};

use crate::policy::RetentionPolicy;

/// Check whether a snapshot of the given age is eligible for cleanup
pub fn is_stale(age: Duration, is_major: bool, policy: &RetentionPolicy) -> bool {
    age > policy.threshold(is_major)
}

/// Age of a snapshot observed at `now`
///
/// Snapshots dated after `now` have age zero.
pub fn age_of(snapshot: &SnapshotMetadata, now: Timestamp) -> Duration {
    now.age_of(snapshot.created_at)
}

/// Staleness of a snapshot observed at `now`
pub fn is_snapshot_stale(
    snapshot: &SnapshotMetadata,
    now: Timestamp,
    policy: &RetentionPolicy,
) -> bool {
    is_stale(age_of(snapshot, now), snapshot.is_major, policy)
}
