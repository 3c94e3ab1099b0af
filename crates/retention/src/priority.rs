//! Eviction priority scoring
//!
//! Ranks snapshots for eviction under storage pressure. Higher scores are
//! evicted first. The scorer only ranks; it never decides staleness.
//!
//! ```text
//! score = (age / max_age) * 100
//!       * 0.5   if major
//!       * 1.2   if size_bytes > 1 MiB
//! ```
//!
//! Ties are broken by the orchestrator's sort (oldest first), not here.

use keepsake_core::limits::MIB;
use keepsake_core::{SnapshotMetadata, Timestamp};

use crate::policy::RetentionPolicy;
use crate::staleness::age_of;

/// Scale applied to the normalized age
pub const BASE_SCALE: f64 = 100.0;

/// Multiplier applied to major checkpoints
pub const MAJOR_MULTIPLIER: f64 = 0.5;

/// Multiplier applied to snapshots above [`LARGE_SNAPSHOT_BYTES`]
pub const LARGE_MULTIPLIER: f64 = 1.2;

/// Snapshots strictly larger than this are preferentially reclaimed
pub const LARGE_SNAPSHOT_BYTES: u64 = MIB;

/// Age normalized by the policy's `max_age`
///
/// Values above 1.0 mean the snapshot is past the routine staleness threshold.
pub fn age_ratio(snapshot: &SnapshotMetadata, now: Timestamp, policy: &RetentionPolicy) -> f64 {
    age_of(snapshot, now).as_micros() as f64 / policy.max_age.as_micros() as f64
}

/// Eviction priority of a snapshot observed at `now`
pub fn priority(snapshot: &SnapshotMetadata, now: Timestamp, policy: &RetentionPolicy) -> f64 {
    let mut score = age_ratio(snapshot, now, policy) * BASE_SCALE;
    if snapshot.is_major {
        score *= MAJOR_MULTIPLIER;
    }
    if snapshot.size_bytes > LARGE_SNAPSHOT_BYTES {
        score *= LARGE_MULTIPLIER;
    }
    score
}
