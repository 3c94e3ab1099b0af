//! Keepsake - snapshot retention and eviction for version history
//!
//! Keepsake decides which historical snapshots of a user's work are kept and
//! which are deleted: routine snapshots age out by plan tier, major
//! checkpoints live twice as long, and when a user exceeds their storage
//! quota an ordered eviction plan brings usage back under it.
//!
//! # Quick Start
//!
//! ```
//! use std::sync::Arc;
//! use keepsake::limits::{days, MB};
//! use keepsake::{
//!     EvictionOrchestrator, InMemorySnapshotStore, PlanTier, RetentionRunner, SnapshotId,
//!     SnapshotMetadata, Timestamp, UserId,
//! };
//!
//! let store = Arc::new(InMemorySnapshotStore::new());
//! let user = UserId::new();
//! let now = Timestamp::from_secs(1_700_000_000);
//! store.insert_all(user, (0..4u64).map(|i| {
//!     SnapshotMetadata::new(SnapshotId::new(), now.saturating_sub(days(i * 20)), 30 * MB)
//! }));
//!
//! let runner = RetentionRunner::new(Arc::clone(&store), EvictionOrchestrator::default());
//! let report = runner.enforce(&user, PlanTier::Free, now).unwrap();
//! assert!(report.converged());
//! assert_eq!(store.snapshot_count(&user), 3);
//! ```
//!
//! # Architecture
//!
//! - `keepsake-core`: identifiers, metadata, timestamps, errors, `SnapshotStore`
//! - `keepsake-retention`: policy catalog, staleness, priority, quota, eviction planning
//! - `keepsake-storage`: in-memory store with fault injection
//! - `keepsake-engine`: enforcement loop against a store

pub use keepsake_core::*;
pub use keepsake_engine::{EnforcementReport, RetentionRunner, RunnerConfig};
pub use keepsake_retention::{
    assess_quota, assess_quota_with, is_snapshot_stale, is_stale, plan_eviction, policy_for,
    priority, ConfigError, EvictionCandidate, EvictionOrchestrator, EvictionOrder,
    EvictionOutcome, EvictionPlan, PolicyCatalog, QuotaAssessment, RetentionConfig,
    RetentionPolicy, TierConfig,
};
pub use keepsake_storage::{FaultInjector, InMemorySnapshotStore};

/// Retention policy engine
pub use keepsake_retention as retention;

/// Storage collaborators
pub use keepsake_storage as storage;
