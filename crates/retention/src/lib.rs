//! Retention policy engine for snapshot history
//!
//! Pure policy and arithmetic over snapshot metadata:
//! - Policy catalog: plan tier -> retention policy
//! - Staleness: age + major flag -> eligible for cleanup
//! - Priority: eviction ranking under storage pressure
//! - Quota: aggregate usage -> exceeded / percentage
//! - Eviction: ordered plan restoring quota compliance
//!
//! Nothing here performs I/O or reads the clock; `now` is always a parameter.
//!
//! # Example
//!
//! ```
//! use keepsake_core::limits::{days, MB};
//! use keepsake_core::{PlanTier, SnapshotId, SnapshotMetadata, Timestamp, UsageSnapshot};
//! use keepsake_retention::{plan_eviction, EvictionOutcome};
//!
//! let now = Timestamp::from_secs(1_700_000_000);
//! let old = SnapshotMetadata::new(SnapshotId::new(), now.saturating_sub(days(90)), 30 * MB);
//! let plan = plan_eviction(
//!     &[old.clone()],
//!     PlanTier::Free,
//!     Some(UsageSnapshot::new(120 * MB, 100 * MB)),
//!     now,
//! );
//! assert_eq!(plan.outcome, EvictionOutcome::Satisfied);
//! assert_eq!(plan.snapshot_ids(), vec![old.id]);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod eviction;
pub mod policy;
pub mod priority;
pub mod quota;
pub mod staleness;

pub use config::{ConfigError, RetentionConfig, TierConfig, CONFIG_FILE_NAME};
pub use eviction::{
    plan_eviction, EvictionCandidate, EvictionOrchestrator, EvictionOrder, EvictionOutcome,
    EvictionPlan,
};
pub use policy::{policy_for, PolicyCatalog, RetentionPolicy};
pub use priority::priority;
pub use quota::{assess_quota, assess_quota_with, QuotaAssessment};
pub use staleness::{age_of, is_snapshot_stale, is_stale};
