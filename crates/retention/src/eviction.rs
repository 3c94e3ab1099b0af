//! Eviction orchestration
//!
//! Combines the catalog, staleness, priority and quota components into an
//! ordered eviction plan for one user. Planning is a single pass over one
//! consistent inventory + usage view:
//!
//! 1. Resolve the tier's policy
//! 2. Assess quota; if not exceeded the plan is empty (`NotNeeded`)
//! 3. Classify and score every snapshot
//! 4. Sort, then take snapshots until projected usage is back at or below
//!    quota (`Satisfied`) or the inventory runs out (`Exhausted`)
//!
//! The orchestrator never deletes anything. Plans are advisory: after a
//! partial deletion failure the caller re-enumerates and plans again, and
//! already-deleted snapshots are simply absent from the next inventory.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use keepsake_core::{
    Error, PlanTier, Result, SnapshotId, SnapshotMetadata, Timestamp, UsageSnapshot,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::ConfigError;
use crate::policy::{PolicyCatalog, RetentionPolicy};
use crate::priority::priority;
use crate::quota::{assess_quota_with, QuotaAssessment};
use crate::staleness::is_snapshot_stale;

/// Order in which over-quota snapshots are taken
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvictionOrder {
    /// Every stale snapshot (by priority) before any fresh one (by priority)
    #[default]
    StaleFirst,
    /// Descending priority regardless of staleness
    PriorityOnly,
}

impl EvictionOrder {
    /// Get the configuration name of this order
    pub fn name(&self) -> &'static str {
        match self {
            EvictionOrder::StaleFirst => "stale_first",
            EvictionOrder::PriorityOnly => "priority_only",
        }
    }

    /// Compare two candidates; `Less` means `a` is evicted first
    ///
    /// Priority descending, then oldest first, then by ID so that the order is
    /// total and plans are deterministic.
    fn compare(&self, a: &EvictionCandidate, b: &EvictionCandidate) -> Ordering {
        let by_staleness = match self {
            EvictionOrder::StaleFirst => b.is_stale.cmp(&a.is_stale),
            EvictionOrder::PriorityOnly => Ordering::Equal,
        };
        by_staleness
            .then_with(|| b.priority.total_cmp(&a.priority))
            .then_with(|| a.created_at.cmp(&b.created_at))
            .then_with(|| a.id.cmp(&b.id))
    }
}

impl fmt::Display for EvictionOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EvictionOrder {
    type Err = ConfigError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "stale_first" => Ok(EvictionOrder::StaleFirst),
            "priority_only" => Ok(EvictionOrder::PriorityOnly),
            other => Err(ConfigError::InvalidEvictionOrder(other.to_string())),
        }
    }
}

/// Terminal state of a plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvictionOutcome {
    /// Usage is within quota; nothing to evict
    NotNeeded,
    /// Planned deletions bring usage back within quota
    Satisfied,
    /// Every snapshot was planned and usage is still over quota
    Exhausted,
}

impl EvictionOutcome {
    /// Get the name of this outcome for logging
    pub fn name(&self) -> &'static str {
        match self {
            EvictionOutcome::NotNeeded => "not_needed",
            EvictionOutcome::Satisfied => "satisfied",
            EvictionOutcome::Exhausted => "exhausted",
        }
    }
}

impl fmt::Display for EvictionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One snapshot chosen for eviction, with the facts that ranked it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvictionCandidate {
    /// Snapshot to delete
    pub id: SnapshotId,
    /// Creation time (tie-breaker)
    pub created_at: Timestamp,
    /// Bytes reclaimed by deleting it
    pub size_bytes: u64,
    /// Major checkpoint flag
    pub is_major: bool,
    /// Staleness under the plan's policy
    pub is_stale: bool,
    /// Eviction priority score
    pub priority: f64,
}

impl EvictionCandidate {
    fn evaluate(snapshot: &SnapshotMetadata, now: Timestamp, policy: &RetentionPolicy) -> Self {
        EvictionCandidate {
            id: snapshot.id,
            created_at: snapshot.created_at,
            size_bytes: snapshot.size_bytes,
            is_major: snapshot.is_major,
            is_stale: is_snapshot_stale(snapshot, now, policy),
            priority: priority(snapshot, now, policy),
        }
    }
}

/// Ordered list of snapshots to delete, plus the state that produced it
///
/// Serializable so callers can record it in an audit log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvictionPlan {
    /// Tier the plan was computed for
    pub tier: PlanTier,
    /// Policy resolved for the tier
    pub policy: RetentionPolicy,
    /// Quota verdict before any eviction
    pub assessment: QuotaAssessment,
    /// Snapshots to delete, in order
    pub evictions: Vec<EvictionCandidate>,
    /// Usage expected after every planned deletion
    pub projected_bytes: u64,
    /// Terminal state
    pub outcome: EvictionOutcome,
}

impl EvictionPlan {
    /// IDs to hand to the storage collaborator, in eviction order
    pub fn snapshot_ids(&self) -> Vec<SnapshotId> {
        self.evictions.iter().map(|c| c.id).collect()
    }

    /// Check if the plan deletes nothing
    pub fn is_empty(&self) -> bool {
        self.evictions.is_empty()
    }

    /// Bytes reclaimed if every planned deletion succeeds
    pub fn bytes_to_reclaim(&self) -> u64 {
        self.evictions
            .iter()
            .fold(0u64, |acc, c| acc.saturating_add(c.size_bytes))
    }

    /// Convert an exhausted plan into `Error::ExhaustedWithoutSatisfaction`
    ///
    /// # Errors
    ///
    /// Returns an error if the plan could not bring usage under quota.
    pub fn into_result(self) -> Result<Self> {
        match self.outcome {
            EvictionOutcome::Exhausted => Err(Error::ExhaustedWithoutSatisfaction {
                projected_bytes: self.projected_bytes,
                quota_bytes: self.assessment.quota,
            }),
            _ => Ok(self),
        }
    }

    /// Get a summary string for logging
    pub fn summary(&self) -> String {
        format!(
            "tier={}, outcome={}, evictions={}, usage={}, projected={}, quota={}",
            self.tier,
            self.outcome,
            self.evictions.len(),
            self.assessment.usage,
            self.projected_bytes,
            self.assessment.quota
        )
    }
}

/// Computes eviction plans against a policy catalog
#[derive(Debug, Clone, Default)]
pub struct EvictionOrchestrator {
    catalog: PolicyCatalog,
    order: EvictionOrder,
}

impl EvictionOrchestrator {
    /// Create an orchestrator over a catalog with the default order
    pub fn new(catalog: PolicyCatalog) -> Self {
        EvictionOrchestrator {
            catalog,
            order: EvictionOrder::default(),
        }
    }

    /// Set the eviction order
    pub fn with_order(mut self, order: EvictionOrder) -> Self {
        self.order = order;
        self
    }

    /// Catalog used to resolve tiers
    pub fn catalog(&self) -> &PolicyCatalog {
        &self.catalog
    }

    /// Eviction order in use
    pub fn order(&self) -> EvictionOrder {
        self.order
    }

    /// Plan evictions for one user's inventory
    ///
    /// Usage is assessed against the tier policy's quota; a quota column
    /// reported by storage is not authoritative. Projected usage starts from
    /// the larger of the reported total and the inventory's summed sizes.
    pub fn plan(
        &self,
        inventory: &[SnapshotMetadata],
        tier: PlanTier,
        usage: Option<UsageSnapshot>,
        now: Timestamp,
    ) -> EvictionPlan {
        let policy = self.catalog.policy_for(tier);
        let assessment = assess_quota_with(
            usage.map(|u| u.with_quota(policy.storage_quota)),
            &self.catalog,
        );

        if !assessment.exceeded {
            debug!(
                target: "keepsake::eviction",
                tier = %tier,
                percentage = assessment.percentage,
                "Quota not exceeded, no eviction needed"
            );
            return EvictionPlan {
                tier,
                policy,
                assessment,
                evictions: Vec::new(),
                projected_bytes: assessment.usage,
                outcome: EvictionOutcome::NotNeeded,
            };
        }

        let mut candidates: Vec<EvictionCandidate> = inventory
            .iter()
            .map(|snapshot| EvictionCandidate::evaluate(snapshot, now, &policy))
            .collect();
        candidates.sort_by(|a, b| self.order.compare(a, b));

        let inventory_bytes = inventory
            .iter()
            .fold(0u64, |acc, s| acc.saturating_add(s.size_bytes));
        let quota = assessment.quota;
        let mut projected = assessment.usage.max(inventory_bytes);

        let mut evictions = Vec::new();
        for candidate in candidates {
            if projected <= quota {
                break;
            }
            projected = projected.saturating_sub(candidate.size_bytes);
            evictions.push(candidate);
        }

        let outcome = if projected <= quota {
            EvictionOutcome::Satisfied
        } else {
            EvictionOutcome::Exhausted
        };

        debug!(
            target: "keepsake::eviction",
            tier = %tier,
            order = %self.order,
            inventory = inventory.len(),
            stale = evictions.iter().filter(|c| c.is_stale).count(),
            evictions = evictions.len(),
            usage = assessment.usage,
            projected,
            quota,
            outcome = %outcome,
            "Eviction plan computed"
        );

        EvictionPlan {
            tier,
            policy,
            assessment,
            evictions,
            projected_bytes: projected,
            outcome,
        }
    }
}

/// Plan evictions against the built-in catalog
pub fn plan_eviction(
    inventory: &[SnapshotMetadata],
    tier: PlanTier,
    usage: Option<UsageSnapshot>,
    now: Timestamp,
) -> EvictionPlan {
    EvictionOrchestrator::default().plan(inventory, tier, usage, now)
}
