//! Retention enforcement against a storage collaborator
//!
//! [`RetentionRunner`] is the caller side of the eviction engine: it takes a
//! consistent usage + inventory view, plans, and hands the planned IDs to the
//! store for deletion.
//!
//! # Design Notes
//!
//! - Plans are advisory and idempotent; recovery from a partial deletion
//!   failure is another pass over fresh data, not a rollback
//! - A snapshot whose deletion failed is skipped by later passes of the same
//!   enforcement, so the planner routes around it
//! - An exhausted plan is never retried: without new data the next plan is the same
//! - An exhausted replan that excludes failed snapshots is never applied; it
//!   would delete fresh history without restoring quota
//! - A failure after deletions were applied surfaces as
//!   `Error::EnforcementInterrupted`, which carries the deleted IDs
//! - A failed usage query aborts with `QuotaDataUnavailable`; it is never read
//!   as zero usage
//!
//! # Example
//!
//! ```ignore
//! let runner = RetentionRunner::new(Arc::clone(&store), EvictionOrchestrator::default());
//! let report = runner.enforce(&user, PlanTier::Free, Timestamp::now())?;
//! println!("{}", report.summary());
//! report.into_result()?;
//! ```

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Instant;

use keepsake_core::{Error, PlanTier, Result, SnapshotId, SnapshotStore, Timestamp, UserId};
use keepsake_retention::config::DEFAULT_MAX_PASSES;
use keepsake_retention::{
    ConfigError, EvictionOrchestrator, EvictionOutcome, EvictionPlan, RetentionConfig,
};
use tracing::{debug, info, warn};

/// Knobs for a retention runner
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunnerConfig {
    /// Plan/delete passes per enforcement (at least 1)
    pub max_passes: u32,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        RunnerConfig {
            max_passes: DEFAULT_MAX_PASSES,
        }
    }
}

impl RunnerConfig {
    /// Set the number of passes
    pub fn with_max_passes(mut self, max_passes: u32) -> Self {
        self.max_passes = max_passes;
        self
    }
}

/// Result of one enforcement
#[derive(Debug, Clone, PartialEq)]
pub struct EnforcementReport {
    /// Tier enforced
    pub tier: PlanTier,
    /// Passes executed
    pub passes: u32,
    /// Snapshots deleted across all passes, in deletion order
    pub deleted: Vec<SnapshotId>,
    /// Bytes freed by the deletions
    pub bytes_reclaimed: u64,
    /// Deletions that failed and were not retried successfully
    pub failures: Vec<(SnapshotId, String)>,
    /// Outcome of the last plan
    pub outcome: EvictionOutcome,
    /// Usage projected by the last plan
    pub projected_bytes: u64,
    /// Quota enforced
    pub quota_bytes: u64,
    /// Wall time of the enforcement in milliseconds
    pub duration_ms: u64,
    converged: bool,
}

impl EnforcementReport {
    fn new(tier: PlanTier) -> Self {
        EnforcementReport {
            tier,
            passes: 0,
            deleted: Vec::new(),
            bytes_reclaimed: 0,
            failures: Vec::new(),
            outcome: EvictionOutcome::NotNeeded,
            projected_bytes: 0,
            quota_bytes: 0,
            duration_ms: 0,
            converged: false,
        }
    }

    /// Check if usage ended within quota with every planned deletion applied
    pub fn converged(&self) -> bool {
        self.converged
    }

    /// Check if anything was deleted
    pub fn did_evict(&self) -> bool {
        !self.deleted.is_empty()
    }

    /// Lift unresolved problems into typed errors
    ///
    /// # Errors
    ///
    /// - `Error::PartialDeletionFailure` if deletions failed and the
    ///   enforcement did not converge
    /// - `Error::ExhaustedWithoutSatisfaction` if the inventory ran out
    ///   before usage was back within quota
    pub fn into_result(self) -> Result<Self> {
        if !self.converged && !self.failures.is_empty() {
            return Err(Error::PartialDeletionFailure {
                deleted: self.deleted.len(),
                failed: self.failures,
            });
        }
        if self.outcome == EvictionOutcome::Exhausted {
            return Err(Error::ExhaustedWithoutSatisfaction {
                projected_bytes: self.projected_bytes,
                quota_bytes: self.quota_bytes,
            });
        }
        Ok(self)
    }

    /// Wrap `source` so deletions already applied are not lost
    fn interrupted(self, source: Error) -> Error {
        if self.deleted.is_empty() {
            return source;
        }
        Error::EnforcementInterrupted {
            deleted: self.deleted,
            bytes_reclaimed: self.bytes_reclaimed,
            source: Box::new(source),
        }
    }

    /// Get a summary string for logging
    pub fn summary(&self) -> String {
        format!(
            "tier={}, outcome={}, passes={}, deleted={}, failed={}, bytes_reclaimed={}, duration_ms={}",
            self.tier,
            self.outcome,
            self.passes,
            self.deleted.len(),
            self.failures.len(),
            self.bytes_reclaimed,
            self.duration_ms
        )
    }
}

/// Runs the retention pipeline for users of one store
pub struct RetentionRunner<S: SnapshotStore + ?Sized> {
    store: Arc<S>,
    orchestrator: EvictionOrchestrator,
    config: RunnerConfig,
}

impl<S: SnapshotStore + ?Sized> RetentionRunner<S> {
    /// Create a runner with default knobs
    pub fn new(store: Arc<S>, orchestrator: EvictionOrchestrator) -> Self {
        RetentionRunner {
            store,
            orchestrator,
            config: RunnerConfig::default(),
        }
    }

    /// Create a runner from `retention.toml` settings
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn from_config(
        store: Arc<S>,
        config: &RetentionConfig,
    ) -> std::result::Result<Self, ConfigError> {
        config.validate()?;
        Ok(RetentionRunner {
            store,
            orchestrator: config.orchestrator()?,
            config: RunnerConfig::default().with_max_passes(config.max_passes),
        })
    }

    /// Set runner knobs
    pub fn with_config(mut self, config: RunnerConfig) -> Self {
        self.config = config;
        self
    }

    /// Runner knobs in use
    pub fn config(&self) -> RunnerConfig {
        self.config
    }

    /// Compute the eviction plan for a user without deleting anything
    ///
    /// # Errors
    ///
    /// Returns `Error::QuotaDataUnavailable` if the usage query fails, or a
    /// storage error if the inventory cannot be enumerated.
    pub fn plan(&self, user: &UserId, tier: PlanTier, now: Timestamp) -> Result<EvictionPlan> {
        self.plan_excluding(user, tier, now, &HashSet::new())
    }

    fn plan_excluding(
        &self,
        user: &UserId,
        tier: PlanTier,
        now: Timestamp,
        skip: &HashSet<SnapshotId>,
    ) -> Result<EvictionPlan> {
        let (usage, mut inventory) = self.store.consistent_view(user)?;
        if !skip.is_empty() {
            inventory.retain(|snapshot| !skip.contains(&snapshot.id));
        }
        Ok(self.orchestrator.plan(&inventory, tier, usage, now))
    }

    /// Plan and delete until usage is within quota or no further progress is possible
    ///
    /// Outstanding failures and exhaustion are reported in the returned
    /// report; use [`EnforcementReport::into_result`] to turn them into errors.
    ///
    /// # Errors
    ///
    /// Returns an error if usage, inventory or the deletion request itself
    /// cannot be read or attempted. If earlier passes already deleted
    /// snapshots, the error is `Error::EnforcementInterrupted` carrying them.
    pub fn enforce(
        &self,
        user: &UserId,
        tier: PlanTier,
        now: Timestamp,
    ) -> Result<EnforcementReport> {
        let start = Instant::now();
        let max_passes = self.config.max_passes.max(1);
        let mut report = EnforcementReport::new(tier);
        let mut skip: HashSet<SnapshotId> = HashSet::new();

        info!(
            target: "keepsake::retention",
            user = %user,
            tier = %tier,
            max_passes,
            order = %self.orchestrator.order(),
            "Starting retention enforcement"
        );

        for pass in 1..=max_passes {
            let plan = match self.plan_excluding(user, tier, now, &skip) {
                Ok(plan) => plan,
                Err(e) => {
                    warn!(
                        target: "keepsake::retention",
                        user = %user,
                        pass,
                        deleted = report.deleted.len(),
                        error = %e,
                        "Retention pass failed to read storage"
                    );
                    return Err(report.interrupted(e));
                }
            };
            report.passes = pass;
            report.outcome = plan.outcome;
            report.projected_bytes = plan.projected_bytes;
            report.quota_bytes = plan.assessment.quota;

            if plan.is_empty() {
                report.converged = plan.outcome != EvictionOutcome::Exhausted;
                break;
            }

            if plan.outcome == EvictionOutcome::Exhausted && !skip.is_empty() {
                warn!(
                    target: "keepsake::retention",
                    user = %user,
                    pass,
                    skipped = skip.len(),
                    planned = plan.evictions.len(),
                    metric = "keepsake_retention_deferred_total",
                    "Replan exhausted without failed snapshots, deferring to next run"
                );
                break;
            }

            let sizes: HashMap<SnapshotId, u64> = plan
                .evictions
                .iter()
                .map(|c| (c.id, c.size_bytes))
                .collect();
            let outcome = match self.store.delete(user, &plan.snapshot_ids()) {
                Ok(outcome) => outcome,
                Err(e) => {
                    warn!(
                        target: "keepsake::retention",
                        user = %user,
                        pass,
                        deleted = report.deleted.len(),
                        error = %e,
                        "Retention pass failed to delete"
                    );
                    return Err(report.interrupted(e));
                }
            };

            for id in &outcome.deleted {
                report.bytes_reclaimed = report
                    .bytes_reclaimed
                    .saturating_add(sizes.get(id).copied().unwrap_or(0));
            }
            report.deleted.extend_from_slice(&outcome.deleted);

            debug!(
                target: "keepsake::retention",
                user = %user,
                pass,
                planned = sizes.len(),
                deleted = outcome.deleted.len(),
                failed = outcome.failed.len(),
                "Retention pass applied"
            );

            if plan.outcome == EvictionOutcome::Exhausted {
                report.failures.extend(outcome.failed);
                break;
            }

            if outcome.is_complete() {
                report.converged = true;
                break;
            }

            warn!(
                target: "keepsake::retention",
                user = %user,
                pass,
                failed = outcome.failed.len(),
                metric = "keepsake_retention_partial_deletions_total",
                "Partial deletion failure, replanning"
            );
            skip.extend(outcome.failed.iter().map(|(id, _)| *id));
            report.failures.extend(outcome.failed);
        }

        report.duration_ms = start.elapsed().as_millis() as u64;

        if report.outcome == EvictionOutcome::Exhausted {
            warn!(
                target: "keepsake::retention",
                user = %user,
                tier = %tier,
                projected_bytes = report.projected_bytes,
                quota_bytes = report.quota_bytes,
                metric = "keepsake_retention_exhausted_total",
                "Inventory exhausted without satisfying quota"
            );
        }

        info!(
            target: "keepsake::retention",
            user = %user,
            tier = %tier,
            passes = report.passes,
            deleted = report.deleted.len(),
            failed = report.failures.len(),
            bytes_reclaimed = report.bytes_reclaimed,
            outcome = %report.outcome,
            converged = report.converged,
            duration_ms = report.duration_ms,
            metric = "keepsake_retention_run_completed",
            "Retention enforcement completed"
        );

        Ok(report)
    }
}
