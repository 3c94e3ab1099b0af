//! Storage collaborator abstraction
//!
//! The retention engine never touches snapshot bytes. Everything it needs from
//! storage goes through [`SnapshotStore`]: an aggregate usage query, inventory
//! enumeration, and deletion by ID.
//!
//! Thread safety: all methods must be safe to call concurrently from
//! multiple threads (requires Send + Sync).

use crate::error::{Error, Result};
use crate::types::{SnapshotId, SnapshotMetadata, UsageSnapshot, UserId};

/// Result of a deletion request
///
/// Deletion may partially fail; successes and failures are reported per ID.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeletionOutcome {
    /// Snapshots removed, in request order
    pub deleted: Vec<SnapshotId>,
    /// Snapshots that could not be removed, with the reason
    pub failed: Vec<(SnapshotId, String)>,
}

impl DeletionOutcome {
    /// Check if every requested deletion succeeded
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Storage collaborator holding snapshot payloads and metadata
pub trait SnapshotStore: Send + Sync {
    /// Aggregate usage for a user
    ///
    /// Returns `Ok(None)` when the user has no snapshots yet. A failed query
    /// must return `Err`, never `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns `Error::QuotaDataUnavailable` if the usage query fails or
    /// times out.
    fn usage(&self, user: &UserId) -> Result<Option<UsageSnapshot>>;

    /// Full snapshot inventory for a user
    ///
    /// # Errors
    ///
    /// Returns an error if enumeration fails.
    fn inventory(&self, user: &UserId) -> Result<Vec<SnapshotMetadata>>;

    /// Delete snapshots by ID
    ///
    /// IDs that no longer exist count as deleted, so re-running a plan is
    /// harmless.
    ///
    /// # Errors
    ///
    /// Returns an error only if the request could not be attempted at all;
    /// per-snapshot failures are reported in the outcome.
    fn delete(&self, user: &UserId, ids: &[SnapshotId]) -> Result<DeletionOutcome>;

    /// Usage and inventory taken from one consistent point
    ///
    /// The default calls [`usage`](Self::usage) then
    /// [`inventory`](Self::inventory); implementations that can read both
    /// atomically should override it.
    ///
    /// # Errors
    ///
    /// Returns `Error::QuotaDataUnavailable` if the usage query fails, or the
    /// enumeration error if the inventory cannot be read.
    fn consistent_view(
        &self,
        user: &UserId,
    ) -> Result<(Option<UsageSnapshot>, Vec<SnapshotMetadata>)> {
        let usage = self.usage(user).map_err(|e| match e {
            Error::QuotaDataUnavailable { .. } => e,
            other => Error::QuotaDataUnavailable {
                user: *user,
                reason: other.to_string(),
            },
        })?;
        let inventory = self.inventory(user)?;
        Ok((usage, inventory))
    }
}
