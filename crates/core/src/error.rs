//! Error types for the retention engine
//!
//! Every failure a caller must render differently gets its own variant.
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.

use thiserror::Error;

use crate::types::{SnapshotId, UserId};

/// Result type alias for retention operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the retention engine
#[derive(Debug, Error)]
pub enum Error {
    /// Tier name not present in the policy catalog
    #[error("Invalid policy tier: {0:?}")]
    InvalidPolicyTier(String),

    /// Aggregate usage query failed or timed out
    ///
    /// Distinct from a legitimately empty usage result; usage must never be
    /// assumed to be zero after a failed query.
    #[error("Quota data unavailable for user {user}: {reason}")]
    QuotaDataUnavailable {
        /// User whose usage could not be read
        user: UserId,
        /// Underlying failure
        reason: String,
    },

    /// Some planned deletions succeeded and others failed
    #[error("Partial deletion failure: {deleted} deleted, {} failed", .failed.len())]
    PartialDeletionFailure {
        /// Number of snapshots deleted
        deleted: usize,
        /// Snapshots that could not be deleted, with the reason
        failed: Vec<(SnapshotId, String)>,
    },

    /// The whole inventory was planned without bringing usage under quota
    #[error("Inventory exhausted without satisfying quota: {projected_bytes} bytes projected, quota {quota_bytes}")]
    ExhaustedWithoutSatisfaction {
        /// Usage remaining after every planned deletion
        projected_bytes: u64,
        /// Quota that could not be met
        quota_bytes: u64,
    },

    /// Enforcement stopped by `source` after earlier passes had already deleted snapshots
    #[error("Enforcement interrupted after {} deletions: {source}", .deleted.len())]
    EnforcementInterrupted {
        /// Snapshots deleted before the failure, in deletion order
        deleted: Vec<SnapshotId>,
        /// Bytes freed by those deletions
        bytes_reclaimed: u64,
        /// Failure that stopped the enforcement
        #[source]
        source: Box<Error>,
    },

    /// Storage collaborator failure (inventory enumeration, deletion)
    #[error("Storage error: {0}")]
    Storage(String),

    /// Invalid retention configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl Error {
    /// Create a storage error
    pub fn storage(message: impl Into<String>) -> Self {
        Error::Storage(message.into())
    }

    /// Check if re-running the retention pipeline may succeed
    ///
    /// Exhaustion is not retryable: without new data the next plan is the same.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::EnforcementInterrupted { source, .. } => source.is_retryable(),
            other => matches!(
                other,
                Error::QuotaDataUnavailable { .. }
                    | Error::PartialDeletionFailure { .. }
                    | Error::Storage(_)
            ),
        }
    }
}
