//! Core types for snapshot retention
//!
//! This module defines the foundational value types:
//! - SnapshotId: Unique identifier for one edit-history snapshot
//! - UserId: Owner of a snapshot inventory
//! - PlanTier: Billing tier selecting the retention policy
//! - SnapshotMetadata: Everything the engine knows about a snapshot
//! - UsageSnapshot: Aggregate storage usage for one user

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::Error;
use crate::timestamp::Timestamp;

/// Unique identifier for a snapshot
///
/// Opaque to the engine: it is only carried from the inventory into the
/// eviction plan and handed back to the storage collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SnapshotId(Uuid);

impl SnapshotId {
    /// Create a new random SnapshotId using UUID v4
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SnapshotId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SnapshotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of the user owning a snapshot inventory
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UserId(Uuid);

impl UserId {
    /// Create a new random UserId using UUID v4
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Billing tier that selects a retention policy
///
/// The tier is supplied by the billing/authorization layer; the engine never
/// looks it up itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanTier {
    /// Free plan (most restrictive)
    Free,
    /// Paid plan
    Pro,
}

impl PlanTier {
    /// All tiers, most restrictive first
    pub const ALL: [PlanTier; 2] = [PlanTier::Free, PlanTier::Pro];

    /// Wire name of this tier
    pub fn as_str(&self) -> &'static str {
        match self {
            PlanTier::Free => "free",
            PlanTier::Pro => "pro",
        }
    }
}

impl fmt::Display for PlanTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlanTier {
    type Err = Error;

    /// Parse a tier name coming from billing
    ///
    /// Unknown names are rejected; they never fall back to a default tier.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "free" => Ok(PlanTier::Free),
            "pro" => Ok(PlanTier::Pro),
            _ => Err(Error::InvalidPolicyTier(s.to_string())),
        }
    }
}

/// Metadata for one stored edit-history snapshot
///
/// Built once at the storage boundary and never mutated. Snapshot payload
/// bytes stay with the storage collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotMetadata {
    /// Snapshot identifier
    pub id: SnapshotId,
    /// Commit time of the edit that produced the snapshot
    pub created_at: Timestamp,
    /// Flagged checkpoint (named save) that outlives routine auto-saves
    pub is_major: bool,
    /// Size of the serialized snapshot payload
    pub size_bytes: u64,
}

impl SnapshotMetadata {
    /// Create metadata for a routine (non-major) snapshot
    pub fn new(id: SnapshotId, created_at: Timestamp, size_bytes: u64) -> Self {
        Self {
            id,
            created_at,
            is_major: false,
            size_bytes,
        }
    }

    /// Create metadata for a major checkpoint
    pub fn major(id: SnapshotId, created_at: Timestamp, size_bytes: u64) -> Self {
        Self {
            id,
            created_at,
            is_major: true,
            size_bytes,
        }
    }
}

/// Aggregate snapshot storage for one user at one point in time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageSnapshot {
    /// Sum of all snapshot sizes
    pub total_bytes: u64,
    /// Quota the usage is measured against
    pub quota_bytes: u64,
}

impl UsageSnapshot {
    /// Create a usage snapshot
    pub fn new(total_bytes: u64, quota_bytes: u64) -> Self {
        Self {
            total_bytes,
            quota_bytes,
        }
    }

    /// Same usage measured against a different quota
    pub fn with_quota(self, quota_bytes: u64) -> Self {
        Self {
            quota_bytes,
            ..self
        }
    }
}
