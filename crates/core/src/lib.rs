//! Core types and traits for Keepsake
//!
//! This crate defines the foundational types used throughout the system:
//! - Timestamp: Microsecond-precision creation times
//! - SnapshotId / UserId: Opaque identifiers
//! - PlanTier: Billing tier selecting a retention policy
//! - SnapshotMetadata / UsageSnapshot: What the engine reasons about
//! - Error: Error taxonomy shared by every layer
//! - SnapshotStore: Boundary with the storage collaborator

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod limits;
pub mod timestamp;
pub mod traits;
pub mod types;

pub use error::{Error, Result};
pub use timestamp::Timestamp;
pub use traits::{DeletionOutcome, SnapshotStore};
pub use types::{PlanTier, SnapshotId, SnapshotMetadata, UsageSnapshot, UserId};
