//! Retention enforcement for Keepsake
//!
//! Drives the pure eviction engine against a storage collaborator:
//! - RetentionRunner: consistent read, plan, delete, replan on partial failure
//! - EnforcementReport: what one enforcement deleted, reclaimed and left behind
//!
//! The engine is the only component that both reads storage and acts on an
//! eviction plan. Planning itself stays in `keepsake-retention`.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod runner;

pub use runner::{EnforcementReport, RetentionRunner, RunnerConfig};
