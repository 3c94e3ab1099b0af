//! Storage layer for Keepsake
//!
//! Reference implementation of the storage collaborator:
//! - InMemorySnapshotStore: per-user snapshot metadata behind a RwLock
//! - FaultInjector: switchable failures for usage, inventory and deletion
//!
//! Production deployments implement `SnapshotStore` over their own database;
//! this crate backs tests and local tooling.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod memory;
pub mod testing;

pub use memory::InMemorySnapshotStore;
pub use testing::FaultInjector;
