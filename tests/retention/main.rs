//! Retention integration tests
//!
//! End-to-end behavior of the retention pipeline through the `keepsake`
//! facade: tier policies, staleness, priority, quota, eviction planning, and
//! enforcement against the in-memory store.

#![allow(clippy::unwrap_used)]

mod common;

mod config;
mod properties;
mod scenarios;
