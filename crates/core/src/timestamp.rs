//! Snapshot commit times
//!
//! Every snapshot records the moment its edit was committed, as microseconds
//! since Unix epoch. Ages used by the retention policy are computed between
//! two timestamps; the engine itself never reads the wall clock.
//!
//! ```
//! use std::time::Duration;
//! use keepsake_core::Timestamp;
//!
//! let created = Timestamp::from_secs(1);
//! let now = Timestamp::from_secs(61);
//! assert_eq!(now.age_of(created), Duration::from_secs(60));
//! assert_eq!(created.age_of(now), Duration::ZERO);
//! ```

use serde::{Deserialize, Serialize};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Commit time in microseconds since Unix epoch
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Timestamp(u64);

/// Whole microseconds in `duration`, saturating at `u64::MAX`
fn micros_of(duration: Duration) -> u64 {
    u64::try_from(duration.as_micros()).unwrap_or(u64::MAX)
}

impl Timestamp {
    /// Unix epoch
    pub const EPOCH: Timestamp = Timestamp(0);

    /// Current wall-clock time, for callers assembling `now`
    ///
    /// A clock set before the epoch reads as the epoch.
    pub fn now() -> Self {
        let since_epoch = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default();
        Timestamp(micros_of(since_epoch))
    }

    /// Timestamp from microseconds since epoch
    pub const fn from_micros(micros: u64) -> Self {
        Timestamp(micros)
    }

    /// Timestamp from whole seconds since epoch
    pub const fn from_secs(secs: u64) -> Self {
        Timestamp(secs.saturating_mul(1_000_000))
    }

    /// Microseconds since epoch
    pub const fn as_micros(&self) -> u64 {
        self.0
    }

    /// Whole seconds since epoch
    pub const fn as_secs(&self) -> u64 {
        self.0 / 1_000_000
    }

    /// Age at `self` of something created at `created_at`
    ///
    /// A `created_at` in the future (clock skew between writer and caller)
    /// has age zero.
    pub fn age_of(&self, created_at: Timestamp) -> Duration {
        Duration::from_micros(self.0.saturating_sub(created_at.0))
    }

    /// Move forward by `duration`, saturating at the largest timestamp
    pub fn saturating_add(&self, duration: Duration) -> Self {
        Timestamp(self.0.saturating_add(micros_of(duration)))
    }

    /// Move back by `duration`, saturating at the epoch
    pub fn saturating_sub(&self, duration: Duration) -> Self {
        Timestamp(self.0.saturating_sub(micros_of(duration)))
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{:06}", self.0 / 1_000_000, self.0 % 1_000_000)
    }
}
