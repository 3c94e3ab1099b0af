//! Byte and time units used by retention policies
//!
//! Quotas are expressed in decimal units (as billed), the large-snapshot
//! threshold in binary units.

use std::time::Duration;

/// One megabyte (decimal)
pub const MB: u64 = 1_000_000;

/// One gigabyte (decimal)
pub const GB: u64 = 1_000_000_000;

/// One mebibyte
pub const MIB: u64 = 1_048_576;

/// Seconds in one day
pub const SECS_PER_DAY: u64 = 24 * 60 * 60;

/// Duration of `n` whole days, saturating at `u64::MAX` seconds
///
/// Use [`checked_days`] for untrusted input.
pub const fn days(n: u64) -> Duration {
    Duration::from_secs(n.saturating_mul(SECS_PER_DAY))
}

/// Duration of `n` whole days, or `None` if the seconds overflow `u64`
pub const fn checked_days(n: u64) -> Option<Duration> {
    match n.checked_mul(SECS_PER_DAY) {
        Some(secs) => Some(Duration::from_secs(secs)),
        None => None,
    }
}
