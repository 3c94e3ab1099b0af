//! Quota assessment
//!
//! Turns an aggregate usage row into an exceeded/percentage verdict. Usage at
//! exactly 100% of quota is not exceeded.
//!
//! Missing usage data (a user with no snapshots yet) assesses as zero usage
//! against the free tier's quota. Absence of data never grants extra headroom.

use keepsake_core::UsageSnapshot;
use serde::{Deserialize, Serialize};

use crate::policy::PolicyCatalog;

/// Verdict on a user's aggregate snapshot storage
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QuotaAssessment {
    /// Usage is strictly above quota
    pub exceeded: bool,
    /// Bytes in use
    pub usage: u64,
    /// Quota the usage was measured against
    pub quota: u64,
    /// `usage / quota * 100`
    pub percentage: f64,
}

impl QuotaAssessment {
    /// Bytes left before the quota is exceeded
    pub fn remaining_bytes(&self) -> u64 {
        self.quota.saturating_sub(self.usage)
    }

    /// Bytes that must be reclaimed to get back to quota
    pub fn overage_bytes(&self) -> u64 {
        self.usage.saturating_sub(self.quota)
    }
}

/// Assess usage against the built-in catalog
pub fn assess_quota(usage: Option<UsageSnapshot>) -> QuotaAssessment {
    assess_quota_with(usage, &PolicyCatalog::default())
}

/// Assess usage, falling back to `catalog`'s most restrictive quota
///
/// The fallback applies when usage data is absent, and when the row carries a
/// zero quota (which would otherwise divide by zero or read as unlimited).
pub fn assess_quota_with(usage: Option<UsageSnapshot>, catalog: &PolicyCatalog) -> QuotaAssessment {
    let floor = catalog.most_restrictive().storage_quota;

    let usage = match usage {
        Some(usage) => usage,
        None => {
            return QuotaAssessment {
                exceeded: false,
                usage: 0,
                quota: floor,
                percentage: 0.0,
            }
        }
    };

    let quota = if usage.quota_bytes == 0 {
        floor
    } else {
        usage.quota_bytes
    };
    let percentage = usage.total_bytes as f64 / quota as f64 * 100.0;

    QuotaAssessment {
        // Integer comparison, equivalent to `percentage > 100` without float rounding.
        exceeded: usage.total_bytes > quota,
        usage: usage.total_bytes,
        quota,
        percentage,
    }
}
