//! Retention policy types and the per-tier policy catalog
//!
//! A [`RetentionPolicy`] bounds how long routine snapshots live and how many
//! bytes a user may keep in total. Exactly one policy exists per [`PlanTier`].
//!
//! # Example
//!
//! ```
//! use keepsake_core::PlanTier;
//! use keepsake_retention::policy_for;
//!
//! let free = policy_for(PlanTier::Free);
//! let pro = policy_for(PlanTier::Pro);
//! assert!(pro.max_age >= free.max_age);
//! assert!(pro.storage_quota >= free.storage_quota);
//! ```

use std::time::Duration;

use keepsake_core::limits::{days, GB, MB};
use keepsake_core::PlanTier;
use serde::{Deserialize, Serialize};

use crate::config::ConfigError;

/// Default maximum age of routine snapshots on the free tier
pub const FREE_MAX_AGE: Duration = days(30);

/// Default storage quota on the free tier
pub const FREE_STORAGE_QUOTA: u64 = 100 * MB;

/// Default maximum age of routine snapshots on the pro tier
pub const PRO_MAX_AGE: Duration = days(365);

/// Default storage quota on the pro tier
pub const PRO_STORAGE_QUOTA: u64 = 10 * GB;

/// Retention policy for one plan tier
///
/// Immutable value type. Major snapshots get twice `max_age` before they are
/// considered stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetentionPolicy {
    /// Routine snapshots older than this are stale
    pub max_age: Duration,
    /// Aggregate byte ceiling for a user's snapshots
    pub storage_quota: u64,
}

impl RetentionPolicy {
    /// Create a policy
    ///
    /// # Panics
    ///
    /// Panics if `max_age` is zero or `storage_quota` is zero.
    pub fn new(max_age: Duration, storage_quota: u64) -> Self {
        assert!(!max_age.is_zero(), "RetentionPolicy requires non-zero max_age");
        assert!(storage_quota > 0, "RetentionPolicy requires non-zero storage_quota");
        RetentionPolicy {
            max_age,
            storage_quota,
        }
    }

    /// Create a policy, reporting invalid values instead of panicking
    pub fn try_new(max_age: Duration, storage_quota: u64) -> Result<Self, ConfigError> {
        if max_age.is_zero() {
            return Err(ConfigError::ZeroMaxAge);
        }
        if storage_quota == 0 {
            return Err(ConfigError::ZeroQuota);
        }
        Ok(RetentionPolicy {
            max_age,
            storage_quota,
        })
    }

    /// Staleness threshold for a snapshot
    pub fn threshold(&self, is_major: bool) -> Duration {
        if is_major {
            self.max_age.saturating_mul(2)
        } else {
            self.max_age
        }
    }

    /// Get a human-readable summary of the policy
    pub fn summary(&self) -> String {
        format!(
            "max_age={}s, storage_quota={}B",
            self.max_age.as_secs(),
            self.storage_quota
        )
    }
}

/// Policies for every plan tier
///
/// Built so that upgrading never shrinks either limit: `pro.max_age >=
/// free.max_age` and `pro.storage_quota >= free.storage_quota`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyCatalog {
    free: RetentionPolicy,
    pro: RetentionPolicy,
}

impl Default for PolicyCatalog {
    fn default() -> Self {
        PolicyCatalog {
            free: RetentionPolicy::new(FREE_MAX_AGE, FREE_STORAGE_QUOTA),
            pro: RetentionPolicy::new(PRO_MAX_AGE, PRO_STORAGE_QUOTA),
        }
    }
}

impl PolicyCatalog {
    /// Create a catalog from explicit policies
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NonMonotonicTiers` if the pro policy is more
    /// restrictive than the free one in either dimension.
    pub fn new(free: RetentionPolicy, pro: RetentionPolicy) -> Result<Self, ConfigError> {
        if pro.max_age < free.max_age || pro.storage_quota < free.storage_quota {
            return Err(ConfigError::NonMonotonicTiers {
                free: free.summary(),
                pro: pro.summary(),
            });
        }
        Ok(PolicyCatalog { free, pro })
    }

    /// Policy for a tier
    pub fn policy_for(&self, tier: PlanTier) -> RetentionPolicy {
        match tier {
            PlanTier::Free => self.free,
            PlanTier::Pro => self.pro,
        }
    }

    /// Most restrictive policy in the catalog
    ///
    /// Used whenever usage data carries no trustworthy quota.
    pub fn most_restrictive(&self) -> RetentionPolicy {
        self.free
    }
}

/// Policy for a tier from the built-in catalog
pub fn policy_for(tier: PlanTier) -> RetentionPolicy {
    PolicyCatalog::default().policy_for(tier)
}
