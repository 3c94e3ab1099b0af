//! Retention configuration via `retention.toml`
//!
//! Tier policies and eviction knobs live in a small TOML file next to the
//! service that runs retention. A missing file can be replaced with the
//! commented default; every value is validated eagerly on load.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::eviction::{EvictionOrchestrator, EvictionOrder};
use crate::policy::{
    PolicyCatalog, RetentionPolicy, FREE_MAX_AGE, FREE_STORAGE_QUOTA, PRO_MAX_AGE,
    PRO_STORAGE_QUOTA,
};
use keepsake_core::limits::{checked_days, SECS_PER_DAY};

/// Config file name
pub const CONFIG_FILE_NAME: &str = "retention.toml";

/// Default number of plan/delete passes per enforcement
pub const DEFAULT_MAX_PASSES: u32 = 3;

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file could not be read or written
    #[error("Config file '{path}': {source}")]
    Io {
        /// File involved
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Config text is not valid TOML for this schema
    #[error("Failed to parse config: {0}")]
    Parse(String),

    /// A tier has a zero max age
    #[error("max_age must be non-zero")]
    ZeroMaxAge,

    /// A tier's max age does not fit in a duration
    #[error("max_age_days = {0} is too large")]
    MaxAgeTooLarge(u64),

    /// A tier has a zero storage quota
    #[error("storage_quota must be non-zero")]
    ZeroQuota,

    /// Pro tier is more restrictive than free
    #[error("Pro tier must not be more restrictive than free (free: {free}; pro: {pro})")]
    NonMonotonicTiers {
        /// Free policy summary
        free: String,
        /// Pro policy summary
        pro: String,
    },

    /// Unknown eviction order name
    #[error("Invalid eviction order '{0}'. Expected \"stale_first\" or \"priority_only\".")]
    InvalidEvictionOrder(String),

    /// `max_passes` is zero
    #[error("max_passes must be at least 1")]
    ZeroPasses,
}

impl From<ConfigError> for keepsake_core::Error {
    fn from(e: ConfigError) -> Self {
        keepsake_core::Error::InvalidConfig(e.to_string())
    }
}

/// Limits for one plan tier, as written in `retention.toml`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierConfig {
    /// Routine snapshots older than this many days are stale
    pub max_age_days: u64,
    /// Aggregate byte ceiling
    pub storage_quota_bytes: u64,
}

impl TierConfig {
    fn from_policy(policy: RetentionPolicy) -> Self {
        TierConfig {
            max_age_days: policy.max_age.as_secs() / SECS_PER_DAY,
            storage_quota_bytes: policy.storage_quota,
        }
    }

    /// Convert into a validated policy
    pub fn to_policy(&self) -> Result<RetentionPolicy, ConfigError> {
        let max_age = checked_days(self.max_age_days)
            .ok_or(ConfigError::MaxAgeTooLarge(self.max_age_days))?;
        RetentionPolicy::try_new(max_age, self.storage_quota_bytes)
    }
}

fn default_free() -> TierConfig {
    TierConfig::from_policy(RetentionPolicy::new(FREE_MAX_AGE, FREE_STORAGE_QUOTA))
}

fn default_pro() -> TierConfig {
    TierConfig::from_policy(RetentionPolicy::new(PRO_MAX_AGE, PRO_STORAGE_QUOTA))
}

fn default_eviction_order() -> String {
    EvictionOrder::default().name().to_string()
}

fn default_max_passes() -> u32 {
    DEFAULT_MAX_PASSES
}

/// Retention configuration loaded from `retention.toml`
///
/// # Example
///
/// ```toml
/// eviction_order = "stale_first"
/// max_passes = 3
///
/// [free]
/// max_age_days = 30
/// storage_quota_bytes = 100000000
///
/// [pro]
/// max_age_days = 365
/// storage_quota_bytes = 10000000000
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetentionConfig {
    /// `"stale_first"` (default) or `"priority_only"`
    #[serde(default = "default_eviction_order")]
    pub eviction_order: String,
    /// Plan/delete passes per enforcement before giving up
    #[serde(default = "default_max_passes")]
    pub max_passes: u32,
    /// Free tier limits
    #[serde(default = "default_free")]
    pub free: TierConfig,
    /// Pro tier limits
    #[serde(default = "default_pro")]
    pub pro: TierConfig,
}

impl Default for RetentionConfig {
    fn default() -> Self {
        RetentionConfig {
            eviction_order: default_eviction_order(),
            max_passes: default_max_passes(),
            free: default_free(),
            pro: default_pro(),
        }
    }
}

impl RetentionConfig {
    /// Build the policy catalog
    ///
    /// # Errors
    ///
    /// Returns an error if a tier has zero limits or the tiers are not monotonic.
    pub fn catalog(&self) -> Result<PolicyCatalog, ConfigError> {
        PolicyCatalog::new(self.free.to_policy()?, self.pro.to_policy()?)
    }

    /// Parse the eviction order
    ///
    /// # Errors
    ///
    /// Returns an error if the name is not a known order.
    pub fn eviction_order(&self) -> Result<EvictionOrder, ConfigError> {
        self.eviction_order.parse()
    }

    /// Validate every setting
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.catalog()?;
        self.eviction_order()?;
        if self.max_passes == 0 {
            return Err(ConfigError::ZeroPasses);
        }
        Ok(())
    }

    /// Build an orchestrator from this configuration
    pub fn orchestrator(&self) -> Result<EvictionOrchestrator, ConfigError> {
        Ok(EvictionOrchestrator::new(self.catalog()?).with_order(self.eviction_order()?))
    }

    /// Returns the default config file content with comments.
    pub fn default_toml() -> &'static str {
        r#"# Snapshot retention configuration
#
# Eviction order when a user is over quota:
#   "stale_first"   = every stale snapshot before any fresh one (default)
#   "priority_only" = strictly by eviction priority score
eviction_order = "stale_first"

# Plan/delete passes per enforcement; extra passes retry partial deletion failures.
max_passes = 3

# Routine snapshots older than max_age_days are stale; major checkpoints
# get twice as long. Quotas are in bytes.
[free]
max_age_days = 30
storage_quota_bytes = 100000000

[pro]
max_age_days = 365
storage_quota_bytes = 10000000000
"#
    }

    /// Parse and validate config text
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid TOML or fails validation.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: RetentionConfig =
            toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse config from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Write the default config file if it does not already exist.
    pub fn write_default_if_missing(path: &Path) -> Result<(), ConfigError> {
        if !path.exists() {
            std::fs::write(path, Self::default_toml()).map_err(|source| ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        }
        Ok(())
    }

    /// Serialize this config to TOML and write it to the given path.
    pub fn write_to_file(&self, path: &Path) -> Result<(), ConfigError> {
        let content =
            toml::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))?;
        std::fs::write(path, content).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}
