//! `retention.toml` loading and validation

use std::time::Duration;

use tempfile::TempDir;

use keepsake::limits::days;
use keepsake::retention::CONFIG_FILE_NAME;
use keepsake::{ConfigError, EvictionOrder, PlanTier, PolicyCatalog, RetentionConfig};

#[test]
fn default_file_reproduces_builtin_catalog() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(CONFIG_FILE_NAME);

    RetentionConfig::write_default_if_missing(&path).unwrap();
    let config = RetentionConfig::from_file(&path).unwrap();

    assert_eq!(config.catalog().unwrap(), PolicyCatalog::default());
    assert_eq!(config.eviction_order().unwrap(), EvictionOrder::StaleFirst);
}

#[test]
fn custom_tiers_flow_into_orchestrator() {
    let config = RetentionConfig::from_toml_str(
        r#"
[free]
max_age_days = 7
storage_quota_bytes = 5000000

[pro]
max_age_days = 90
storage_quota_bytes = 50000000
"#,
    )
    .unwrap();

    let orchestrator = config.orchestrator().unwrap();
    let free = orchestrator.catalog().policy_for(PlanTier::Free);
    assert_eq!(free.max_age, days(7));
    assert_eq!(free.storage_quota, 5_000_000);
    assert_eq!(
        orchestrator.catalog().policy_for(PlanTier::Pro).max_age,
        Duration::from_secs(90 * 86_400)
    );
}

#[test]
fn pro_more_restrictive_than_free_is_rejected() {
    let result = RetentionConfig::from_toml_str(
        r#"
[free]
max_age_days = 30
storage_quota_bytes = 100000000

[pro]
max_age_days = 10
storage_quota_bytes = 100000000
"#,
    );
    assert!(matches!(result, Err(ConfigError::NonMonotonicTiers { .. })));
}

#[test]
fn unknown_eviction_order_is_rejected() {
    let result = RetentionConfig::from_toml_str("eviction_order = \"newest_first\"\n");
    assert!(matches!(result, Err(ConfigError::InvalidEvictionOrder(name)) if name == "newest_first"));
}

#[test]
fn malformed_toml_is_parse_error() {
    let result = RetentionConfig::from_toml_str("max_passes = [");
    assert!(matches!(result, Err(ConfigError::Parse(_))));
}
