//! Worked retention scenarios
//!
//! Each test is a complete decision: inventory and usage in, plan out.

use keepsake::limits::{days, MB};
use keepsake::{
    assess_quota, is_stale, plan_eviction, policy_for, EvictionOutcome, PlanTier, UsageSnapshot,
};

use crate::common::{major, now, ordinary};

// ============================================================================
// Scenario 1: free tier over quota
// ============================================================================

#[test]
fn free_tier_over_quota_evicts_two_oldest() {
    let inventory = vec![
        ordinary(1, 30 * MB),
        ordinary(5, 30 * MB),
        ordinary(10, 30 * MB),
        ordinary(40, 30 * MB),
        ordinary(90, 30 * MB),
    ];
    let usage = UsageSnapshot::new(120 * MB, 100 * MB);

    let plan = plan_eviction(&inventory, PlanTier::Free, Some(usage), now());

    assert!(plan.assessment.exceeded);
    assert_eq!(plan.outcome, EvictionOutcome::Satisfied);
    assert_eq!(plan.snapshot_ids(), vec![inventory[4].id, inventory[3].id]);
    assert!(plan.evictions.iter().all(|c| c.is_stale));
    assert!(plan.evictions[0].priority > plan.evictions[1].priority);
    assert!(plan.projected_bytes <= 100 * MB);
}

// ============================================================================
// Scenario 2: stale major vs stale ordinary
// ============================================================================

#[test]
fn stale_ordinary_evicted_before_stale_major() {
    let policy = policy_for(PlanTier::Free);
    assert!(is_stale(days(65), true, &policy));
    assert!(is_stale(days(35), false, &policy));

    let checkpoint = major(65, 40 * MB);
    let routine = ordinary(35, 40 * MB);
    let usage = UsageSnapshot::new(110 * MB, 100 * MB);

    let plan = plan_eviction(
        &[checkpoint.clone(), routine.clone()],
        PlanTier::Free,
        Some(usage),
        now(),
    );

    assert_eq!(plan.outcome, EvictionOutcome::Satisfied);
    assert_eq!(plan.snapshot_ids(), vec![routine.id]);
}

#[test]
fn major_survives_until_double_max_age() {
    let policy = policy_for(PlanTier::Free);
    assert!(!is_stale(days(59), true, &policy));
    assert!(!is_stale(days(60), true, &policy));
    assert!(is_stale(days(61), true, &policy));
}

// ============================================================================
// Scenario 3: exactly at quota
// ============================================================================

#[test]
fn usage_exactly_at_quota_is_not_exceeded() {
    let usage = UsageSnapshot::new(100 * MB, 100 * MB);
    let assessment = assess_quota(Some(usage));
    assert!(!assessment.exceeded);
    assert_eq!(assessment.percentage, 100.0);

    let plan = plan_eviction(&[ordinary(400, 100 * MB)], PlanTier::Free, Some(usage), now());
    assert_eq!(plan.outcome, EvictionOutcome::NotNeeded);
    assert!(plan.is_empty());
}

#[test]
fn one_byte_over_quota_is_exceeded() {
    let assessment = assess_quota(Some(UsageSnapshot::new(100 * MB + 1, 100 * MB)));
    assert!(assessment.exceeded);
    assert_eq!(assessment.overage_bytes(), 1);
}

// ============================================================================
// Tiers and missing data
// ============================================================================

#[test]
fn pro_tier_tolerates_free_tier_overage() {
    let inventory = vec![ordinary(90, 60 * MB), ordinary(40, 60 * MB)];
    let usage = UsageSnapshot::new(120 * MB, 0);

    let free = plan_eviction(&inventory, PlanTier::Free, Some(usage), now());
    let pro = plan_eviction(&inventory, PlanTier::Pro, Some(usage), now());

    assert_eq!(free.outcome, EvictionOutcome::Satisfied);
    assert_eq!(pro.outcome, EvictionOutcome::NotNeeded);
}

#[test]
fn missing_usage_means_new_user() {
    let assessment = assess_quota(None);
    assert!(!assessment.exceeded);
    assert_eq!(assessment.usage, 0);
    assert_eq!(assessment.quota, 100 * MB);
    assert_eq!(assessment.percentage, 0.0);
}

#[test]
fn replanning_same_inputs_is_identical() {
    let inventory = vec![
        ordinary(3, 50 * MB),
        major(100, 50 * MB),
        ordinary(45, 50 * MB),
    ];
    let usage = Some(UsageSnapshot::new(150 * MB, 100 * MB));

    let first = plan_eviction(&inventory, PlanTier::Free, usage, now());
    let second = plan_eviction(&inventory, PlanTier::Free, usage, now());
    assert_eq!(first, second);
}

#[test]
fn unknown_tier_name_is_rejected() {
    let err = "enterprise".parse::<PlanTier>().unwrap_err();
    assert!(matches!(err, keepsake::Error::InvalidPolicyTier(name) if name == "enterprise"));
    assert_eq!(" Pro ".parse::<PlanTier>().unwrap(), PlanTier::Pro);
}
