//! Property tests for retention invariants
//!
//! Randomized ages, sizes and inventories checked against the policy rules.

use std::collections::HashSet;
use std::time::Duration;

use proptest::prelude::*;

use keepsake::limits::{days, MIB, MB, SECS_PER_DAY};
use keepsake::{
    assess_quota, is_stale, plan_eviction, policy_for, priority, EvictionOutcome, PlanTier,
    SnapshotId, SnapshotMetadata, Timestamp, UsageSnapshot,
};

use crate::common::now;

fn arb_tier() -> impl Strategy<Value = PlanTier> {
    prop::sample::select(PlanTier::ALL.to_vec())
}

/// Age up to 800 days at one-second resolution
fn arb_age() -> impl Strategy<Value = Duration> {
    (0u64..800 * SECS_PER_DAY).prop_map(Duration::from_secs)
}

fn arb_snapshot() -> impl Strategy<Value = SnapshotMetadata> {
    (0u64..400, 1u64..80 * MB, any::<bool>()).prop_map(|(age_days, size, is_major)| {
        let created_at = now().saturating_sub(days(age_days));
        if is_major {
            SnapshotMetadata::major(SnapshotId::new(), created_at, size)
        } else {
            SnapshotMetadata::new(SnapshotId::new(), created_at, size)
        }
    })
}

fn snapshot_aged(age: Duration, size: u64, is_major: bool) -> SnapshotMetadata {
    SnapshotMetadata {
        id: SnapshotId::new(),
        created_at: now().saturating_sub(age),
        is_major,
        size_bytes: size,
    }
}

proptest! {
    #[test]
    fn ordinary_stale_iff_older_than_max_age(tier in arb_tier(), age in arb_age()) {
        let policy = policy_for(tier);
        prop_assert_eq!(is_stale(age, false, &policy), age > policy.max_age);
    }

    #[test]
    fn major_stale_iff_older_than_twice_max_age(tier in arb_tier(), age in arb_age()) {
        let policy = policy_for(tier);
        prop_assert_eq!(is_stale(age, true, &policy), age > policy.max_age * 2);
    }

    #[test]
    fn stale_major_implies_stale_ordinary(tier in arb_tier(), age in arb_age()) {
        let policy = policy_for(tier);
        if is_stale(age, true, &policy) {
            prop_assert!(is_stale(age, false, &policy));
        }
    }

    #[test]
    fn priority_never_decreases_with_age(
        tier in arb_tier(),
        a in arb_age(),
        b in arb_age(),
        size in 1u64..4 * MIB,
        is_major in any::<bool>(),
    ) {
        let policy = policy_for(tier);
        let (younger, older) = if a <= b { (a, b) } else { (b, a) };
        let p_young = priority(&snapshot_aged(younger, size, is_major), now(), &policy);
        let p_old = priority(&snapshot_aged(older, size, is_major), now(), &policy);
        prop_assert!(p_young <= p_old);
        prop_assert!(p_young >= 0.0);
    }

    #[test]
    fn major_halves_priority(tier in arb_tier(), age in arb_age(), size in 1u64..=MIB) {
        let policy = policy_for(tier);
        let routine = priority(&snapshot_aged(age, size, false), now(), &policy);
        let checkpoint = priority(&snapshot_aged(age, size, true), now(), &policy);
        prop_assert_eq!(checkpoint, routine * 0.5);
    }

    #[test]
    fn large_snapshots_boost_priority(tier in arb_tier(), age in arb_age(), extra in 1u64..100 * MB) {
        let policy = policy_for(tier);
        let at_threshold = priority(&snapshot_aged(age, MIB, false), now(), &policy);
        let large = priority(&snapshot_aged(age, MIB + extra, false), now(), &policy);
        prop_assert_eq!(large, at_threshold * 1.2);
    }

    #[test]
    fn exceeded_iff_usage_above_quota(total in 0u64..10 * MB, quota in 1u64..10 * MB) {
        let assessment = assess_quota(Some(UsageSnapshot::new(total, quota)));
        prop_assert_eq!(assessment.exceeded, total > quota);
        prop_assert_eq!(assessment.quota, quota);
        prop_assert_eq!(assessment.percentage, total as f64 / quota as f64 * 100.0);
    }

    #[test]
    fn plan_is_minimal_and_within_inventory(
        tier in arb_tier(),
        inventory in prop::collection::vec(arb_snapshot(), 0..12),
        reported in 0u64..600 * MB,
    ) {
        let usage = UsageSnapshot::new(reported, 0);
        let plan = plan_eviction(&inventory, tier, Some(usage), now());
        let quota = plan.policy.storage_quota;

        let known: HashSet<SnapshotId> = inventory.iter().map(|s| s.id).collect();
        let planned: HashSet<SnapshotId> = plan.snapshot_ids().into_iter().collect();
        prop_assert_eq!(planned.len(), plan.evictions.len());
        prop_assert!(planned.is_subset(&known));

        match plan.outcome {
            EvictionOutcome::NotNeeded => {
                prop_assert!(reported <= quota);
                prop_assert!(plan.is_empty());
            }
            EvictionOutcome::Satisfied => {
                prop_assert!(plan.projected_bytes <= quota);
                let before_last = plan.projected_bytes
                    + plan.evictions.last().map(|c| c.size_bytes).unwrap_or(0);
                prop_assert!(before_last > quota);
            }
            EvictionOutcome::Exhausted => {
                prop_assert!(plan.projected_bytes > quota);
                prop_assert_eq!(plan.evictions.len(), inventory.len());
            }
        }
    }

    #[test]
    fn stale_first_never_takes_fresh_before_stale(
        inventory in prop::collection::vec(arb_snapshot(), 1..12),
        reported in 100 * MB..900 * MB,
    ) {
        let usage = UsageSnapshot::new(reported, 0);
        let plan = plan_eviction(&inventory, PlanTier::Free, Some(usage), now());

        let first_fresh = plan.evictions.iter().position(|c| !c.is_stale);
        if let Some(index) = first_fresh {
            prop_assert!(plan.evictions[index..].iter().all(|c| !c.is_stale));
        }
    }
}

#[test]
fn future_dated_snapshot_has_zero_age() {
    let policy = policy_for(PlanTier::Free);
    let ahead = SnapshotMetadata::new(
        SnapshotId::new(),
        Timestamp::from_secs(now().as_secs() + 3600),
        MIB,
    );
    assert_eq!(priority(&ahead, now(), &policy), 0.0);
}
