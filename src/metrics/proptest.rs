//! Property-Based Tests for Metric Derivation
//!
//! # Test Properties
//!
//! 1. **Ratios are finite**: every efficiency factor is finite for any
//!    non-negative capacity snapshot
//! 2. **Zero guards**: a zero denominator yields exactly 1
//! 3. **Histogram totals**: cumulative buckets end at the bucket total
//! 4. **One-hot**: at most one member is hot, exactly one for known values
//! 5. **Async partitioning**: known types always present, totals add up

#![cfg(test)]

use proptest::prelude::*;

use super::derive::{
    self, DriveStatus, EfficiencyFactors, FullnessStage, OneHot, KNOWN_ASYNC_RESULT_TYPES,
};
use super::sample::{BucketMap, HistogramValue};
use crate::solidfire::types::{AsyncHandle, ClusterCapacity, PercentageBuckets};

// =============================================================================
// Property Strategies
// =============================================================================

/// Block counts and byte sizes as the API reports them
fn quantity_strategy() -> impl Strategy<Value = f64> {
    prop_oneof![Just(0.0), 1.0f64..1e15]
}

fn capacity_strategy() -> impl Strategy<Value = ClusterCapacity> {
    (
        quantity_strategy(),
        quantity_strategy(),
        quantity_strategy(),
        quantity_strategy(),
        quantity_strategy(),
    )
        .prop_map(|(nz, z, snap, unique, used)| ClusterCapacity {
            non_zero_blocks: nz,
            zero_blocks: z,
            snapshot_non_zero_blocks: snap,
            unique_blocks: unique,
            unique_blocks_used_space: used,
            ..Default::default()
        })
}

fn percentage_buckets_strategy() -> impl Strategy<Value = PercentageBuckets> {
    prop::array::uniform7(0u64..1_000_000).prop_map(|b| PercentageBuckets {
        bucket_0: b[0],
        bucket_1_to_19: b[1],
        bucket_20_to_39: b[2],
        bucket_40_to_59: b[3],
        bucket_60_to_79: b[4],
        bucket_80_to_100: b[5],
        bucket_101_plus: b[6],
    })
}

fn async_handle_strategy() -> impl Strategy<Value = AsyncHandle> {
    (
        0i64..100_000,
        any::<bool>(),
        any::<bool>(),
        prop::sample::select(vec!["DriveAdd", "Clone", "BulkVolume", "ResyncVolume", ""]),
    )
        .prop_map(|(id, completed, success, kind)| AsyncHandle {
            async_result_id: id,
            completed,
            success,
            result_type: kind.to_string(),
            ..Default::default()
        })
}

// =============================================================================
// Ratio Properties
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Property: No factor is ever NaN or infinite.
    #[test]
    fn prop_factors_are_finite(capacity in capacity_strategy()) {
        let f = EfficiencyFactors::from_capacity(&capacity);
        prop_assert!(f.thin_provisioning.is_finite());
        prop_assert!(f.deduplication.is_finite());
        prop_assert!(f.compression.is_finite());
        prop_assert!(f.efficiency.is_finite());
    }

    /// Property: thin provisioning is 1 with no written blocks.
    #[test]
    fn prop_thin_provisioning_zero_guard(zero in quantity_strategy()) {
        prop_assert_eq!(derive::thin_provisioning_factor(0.0, zero), 1.0);
    }

    #[test]
    fn prop_dedup_and_compression_zero_guard(a in quantity_strategy(), b in quantity_strategy()) {
        prop_assert_eq!(derive::deduplication_factor(a, b, 0.0), 1.0);
        prop_assert_eq!(derive::compression_factor(a, 0.0), 1.0);
    }

    /// Property: efficiency is the product of the three factors.
    #[test]
    fn prop_efficiency_is_product(capacity in capacity_strategy()) {
        let f = EfficiencyFactors::from_capacity(&capacity);
        prop_assert_eq!(f.efficiency, f.thin_provisioning * f.deduplication * f.compression);
    }

    #[test]
    fn prop_unit_conversions_scale(v in 0.0f64..1e12) {
        prop_assert_eq!(derive::micros_to_seconds(v), v * 1e-6);
        prop_assert_eq!(derive::millis_to_seconds(v), v * 1e-3);
        prop_assert_eq!(derive::gigabytes_to_bytes(v), v * 1e9);
    }
}

// =============================================================================
// Histogram Properties
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Property: the last cumulative bucket equals the total.
    #[test]
    fn prop_cumulative_ends_at_total(h in percentage_buckets_strategy()) {
        for map in [
            derive::node_load_buckets(&h),
            derive::below_min_iops_buckets(&h),
            derive::min_to_max_iops_buckets(&h),
            derive::target_utilization_buckets(&h),
            derive::throttle_buckets(&h),
        ] {
            let cumulative = map.cumulative();
            let last = cumulative.last().map(|(_, c)| *c).unwrap_or(0);
            prop_assert_eq!(last, map.total());
            prop_assert!(cumulative.windows(2).all(|w| w[0].1 <= w[1].1));
        }
    }

    /// Property: the bound set does not depend on the counts.
    #[test]
    fn prop_bounds_are_fixed(h in percentage_buckets_strategy()) {
        let empty = PercentageBuckets::default();
        prop_assert_eq!(
            derive::target_utilization_buckets(&h).upper_bounds(),
            derive::target_utilization_buckets(&empty).upper_bounds()
        );
    }

    #[test]
    fn prop_histogram_count_override(h in percentage_buckets_strategy(), count in any::<u64>()) {
        let map: BucketMap = derive::node_load_buckets(&h);
        let total = map.total();
        let value = HistogramValue::from_buckets(map, Some(count));
        prop_assert_eq!(value.sample_count, count);
        prop_assert_eq!(value.sample_sum, total as f64);
    }
}

// =============================================================================
// One-Hot and Async Properties
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Property: arbitrary strings light up at most one member.
    #[test]
    fn prop_one_hot_at_most_one(observed in ".{0,24}") {
        let hot = derive::one_hot::<FullnessStage>(&observed)
            .iter()
            .filter(|(_, v)| *v == 1.0)
            .count();
        prop_assert!(hot <= 1);
    }

    #[test]
    fn prop_one_hot_known_member(idx in 0usize..5) {
        let member = DriveStatus::VARIANTS[idx];
        let expanded = derive::one_hot::<DriveStatus>(member.as_label());
        prop_assert_eq!(expanded.len(), 5);
        prop_assert_eq!(expanded[idx].1, 1.0);
        prop_assert_eq!(expanded.iter().map(|(_, v)| v).sum::<f64>(), 1.0);
    }

    /// Property: totals sum to the handle count and known types are present.
    #[test]
    fn prop_async_partition(handles in prop::collection::vec(async_handle_strategy(), 0..50)) {
        let summary = derive::partition_async_results(&handles);

        prop_assert_eq!(summary.total.values().sum::<u64>(), handles.len() as u64);
        for known in KNOWN_ASYNC_RESULT_TYPES {
            prop_assert!(summary.active.contains_key(known));
            prop_assert!(summary.total.contains_key(known));
        }
        for (kind, active) in &summary.active {
            prop_assert!(*active <= summary.total[kind]);
        }
        let max = handles.iter().map(|h| h.async_result_id).max().unwrap_or(0);
        prop_assert_eq!(summary.max_async_result_id, max);
    }
}
