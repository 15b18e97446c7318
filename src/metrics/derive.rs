//! Metric Derivation
//!
//! Pure functions turning raw Element API results into sample values:
//! unit conversions, efficiency ratios, histogram bucket maps, one-hot
//! expansion of enumerated fields and async-job partitioning.
//!
//! Nothing here touches the cache, the sink or the network.

use std::collections::BTreeMap;

use super::sample::BucketMap;
use crate::solidfire::types::{
    AsyncHandle, BlockSizeBuckets, ClusterCapacity, IscsiSession, PercentageBuckets, Volume,
};

// =============================================================================
// Unit Conversion
// =============================================================================

pub fn micros_to_seconds(micros: f64) -> f64 {
    micros * 1e-6
}

pub fn millis_to_seconds(millis: f64) -> f64 {
    millis * 1e-3
}

pub fn gigabytes_to_bytes(gigabytes: f64) -> f64 {
    gigabytes * 1e9
}

// =============================================================================
// Volume Exclusion
// =============================================================================

/// Name prefixes of internal volumes kept out of per-volume reporting
pub const EXCLUDED_VOLUME_PREFIXES: [&str; 2] = ["snapshot-clone-src-", "replica-vol-"];

/// Whether a volume is internal (clone sources, replication targets).
///
/// Case-sensitive prefix match.
pub fn is_excluded_volume(name: &str) -> bool {
    EXCLUDED_VOLUME_PREFIXES
        .iter()
        .any(|prefix| name.starts_with(prefix))
}

/// Volume counts per status string. Excluded volumes are still counted.
pub fn count_volumes_by_status(volumes: &[Volume]) -> BTreeMap<String, u64> {
    let mut counts = BTreeMap::new();
    for volume in volumes {
        *counts.entry(volume.status.clone()).or_insert(0) += 1;
    }
    counts
}

/// iSCSI session counts per node id. Nodes without sessions are absent.
pub fn count_sessions_by_node(sessions: &[IscsiSession]) -> BTreeMap<i64, u64> {
    let mut counts = BTreeMap::new();
    for session in sessions {
        *counts.entry(session.node_id).or_insert(0) += 1;
    }
    counts
}

/// Render a float identifier the way fault labels expect (`1.000000`).
pub fn format_fault_id(id: f64) -> String {
    format!("{:.6}", id)
}

// =============================================================================
// Efficiency Ratios
// =============================================================================

/// Bytes per unique block before compression
const BLOCK_SIZE_BYTES: f64 = 4096.0;

/// Share of used space attributed to block data rather than overhead
const COMPRESSION_OVERHEAD: f64 = 0.93;

/// (nonZero + zero) / nonZero, or 1 when nothing is written.
pub fn thin_provisioning_factor(non_zero_blocks: f64, zero_blocks: f64) -> f64 {
    if non_zero_blocks == 0.0 {
        return 1.0;
    }
    (non_zero_blocks + zero_blocks) / non_zero_blocks
}

/// (nonZero + snapshotNonZero) / unique, or 1 when no unique blocks exist.
pub fn deduplication_factor(
    non_zero_blocks: f64,
    snapshot_non_zero_blocks: f64,
    unique_blocks: f64,
) -> f64 {
    if unique_blocks == 0.0 {
        return 1.0;
    }
    (non_zero_blocks + snapshot_non_zero_blocks) / unique_blocks
}

/// (unique * 4096) / (uniqueUsedSpace * 0.93), or 1 when no space is used.
pub fn compression_factor(unique_blocks: f64, unique_blocks_used_space: f64) -> f64 {
    if unique_blocks_used_space == 0.0 {
        return 1.0;
    }
    (unique_blocks * BLOCK_SIZE_BYTES) / (unique_blocks_used_space * COMPRESSION_OVERHEAD)
}

/// Composite ratios from one capacity snapshot
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EfficiencyFactors {
    pub thin_provisioning: f64,
    pub deduplication: f64,
    pub compression: f64,
    pub efficiency: f64,
}

impl EfficiencyFactors {
    pub fn from_capacity(capacity: &ClusterCapacity) -> Self {
        let thin_provisioning =
            thin_provisioning_factor(capacity.non_zero_blocks, capacity.zero_blocks);
        let deduplication = deduplication_factor(
            capacity.non_zero_blocks,
            capacity.snapshot_non_zero_blocks,
            capacity.unique_blocks,
        );
        let compression =
            compression_factor(capacity.unique_blocks, capacity.unique_blocks_used_space);

        Self {
            thin_provisioning,
            deduplication,
            compression,
            efficiency: thin_provisioning * deduplication * compression,
        }
    }
}

// =============================================================================
// Histogram Buckets
// =============================================================================

/// Slice service load, 0..100 without an overflow bucket
pub fn node_load_buckets(h: &PercentageBuckets) -> BucketMap {
    BucketMap::from_pairs(&[
        (0.0, h.bucket_0),
        (19.0, h.bucket_1_to_19),
        (39.0, h.bucket_20_to_39),
        (59.0, h.bucket_40_to_59),
        (79.0, h.bucket_60_to_79),
        (100.0, h.bucket_80_to_100),
    ])
}

pub fn below_min_iops_buckets(h: &PercentageBuckets) -> BucketMap {
    BucketMap::from_pairs(&[
        (19.0, h.bucket_1_to_19),
        (39.0, h.bucket_20_to_39),
        (59.0, h.bucket_40_to_59),
        (79.0, h.bucket_60_to_79),
        (100.0, h.bucket_80_to_100),
    ])
}

pub fn min_to_max_iops_buckets(h: &PercentageBuckets) -> BucketMap {
    BucketMap::from_pairs(&[
        (19.0, h.bucket_1_to_19),
        (39.0, h.bucket_20_to_39),
        (59.0, h.bucket_40_to_59),
        (79.0, h.bucket_60_to_79),
        (100.0, h.bucket_80_to_100),
        (f64::INFINITY, h.bucket_101_plus),
    ])
}

pub fn target_utilization_buckets(h: &PercentageBuckets) -> BucketMap {
    BucketMap::from_pairs(&[
        (0.0, h.bucket_0),
        (19.0, h.bucket_1_to_19),
        (39.0, h.bucket_20_to_39),
        (59.0, h.bucket_40_to_59),
        (79.0, h.bucket_60_to_79),
        (100.0, h.bucket_80_to_100),
        (f64::INFINITY, h.bucket_101_plus),
    ])
}

pub fn throttle_buckets(h: &PercentageBuckets) -> BucketMap {
    BucketMap::from_pairs(&[
        (0.0, h.bucket_0),
        (19.0, h.bucket_1_to_19),
        (39.0, h.bucket_20_to_39),
        (59.0, h.bucket_40_to_59),
        (79.0, h.bucket_60_to_79),
        (100.0, h.bucket_80_to_100),
    ])
}

/// Request block sizes in bytes, read and write alike
pub fn block_size_buckets(h: &BlockSizeBuckets) -> BucketMap {
    BucketMap::from_pairs(&[
        (8191.0, h.bucket_4096_to_8191),
        (16383.0, h.bucket_8192_to_16383),
        (32767.0, h.bucket_16384_to_32767),
        (65535.0, h.bucket_32768_to_65535),
        (131071.0, h.bucket_65536_to_131071),
        (f64::INFINITY, h.bucket_131072_plus),
    ])
}

// =============================================================================
// One-Hot Expansion
// =============================================================================

/// A closed vocabulary reported by the API as a string.
pub trait OneHot: Copy + PartialEq + 'static {
    /// Every member, in emission order.
    const VARIANTS: &'static [Self];

    /// Label value for this member.
    fn as_label(&self) -> &'static str;

    /// Observed API value to member, `None` when outside the vocabulary.
    fn parse(observed: &str) -> Option<Self>;
}

/// One `(label, value)` pair per member: 1.0 for the observed member, 0.0
/// for the rest. An unknown observation gives all zeros.
pub fn one_hot<T: OneHot>(observed: &str) -> Vec<(&'static str, f64)> {
    let current = T::parse(observed);
    T::VARIANTS
        .iter()
        .map(|member| {
            let value = if Some(*member) == current { 1.0 } else { 0.0 };
            (member.as_label(), value)
        })
        .collect()
}

/// Block or metadata fullness stage of the cluster
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FullnessStage {
    Stage1Happy,
    Stage2Aware,
    Stage3Low,
    Stage4Critical,
    Stage5CompletelyConsumed,
}

impl OneHot for FullnessStage {
    const VARIANTS: &'static [Self] = &[
        FullnessStage::Stage1Happy,
        FullnessStage::Stage2Aware,
        FullnessStage::Stage3Low,
        FullnessStage::Stage4Critical,
        FullnessStage::Stage5CompletelyConsumed,
    ];

    fn as_label(&self) -> &'static str {
        match self {
            FullnessStage::Stage1Happy => "stage1Happy",
            FullnessStage::Stage2Aware => "stage2Aware",
            FullnessStage::Stage3Low => "stage3Low",
            FullnessStage::Stage4Critical => "stage4Critical",
            FullnessStage::Stage5CompletelyConsumed => "stage5CompletelyConsumed",
        }
    }

    fn parse(observed: &str) -> Option<Self> {
        parse_ignore_case(observed)
    }
}

/// Which dimension currently drives overall fullness
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fullness {
    Block,
    Metadata,
}

impl OneHot for Fullness {
    const VARIANTS: &'static [Self] = &[Fullness::Block, Fullness::Metadata];

    fn as_label(&self) -> &'static str {
        match self {
            Fullness::Block => "blockFullness",
            Fullness::Metadata => "metadataFullness",
        }
    }

    fn parse(observed: &str) -> Option<Self> {
        parse_ignore_case(observed)
    }
}

/// Drive lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriveStatus {
    Active,
    Available,
    Erasing,
    Failed,
    Removing,
}

impl OneHot for DriveStatus {
    const VARIANTS: &'static [Self] = &[
        DriveStatus::Active,
        DriveStatus::Available,
        DriveStatus::Erasing,
        DriveStatus::Failed,
        DriveStatus::Removing,
    ];

    fn as_label(&self) -> &'static str {
        match self {
            DriveStatus::Active => "active",
            DriveStatus::Available => "available",
            DriveStatus::Erasing => "erasing",
            DriveStatus::Failed => "failed",
            DriveStatus::Removing => "removing",
        }
    }

    // Drive statuses are always lower-case on the wire
    fn parse(observed: &str) -> Option<Self> {
        Self::VARIANTS
            .iter()
            .copied()
            .find(|member| member.as_label() == observed)
    }
}

fn parse_ignore_case<T: OneHot>(observed: &str) -> Option<T> {
    T::VARIANTS
        .iter()
        .copied()
        .find(|member| member.as_label().eq_ignore_ascii_case(observed))
}

// =============================================================================
// Async Results
// =============================================================================

/// Result types always reported, even with no handles
pub const KNOWN_ASYNC_RESULT_TYPES: [&str; 5] = [
    "DriveAdd",
    "BulkVolume",
    "Clone",
    "DriveRemoval",
    "RtfiPendingNode",
];

/// Async handles partitioned by result type
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AsyncResultSummary {
    /// Handles neither completed nor successful
    pub active: BTreeMap<String, u64>,
    pub total: BTreeMap<String, u64>,
    /// Highest handle id seen, 0 when there are none
    pub max_async_result_id: i64,
}

/// Count handles per result type.
///
/// Known types are always present in both maps. Other types appear in
/// `active` only when at least one of their handles is active.
pub fn partition_async_results(handles: &[AsyncHandle]) -> AsyncResultSummary {
    let mut summary = AsyncResultSummary::default();

    for known in KNOWN_ASYNC_RESULT_TYPES {
        summary.active.insert(known.to_string(), 0);
        summary.total.insert(known.to_string(), 0);
    }

    for handle in handles {
        *summary.total.entry(handle.result_type.clone()).or_insert(0) += 1;
        if !handle.completed && !handle.success {
            *summary.active.entry(handle.result_type.clone()).or_insert(0) += 1;
        }
        summary.max_async_result_id = summary.max_async_result_id.max(handle.async_result_id);
    }

    summary
}

#[cfg(test)]
mod tests {
    use super::*;

    fn handle(id: i64, result_type: &str, completed: bool, success: bool) -> AsyncHandle {
        AsyncHandle {
            async_result_id: id,
            completed,
            success,
            result_type: result_type.to_string(),
            ..Default::default()
        }
    }

    // =========================================================================
    // Conversions and filters
    // =========================================================================

    #[test]
    fn test_unit_conversions() {
        assert_eq!(micros_to_seconds(2_500_000.0), 2.5);
        assert_eq!(millis_to_seconds(500.0), 0.5);
        assert_eq!(gigabytes_to_bytes(256.0), 256e9);
    }

    #[test]
    fn test_volume_exclusion() {
        assert!(is_excluded_volume("replica-vol-7"));
        assert!(is_excluded_volume("snapshot-clone-src-42"));
        assert!(!is_excluded_volume("pg-data-01"));
        assert!(!is_excluded_volume("Replica-Vol-7"));
        assert!(!is_excluded_volume("my-replica-vol-7"));
        assert!(!is_excluded_volume(""));
    }

    #[test]
    fn test_fault_id_formatting() {
        assert_eq!(format_fault_id(3.0), "3.000000");
        assert_eq!(format_fault_id(0.0), "0.000000");
    }

    // =========================================================================
    // Ratios
    // =========================================================================

    #[test]
    fn test_efficiency_factors_example() {
        let capacity = ClusterCapacity {
            non_zero_blocks: 100.0,
            zero_blocks: 50.0,
            snapshot_non_zero_blocks: 20.0,
            unique_blocks: 40.0,
            unique_blocks_used_space: 30.0,
            ..Default::default()
        };

        let factors = EfficiencyFactors::from_capacity(&capacity);
        assert_eq!(factors.thin_provisioning, 1.5);
        assert_eq!(factors.deduplication, 3.0);
        assert!((factors.compression - 5872.401).abs() < 1e-2);
        assert_eq!(
            factors.efficiency,
            factors.thin_provisioning * factors.deduplication * factors.compression
        );
    }

    #[test]
    fn test_zero_denominators_yield_one() {
        assert_eq!(thin_provisioning_factor(0.0, 1234.0), 1.0);
        assert_eq!(deduplication_factor(10.0, 5.0, 0.0), 1.0);
        assert_eq!(compression_factor(40.0, 0.0), 1.0);

        let empty = EfficiencyFactors::from_capacity(&ClusterCapacity::default());
        assert_eq!(empty.efficiency, 1.0);
    }

    // =========================================================================
    // Histograms
    // =========================================================================

    #[test]
    fn test_percentage_bucket_bounds() {
        let h = PercentageBuckets {
            bucket_0: 1,
            bucket_1_to_19: 2,
            bucket_20_to_39: 3,
            bucket_40_to_59: 4,
            bucket_60_to_79: 5,
            bucket_80_to_100: 6,
            bucket_101_plus: 7,
        };

        assert_eq!(
            node_load_buckets(&h).upper_bounds(),
            vec![0.0, 19.0, 39.0, 59.0, 79.0, 100.0]
        );
        assert_eq!(below_min_iops_buckets(&h).total(), 20);
        assert_eq!(min_to_max_iops_buckets(&h).get(f64::INFINITY), Some(7));
        assert_eq!(target_utilization_buckets(&h).len(), 7);
        assert_eq!(target_utilization_buckets(&h).total(), 28);
        assert_eq!(throttle_buckets(&h).get(f64::INFINITY), None);
    }

    #[test]
    fn test_empty_buckets_still_present() {
        let map = block_size_buckets(&BlockSizeBuckets::default());
        assert_eq!(
            map.upper_bounds(),
            vec![8191.0, 16383.0, 32767.0, 65535.0, 131071.0, f64::INFINITY]
        );
        assert_eq!(map.total(), 0);
    }

    // =========================================================================
    // One-hot
    // =========================================================================

    #[test]
    fn test_fullness_stage_one_hot() {
        let expanded = one_hot::<FullnessStage>("stage3Low");
        assert_eq!(expanded.len(), 5);
        assert_eq!(expanded.iter().filter(|(_, v)| *v == 1.0).count(), 1);
        assert_eq!(expanded[2], ("stage3Low", 1.0));

        let shouting = one_hot::<FullnessStage>("STAGE3LOW");
        assert_eq!(shouting, expanded);

        let unknown = one_hot::<FullnessStage>("stage9Weird");
        assert!(unknown.iter().all(|(_, v)| *v == 0.0));
    }

    #[test]
    fn test_fullness_one_hot() {
        assert_eq!(
            one_hot::<Fullness>("metadataFullness"),
            vec![("blockFullness", 0.0), ("metadataFullness", 1.0)]
        );
        assert!(one_hot::<Fullness>("").iter().all(|(_, v)| *v == 0.0));
    }

    #[test]
    fn test_drive_status_matches_exactly() {
        let expanded = one_hot::<DriveStatus>("failed");
        assert_eq!(
            expanded,
            vec![
                ("active", 0.0),
                ("available", 0.0),
                ("erasing", 0.0),
                ("failed", 1.0),
                ("removing", 0.0),
            ]
        );
        assert!(one_hot::<DriveStatus>("Failed").iter().all(|(_, v)| *v == 0.0));
    }

    // =========================================================================
    // Async results and counts
    // =========================================================================

    #[test]
    fn test_async_results_empty() {
        let summary = partition_async_results(&[]);

        assert_eq!(summary.active.len(), 5);
        assert_eq!(summary.total.len(), 5);
        assert!(summary.active.values().all(|v| *v == 0));
        assert!(summary.total.values().all(|v| *v == 0));
        assert_eq!(summary.max_async_result_id, 0);
    }

    #[test]
    fn test_async_results_partitioned() {
        let handles = vec![
            handle(4, "Clone", false, false),
            handle(9, "Clone", true, true),
            handle(7, "DriveAdd", true, false),
            handle(12, "ResyncVolume", false, false),
            handle(13, "SnapMirrorModify", true, true),
        ];

        let summary = partition_async_results(&handles);

        assert_eq!(summary.active["Clone"], 1);
        assert_eq!(summary.total["Clone"], 2);
        assert_eq!(summary.active["DriveAdd"], 0);
        assert_eq!(summary.total["DriveAdd"], 1);
        assert_eq!(summary.active["ResyncVolume"], 1);
        assert_eq!(summary.total["BulkVolume"], 0);
        assert_eq!(summary.total["SnapMirrorModify"], 1);
        assert!(!summary.active.contains_key("SnapMirrorModify"));
        assert_eq!(summary.max_async_result_id, 13);
    }

    #[test]
    fn test_volume_counts_include_excluded_names() {
        let volumes = vec![
            Volume {
                volume_id: 1,
                name: "data".into(),
                status: "active".into(),
                ..Default::default()
            },
            Volume {
                volume_id: 7,
                name: "replica-vol-7".into(),
                status: "active".into(),
                ..Default::default()
            },
            Volume {
                volume_id: 8,
                name: "old".into(),
                status: "deleted".into(),
                ..Default::default()
            },
        ];

        let counts = count_volumes_by_status(&volumes);
        assert_eq!(counts["active"], 2);
        assert_eq!(counts["deleted"], 1);
    }

    #[test]
    fn test_session_counts_per_node() {
        let sessions = vec![
            IscsiSession {
                node_id: 1,
                ..Default::default()
            },
            IscsiSession {
                node_id: 1,
                ..Default::default()
            },
            IscsiSession {
                node_id: 3,
                ..Default::default()
            },
        ];

        let counts = count_sessions_by_node(&sessions);
        assert_eq!(counts.get(&1), Some(&2));
        assert_eq!(counts.get(&3), Some(&1));
        assert_eq!(counts.get(&2), None);
    }
}
