//! Metric Descriptor Table
//!
//! Static metadata for every metric family the exporter may emit. The table
//! is built once per orchestrator and advertised before any scrape runs,
//! independently of which families a given scrape produces.

use std::collections::HashMap;
use std::sync::Arc;

use prometheus::core::Desc;

use crate::error::Result;

// =============================================================================
// Label Sets
// =============================================================================

pub const VOLUME_LABELS: &[&str] = &["volume_id", "volume_name", "account_id"];
pub const NODE_LABELS: &[&str] = &["node_id", "node_name"];
pub const NODE_INTERFACE_LABELS: &[&str] = &["node_id", "node_name", "interface"];
pub const NODE_INFO_LABELS: &[&str] = &[
    "node_id",
    "node_name",
    "chassis_name",
    "associated_fservice_id",
    "associated_master_service_id",
    "chassis_type",
    "cpu_model",
    "node_type",
    "platform_config_version",
    "sip",
    "sipi",
    "software_version",
    "uuid",
];
pub const FAULT_LABELS: &[&str] = &[
    "node_id",
    "node_name",
    "code",
    "severity",
    "type",
    "service_id",
    "resolved",
    "node_hardware_fault_id",
    "drive_id",
    "details",
];
pub const DRIVE_LABELS: &[&str] = &["node_id", "node_name", "drive_id", "serial", "slot", "type"];
pub const DRIVE_STATUS_LABELS: &[&str] = &[
    "node_id", "node_name", "drive_id", "serial", "slot", "status", "type",
];
pub const LEVEL_LABELS: &[&str] = &["level"];
pub const STATUS_LABELS: &[&str] = &["status"];
pub const TYPE_LABELS: &[&str] = &["type"];

// =============================================================================
// Metric Descriptor
// =============================================================================

/// Name, help text and ordered label names of one metric family
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricDesc {
    pub fq_name: String,
    pub help: String,
    pub label_names: Vec<String>,
}

impl MetricDesc {
    /// Build a descriptor, rejecting names or labels Prometheus would refuse.
    pub fn new(fq_name: impl Into<String>, help: impl Into<String>, labels: &[&str]) -> Result<Self> {
        let fq_name = fq_name.into();
        let help = help.into();
        let label_names: Vec<String> = labels.iter().map(|l| l.to_string()).collect();

        Desc::new(
            fq_name.clone(),
            help.clone(),
            label_names.clone(),
            HashMap::new(),
        )?;

        Ok(Self {
            fq_name,
            help,
            label_names,
        })
    }
}

struct TableBuilder {
    namespace: String,
    all: Vec<Arc<MetricDesc>>,
}

impl TableBuilder {
    fn add(&mut self, name: &str, help: &str, labels: &[&str]) -> Result<Arc<MetricDesc>> {
        let desc = Arc::new(MetricDesc::new(
            format!("{}_{}", self.namespace, name),
            help,
            labels,
        )?);
        self.all.push(Arc::clone(&desc));
        Ok(desc)
    }
}

// =============================================================================
// Descriptor Table
// =============================================================================

/// Every metric family the exporter knows about
#[derive(Debug, Clone)]
pub struct MetricDescriptions {
    pub namespace: String,
    all: Vec<Arc<MetricDesc>>,

    pub up: Arc<MetricDesc>,

    // Volume stats
    pub volume_actual_iops: Arc<MetricDesc>,
    pub volume_average_io_size_bytes: Arc<MetricDesc>,
    pub volume_burst_iops_credit: Arc<MetricDesc>,
    pub volume_client_queue_depth: Arc<MetricDesc>,
    pub volume_latency_seconds: Arc<MetricDesc>,
    pub volume_non_zero_blocks: Arc<MetricDesc>,
    pub volume_read_bytes_total: Arc<MetricDesc>,
    pub volume_read_latency_seconds_total: Arc<MetricDesc>,
    pub volume_read_ops_total: Arc<MetricDesc>,
    pub volume_throttle: Arc<MetricDesc>,
    pub volume_unaligned_reads_total: Arc<MetricDesc>,
    pub volume_unaligned_writes_total: Arc<MetricDesc>,
    pub volume_size_bytes: Arc<MetricDesc>,
    pub volume_utilization: Arc<MetricDesc>,
    pub volume_write_bytes_total: Arc<MetricDesc>,
    pub volume_write_latency_seconds_total: Arc<MetricDesc>,
    pub volume_write_ops_total: Arc<MetricDesc>,
    pub volume_zero_blocks: Arc<MetricDesc>,

    // Volume QoS histograms
    pub volume_qos_below_min_iops_percentage: Arc<MetricDesc>,
    pub volume_qos_min_to_max_iops_percentage: Arc<MetricDesc>,
    pub volume_qos_read_block_size_bytes: Arc<MetricDesc>,
    pub volume_qos_target_utilization_percentage: Arc<MetricDesc>,
    pub volume_qos_throttle_percentage: Arc<MetricDesc>,
    pub volume_qos_write_block_size_bytes: Arc<MetricDesc>,

    // Cluster capacity
    pub cluster_active_block_space_bytes: Arc<MetricDesc>,
    pub cluster_active_sessions: Arc<MetricDesc>,
    pub cluster_average_iops: Arc<MetricDesc>,
    pub cluster_recent_io_size_bytes: Arc<MetricDesc>,
    pub cluster_current_iops: Arc<MetricDesc>,
    pub cluster_max_iops: Arc<MetricDesc>,
    pub cluster_max_over_provisionable_space_bytes: Arc<MetricDesc>,
    pub cluster_max_provisioned_space_bytes: Arc<MetricDesc>,
    pub cluster_max_used_metadata_space_bytes: Arc<MetricDesc>,
    pub cluster_max_used_space_bytes: Arc<MetricDesc>,
    pub cluster_non_zero_blocks: Arc<MetricDesc>,
    pub cluster_peak_active_sessions: Arc<MetricDesc>,
    pub cluster_peak_iops: Arc<MetricDesc>,
    pub cluster_provisioned_space_bytes: Arc<MetricDesc>,
    pub cluster_snapshot_non_zero_blocks: Arc<MetricDesc>,
    pub cluster_io_ops_total: Arc<MetricDesc>,
    pub cluster_unique_blocks: Arc<MetricDesc>,
    pub cluster_unique_blocks_used_space_bytes: Arc<MetricDesc>,
    pub cluster_used_metadata_space_bytes: Arc<MetricDesc>,
    pub cluster_used_metadata_space_in_snapshots_bytes: Arc<MetricDesc>,
    pub cluster_used_space_bytes: Arc<MetricDesc>,
    pub cluster_zero_blocks: Arc<MetricDesc>,
    pub cluster_thin_provisioning_factor: Arc<MetricDesc>,
    pub cluster_deduplication_factor: Arc<MetricDesc>,
    pub cluster_compression_factor: Arc<MetricDesc>,
    pub cluster_efficiency_factor: Arc<MetricDesc>,

    // Faults
    pub cluster_active_faults: Arc<MetricDesc>,

    // Nodes
    pub node_info: Arc<MetricDesc>,
    pub node_total_memory_bytes: Arc<MetricDesc>,
    pub node_samples: Arc<MetricDesc>,
    pub node_cpu_percentage: Arc<MetricDesc>,
    pub node_cpu_seconds_total: Arc<MetricDesc>,
    pub node_interface_in_bytes_total: Arc<MetricDesc>,
    pub node_interface_out_bytes_total: Arc<MetricDesc>,
    pub node_interface_utilization_percentage: Arc<MetricDesc>,
    pub node_read_latency_seconds_total: Arc<MetricDesc>,
    pub node_used_memory_bytes: Arc<MetricDesc>,
    pub node_write_latency_seconds_total: Arc<MetricDesc>,
    pub node_load_histogram: Arc<MetricDesc>,
    pub node_iscsi_sessions: Arc<MetricDesc>,

    // Cluster stats
    pub cluster_actual_iops: Arc<MetricDesc>,
    pub cluster_average_io_bytes: Arc<MetricDesc>,
    pub cluster_client_queue_depth: Arc<MetricDesc>,
    pub cluster_throughput_utilization: Arc<MetricDesc>,
    pub cluster_latency_seconds: Arc<MetricDesc>,
    pub cluster_normalized_iops: Arc<MetricDesc>,
    pub cluster_read_bytes_total: Arc<MetricDesc>,
    pub cluster_last_sample_read_bytes: Arc<MetricDesc>,
    pub cluster_read_latency_seconds: Arc<MetricDesc>,
    pub cluster_read_latency_seconds_total: Arc<MetricDesc>,
    pub cluster_read_ops_total: Arc<MetricDesc>,
    pub cluster_last_sample_read_ops: Arc<MetricDesc>,
    pub cluster_sample_period_seconds: Arc<MetricDesc>,
    pub cluster_services: Arc<MetricDesc>,
    pub cluster_expected_services: Arc<MetricDesc>,
    pub cluster_unaligned_reads_total: Arc<MetricDesc>,
    pub cluster_unaligned_writes_total: Arc<MetricDesc>,
    pub cluster_write_bytes_total: Arc<MetricDesc>,
    pub cluster_last_sample_write_bytes: Arc<MetricDesc>,
    pub cluster_write_latency_seconds: Arc<MetricDesc>,
    pub cluster_write_latency_seconds_total: Arc<MetricDesc>,
    pub cluster_write_ops_total: Arc<MetricDesc>,
    pub cluster_last_sample_write_ops: Arc<MetricDesc>,

    // Full threshold
    pub cluster_block_fullness: Arc<MetricDesc>,
    pub cluster_fullness: Arc<MetricDesc>,
    pub cluster_max_metadata_over_provision_factor: Arc<MetricDesc>,
    pub cluster_metadata_fullness: Arc<MetricDesc>,
    pub cluster_slice_reserve_used_threshold_percentage: Arc<MetricDesc>,
    pub cluster_stage2_aware_threshold_percentage: Arc<MetricDesc>,
    pub cluster_stage2_block_threshold_bytes: Arc<MetricDesc>,
    pub cluster_stage3_block_threshold_bytes: Arc<MetricDesc>,
    pub cluster_stage3_block_threshold_percentage: Arc<MetricDesc>,
    pub cluster_stage3_low_threshold_percentage: Arc<MetricDesc>,
    pub cluster_stage4_block_threshold_bytes: Arc<MetricDesc>,
    pub cluster_stage4_critical_threshold_percentage: Arc<MetricDesc>,
    pub cluster_stage5_block_threshold_bytes: Arc<MetricDesc>,
    pub cluster_total_bytes: Arc<MetricDesc>,
    pub cluster_total_metadata_bytes: Arc<MetricDesc>,
    pub cluster_used_bytes: Arc<MetricDesc>,
    pub cluster_used_metadata_bytes: Arc<MetricDesc>,

    // Drives
    pub drive_status: Arc<MetricDesc>,
    pub drive_capacity_bytes: Arc<MetricDesc>,

    // Inventory
    pub volume_count: Arc<MetricDesc>,
    pub account_count: Arc<MetricDesc>,
    pub initiator_count: Arc<MetricDesc>,
    pub volume_access_group_count: Arc<MetricDesc>,
    pub virtual_volume_tasks: Arc<MetricDesc>,
    pub bulk_volume_jobs: Arc<MetricDesc>,
    pub async_results_active: Arc<MetricDesc>,
    pub async_results: Arc<MetricDesc>,
    pub max_async_result_id: Arc<MetricDesc>,
}

impl MetricDescriptions {
    /// Build the table with every family name prefixed by `namespace`.
    pub fn new(namespace: &str) -> Result<Self> {
        let mut t = TableBuilder {
            namespace: namespace.to_string(),
            all: Vec::new(),
        };

        let up = t.add("up", "Whether the last scrape of the Element API was successful", &[])?;

        let volume_actual_iops = t.add(
            "volume_actual_iops",
            "The current actual IOPS to the volume in the last 500 milliseconds",
            VOLUME_LABELS,
        )?;
        let volume_average_io_size_bytes = t.add(
            "volume_average_io_size_bytes",
            "The average size in bytes of recent I/O to the volume in the last 500 milliseconds",
            VOLUME_LABELS,
        )?;
        let volume_burst_iops_credit = t.add(
            "volume_burst_iops_credit",
            "The total number of IOP credits available to the user",
            VOLUME_LABELS,
        )?;
        let volume_client_queue_depth = t.add(
            "volume_client_queue_depth",
            "The number of outstanding read and write operations to the volume",
            VOLUME_LABELS,
        )?;
        let volume_latency_seconds = t.add(
            "volume_latency_seconds",
            "The average time, in seconds, to complete operations to the volume in the last 500 milliseconds",
            VOLUME_LABELS,
        )?;
        let volume_non_zero_blocks = t.add(
            "volume_non_zero_blocks",
            "The total number of 4KiB blocks that contain data after the last garbage collection",
            VOLUME_LABELS,
        )?;
        let volume_read_bytes_total = t.add(
            "volume_read_bytes_total",
            "The total cumulative bytes read from the volume since its creation",
            VOLUME_LABELS,
        )?;
        let volume_read_latency_seconds_total = t.add(
            "volume_read_latency_seconds_total",
            "The total time spent performing read operations from the volume",
            VOLUME_LABELS,
        )?;
        let volume_read_ops_total = t.add(
            "volume_read_ops_total",
            "The total read operations to the volume since its creation",
            VOLUME_LABELS,
        )?;
        let volume_throttle = t.add(
            "volume_throttle",
            "A value between 0 and 1 representing how much the system is throttling clients below their maxIOPS",
            VOLUME_LABELS,
        )?;
        let volume_unaligned_reads_total = t.add(
            "volume_unaligned_reads_total",
            "The total cumulative unaligned read operations to the volume since its creation",
            VOLUME_LABELS,
        )?;
        let volume_unaligned_writes_total = t.add(
            "volume_unaligned_writes_total",
            "The total cumulative unaligned write operations to the volume since its creation",
            VOLUME_LABELS,
        )?;
        let volume_size_bytes = t.add(
            "volume_size_bytes",
            "Total provisioned capacity in bytes",
            VOLUME_LABELS,
        )?;
        let volume_utilization = t.add(
            "volume_utilization",
            "A value describing how much the client is using the volume relative to its maxIOPS",
            VOLUME_LABELS,
        )?;
        let volume_write_bytes_total = t.add(
            "volume_write_bytes_total",
            "The total cumulative bytes written to the volume since its creation",
            VOLUME_LABELS,
        )?;
        let volume_write_latency_seconds_total = t.add(
            "volume_write_latency_seconds_total",
            "The total time spent performing write operations to the volume",
            VOLUME_LABELS,
        )?;
        let volume_write_ops_total = t.add(
            "volume_write_ops_total",
            "The total cumulative write operations to the volume since its creation",
            VOLUME_LABELS,
        )?;
        let volume_zero_blocks = t.add(
            "volume_zero_blocks",
            "The total number of empty 4KiB blocks without data after the last garbage collection",
            VOLUME_LABELS,
        )?;

        let volume_qos_below_min_iops_percentage = t.add(
            "volume_qos_below_min_iops_percentage",
            "Distribution of volume IOPS as a percentage below the minimum IOPS setting",
            VOLUME_LABELS,
        )?;
        let volume_qos_min_to_max_iops_percentage = t.add(
            "volume_qos_min_to_max_iops_percentage",
            "Distribution of volume IOPS as a percentage between the minimum and maximum IOPS settings",
            VOLUME_LABELS,
        )?;
        let volume_qos_read_block_size_bytes = t.add(
            "volume_qos_read_block_size_bytes",
            "Distribution of read request block sizes for the volume",
            VOLUME_LABELS,
        )?;
        let volume_qos_target_utilization_percentage = t.add(
            "volume_qos_target_utilization_percentage",
            "Distribution of volume utilization as a percentage of the target IOPS",
            VOLUME_LABELS,
        )?;
        let volume_qos_throttle_percentage = t.add(
            "volume_qos_throttle_percentage",
            "Distribution of the throttling applied to the volume",
            VOLUME_LABELS,
        )?;
        let volume_qos_write_block_size_bytes = t.add(
            "volume_qos_write_block_size_bytes",
            "Distribution of write request block sizes for the volume",
            VOLUME_LABELS,
        )?;

        let cluster_active_block_space_bytes = t.add(
            "cluster_active_block_space_bytes",
            "The amount of space on the block drives, including metadata entries and unused space",
            &[],
        )?;
        let cluster_active_sessions = t.add(
            "cluster_active_sessions",
            "The number of active iSCSI sessions communicating with the cluster",
            &[],
        )?;
        let cluster_average_iops = t.add(
            "cluster_average_iops",
            "The average IOPS for the cluster since midnight Coordinated Universal Time (UTC)",
            &[],
        )?;
        let cluster_recent_io_size_bytes = t.add(
            "cluster_recent_io_size_bytes",
            "The average size of IOPS to all volumes in the cluster",
            &[],
        )?;
        let cluster_current_iops = t.add(
            "cluster_current_iops",
            "The average IOPS for all volumes in the cluster over the last 5 seconds",
            &[],
        )?;
        let cluster_max_iops = t.add(
            "cluster_max_iops",
            "The estimated maximum IOPS capability of the current cluster",
            &[],
        )?;
        let cluster_max_over_provisionable_space_bytes = t.add(
            "cluster_max_over_provisionable_space_bytes",
            "The maximum amount of provisionable space",
            &[],
        )?;
        let cluster_max_provisioned_space_bytes = t.add(
            "cluster_max_provisioned_space_bytes",
            "The total amount of provisionable space if all volumes are 100% filled",
            &[],
        )?;
        let cluster_max_used_metadata_space_bytes = t.add(
            "cluster_max_used_metadata_space_bytes",
            "The amount of bytes on volume drives used to store metadata",
            &[],
        )?;
        let cluster_max_used_space_bytes = t.add(
            "cluster_max_used_space_bytes",
            "The total amount of space on all active block drives",
            &[],
        )?;
        let cluster_non_zero_blocks = t.add(
            "cluster_non_zero_blocks",
            "The total number of 4KiB blocks that contain data after the last garbage collection",
            &[],
        )?;
        let cluster_peak_active_sessions = t.add(
            "cluster_peak_active_sessions",
            "The peak number of iSCSI connections since midnight UTC",
            &[],
        )?;
        let cluster_peak_iops = t.add(
            "cluster_peak_iops",
            "The highest value for currentIOPS since midnight UTC",
            &[],
        )?;
        let cluster_provisioned_space_bytes = t.add(
            "cluster_provisioned_space_bytes",
            "The total amount of space provisioned in all volumes on the cluster",
            &[],
        )?;
        let cluster_snapshot_non_zero_blocks = t.add(
            "cluster_snapshot_non_zero_blocks",
            "The total number of 4KiB blocks in snapshots that contain data",
            &[],
        )?;
        let cluster_io_ops_total = t.add(
            "cluster_io_ops_total",
            "The total number of I/O operations performed throughout the lifetime of the cluster",
            &[],
        )?;
        let cluster_unique_blocks = t.add(
            "cluster_unique_blocks",
            "The total number of blocks stored on the block drives",
            &[],
        )?;
        let cluster_unique_blocks_used_space_bytes = t.add(
            "cluster_unique_blocks_used_space_bytes",
            "The total amount of data the unique blocks take up on the block drives",
            &[],
        )?;
        let cluster_used_metadata_space_bytes = t.add(
            "cluster_used_metadata_space_bytes",
            "The total amount of bytes on volume drives used to store metadata",
            &[],
        )?;
        let cluster_used_metadata_space_in_snapshots_bytes = t.add(
            "cluster_used_metadata_space_in_snapshots_bytes",
            "The amount of bytes on volume drives used for storing unique data in snapshots",
            &[],
        )?;
        let cluster_used_space_bytes = t.add(
            "cluster_used_space_bytes",
            "The total amount of space used by all block drives in the system",
            &[],
        )?;
        let cluster_zero_blocks = t.add(
            "cluster_zero_blocks",
            "The total number of empty 4KiB blocks without data after the last garbage collection",
            &[],
        )?;
        let cluster_thin_provisioning_factor = t.add(
            "cluster_thin_provisioning_factor",
            "The cluster thin provisioning factor: (nonZeroBlocks + zeroBlocks) / nonZeroBlocks",
            &[],
        )?;
        let cluster_deduplication_factor = t.add(
            "cluster_deduplication_factor",
            "The cluster deduplication factor: (nonZeroBlocks + snapshotNonZeroBlocks) / uniqueBlocks",
            &[],
        )?;
        let cluster_compression_factor = t.add(
            "cluster_compression_factor",
            "The cluster compression factor: (uniqueBlocks * 4096) / (uniqueBlocksUsedSpace * 0.93)",
            &[],
        )?;
        let cluster_efficiency_factor = t.add(
            "cluster_efficiency_factor",
            "The cluster efficiency factor: thin provisioning * deduplication * compression",
            &[],
        )?;

        let cluster_active_faults = t.add(
            "cluster_active_faults",
            "List of any active faults detected in the cluster",
            FAULT_LABELS,
        )?;

        let node_info = t.add("node_info", "Cluster node info", NODE_INFO_LABELS)?;
        let node_total_memory_bytes = t.add(
            "node_total_memory_bytes",
            "Total node memory in bytes",
            NODE_LABELS,
        )?;
        let node_samples = t.add(
            "node_samples",
            "Node samples count",
            NODE_LABELS,
        )?;
        let node_cpu_percentage = t.add(
            "node_cpu_percentage",
            "CPU usage in percent",
            NODE_LABELS,
        )?;
        let node_cpu_seconds_total = t.add(
            "node_cpu_seconds_total",
            "CPU usage in seconds since last boot",
            NODE_LABELS,
        )?;
        let node_interface_in_bytes_total = t.add(
            "node_interface_in_bytes_total",
            "Bytes in on the node network interface",
            NODE_INTERFACE_LABELS,
        )?;
        let node_interface_out_bytes_total = t.add(
            "node_interface_out_bytes_total",
            "Bytes out on the node network interface",
            NODE_INTERFACE_LABELS,
        )?;
        let node_interface_utilization_percentage = t.add(
            "node_interface_utilization_percentage",
            "Node network interface utilization in percent",
            NODE_INTERFACE_LABELS,
        )?;
        let node_read_latency_seconds_total = t.add(
            "node_read_latency_seconds_total",
            "The total time spent performing read operations since the creation of the cluster",
            NODE_LABELS,
        )?;
        let node_used_memory_bytes = t.add(
            "node_used_memory_bytes",
            "Total node memory usage in bytes",
            NODE_LABELS,
        )?;
        let node_write_latency_seconds_total = t.add(
            "node_write_latency_seconds_total",
            "The total time spent performing write operations since the creation of the cluster",
            NODE_LABELS,
        )?;
        let node_load_histogram = t.add(
            "node_load_histogram",
            "Histogram of the slice service load on the node",
            NODE_LABELS,
        )?;
        let node_iscsi_sessions = t.add(
            "node_iscsi_sessions",
            "Number of iSCSI sessions per node",
            NODE_LABELS,
        )?;

        let cluster_actual_iops = t.add(
            "cluster_actual_iops",
            "Current actual IOPS for the entire cluster in the last 500 milliseconds",
            &[],
        )?;
        let cluster_average_io_bytes = t.add(
            "cluster_average_io_bytes",
            "Average size in bytes of recent I/O to the cluster in the last 500 milliseconds",
            &[],
        )?;
        let cluster_client_queue_depth = t.add(
            "cluster_client_queue_depth",
            "The number of outstanding read and write operations to the cluster",
            &[],
        )?;
        let cluster_throughput_utilization = t.add(
            "cluster_throughput_utilization",
            "The cluster capacity being utilized. 0 - not utilized. 1 - 100% utilized",
            &[],
        )?;
        let cluster_latency_seconds = t.add(
            "cluster_latency_seconds",
            "The average time, in seconds, to complete operations to the cluster in the last 500 milliseconds",
            &[],
        )?;
        let cluster_normalized_iops = t.add(
            "cluster_normalized_iops",
            "Average number of IOPS for the entire cluster in the last 500 milliseconds",
            &[],
        )?;
        let cluster_read_bytes_total = t.add(
            "cluster_read_bytes_total",
            "The total cumulative bytes read from the cluster since its creation",
            &[],
        )?;
        let cluster_last_sample_read_bytes = t.add(
            "cluster_last_sample_read_bytes",
            "The total number of bytes read from the cluster during the last sample period",
            &[],
        )?;
        let cluster_read_latency_seconds = t.add(
            "cluster_read_latency_seconds",
            "The average time, in seconds, to complete read operations to the cluster in the last 500 milliseconds",
            &[],
        )?;
        let cluster_read_latency_seconds_total = t.add(
            "cluster_read_latency_seconds_total",
            "The total time spent performing read operations since the creation of the cluster",
            &[],
        )?;
        let cluster_read_ops_total = t.add(
            "cluster_read_ops_total",
            "The total cumulative read operations to the cluster since its creation",
            &[],
        )?;
        let cluster_last_sample_read_ops = t.add(
            "cluster_last_sample_read_ops",
            "The total number of read operations during the last sample period",
            &[],
        )?;
        let cluster_sample_period_seconds = t.add(
            "cluster_sample_period_seconds",
            "The length of the sample period, in seconds",
            &[],
        )?;
        let cluster_services = t.add(
            "cluster_services",
            "The number of services running on the cluster",
            &[],
        )?;
        let cluster_expected_services = t.add(
            "cluster_expected_services",
            "The total number of expected services running on the cluster",
            &[],
        )?;
        let cluster_unaligned_reads_total = t.add(
            "cluster_unaligned_reads_total",
            "The total cumulative unaligned read operations to the cluster since its creation",
            &[],
        )?;
        let cluster_unaligned_writes_total = t.add(
            "cluster_unaligned_writes_total",
            "The total cumulative unaligned write operations to the cluster since its creation",
            &[],
        )?;
        let cluster_write_bytes_total = t.add(
            "cluster_write_bytes_total",
            "The total cumulative bytes written to the cluster since its creation",
            &[],
        )?;
        let cluster_last_sample_write_bytes = t.add(
            "cluster_last_sample_write_bytes",
            "The total number of bytes written to the cluster during the last sample period",
            &[],
        )?;
        let cluster_write_latency_seconds = t.add(
            "cluster_write_latency_seconds",
            "The average time, in seconds, to complete write operations to the cluster in the last 500 milliseconds",
            &[],
        )?;
        let cluster_write_latency_seconds_total = t.add(
            "cluster_write_latency_seconds_total",
            "The total time spent performing write operations since the creation of the cluster",
            &[],
        )?;
        let cluster_write_ops_total = t.add(
            "cluster_write_ops_total",
            "The total cumulative write operations to the cluster since its creation",
            &[],
        )?;
        let cluster_last_sample_write_ops = t.add(
            "cluster_last_sample_write_ops",
            "The total number of write operations during the last sample period",
            &[],
        )?;

        let cluster_block_fullness = t.add(
            "cluster_block_fullness",
            "The current computed level of block fullness of the cluster",
            LEVEL_LABELS,
        )?;
        let cluster_fullness = t.add(
            "cluster_fullness",
            "Reflects the highest level of fullness between blockFullness and metadataFullness",
            LEVEL_LABELS,
        )?;
        let cluster_max_metadata_over_provision_factor = t.add(
            "cluster_max_metadata_over_provision_factor",
            "A value representing the number of times metadata space can be over provisioned",
            &[],
        )?;
        let cluster_metadata_fullness = t.add(
            "cluster_metadata_fullness",
            "The current computed level of metadata fullness of the cluster",
            LEVEL_LABELS,
        )?;
        let cluster_slice_reserve_used_threshold_percentage = t.add(
            "cluster_slice_reserve_used_threshold_percentage",
            "Error condition triggered when reserved slice utilization exceeds this percentage",
            &[],
        )?;
        let cluster_stage2_aware_threshold_percentage = t.add(
            "cluster_stage2_aware_threshold_percentage",
            "Percentage of cluster capacity at which an Aware condition is raised",
            &[],
        )?;
        let cluster_stage2_block_threshold_bytes = t.add(
            "cluster_stage2_block_threshold_bytes",
            "Number of bytes used by the cluster at which a warning condition will exist",
            &[],
        )?;
        let cluster_stage3_block_threshold_bytes = t.add(
            "cluster_stage3_block_threshold_bytes",
            "Number of bytes used by the cluster at which an error condition will exist",
            &[],
        )?;
        let cluster_stage3_block_threshold_percentage = t.add(
            "cluster_stage3_block_threshold_percentage",
            "Percent value set for stage3 of block fullness",
            &[],
        )?;
        let cluster_stage3_low_threshold_percentage = t.add(
            "cluster_stage3_low_threshold_percentage",
            "Percentage of cluster capacity at which a low capacity condition is raised",
            &[],
        )?;
        let cluster_stage4_block_threshold_bytes = t.add(
            "cluster_stage4_block_threshold_bytes",
            "Number of bytes used by the cluster at which a critical condition will exist",
            &[],
        )?;
        let cluster_stage4_critical_threshold_percentage = t.add(
            "cluster_stage4_critical_threshold_percentage",
            "Percentage of cluster capacity at which a critical condition is raised",
            &[],
        )?;
        let cluster_stage5_block_threshold_bytes = t.add(
            "cluster_stage5_block_threshold_bytes",
            "Number of bytes used by the cluster at which the cluster is completely consumed",
            &[],
        )?;
        let cluster_total_bytes = t.add(
            "cluster_total_bytes",
            "Physical capacity of the cluster, measured in bytes",
            &[],
        )?;
        let cluster_total_metadata_bytes = t.add(
            "cluster_total_metadata_bytes",
            "Total amount of space that can be used to store metadata",
            &[],
        )?;
        let cluster_used_bytes = t.add(
            "cluster_used_bytes",
            "Number of bytes used on the cluster",
            &[],
        )?;
        let cluster_used_metadata_bytes = t.add(
            "cluster_used_metadata_bytes",
            "Amount of space used on volume drives to store metadata",
            &[],
        )?;

        let drive_status = t.add(
            "drive_status",
            "The drive status for each individual drive, one series per possible status",
            DRIVE_STATUS_LABELS,
        )?;
        let drive_capacity_bytes = t.add(
            "drive_capacity_bytes",
            "The drive capacity in bytes",
            DRIVE_LABELS,
        )?;

        let volume_count = t.add(
            "volume_count",
            "The number of volumes by status",
            STATUS_LABELS,
        )?;
        let account_count = t.add("account_count", "The number of accounts", &[])?;
        let initiator_count = t.add("initiator_count", "The number of initiators", &[])?;
        let volume_access_group_count = t.add(
            "volume_access_group_count",
            "The number of volume access groups",
            &[],
        )?;
        let virtual_volume_tasks = t.add(
            "virtual_volume_tasks",
            "The number of virtual volume tasks",
            &[],
        )?;
        let bulk_volume_jobs = t.add(
            "bulk_volume_jobs",
            "The number of running bulk volume jobs",
            &[],
        )?;
        let async_results_active = t.add(
            "async_results_active",
            "The number of currently running async results by type",
            TYPE_LABELS,
        )?;
        let async_results = t.add(
            "async_results",
            "The number of async results by type",
            TYPE_LABELS,
        )?;
        let max_async_result_id = t.add(
            "max_async_result_id",
            "The highest async result id observed",
            &[],
        )?;

        Ok(Self {
            namespace: t.namespace,
            all: t.all,
            up,
            volume_actual_iops,
            volume_average_io_size_bytes,
            volume_burst_iops_credit,
            volume_client_queue_depth,
            volume_latency_seconds,
            volume_non_zero_blocks,
            volume_read_bytes_total,
            volume_read_latency_seconds_total,
            volume_read_ops_total,
            volume_throttle,
            volume_unaligned_reads_total,
            volume_unaligned_writes_total,
            volume_size_bytes,
            volume_utilization,
            volume_write_bytes_total,
            volume_write_latency_seconds_total,
            volume_write_ops_total,
            volume_zero_blocks,
            volume_qos_below_min_iops_percentage,
            volume_qos_min_to_max_iops_percentage,
            volume_qos_read_block_size_bytes,
            volume_qos_target_utilization_percentage,
            volume_qos_throttle_percentage,
            volume_qos_write_block_size_bytes,
            cluster_active_block_space_bytes,
            cluster_active_sessions,
            cluster_average_iops,
            cluster_recent_io_size_bytes,
            cluster_current_iops,
            cluster_max_iops,
            cluster_max_over_provisionable_space_bytes,
            cluster_max_provisioned_space_bytes,
            cluster_max_used_metadata_space_bytes,
            cluster_max_used_space_bytes,
            cluster_non_zero_blocks,
            cluster_peak_active_sessions,
            cluster_peak_iops,
            cluster_provisioned_space_bytes,
            cluster_snapshot_non_zero_blocks,
            cluster_io_ops_total,
            cluster_unique_blocks,
            cluster_unique_blocks_used_space_bytes,
            cluster_used_metadata_space_bytes,
            cluster_used_metadata_space_in_snapshots_bytes,
            cluster_used_space_bytes,
            cluster_zero_blocks,
            cluster_thin_provisioning_factor,
            cluster_deduplication_factor,
            cluster_compression_factor,
            cluster_efficiency_factor,
            cluster_active_faults,
            node_info,
            node_total_memory_bytes,
            node_samples,
            node_cpu_percentage,
            node_cpu_seconds_total,
            node_interface_in_bytes_total,
            node_interface_out_bytes_total,
            node_interface_utilization_percentage,
            node_read_latency_seconds_total,
            node_used_memory_bytes,
            node_write_latency_seconds_total,
            node_load_histogram,
            node_iscsi_sessions,
            cluster_actual_iops,
            cluster_average_io_bytes,
            cluster_client_queue_depth,
            cluster_throughput_utilization,
            cluster_latency_seconds,
            cluster_normalized_iops,
            cluster_read_bytes_total,
            cluster_last_sample_read_bytes,
            cluster_read_latency_seconds,
            cluster_read_latency_seconds_total,
            cluster_read_ops_total,
            cluster_last_sample_read_ops,
            cluster_sample_period_seconds,
            cluster_services,
            cluster_expected_services,
            cluster_unaligned_reads_total,
            cluster_unaligned_writes_total,
            cluster_write_bytes_total,
            cluster_last_sample_write_bytes,
            cluster_write_latency_seconds,
            cluster_write_latency_seconds_total,
            cluster_write_ops_total,
            cluster_last_sample_write_ops,
            cluster_block_fullness,
            cluster_fullness,
            cluster_max_metadata_over_provision_factor,
            cluster_metadata_fullness,
            cluster_slice_reserve_used_threshold_percentage,
            cluster_stage2_aware_threshold_percentage,
            cluster_stage2_block_threshold_bytes,
            cluster_stage3_block_threshold_bytes,
            cluster_stage3_block_threshold_percentage,
            cluster_stage3_low_threshold_percentage,
            cluster_stage4_block_threshold_bytes,
            cluster_stage4_critical_threshold_percentage,
            cluster_stage5_block_threshold_bytes,
            cluster_total_bytes,
            cluster_total_metadata_bytes,
            cluster_used_bytes,
            cluster_used_metadata_bytes,
            drive_status,
            drive_capacity_bytes,
            volume_count,
            account_count,
            initiator_count,
            volume_access_group_count,
            virtual_volume_tasks,
            bulk_volume_jobs,
            async_results_active,
            async_results,
            max_async_result_id,
        })
    }

    /// Every descriptor, in table order.
    pub fn all(&self) -> &[Arc<MetricDesc>] {
        &self.all
    }

    /// Look a descriptor up by fully-qualified name.
    pub fn find(&self, fq_name: &str) -> Option<&Arc<MetricDesc>> {
        self.all.iter().find(|d| d.fq_name == fq_name)
    }
}
