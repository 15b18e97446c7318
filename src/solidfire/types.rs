//! Element API result types
//!
//! Only the fields the exporter reads are modelled. Every struct is
//! `#[serde(default)]` so a field the cluster omits reads as zero or empty.

use std::collections::HashMap;

use serde::Deserialize;

// =============================================================================
// RPC Methods
// =============================================================================

/// Read-only Element API methods issued by the exporter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    ListVolumes,
    ListAllNodes,
    ListVolumeStats,
    GetClusterCapacity,
    ListClusterFaults,
    ListNodeStats,
    ListVolumeQoSHistograms,
    GetClusterStats,
    GetClusterFullThreshold,
    ListDrives,
    ListIscsiSessions,
    ListAccounts,
    ListInitiators,
    ListVolumeAccessGroups,
    ListVirtualVolumeTasks,
    ListBulkVolumeJobs,
    ListAsyncResults,
}

impl Method {
    /// Every method, in scrape order
    pub const ALL: [Method; 17] = [
        Method::ListVolumes,
        Method::ListAllNodes,
        Method::ListVolumeStats,
        Method::GetClusterCapacity,
        Method::ListClusterFaults,
        Method::ListNodeStats,
        Method::ListVolumeQoSHistograms,
        Method::GetClusterStats,
        Method::GetClusterFullThreshold,
        Method::ListDrives,
        Method::ListIscsiSessions,
        Method::ListAccounts,
        Method::ListInitiators,
        Method::ListVolumeAccessGroups,
        Method::ListVirtualVolumeTasks,
        Method::ListBulkVolumeJobs,
        Method::ListAsyncResults,
    ];

    /// Wire name of the method
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::ListVolumes => "ListVolumes",
            Method::ListAllNodes => "ListAllNodes",
            Method::ListVolumeStats => "ListVolumeStats",
            Method::GetClusterCapacity => "GetClusterCapacity",
            Method::ListClusterFaults => "ListClusterFaults",
            Method::ListNodeStats => "ListNodeStats",
            Method::ListVolumeQoSHistograms => "ListVolumeQoSHistograms",
            Method::GetClusterStats => "GetClusterStats",
            Method::GetClusterFullThreshold => "GetClusterFullThreshold",
            Method::ListDrives => "ListDrives",
            Method::ListIscsiSessions => "ListISCSISessions",
            Method::ListAccounts => "ListAccounts",
            Method::ListInitiators => "ListInitiators",
            Method::ListVolumeAccessGroups => "ListVolumeAccessGroups",
            Method::ListVirtualVolumeTasks => "ListVirtualVolumeTasks",
            Method::ListBulkVolumeJobs => "ListBulkVolumeJobs",
            Method::ListAsyncResults => "ListAsyncResults",
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// JSON-RPC Envelope
// =============================================================================

/// JSON-RPC response envelope
#[derive(Debug, Deserialize)]
pub struct RpcResponse<T> {
    pub result: Option<T>,
    pub error: Option<RpcError>,
}

/// JSON-RPC error member
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RpcError {
    pub name: String,
    pub code: i64,
    pub message: String,
}

// =============================================================================
// Volumes
// =============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ListVolumesResult {
    pub volumes: Vec<Volume>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Volume {
    #[serde(rename = "volumeID")]
    pub volume_id: i64,
    pub name: String,
    #[serde(rename = "accountID")]
    pub account_id: i64,
    pub status: String,
    pub attributes: HashMap<String, serde_json::Value>,
}

impl Volume {
    /// Owning account recorded in the `owner_id` attribute, if any.
    pub fn owner_id(&self) -> Option<String> {
        match self.attributes.get("owner_id")? {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ListVolumeStatsResult {
    pub volume_stats: Vec<VolumeStats>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VolumeStats {
    #[serde(rename = "volumeID")]
    pub volume_id: i64,
    #[serde(rename = "actualIOPS")]
    pub actual_iops: f64,
    #[serde(rename = "averageIOPSize")]
    pub average_iop_size: f64,
    #[serde(rename = "burstIOPSCredit")]
    pub burst_iops_credit: f64,
    pub client_queue_depth: f64,
    #[serde(rename = "latencyUSec")]
    pub latency_usec: f64,
    pub non_zero_blocks: f64,
    pub read_bytes: f64,
    #[serde(rename = "readLatencyUSecTotal")]
    pub read_latency_usec_total: f64,
    pub read_ops: f64,
    pub throttle: f64,
    pub unaligned_reads: f64,
    pub unaligned_writes: f64,
    pub volume_size: f64,
    pub volume_utilization: f64,
    pub write_bytes: f64,
    #[serde(rename = "writeLatencyUSecTotal")]
    pub write_latency_usec_total: f64,
    pub write_ops: f64,
    pub zero_blocks: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ListVolumeQosHistogramsResult {
    pub qos_histograms: Vec<VolumeQosHistograms>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct VolumeQosHistograms {
    #[serde(rename = "volumeID")]
    pub volume_id: i64,
    pub histograms: QosHistograms,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct QosHistograms {
    pub below_min_iops_percentages: PercentageBuckets,
    pub min_to_max_iops_percentages: PercentageBuckets,
    pub read_block_sizes: BlockSizeBuckets,
    pub target_utilization_percentages: PercentageBuckets,
    pub throttle_percentages: PercentageBuckets,
    pub write_block_sizes: BlockSizeBuckets,
}

/// Percentage distribution buckets shared by the QoS and load histograms.
/// Not every family reports every bucket.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(default)]
pub struct PercentageBuckets {
    #[serde(rename = "Bucket0")]
    pub bucket_0: u64,
    #[serde(rename = "Bucket1To19")]
    pub bucket_1_to_19: u64,
    #[serde(rename = "Bucket20To39")]
    pub bucket_20_to_39: u64,
    #[serde(rename = "Bucket40To59")]
    pub bucket_40_to_59: u64,
    #[serde(rename = "Bucket60To79")]
    pub bucket_60_to_79: u64,
    #[serde(rename = "Bucket80To100")]
    pub bucket_80_to_100: u64,
    #[serde(rename = "Bucket101Plus")]
    pub bucket_101_plus: u64,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(default)]
pub struct BlockSizeBuckets {
    #[serde(rename = "Bucket4096To8191")]
    pub bucket_4096_to_8191: u64,
    #[serde(rename = "Bucket8192To16383")]
    pub bucket_8192_to_16383: u64,
    #[serde(rename = "Bucket16384To32767")]
    pub bucket_16384_to_32767: u64,
    #[serde(rename = "Bucket32768To65535")]
    pub bucket_32768_to_65535: u64,
    #[serde(rename = "Bucket65536To131071")]
    pub bucket_65536_to_131071: u64,
    #[serde(rename = "Bucket131072Plus")]
    pub bucket_131072_plus: u64,
}

// =============================================================================
// Nodes
// =============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ListAllNodesResult {
    pub nodes: Vec<Node>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Node {
    #[serde(rename = "nodeID")]
    pub node_id: i64,
    pub name: String,
    pub chassis_name: String,
    #[serde(rename = "associatedFServiceID")]
    pub associated_fservice_id: i64,
    #[serde(rename = "associatedMasterServiceID")]
    pub associated_master_service_id: i64,
    pub platform_info: PlatformInfo,
    pub sip: String,
    pub sipi: String,
    pub software_version: String,
    pub uuid: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PlatformInfo {
    pub chassis_type: String,
    pub cpu_model: String,
    #[serde(rename = "nodeMemoryGB")]
    pub node_memory_gb: f64,
    pub node_type: String,
    pub platform_config_version: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ListNodeStatsResult {
    pub node_stats: NodeStatsList,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NodeStatsList {
    pub nodes: Vec<NodeStats>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NodeStats {
    #[serde(rename = "nodeID")]
    pub node_id: i64,
    pub count: u64,
    pub c_bytes_in: f64,
    pub c_bytes_out: f64,
    pub cpu: f64,
    pub cpu_total: f64,
    pub m_bytes_in: f64,
    pub m_bytes_out: f64,
    pub network_utilization_cluster: f64,
    pub network_utilization_storage: f64,
    #[serde(rename = "readLatencyUSecTotal")]
    pub read_latency_usec_total: f64,
    pub s_bytes_in: f64,
    pub s_bytes_out: f64,
    pub ss_load_histogram: PercentageBuckets,
    pub used_memory: f64,
    #[serde(rename = "writeLatencyUSecTotal")]
    pub write_latency_usec_total: f64,
}

// =============================================================================
// Cluster
// =============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GetClusterCapacityResult {
    pub cluster_capacity: ClusterCapacity,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ClusterCapacity {
    pub active_block_space: f64,
    pub active_sessions: f64,
    #[serde(rename = "averageIOPS")]
    pub average_iops: f64,
    #[serde(rename = "clusterRecentIOSize")]
    pub cluster_recent_io_size: f64,
    #[serde(rename = "currentIOPS")]
    pub current_iops: f64,
    #[serde(rename = "maxIOPS")]
    pub max_iops: f64,
    pub max_over_provisionable_space: f64,
    pub max_provisioned_space: f64,
    pub max_used_metadata_space: f64,
    pub max_used_space: f64,
    pub non_zero_blocks: f64,
    pub peak_active_sessions: f64,
    #[serde(rename = "peakIOPS")]
    pub peak_iops: f64,
    pub provisioned_space: f64,
    pub snapshot_non_zero_blocks: f64,
    pub total_ops: f64,
    pub unique_blocks: f64,
    pub unique_blocks_used_space: f64,
    pub used_metadata_space: f64,
    pub used_metadata_space_in_snapshots: f64,
    pub used_space: f64,
    pub zero_blocks: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GetClusterStatsResult {
    pub cluster_stats: ClusterStats,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ClusterStats {
    #[serde(rename = "actualIOPS")]
    pub actual_iops: f64,
    #[serde(rename = "averageIOPSize")]
    pub average_iop_size: f64,
    pub client_queue_depth: f64,
    pub cluster_utilization: f64,
    #[serde(rename = "latencyUSec")]
    pub latency_usec: f64,
    #[serde(rename = "normalizedIOPS")]
    pub normalized_iops: f64,
    pub read_bytes: f64,
    pub read_bytes_last_sample: f64,
    #[serde(rename = "readLatencyUSec")]
    pub read_latency_usec: f64,
    #[serde(rename = "readLatencyUSecTotal")]
    pub read_latency_usec_total: f64,
    pub read_ops: f64,
    pub read_ops_last_sample: f64,
    pub sample_period_msec: f64,
    pub services_count: f64,
    pub services_total: f64,
    pub unaligned_reads: f64,
    pub unaligned_writes: f64,
    pub write_bytes: f64,
    pub write_bytes_last_sample: f64,
    #[serde(rename = "writeLatencyUSec")]
    pub write_latency_usec: f64,
    #[serde(rename = "writeLatencyUSecTotal")]
    pub write_latency_usec_total: f64,
    pub write_ops: f64,
    pub write_ops_last_sample: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GetClusterFullThresholdResult {
    pub block_fullness: String,
    pub fullness: String,
    pub max_metadata_over_provision_factor: f64,
    pub metadata_fullness: String,
    pub slice_reserve_used_threshold_pct: f64,
    pub stage2_aware_threshold: f64,
    pub stage2_block_threshold_bytes: f64,
    pub stage3_block_threshold_bytes: f64,
    pub stage3_block_threshold_percent: f64,
    pub stage3_low_threshold: f64,
    pub stage4_block_threshold_bytes: f64,
    pub stage4_critical_threshold: f64,
    pub stage5_block_threshold_bytes: f64,
    pub sum_total_cluster_bytes: f64,
    pub sum_total_metadata_cluster_bytes: f64,
    pub sum_used_cluster_bytes: f64,
    pub sum_used_metadata_cluster_bytes: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ListClusterFaultsResult {
    pub faults: Vec<ClusterFault>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ClusterFault {
    #[serde(rename = "clusterFaultID")]
    pub cluster_fault_id: i64,
    #[serde(rename = "nodeID")]
    pub node_id: i64,
    pub code: String,
    pub severity: String,
    #[serde(rename = "type")]
    pub fault_type: String,
    #[serde(rename = "serviceID")]
    pub service_id: f64,
    pub resolved: bool,
    #[serde(rename = "nodeHardwareFaultID")]
    pub node_hardware_fault_id: f64,
    #[serde(rename = "driveID")]
    pub drive_id: f64,
    pub details: String,
}

// =============================================================================
// Drives & Sessions
// =============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ListDrivesResult {
    pub drives: Vec<Drive>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Drive {
    #[serde(rename = "driveID")]
    pub drive_id: i64,
    #[serde(rename = "nodeID")]
    pub node_id: i64,
    pub serial: String,
    pub slot: i64,
    pub status: String,
    #[serde(rename = "type")]
    pub drive_type: String,
    pub capacity: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ListIscsiSessionsResult {
    pub sessions: Vec<IscsiSession>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct IscsiSession {
    #[serde(rename = "sessionID")]
    pub session_id: i64,
    #[serde(rename = "nodeID")]
    pub node_id: i64,
    #[serde(rename = "volumeID")]
    pub volume_id: i64,
}

// =============================================================================
// Inventory
// =============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ListAccountsResult {
    pub accounts: Vec<Account>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Account {
    #[serde(rename = "accountID")]
    pub account_id: i64,
    pub username: String,
    pub status: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ListInitiatorsResult {
    pub initiators: Vec<Initiator>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Initiator {
    #[serde(rename = "initiatorID")]
    pub initiator_id: i64,
    pub initiator_name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ListVolumeAccessGroupsResult {
    pub volume_access_groups: Vec<VolumeAccessGroup>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct VolumeAccessGroup {
    #[serde(rename = "volumeAccessGroupID")]
    pub volume_access_group_id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ListVirtualVolumeTasksResult {
    pub tasks: Vec<VirtualVolumeTask>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VirtualVolumeTask {
    #[serde(rename = "virtualVolumeTaskID")]
    pub virtual_volume_task_id: String,
    pub status: String,
    pub operation: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ListBulkVolumeJobsResult {
    pub bulk_volume_jobs: Vec<BulkVolumeJob>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BulkVolumeJob {
    #[serde(rename = "bulkVolumeID")]
    pub bulk_volume_id: i64,
    pub status: String,
    #[serde(rename = "type")]
    pub job_type: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ListAsyncResultsResult {
    pub async_handles: Vec<AsyncHandle>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AsyncHandle {
    #[serde(rename = "asyncResultID")]
    pub async_result_id: i64,
    pub completed: bool,
    pub success: bool,
    pub result_type: String,
}
