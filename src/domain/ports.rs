//! Domain Ports
//!
//! The two seams the scrape core depends on. Infrastructure adapters
//! implement them; tests substitute in-memory doubles.
//!
//! ```text
//! ┌──────────────┐     ┌────────────────────┐     ┌──────────────┐
//! │  ClusterApi  │────▶│ ScrapeOrchestrator │────▶│  MetricSink  │
//! │ (Element RPC)│     │  (cache + derive)  │     │ (Prometheus) │
//! └──────────────┘     └────────────────────┘     └──────────────┘
//! ```

use async_trait::async_trait;

use crate::error::Result;
use crate::metrics::Sample;
use crate::solidfire::types::{
    GetClusterCapacityResult, GetClusterFullThresholdResult, GetClusterStatsResult,
    ListAccountsResult, ListAllNodesResult, ListAsyncResultsResult, ListBulkVolumeJobsResult,
    ListClusterFaultsResult, ListDrivesResult, ListInitiatorsResult, ListIscsiSessionsResult,
    ListNodeStatsResult, ListVirtualVolumeTasksResult, ListVolumeAccessGroupsResult,
    ListVolumeQosHistogramsResult, ListVolumeStatsResult, ListVolumesResult,
};

// =============================================================================
// Cluster API Port
// =============================================================================

/// Read-only query interface of a storage cluster's management API.
///
/// The exporter never issues a mutating call; every method maps to one
/// `List*`/`Get*` RPC. Any failure (transport, authentication, timeout,
/// malformed response) surfaces as an `Err`.
#[async_trait]
pub trait ClusterApi: Send + Sync {
    async fn list_volumes(&self) -> Result<ListVolumesResult>;

    async fn list_all_nodes(&self) -> Result<ListAllNodesResult>;

    async fn list_volume_stats(&self) -> Result<ListVolumeStatsResult>;

    async fn get_cluster_capacity(&self) -> Result<GetClusterCapacityResult>;

    async fn list_cluster_faults(&self) -> Result<ListClusterFaultsResult>;

    async fn list_node_stats(&self) -> Result<ListNodeStatsResult>;

    async fn list_volume_qos_histograms(&self) -> Result<ListVolumeQosHistogramsResult>;

    async fn get_cluster_stats(&self) -> Result<GetClusterStatsResult>;

    async fn get_cluster_full_threshold(&self) -> Result<GetClusterFullThresholdResult>;

    async fn list_drives(&self) -> Result<ListDrivesResult>;

    async fn list_iscsi_sessions(&self) -> Result<ListIscsiSessionsResult>;

    async fn list_accounts(&self) -> Result<ListAccountsResult>;

    async fn list_initiators(&self) -> Result<ListInitiatorsResult>;

    async fn list_volume_access_groups(&self) -> Result<ListVolumeAccessGroupsResult>;

    async fn list_virtual_volume_tasks(&self) -> Result<ListVirtualVolumeTasksResult>;

    async fn list_bulk_volume_jobs(&self) -> Result<ListBulkVolumeJobsResult>;

    async fn list_async_results(&self) -> Result<ListAsyncResultsResult>;
}

// =============================================================================
// Metric Sink Port
// =============================================================================

/// Pull-based metrics sink the orchestrator writes samples into.
///
/// Each sample carries its descriptor, kind, value and label values in the
/// descriptor's label order.
pub trait MetricSink: Send + Sync {
    /// Accept one sample.
    fn emit(&self, sample: Sample);

    /// Accept a batch of samples, in order.
    fn emit_all(&self, samples: Vec<Sample>) {
        for sample in samples {
            self.emit(sample);
        }
    }
}

impl<S: MetricSink + ?Sized> MetricSink for std::sync::Arc<S> {
    fn emit(&self, sample: Sample) {
        (**self).emit(sample)
    }

    fn emit_all(&self, samples: Vec<Sample>) {
        (**self).emit_all(samples)
    }
}
