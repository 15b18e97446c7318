//! SolidFire Element API clients
//!
//! - [`ElementClient`] talks JSON-RPC over HTTPS to a live cluster
//! - [`FixtureClient`] serves canned responses from a directory
//!
//! Both implement [`ClusterApi`](crate::domain::ClusterApi) through one
//! generic `call` per client.

use crate::error::{Error, Result};
use types::{Method, RpcResponse};

/// Implements `ClusterApi` for a type with an inherent
/// `async fn call<R: DeserializeOwned>(&self, Method) -> Result<R>`.
macro_rules! impl_cluster_api {
    ($client:ty) => {
        #[async_trait::async_trait]
        impl $crate::domain::ClusterApi for $client {
            async fn list_volumes(&self) -> Result<ListVolumesResult> {
                self.call(Method::ListVolumes).await
            }

            async fn list_all_nodes(&self) -> Result<ListAllNodesResult> {
                self.call(Method::ListAllNodes).await
            }

            async fn list_volume_stats(&self) -> Result<ListVolumeStatsResult> {
                self.call(Method::ListVolumeStats).await
            }

            async fn get_cluster_capacity(&self) -> Result<GetClusterCapacityResult> {
                self.call(Method::GetClusterCapacity).await
            }

            async fn list_cluster_faults(&self) -> Result<ListClusterFaultsResult> {
                self.call(Method::ListClusterFaults).await
            }

            async fn list_node_stats(&self) -> Result<ListNodeStatsResult> {
                self.call(Method::ListNodeStats).await
            }

            async fn list_volume_qos_histograms(&self) -> Result<ListVolumeQosHistogramsResult> {
                self.call(Method::ListVolumeQoSHistograms).await
            }

            async fn get_cluster_stats(&self) -> Result<GetClusterStatsResult> {
                self.call(Method::GetClusterStats).await
            }

            async fn get_cluster_full_threshold(&self) -> Result<GetClusterFullThresholdResult> {
                self.call(Method::GetClusterFullThreshold).await
            }

            async fn list_drives(&self) -> Result<ListDrivesResult> {
                self.call(Method::ListDrives).await
            }

            async fn list_iscsi_sessions(&self) -> Result<ListIscsiSessionsResult> {
                self.call(Method::ListIscsiSessions).await
            }

            async fn list_accounts(&self) -> Result<ListAccountsResult> {
                self.call(Method::ListAccounts).await
            }

            async fn list_initiators(&self) -> Result<ListInitiatorsResult> {
                self.call(Method::ListInitiators).await
            }

            async fn list_volume_access_groups(&self) -> Result<ListVolumeAccessGroupsResult> {
                self.call(Method::ListVolumeAccessGroups).await
            }

            async fn list_virtual_volume_tasks(&self) -> Result<ListVirtualVolumeTasksResult> {
                self.call(Method::ListVirtualVolumeTasks).await
            }

            async fn list_bulk_volume_jobs(&self) -> Result<ListBulkVolumeJobsResult> {
                self.call(Method::ListBulkVolumeJobs).await
            }

            async fn list_async_results(&self) -> Result<ListAsyncResultsResult> {
                self.call(Method::ListAsyncResults).await
            }
        }
    };
}

pub mod client;
pub mod fixture;
pub mod types;

pub use client::{ClientConfig, ElementClient};
pub use fixture::FixtureClient;

/// Unwrap a JSON-RPC envelope into its result.
pub(crate) fn into_result<R>(method: Method, envelope: RpcResponse<R>) -> Result<R> {
    if let Some(err) = envelope.error {
        return Err(Error::ApiResponse {
            method: method.to_string(),
            name: err.name,
            code: err.code,
            message: err.message,
        });
    }

    envelope.result.ok_or_else(|| Error::ApiResponseParse {
        method: method.to_string(),
        reason: "response has neither result nor error".to_string(),
    })
}
