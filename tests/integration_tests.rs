//! SolidFire Exporter Integration Tests
//!
//! Drives whole scrapes against:
//! - an in-memory cluster with injectable failures
//! - the JSON fixtures under `tests/fixtures/`

use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use solidfire_exporter::domain::{ClusterApi, MetricSink};
use solidfire_exporter::metrics::{BufferSink, CollectorConfig, Sample, SampleValue, ScrapeOrchestrator};
use solidfire_exporter::solidfire::types::*;
use solidfire_exporter::{Error, FixtureClient, Result};

// =============================================================================
// In-Memory Cluster
// =============================================================================

#[derive(Default)]
struct ClusterState {
    volumes: Vec<Volume>,
    nodes: Vec<Node>,
    volume_stats: Vec<VolumeStats>,
    qos: Vec<VolumeQosHistograms>,
    capacity: ClusterCapacity,
    faults: Vec<ClusterFault>,
    drives: Vec<Drive>,
    sessions: Vec<IscsiSession>,
    async_handles: Vec<AsyncHandle>,
    failing: HashSet<Method>,
    slow: HashMap<Method, Duration>,
}

#[derive(Default)]
struct MockCluster {
    state: Mutex<ClusterState>,
    calls: Mutex<Vec<Method>>,
    completed: Mutex<Vec<Method>>,
}

impl MockCluster {
    fn fail(&self, method: Method) {
        self.state.lock().failing.insert(method);
    }

    fn slow(&self, method: Method, delay: Duration) {
        self.state.lock().slow.insert(method, delay);
    }

    async fn enter(&self, method: Method) -> Result<()> {
        self.calls.lock().push(method);
        let (failing, delay) = {
            let state = self.state.lock();
            (state.failing.contains(&method), state.slow.get(&method).copied())
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.completed.lock().push(method);
        if failing {
            return Err(Error::ApiStatus {
                method: method.to_string(),
                status: 500,
            });
        }
        Ok(())
    }

    fn called(&self, method: Method) -> bool {
        self.calls.lock().contains(&method)
    }

    fn completed(&self, method: Method) -> bool {
        self.completed.lock().contains(&method)
    }
}

#[async_trait]
impl ClusterApi for MockCluster {
    async fn list_volumes(&self) -> Result<ListVolumesResult> {
        self.enter(Method::ListVolumes).await?;
        Ok(ListVolumesResult {
            volumes: self.state.lock().volumes.clone(),
        })
    }

    async fn list_all_nodes(&self) -> Result<ListAllNodesResult> {
        self.enter(Method::ListAllNodes).await?;
        Ok(ListAllNodesResult {
            nodes: self.state.lock().nodes.clone(),
        })
    }

    async fn list_volume_stats(&self) -> Result<ListVolumeStatsResult> {
        self.enter(Method::ListVolumeStats).await?;
        Ok(ListVolumeStatsResult {
            volume_stats: self.state.lock().volume_stats.clone(),
        })
    }

    async fn get_cluster_capacity(&self) -> Result<GetClusterCapacityResult> {
        self.enter(Method::GetClusterCapacity).await?;
        Ok(GetClusterCapacityResult {
            cluster_capacity: self.state.lock().capacity.clone(),
        })
    }

    async fn list_cluster_faults(&self) -> Result<ListClusterFaultsResult> {
        self.enter(Method::ListClusterFaults).await?;
        Ok(ListClusterFaultsResult {
            faults: self.state.lock().faults.clone(),
        })
    }

    async fn list_node_stats(&self) -> Result<ListNodeStatsResult> {
        self.enter(Method::ListNodeStats).await?;
        Ok(ListNodeStatsResult::default())
    }

    async fn list_volume_qos_histograms(&self) -> Result<ListVolumeQosHistogramsResult> {
        self.enter(Method::ListVolumeQoSHistograms).await?;
        Ok(ListVolumeQosHistogramsResult {
            qos_histograms: self.state.lock().qos.clone(),
        })
    }

    async fn get_cluster_stats(&self) -> Result<GetClusterStatsResult> {
        self.enter(Method::GetClusterStats).await?;
        Ok(GetClusterStatsResult::default())
    }

    async fn get_cluster_full_threshold(&self) -> Result<GetClusterFullThresholdResult> {
        self.enter(Method::GetClusterFullThreshold).await?;
        Ok(GetClusterFullThresholdResult {
            block_fullness: "stage3Low".to_string(),
            fullness: "blockFullness".to_string(),
            metadata_fullness: "stage1Happy".to_string(),
            ..Default::default()
        })
    }

    async fn list_drives(&self) -> Result<ListDrivesResult> {
        self.enter(Method::ListDrives).await?;
        Ok(ListDrivesResult {
            drives: self.state.lock().drives.clone(),
        })
    }

    async fn list_iscsi_sessions(&self) -> Result<ListIscsiSessionsResult> {
        self.enter(Method::ListIscsiSessions).await?;
        Ok(ListIscsiSessionsResult {
            sessions: self.state.lock().sessions.clone(),
        })
    }

    async fn list_accounts(&self) -> Result<ListAccountsResult> {
        self.enter(Method::ListAccounts).await?;
        Ok(ListAccountsResult::default())
    }

    async fn list_initiators(&self) -> Result<ListInitiatorsResult> {
        self.enter(Method::ListInitiators).await?;
        Ok(ListInitiatorsResult::default())
    }

    async fn list_volume_access_groups(&self) -> Result<ListVolumeAccessGroupsResult> {
        self.enter(Method::ListVolumeAccessGroups).await?;
        Ok(ListVolumeAccessGroupsResult::default())
    }

    async fn list_virtual_volume_tasks(&self) -> Result<ListVirtualVolumeTasksResult> {
        self.enter(Method::ListVirtualVolumeTasks).await?;
        Ok(ListVirtualVolumeTasksResult::default())
    }

    async fn list_bulk_volume_jobs(&self) -> Result<ListBulkVolumeJobsResult> {
        self.enter(Method::ListBulkVolumeJobs).await?;
        Ok(ListBulkVolumeJobsResult::default())
    }

    async fn list_async_results(&self) -> Result<ListAsyncResultsResult> {
        self.enter(Method::ListAsyncResults).await?;
        Ok(ListAsyncResultsResult {
            async_handles: self.state.lock().async_handles.clone(),
        })
    }
}

// =============================================================================
// Helpers
// =============================================================================

fn volume(id: i64, name: &str, status: &str, owner: Option<&str>) -> Volume {
    let mut attributes = HashMap::new();
    if let Some(owner) = owner {
        attributes.insert("owner_id".to_string(), serde_json::json!(owner));
    }
    Volume {
        volume_id: id,
        name: name.to_string(),
        status: status.to_string(),
        attributes,
        ..Default::default()
    }
}

fn node(id: i64, name: &str) -> Node {
    Node {
        node_id: id,
        name: name.to_string(),
        ..Default::default()
    }
}

fn stats(id: i64) -> VolumeStats {
    VolumeStats {
        volume_id: id,
        actual_iops: 10.0,
        read_latency_usec_total: 2_000_000.0,
        ..Default::default()
    }
}

fn seeded_cluster() -> Arc<MockCluster> {
    let cluster = Arc::new(MockCluster::default());
    {
        let mut state = cluster.state.lock();
        state.volumes = vec![
            volume(1, "db-01", "active", Some("100")),
            volume(7, "replica-vol-7", "active", None),
        ];
        state.nodes = vec![node(1, "sf-node-01")];
        state.volume_stats = vec![stats(1), stats(7)];
        state.qos = vec![
            VolumeQosHistograms {
                volume_id: 1,
                ..Default::default()
            },
            VolumeQosHistograms {
                volume_id: 7,
                ..Default::default()
            },
        ];
        state.capacity = ClusterCapacity {
            non_zero_blocks: 100.0,
            zero_blocks: 300.0,
            ..Default::default()
        };
        state.faults = vec![ClusterFault {
            node_id: 1,
            code: "driveWearFault".to_string(),
            severity: "warning".to_string(),
            fault_type: "drive".to_string(),
            service_id: 1.0,
            drive_id: 7.0,
            ..Default::default()
        }];
        state.drives = vec![Drive {
            drive_id: 7,
            node_id: 1,
            status: "failed".to_string(),
            drive_type: "block".to_string(),
            ..Default::default()
        }];
        state.sessions = vec![
            IscsiSession {
                node_id: 1,
                ..Default::default()
            },
            IscsiSession {
                node_id: 1,
                ..Default::default()
            },
        ];
    }
    cluster
}

fn orchestrator(cluster: &Arc<MockCluster>) -> ScrapeOrchestrator {
    ScrapeOrchestrator::new(
        Arc::clone(cluster) as Arc<dyn ClusterApi>,
        CollectorConfig::default(),
    )
    .unwrap()
}

fn last_up(sink: &BufferSink) -> f64 {
    let samples = sink.samples();
    let last = samples.last().expect("scrape emitted nothing");
    assert_eq!(last.desc.fq_name, "solidfire_up");
    last.scalar().unwrap()
}

fn families(sink: &BufferSink) -> HashSet<String> {
    sink.samples()
        .iter()
        .map(|s| s.desc.fq_name.clone())
        .collect()
}

fn labelled<'a>(samples: &'a [Sample], name: &str, value: &str) -> Option<&'a Sample> {
    samples.iter().find(|s| s.label(name) == Some(value))
}

// =============================================================================
// Scrape Outcomes
// =============================================================================

mod scrape_tests {
    use super::*;

    #[tokio::test]
    async fn test_successful_scrape_reports_up_last() {
        let cluster = seeded_cluster();
        let orch = orchestrator(&cluster);
        let sink = BufferSink::new();

        let outcome = orch.collect(&sink).await;

        assert!(outcome.up);
        assert!(outcome.error.is_none());
        assert_eq!(outcome.samples_emitted, sink.len());
        assert_eq!(last_up(&sink), 1.0);
        assert_eq!(sink.family("solidfire_up").len(), 1);

        for method in Method::ALL {
            assert!(cluster.called(method), "{} was not queried", method);
        }
    }

    #[tokio::test]
    async fn test_metrics_phase_failure_keeps_metadata() {
        let cluster = seeded_cluster();
        cluster.fail(Method::GetClusterCapacity);
        let orch = orchestrator(&cluster);
        let sink = BufferSink::new();

        let outcome = orch.collect(&sink).await;

        assert!(!outcome.up);
        assert!(outcome.error.unwrap().contains("GetClusterCapacity"));
        assert_eq!(last_up(&sink), 0.0);

        let names = families(&sink);
        assert!(names.contains("solidfire_volume_count"));
        assert!(names.contains("solidfire_node_info"));
        assert!(!names.contains("solidfire_cluster_thin_provisioning_factor"));
        assert!(!names.contains("solidfire_volume_actual_iops"));
    }

    #[tokio::test]
    async fn test_metadata_phase_failure_skips_metrics_phase() {
        let cluster = seeded_cluster();
        cluster.fail(Method::ListAllNodes);
        let orch = orchestrator(&cluster);
        let sink = BufferSink::new();

        let outcome = orch.collect(&sink).await;

        assert!(!outcome.up);
        assert_eq!(sink.len(), 1);
        assert_eq!(last_up(&sink), 0.0);
        assert!(!cluster.called(Method::ListVolumeStats));
        assert!(!cluster.called(Method::GetClusterCapacity));
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_query_times_out() {
        let cluster = seeded_cluster();
        cluster.slow(Method::ListDrives, Duration::from_secs(120));
        let orch = ScrapeOrchestrator::new(
            Arc::clone(&cluster) as Arc<dyn ClusterApi>,
            CollectorConfig {
                scrape_timeout: Duration::from_secs(5),
                ..Default::default()
            },
        )
        .unwrap();
        let sink = BufferSink::new();

        let outcome = orch.collect(&sink).await;

        assert!(!outcome.up);
        assert!(outcome.error.unwrap().contains("deadline"));
        assert_eq!(last_up(&sink), 0.0);
        assert!(!families(&sink).contains("solidfire_drive_status"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_metadata_failure_cancels_sibling() {
        let cluster = seeded_cluster();
        cluster.fail(Method::ListVolumes);
        cluster.slow(Method::ListAllNodes, Duration::from_secs(20));
        let orch = orchestrator(&cluster);
        let sink = BufferSink::new();

        let outcome = orch.collect(&sink).await;
        tokio::time::sleep(Duration::from_secs(60)).await;

        assert!(!outcome.up);
        assert!(outcome.error.unwrap().contains("ListVolumes"));
        assert!(cluster.called(Method::ListAllNodes));
        assert!(!cluster.completed(Method::ListAllNodes));
        assert_eq!(sink.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_scrapes_do_not_interleave() {
        let cluster = seeded_cluster();
        cluster.slow(Method::ListVolumes, Duration::from_secs(2));
        cluster.slow(Method::ListDrives, Duration::from_secs(1));
        let orch = orchestrator(&cluster);
        let first = BufferSink::new();
        let second = BufferSink::new();

        let (a, b) = tokio::join!(orch.collect(&first), orch.collect(&second));

        assert!(a.up);
        assert!(b.up);
        assert_eq!(last_up(&first), 1.0);
        assert_eq!(last_up(&second), 1.0);

        let calls = cluster.calls.lock().clone();
        let per_scrape = Method::ALL.len();
        assert_eq!(calls.len(), 2 * per_scrape);
        for half in calls.chunks(per_scrape) {
            let distinct: HashSet<Method> = half.iter().copied().collect();
            assert_eq!(distinct.len(), per_scrape);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_lock_wait_counts_against_deadline() {
        let cluster = seeded_cluster();
        cluster.slow(Method::ListDrives, Duration::from_secs(3));
        let orch = ScrapeOrchestrator::new(
            Arc::clone(&cluster) as Arc<dyn ClusterApi>,
            CollectorConfig {
                scrape_timeout: Duration::from_secs(5),
                ..Default::default()
            },
        )
        .unwrap();
        let first = BufferSink::new();
        let second = BufferSink::new();

        let (a, b) = tokio::join!(orch.collect(&first), orch.collect(&second));

        assert!(a.up);
        assert!(!b.up);
        assert!(b.error.unwrap().contains("deadline"));
        assert_eq!(last_up(&second), 0.0);
        assert!(!families(&second).contains("solidfire_drive_status"));
    }

    #[tokio::test]
    async fn test_recovers_after_failure() {
        let cluster = seeded_cluster();
        cluster.fail(Method::ListAsyncResults);
        let orch = orchestrator(&cluster);

        let first = BufferSink::new();
        assert!(!orch.collect(&first).await.up);

        cluster.state.lock().failing.clear();
        let second = BufferSink::new();
        assert!(orch.collect(&second).await.up);
        assert_eq!(last_up(&second), 1.0);
    }
}

// =============================================================================
// Derived Samples
// =============================================================================

mod derivation_tests {
    use super::*;

    #[tokio::test]
    async fn test_replica_volume_excluded_from_stats_but_counted() {
        let cluster = seeded_cluster();
        let orch = orchestrator(&cluster);
        let sink = BufferSink::new();
        orch.collect(&sink).await;

        let iops = sink.family("solidfire_volume_actual_iops");
        assert_eq!(iops.len(), 1);
        assert_eq!(iops[0].label("volume_id"), Some("1"));
        assert_eq!(iops[0].label("volume_name"), Some("db-01"));
        assert_eq!(iops[0].label("account_id"), Some("100"));

        let latency = sink.family("solidfire_volume_read_latency_seconds_total");
        assert!((latency[0].scalar().unwrap() - 2.0).abs() < 1e-9);

        let throttle = sink.family("solidfire_volume_qos_throttle_percentage");
        assert_eq!(throttle.len(), 1);
        assert_eq!(throttle[0].label("volume_id"), Some("1"));

        let counts = sink.family("solidfire_volume_count");
        assert_eq!(counts.len(), 1);
        assert_eq!(counts[0].label("status"), Some("active"));
        assert_eq!(counts[0].scalar(), Some(2.0));
    }

    #[tokio::test]
    async fn test_cache_accumulates_across_scrapes() {
        let cluster = seeded_cluster();
        let orch = orchestrator(&cluster);
        orch.collect(&BufferSink::new()).await;

        {
            let mut state = cluster.state.lock();
            state.volumes = vec![volume(2, "web-01", "active", None)];
            state.volume_stats = vec![stats(1), stats(2)];
        }

        let sink = BufferSink::new();
        assert!(orch.collect(&sink).await.up);

        let iops = sink.family("solidfire_volume_actual_iops");
        assert_eq!(labelled(&iops, "volume_id", "1").unwrap().label("volume_name"), Some("db-01"));
        assert_eq!(labelled(&iops, "volume_id", "2").unwrap().label("volume_name"), Some("web-01"));
        assert_eq!(orch.lookup_volume(1).name, "db-01");
    }

    #[tokio::test]
    async fn test_unknown_volume_has_empty_labels() {
        let cluster = seeded_cluster();
        cluster.state.lock().volume_stats.push(stats(99));
        let orch = orchestrator(&cluster);
        let sink = BufferSink::new();
        orch.collect(&sink).await;

        let iops = sink.family("solidfire_volume_actual_iops");
        let unknown = labelled(&iops, "volume_id", "99").unwrap();
        assert_eq!(unknown.label("volume_name"), Some(""));
        assert_eq!(unknown.label("account_id"), Some(""));
    }

    #[tokio::test]
    async fn test_fault_labels() {
        let cluster = seeded_cluster();
        let orch = orchestrator(&cluster);
        let sink = BufferSink::new();
        orch.collect(&sink).await;

        let faults = sink.family("solidfire_cluster_active_faults");
        assert_eq!(faults.len(), 1);
        let fault = &faults[0];
        assert_eq!(fault.scalar(), Some(1.0));
        assert_eq!(fault.label("node_name"), Some("sf-node-01"));
        assert_eq!(fault.label("service_id"), Some("1.000000"));
        assert_eq!(fault.label("drive_id"), Some("7.000000"));
        assert_eq!(fault.label("node_hardware_fault_id"), Some("0.000000"));
        assert_eq!(fault.label("resolved"), Some("false"));
    }

    #[tokio::test]
    async fn test_one_hot_families() {
        let cluster = seeded_cluster();
        let orch = orchestrator(&cluster);
        let sink = BufferSink::new();
        orch.collect(&sink).await;

        let block = sink.family("solidfire_cluster_block_fullness");
        assert_eq!(block.len(), 5);
        assert_eq!(labelled(&block, "level", "stage3Low").unwrap().scalar(), Some(1.0));
        let lit: f64 = block.iter().filter_map(Sample::scalar).sum();
        assert_eq!(lit, 1.0);

        let drives = sink.family("solidfire_drive_status");
        assert_eq!(drives.len(), 5);
        assert_eq!(labelled(&drives, "status", "failed").unwrap().scalar(), Some(1.0));
        assert_eq!(labelled(&drives, "status", "active").unwrap().scalar(), Some(0.0));
    }

    #[tokio::test]
    async fn test_capacity_factors_and_sessions() {
        let cluster = seeded_cluster();
        let orch = orchestrator(&cluster);
        let sink = BufferSink::new();
        orch.collect(&sink).await;

        let thin = sink.family("solidfire_cluster_thin_provisioning_factor");
        assert_eq!(thin[0].scalar(), Some(4.0));
        let dedup = sink.family("solidfire_cluster_deduplication_factor");
        assert_eq!(dedup[0].scalar(), Some(1.0));

        let sessions = sink.family("solidfire_node_iscsi_sessions");
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].label("node_name"), Some("sf-node-01"));
        assert_eq!(sessions[0].scalar(), Some(2.0));
    }

    #[tokio::test]
    async fn test_async_results_without_jobs() {
        let cluster = seeded_cluster();
        let orch = orchestrator(&cluster);
        let sink = BufferSink::new();
        orch.collect(&sink).await;

        let active = sink.family("solidfire_async_results_active");
        assert_eq!(active.len(), 5);
        assert!(active.iter().all(|s| s.scalar() == Some(0.0)));
        assert_eq!(sink.family("solidfire_async_results").len(), 5);
        assert_eq!(sink.family("solidfire_max_async_result_id")[0].scalar(), Some(0.0));
    }

    #[tokio::test]
    async fn test_describe_lists_every_family() {
        let cluster = seeded_cluster();
        let orch = orchestrator(&cluster);
        let sink = BufferSink::new();
        orch.collect(&sink).await;

        let described: HashSet<String> = orch
            .describe()
            .iter()
            .map(|d| d.fq_name.clone())
            .collect();
        for name in families(&sink) {
            assert!(described.contains(&name), "{} was not described", name);
        }
    }
}

// =============================================================================
// Fixture-Driven Scrape
// =============================================================================

mod fixture_tests {
    use super::*;

    fn fixture_orchestrator() -> ScrapeOrchestrator {
        let client = FixtureClient::new(Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures"));
        ScrapeOrchestrator::new(Arc::new(client), CollectorConfig::default()).unwrap()
    }

    #[tokio::test]
    async fn test_fixture_scrape() {
        let orch = fixture_orchestrator();
        let sink = BufferSink::new();

        let outcome = orch.collect(&sink).await;
        assert!(outcome.up, "{:?}", outcome.error);
        assert_eq!(last_up(&sink), 1.0);

        // replica-vol-3 is filtered out
        let iops = sink.family("solidfire_volume_actual_iops");
        assert_eq!(iops.len(), 2);
        assert!(labelled(&iops, "volume_id", "3").is_none());

        let memory = sink.family("solidfire_node_total_memory_bytes");
        assert_eq!(memory.len(), 2);
        assert_eq!(memory[0].scalar(), Some(64e9));

        let active = sink.family("solidfire_async_results_active");
        assert_eq!(labelled(&active, "type", "DriveAdd").unwrap().scalar(), Some(1.0));
        assert_eq!(labelled(&active, "type", "Clone").unwrap().scalar(), Some(0.0));
        assert_eq!(sink.family("solidfire_max_async_result_id")[0].scalar(), Some(12.0));
    }

    #[tokio::test]
    async fn test_fixture_node_load_histogram() {
        let orch = fixture_orchestrator();
        let sink = BufferSink::new();
        orch.collect(&sink).await;

        let load = sink.family("solidfire_node_load_histogram");
        assert_eq!(load.len(), 1);
        match &load[0].value {
            SampleValue::Histogram(h) => {
                assert_eq!(h.sample_count, 20);
                assert_eq!(h.buckets.get(0.0), Some(10));
                assert_eq!(h.buckets.get(19.0), Some(6));
                assert_eq!(h.buckets.total(), 20);
            }
            other => panic!("expected histogram, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_fixture_volume_count_by_status() {
        let orch = fixture_orchestrator();
        let sink = BufferSink::new();
        orch.collect(&sink).await;

        let counts = sink.family("solidfire_volume_count");
        assert_eq!(labelled(&counts, "status", "active").unwrap().scalar(), Some(3.0));
        assert_eq!(labelled(&counts, "status", "deleted").unwrap().scalar(), Some(1.0));
    }

    #[tokio::test]
    async fn test_sink_trait_object() {
        let orch = fixture_orchestrator();
        let sink: Arc<BufferSink> = Arc::new(BufferSink::new());
        let as_dyn: &dyn MetricSink = &sink;

        assert!(orch.collect(as_dyn).await.up);
        assert!(!sink.is_empty());
    }
}
