//! Scrape Orchestrator
//!
//! Runs one scrape of a SolidFire cluster in two phases:
//!
//! ```text
//! collect() ─▶ metadata phase ─────▶ metrics phase ──────▶ up = 1
//!              (volumes, nodes)      (15 independent        │
//!               └─ cache upsert       queries, cache reads) │
//!                     │                    │                │
//!                     └──── any error ─────┴───────────▶ up = 0
//! ```
//!
//! Each phase buffers its samples and hands them to the sink only when
//! every task of that phase succeeded. The liveness sample is always the
//! last one emitted.

use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;
use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, instrument};

use super::cache::{MetadataCache, VolumeMetadata};
use super::derive::{
    self, AsyncResultSummary, DriveStatus, EfficiencyFactors, Fullness, FullnessStage,
};
use super::descriptors::{MetricDesc, MetricDescriptions};
use super::fanout::{run_all, Deadline, Task};
use super::sample::{BufferSink, HistogramValue, Sample};
use crate::domain::{ClusterApi, MetricSink};
use crate::error::{Error, Result};

// =============================================================================
// Configuration
// =============================================================================

/// Configuration for the scrape orchestrator
#[derive(Debug, Clone)]
pub struct CollectorConfig {
    /// Prefix of every metric name
    pub namespace: String,

    /// Budget for one whole scrape, shared by both phases
    pub scrape_timeout: Duration,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            namespace: "solidfire".to_string(),
            scrape_timeout: Duration::from_secs(30),
        }
    }
}

/// What one call to [`ScrapeOrchestrator::collect`] did
#[derive(Debug, Clone)]
pub struct ScrapeOutcome {
    pub up: bool,
    /// Samples handed to the sink, liveness included
    pub samples_emitted: usize,
    pub duration: Duration,
    pub error: Option<String>,
}

// =============================================================================
// Orchestrator
// =============================================================================

/// Owns the cache, descriptor table and scrape lock for one cluster.
pub struct ScrapeOrchestrator {
    api: Arc<dyn ClusterApi>,
    config: CollectorConfig,
    descriptions: MetricDescriptions,
    cache: Mutex<MetadataCache>,
    scrape_lock: tokio::sync::Mutex<()>,
}

impl std::fmt::Debug for ScrapeOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let cache = self.cache.lock();
        f.debug_struct("ScrapeOrchestrator")
            .field("config", &self.config)
            .field("cached_volumes", &cache.volume_count())
            .field("cached_nodes", &cache.node_count())
            .finish()
    }
}

impl ScrapeOrchestrator {
    pub fn new(api: Arc<dyn ClusterApi>, config: CollectorConfig) -> Result<Self> {
        let descriptions = MetricDescriptions::new(&config.namespace)?;
        Ok(Self {
            api,
            config,
            descriptions,
            cache: Mutex::new(MetadataCache::new()),
            scrape_lock: tokio::sync::Mutex::new(()),
        })
    }

    /// Every descriptor this orchestrator may emit.
    pub fn describe(&self) -> &[Arc<MetricDesc>] {
        self.descriptions.all()
    }

    pub fn descriptions(&self) -> &MetricDescriptions {
        &self.descriptions
    }

    pub fn config(&self) -> &CollectorConfig {
        &self.config
    }

    /// Cached metadata for a volume id, empty when never seen.
    pub fn lookup_volume(&self, volume_id: i64) -> VolumeMetadata {
        self.cache.lock().lookup_volume(volume_id)
    }

    /// Run one scrape into `sink`.
    ///
    /// Scrapes on the same orchestrator are serialized. The deadline starts
    /// when `collect` is called, so time spent waiting behind another scrape
    /// counts against it.
    #[instrument(skip_all, fields(namespace = %self.config.namespace))]
    pub async fn collect(&self, sink: &dyn MetricSink) -> ScrapeOutcome {
        let started = std::time::Instant::now();
        let deadline = Deadline::after(self.config.scrape_timeout);
        let _guard = self.scrape_lock.lock().await;

        let result = self.run_phases(sink, deadline).await;

        let (up, emitted, err) = match result {
            Ok(emitted) => (true, emitted, None),
            Err((emitted, e)) => {
                error!(error = %e, "Scrape of Element API failed");
                (false, emitted, Some(e.to_string()))
            }
        };

        sink.emit(Sample::gauge(
            &self.descriptions.up,
            if up { 1.0 } else { 0.0 },
            Vec::new(),
        ));

        let duration = started.elapsed();
        debug!(
            up,
            samples = emitted + 1,
            duration_ms = duration.as_millis() as u64,
            "Scrape finished"
        );

        ScrapeOutcome {
            up,
            samples_emitted: emitted + 1,
            duration,
            error: err,
        }
    }

    /// Both phases. On failure returns the samples already flushed along
    /// with the error.
    async fn run_phases(
        &self,
        sink: &dyn MetricSink,
        deadline: Deadline,
    ) -> std::result::Result<usize, (usize, Error)> {
        let cancel = CancellationToken::new();

        let metadata = BufferSink::new();
        self.metadata_phase(&metadata, deadline, &cancel)
            .await
            .map_err(|e| (0, e))?;
        let mut emitted = metadata.len();
        sink.emit_all(metadata.drain());

        let metrics = BufferSink::new();
        self.metrics_phase(&metrics, deadline, &cancel)
            .await
            .map_err(|e| (emitted, e))?;
        emitted += metrics.len();
        sink.emit_all(metrics.drain());

        Ok(emitted)
    }

    #[instrument(skip_all)]
    async fn metadata_phase(
        &self,
        buf: &BufferSink,
        deadline: Deadline,
        cancel: &CancellationToken,
    ) -> Result<()> {
        let tasks = vec![
            Task::new("volume_meta", self.collect_volume_meta(buf).boxed()),
            Task::new("node_meta", self.collect_node_meta(buf).boxed()),
        ];
        run_all(tasks, deadline, cancel).await
    }

    #[instrument(skip_all)]
    async fn metrics_phase(
        &self,
        buf: &BufferSink,
        deadline: Deadline,
        cancel: &CancellationToken,
    ) -> Result<()> {
        let tasks = vec![
            Task::new("volume_stats", self.collect_volume_stats(buf).boxed()),
            Task::new("cluster_capacity", self.collect_cluster_capacity(buf).boxed()),
            Task::new("cluster_faults", self.collect_cluster_faults(buf).boxed()),
            Task::new("node_stats", self.collect_node_stats(buf).boxed()),
            Task::new("volume_qos_histograms", self.collect_volume_qos_histograms(buf).boxed()),
            Task::new("cluster_stats", self.collect_cluster_stats(buf).boxed()),
            Task::new("cluster_full_threshold", self.collect_cluster_full_threshold(buf).boxed()),
            Task::new("drives", self.collect_drives(buf).boxed()),
            Task::new("iscsi_sessions", self.collect_iscsi_sessions(buf).boxed()),
            Task::new("accounts", self.collect_accounts(buf).boxed()),
            Task::new("initiators", self.collect_initiators(buf).boxed()),
            Task::new("volume_access_groups", self.collect_volume_access_groups(buf).boxed()),
            Task::new("virtual_volume_tasks", self.collect_virtual_volume_tasks(buf).boxed()),
            Task::new("bulk_volume_jobs", self.collect_bulk_volume_jobs(buf).boxed()),
            Task::new("async_results", self.collect_async_results(buf).boxed()),
        ];
        run_all(tasks, deadline, cancel).await
    }

    // =========================================================================
    // Metadata Phase Tasks
    // =========================================================================

    async fn collect_volume_meta(&self, buf: &BufferSink) -> Result<()> {
        let result = self.api.list_volumes().await?;

        self.cache.lock().upsert_volumes(&result.volumes);

        let d = &self.descriptions;
        for (status, count) in derive::count_volumes_by_status(&result.volumes) {
            buf.emit(Sample::counter(&d.volume_count, count as f64, vec![status]));
        }

        debug!(volumes = result.volumes.len(), "Volume metadata refreshed");
        Ok(())
    }

    async fn collect_node_meta(&self, buf: &BufferSink) -> Result<()> {
        let result = self.api.list_all_nodes().await?;

        self.cache.lock().upsert_nodes(&result.nodes);

        let d = &self.descriptions;
        for node in &result.nodes {
            let id = node.node_id.to_string();
            let info = &node.platform_info;
            buf.emit(Sample::gauge(
                &d.node_info,
                1.0,
                vec![
                    id.clone(),
                    node.name.clone(),
                    node.chassis_name.clone(),
                    node.associated_fservice_id.to_string(),
                    node.associated_master_service_id.to_string(),
                    info.chassis_type.clone(),
                    info.cpu_model.clone(),
                    info.node_type.clone(),
                    info.platform_config_version.clone(),
                    node.sip.clone(),
                    node.sipi.clone(),
                    node.software_version.clone(),
                    node.uuid.clone(),
                ],
            ));
            buf.emit(Sample::gauge(
                &d.node_total_memory_bytes,
                derive::gigabytes_to_bytes(info.node_memory_gb),
                vec![id, node.name.clone()],
            ));
        }

        debug!(nodes = result.nodes.len(), "Node metadata refreshed");
        Ok(())
    }

    // =========================================================================
    // Metrics Phase Tasks
    // =========================================================================

    async fn collect_volume_stats(&self, buf: &BufferSink) -> Result<()> {
        let result = self.api.list_volume_stats().await?;
        let d = &self.descriptions;

        let mut samples = Vec::new();
        {
            let cache = self.cache.lock();
            for vol in &result.volume_stats {
                let meta = cache.lookup_volume(vol.volume_id);
                if derive::is_excluded_volume(&meta.name) {
                    continue;
                }
                let labels = volume_labels(&meta);
                samples.extend([
                    Sample::gauge(&d.volume_actual_iops, vol.actual_iops, labels.clone()),
                    Sample::gauge(
                        &d.volume_average_io_size_bytes,
                        vol.average_iop_size,
                        labels.clone(),
                    ),
                    Sample::gauge(&d.volume_burst_iops_credit, vol.burst_iops_credit, labels.clone()),
                    Sample::gauge(
                        &d.volume_client_queue_depth,
                        vol.client_queue_depth,
                        labels.clone(),
                    ),
                    Sample::gauge(
                        &d.volume_latency_seconds,
                        derive::micros_to_seconds(vol.latency_usec),
                        labels.clone(),
                    ),
                    Sample::gauge(&d.volume_non_zero_blocks, vol.non_zero_blocks, labels.clone()),
                    Sample::counter(&d.volume_read_bytes_total, vol.read_bytes, labels.clone()),
                    Sample::counter(
                        &d.volume_read_latency_seconds_total,
                        derive::micros_to_seconds(vol.read_latency_usec_total),
                        labels.clone(),
                    ),
                    Sample::counter(&d.volume_read_ops_total, vol.read_ops, labels.clone()),
                    Sample::gauge(&d.volume_throttle, vol.throttle, labels.clone()),
                    Sample::counter(
                        &d.volume_unaligned_reads_total,
                        vol.unaligned_reads,
                        labels.clone(),
                    ),
                    Sample::counter(
                        &d.volume_unaligned_writes_total,
                        vol.unaligned_writes,
                        labels.clone(),
                    ),
                    Sample::gauge(&d.volume_size_bytes, vol.volume_size, labels.clone()),
                    Sample::gauge(&d.volume_utilization, vol.volume_utilization, labels.clone()),
                    Sample::counter(&d.volume_write_bytes_total, vol.write_bytes, labels.clone()),
                    Sample::counter(
                        &d.volume_write_latency_seconds_total,
                        derive::micros_to_seconds(vol.write_latency_usec_total),
                        labels.clone(),
                    ),
                    Sample::counter(&d.volume_write_ops_total, vol.write_ops, labels.clone()),
                    Sample::gauge(&d.volume_zero_blocks, vol.zero_blocks, labels),
                ]);
            }
        }

        debug!(samples = samples.len(), "Volume stats collected");
        buf.emit_all(samples);
        Ok(())
    }

    async fn collect_cluster_capacity(&self, buf: &BufferSink) -> Result<()> {
        let c = self.api.get_cluster_capacity().await?.cluster_capacity;
        let d = &self.descriptions;
        let factors = EfficiencyFactors::from_capacity(&c);

        buf.emit_all(vec![
            Sample::gauge(&d.cluster_active_block_space_bytes, c.active_block_space, vec![]),
            Sample::gauge(&d.cluster_active_sessions, c.active_sessions, vec![]),
            Sample::gauge(&d.cluster_average_iops, c.average_iops, vec![]),
            Sample::gauge(&d.cluster_recent_io_size_bytes, c.cluster_recent_io_size, vec![]),
            Sample::gauge(&d.cluster_current_iops, c.current_iops, vec![]),
            Sample::gauge(&d.cluster_max_iops, c.max_iops, vec![]),
            Sample::gauge(
                &d.cluster_max_over_provisionable_space_bytes,
                c.max_over_provisionable_space,
                vec![],
            ),
            Sample::gauge(
                &d.cluster_max_provisioned_space_bytes,
                c.max_provisioned_space,
                vec![],
            ),
            Sample::gauge(
                &d.cluster_max_used_metadata_space_bytes,
                c.max_used_metadata_space,
                vec![],
            ),
            Sample::gauge(&d.cluster_max_used_space_bytes, c.max_used_space, vec![]),
            Sample::gauge(&d.cluster_non_zero_blocks, c.non_zero_blocks, vec![]),
            Sample::gauge(&d.cluster_peak_active_sessions, c.peak_active_sessions, vec![]),
            Sample::gauge(&d.cluster_peak_iops, c.peak_iops, vec![]),
            Sample::gauge(&d.cluster_provisioned_space_bytes, c.provisioned_space, vec![]),
            Sample::gauge(
                &d.cluster_snapshot_non_zero_blocks,
                c.snapshot_non_zero_blocks,
                vec![],
            ),
            Sample::counter(&d.cluster_io_ops_total, c.total_ops, vec![]),
            Sample::gauge(&d.cluster_unique_blocks, c.unique_blocks, vec![]),
            Sample::gauge(
                &d.cluster_unique_blocks_used_space_bytes,
                c.unique_blocks_used_space,
                vec![],
            ),
            Sample::gauge(&d.cluster_used_metadata_space_bytes, c.used_metadata_space, vec![]),
            Sample::gauge(
                &d.cluster_used_metadata_space_in_snapshots_bytes,
                c.used_metadata_space_in_snapshots,
                vec![],
            ),
            Sample::gauge(&d.cluster_used_space_bytes, c.used_space, vec![]),
            Sample::gauge(&d.cluster_zero_blocks, c.zero_blocks, vec![]),
            Sample::gauge(&d.cluster_thin_provisioning_factor, factors.thin_provisioning, vec![]),
            Sample::gauge(&d.cluster_deduplication_factor, factors.deduplication, vec![]),
            Sample::gauge(&d.cluster_compression_factor, factors.compression, vec![]),
            Sample::gauge(&d.cluster_efficiency_factor, factors.efficiency, vec![]),
        ]);

        debug!(efficiency = factors.efficiency, "Cluster capacity collected");
        Ok(())
    }

    async fn collect_cluster_faults(&self, buf: &BufferSink) -> Result<()> {
        let result = self.api.list_cluster_faults().await?;
        let d = &self.descriptions;

        let samples: Vec<Sample> = {
            let cache = self.cache.lock();
            result
                .faults
                .iter()
                .map(|f| {
                    Sample::gauge(
                        &d.cluster_active_faults,
                        1.0,
                        vec![
                            f.node_id.to_string(),
                            cache.node_name(f.node_id),
                            f.code.clone(),
                            f.severity.clone(),
                            f.fault_type.clone(),
                            derive::format_fault_id(f.service_id),
                            f.resolved.to_string(),
                            derive::format_fault_id(f.node_hardware_fault_id),
                            derive::format_fault_id(f.drive_id),
                            f.details.clone(),
                        ],
                    )
                })
                .collect()
        };

        debug!(faults = samples.len(), "Cluster faults collected");
        buf.emit_all(samples);
        Ok(())
    }

    async fn collect_node_stats(&self, buf: &BufferSink) -> Result<()> {
        let result = self.api.list_node_stats().await?;
        let d = &self.descriptions;

        let mut samples = Vec::new();
        {
            let cache = self.cache.lock();
            for stats in &result.node_stats.nodes {
                let id = stats.node_id.to_string();
                let name = cache.node_name(stats.node_id);
                let labels = vec![id.clone(), name.clone()];
                let iface = |interface: &str| vec![id.clone(), name.clone(), interface.to_string()];

                let load = HistogramValue::from_buckets(
                    derive::node_load_buckets(&stats.ss_load_histogram),
                    Some(stats.count),
                );

                samples.extend([
                    Sample::histogram(&d.node_load_histogram, load, labels.clone()),
                    Sample::counter(&d.node_interface_in_bytes_total, stats.c_bytes_in, iface("cluster")),
                    Sample::counter(&d.node_interface_out_bytes_total, stats.c_bytes_out, iface("cluster")),
                    Sample::counter(
                        &d.node_interface_in_bytes_total,
                        stats.m_bytes_in,
                        iface("management"),
                    ),
                    Sample::counter(
                        &d.node_interface_out_bytes_total,
                        stats.m_bytes_out,
                        iface("management"),
                    ),
                    Sample::counter(&d.node_interface_in_bytes_total, stats.s_bytes_in, iface("storage")),
                    Sample::counter(&d.node_interface_out_bytes_total, stats.s_bytes_out, iface("storage")),
                    Sample::gauge(
                        &d.node_interface_utilization_percentage,
                        stats.network_utilization_cluster,
                        iface("cluster"),
                    ),
                    Sample::gauge(
                        &d.node_interface_utilization_percentage,
                        stats.network_utilization_storage,
                        iface("storage"),
                    ),
                    Sample::gauge(&d.node_samples, stats.count as f64, labels.clone()),
                    Sample::gauge(&d.node_cpu_percentage, stats.cpu, labels.clone()),
                    Sample::counter(&d.node_cpu_seconds_total, stats.cpu_total, labels.clone()),
                    Sample::counter(
                        &d.node_read_latency_seconds_total,
                        derive::micros_to_seconds(stats.read_latency_usec_total),
                        labels.clone(),
                    ),
                    Sample::gauge(&d.node_used_memory_bytes, stats.used_memory, labels.clone()),
                    Sample::counter(
                        &d.node_write_latency_seconds_total,
                        derive::micros_to_seconds(stats.write_latency_usec_total),
                        labels,
                    ),
                ]);
            }
        }

        debug!(nodes = result.node_stats.nodes.len(), "Node stats collected");
        buf.emit_all(samples);
        Ok(())
    }

    async fn collect_volume_qos_histograms(&self, buf: &BufferSink) -> Result<()> {
        let result = self.api.list_volume_qos_histograms().await?;
        let d = &self.descriptions;

        let mut samples = Vec::new();
        {
            let cache = self.cache.lock();
            for entry in &result.qos_histograms {
                let meta = cache.lookup_volume(entry.volume_id);
                if derive::is_excluded_volume(&meta.name) {
                    continue;
                }
                let labels = volume_labels(&meta);
                let h = &entry.histograms;
                let hist = |buckets| HistogramValue::from_buckets(buckets, None);

                samples.extend([
                    Sample::histogram(
                        &d.volume_qos_below_min_iops_percentage,
                        hist(derive::below_min_iops_buckets(&h.below_min_iops_percentages)),
                        labels.clone(),
                    ),
                    Sample::histogram(
                        &d.volume_qos_min_to_max_iops_percentage,
                        hist(derive::min_to_max_iops_buckets(&h.min_to_max_iops_percentages)),
                        labels.clone(),
                    ),
                    Sample::histogram(
                        &d.volume_qos_read_block_size_bytes,
                        hist(derive::block_size_buckets(&h.read_block_sizes)),
                        labels.clone(),
                    ),
                    Sample::histogram(
                        &d.volume_qos_target_utilization_percentage,
                        hist(derive::target_utilization_buckets(
                            &h.target_utilization_percentages,
                        )),
                        labels.clone(),
                    ),
                    Sample::histogram(
                        &d.volume_qos_throttle_percentage,
                        hist(derive::throttle_buckets(&h.throttle_percentages)),
                        labels.clone(),
                    ),
                    Sample::histogram(
                        &d.volume_qos_write_block_size_bytes,
                        hist(derive::block_size_buckets(&h.write_block_sizes)),
                        labels,
                    ),
                ]);
            }
        }

        debug!(samples = samples.len(), "Volume QoS histograms collected");
        buf.emit_all(samples);
        Ok(())
    }

    async fn collect_cluster_stats(&self, buf: &BufferSink) -> Result<()> {
        let s = self.api.get_cluster_stats().await?.cluster_stats;
        let d = &self.descriptions;
        let us = derive::micros_to_seconds;

        buf.emit_all(vec![
            Sample::gauge(&d.cluster_actual_iops, s.actual_iops, vec![]),
            Sample::gauge(&d.cluster_average_io_bytes, s.average_iop_size, vec![]),
            Sample::gauge(&d.cluster_client_queue_depth, s.client_queue_depth, vec![]),
            Sample::gauge(&d.cluster_throughput_utilization, s.cluster_utilization, vec![]),
            Sample::gauge(&d.cluster_latency_seconds, us(s.latency_usec), vec![]),
            Sample::gauge(&d.cluster_normalized_iops, s.normalized_iops, vec![]),
            Sample::counter(&d.cluster_read_bytes_total, s.read_bytes, vec![]),
            Sample::gauge(&d.cluster_last_sample_read_bytes, s.read_bytes_last_sample, vec![]),
            Sample::gauge(&d.cluster_read_latency_seconds, us(s.read_latency_usec), vec![]),
            Sample::counter(
                &d.cluster_read_latency_seconds_total,
                us(s.read_latency_usec_total),
                vec![],
            ),
            Sample::counter(&d.cluster_read_ops_total, s.read_ops, vec![]),
            Sample::gauge(&d.cluster_last_sample_read_ops, s.read_ops_last_sample, vec![]),
            Sample::gauge(
                &d.cluster_sample_period_seconds,
                derive::millis_to_seconds(s.sample_period_msec),
                vec![],
            ),
            Sample::gauge(&d.cluster_services, s.services_count, vec![]),
            Sample::gauge(&d.cluster_expected_services, s.services_total, vec![]),
            Sample::counter(&d.cluster_unaligned_reads_total, s.unaligned_reads, vec![]),
            Sample::counter(&d.cluster_unaligned_writes_total, s.unaligned_writes, vec![]),
            Sample::counter(&d.cluster_write_bytes_total, s.write_bytes, vec![]),
            Sample::gauge(&d.cluster_last_sample_write_bytes, s.write_bytes_last_sample, vec![]),
            Sample::gauge(&d.cluster_write_latency_seconds, us(s.write_latency_usec), vec![]),
            Sample::counter(
                &d.cluster_write_latency_seconds_total,
                us(s.write_latency_usec_total),
                vec![],
            ),
            Sample::counter(&d.cluster_write_ops_total, s.write_ops, vec![]),
            Sample::gauge(&d.cluster_last_sample_write_ops, s.write_ops_last_sample, vec![]),
        ]);

        debug!("Cluster stats collected");
        Ok(())
    }

    async fn collect_cluster_full_threshold(&self, buf: &BufferSink) -> Result<()> {
        let t = self.api.get_cluster_full_threshold().await?;
        let d = &self.descriptions;

        let level = |desc: &Arc<MetricDesc>, expanded: Vec<(&'static str, f64)>| {
            expanded
                .into_iter()
                .map(|(label, value)| Sample::gauge(desc, value, vec![label.to_string()]))
                .collect::<Vec<_>>()
        };

        let mut samples = level(
            &d.cluster_block_fullness,
            derive::one_hot::<FullnessStage>(&t.block_fullness),
        );
        samples.extend(level(
            &d.cluster_fullness,
            derive::one_hot::<Fullness>(&t.fullness),
        ));
        samples.extend(level(
            &d.cluster_metadata_fullness,
            derive::one_hot::<FullnessStage>(&t.metadata_fullness),
        ));
        samples.extend([
            Sample::gauge(
                &d.cluster_max_metadata_over_provision_factor,
                t.max_metadata_over_provision_factor,
                vec![],
            ),
            Sample::gauge(
                &d.cluster_slice_reserve_used_threshold_percentage,
                t.slice_reserve_used_threshold_pct,
                vec![],
            ),
            Sample::gauge(
                &d.cluster_stage2_aware_threshold_percentage,
                t.stage2_aware_threshold,
                vec![],
            ),
            Sample::gauge(
                &d.cluster_stage2_block_threshold_bytes,
                t.stage2_block_threshold_bytes,
                vec![],
            ),
            Sample::gauge(
                &d.cluster_stage3_block_threshold_bytes,
                t.stage3_block_threshold_bytes,
                vec![],
            ),
            Sample::gauge(
                &d.cluster_stage3_block_threshold_percentage,
                t.stage3_block_threshold_percent,
                vec![],
            ),
            Sample::gauge(
                &d.cluster_stage3_low_threshold_percentage,
                t.stage3_low_threshold,
                vec![],
            ),
            Sample::gauge(
                &d.cluster_stage4_block_threshold_bytes,
                t.stage4_block_threshold_bytes,
                vec![],
            ),
            Sample::gauge(
                &d.cluster_stage4_critical_threshold_percentage,
                t.stage4_critical_threshold,
                vec![],
            ),
            Sample::gauge(
                &d.cluster_stage5_block_threshold_bytes,
                t.stage5_block_threshold_bytes,
                vec![],
            ),
            Sample::gauge(&d.cluster_total_bytes, t.sum_total_cluster_bytes, vec![]),
            Sample::gauge(
                &d.cluster_total_metadata_bytes,
                t.sum_total_metadata_cluster_bytes,
                vec![],
            ),
            Sample::gauge(&d.cluster_used_bytes, t.sum_used_cluster_bytes, vec![]),
            Sample::gauge(
                &d.cluster_used_metadata_bytes,
                t.sum_used_metadata_cluster_bytes,
                vec![],
            ),
        ]);

        debug!(
            block_fullness = %t.block_fullness,
            metadata_fullness = %t.metadata_fullness,
            "Cluster full threshold collected"
        );
        buf.emit_all(samples);
        Ok(())
    }

    async fn collect_drives(&self, buf: &BufferSink) -> Result<()> {
        let result = self.api.list_drives().await?;
        let d = &self.descriptions;

        let mut samples = Vec::new();
        {
            let cache = self.cache.lock();
            for drive in &result.drives {
                let node_id = drive.node_id.to_string();
                let node_name = cache.node_name(drive.node_id);
                let drive_id = drive.drive_id.to_string();
                let slot = drive.slot.to_string();

                for (status, value) in derive::one_hot::<DriveStatus>(&drive.status) {
                    samples.push(Sample::gauge(
                        &d.drive_status,
                        value,
                        vec![
                            node_id.clone(),
                            node_name.clone(),
                            drive_id.clone(),
                            drive.serial.clone(),
                            slot.clone(),
                            status.to_string(),
                            drive.drive_type.clone(),
                        ],
                    ));
                }
                samples.push(Sample::gauge(
                    &d.drive_capacity_bytes,
                    drive.capacity,
                    vec![
                        node_id,
                        node_name,
                        drive_id,
                        drive.serial.clone(),
                        slot,
                        drive.drive_type.clone(),
                    ],
                ));
            }
        }

        debug!(drives = result.drives.len(), "Drives collected");
        buf.emit_all(samples);
        Ok(())
    }

    async fn collect_iscsi_sessions(&self, buf: &BufferSink) -> Result<()> {
        let result = self.api.list_iscsi_sessions().await?;
        let d = &self.descriptions;

        let samples: Vec<Sample> = {
            let cache = self.cache.lock();
            derive::count_sessions_by_node(&result.sessions)
                .into_iter()
                .map(|(node_id, count)| {
                    Sample::gauge(
                        &d.node_iscsi_sessions,
                        count as f64,
                        vec![node_id.to_string(), cache.node_name(node_id)],
                    )
                })
                .collect()
        };

        debug!(sessions = result.sessions.len(), "iSCSI sessions collected");
        buf.emit_all(samples);
        Ok(())
    }

    async fn collect_accounts(&self, buf: &BufferSink) -> Result<()> {
        let result = self.api.list_accounts().await?;
        buf.emit(Sample::counter(
            &self.descriptions.account_count,
            result.accounts.len() as f64,
            vec![],
        ));
        Ok(())
    }

    async fn collect_initiators(&self, buf: &BufferSink) -> Result<()> {
        let result = self.api.list_initiators().await?;
        buf.emit(Sample::counter(
            &self.descriptions.initiator_count,
            result.initiators.len() as f64,
            vec![],
        ));
        Ok(())
    }

    async fn collect_volume_access_groups(&self, buf: &BufferSink) -> Result<()> {
        let result = self.api.list_volume_access_groups().await?;
        buf.emit(Sample::counter(
            &self.descriptions.volume_access_group_count,
            result.volume_access_groups.len() as f64,
            vec![],
        ));
        Ok(())
    }

    async fn collect_virtual_volume_tasks(&self, buf: &BufferSink) -> Result<()> {
        let result = self.api.list_virtual_volume_tasks().await?;
        buf.emit(Sample::counter(
            &self.descriptions.virtual_volume_tasks,
            result.tasks.len() as f64,
            vec![],
        ));
        Ok(())
    }

    async fn collect_bulk_volume_jobs(&self, buf: &BufferSink) -> Result<()> {
        let result = self.api.list_bulk_volume_jobs().await?;
        buf.emit(Sample::counter(
            &self.descriptions.bulk_volume_jobs,
            result.bulk_volume_jobs.len() as f64,
            vec![],
        ));
        Ok(())
    }

    async fn collect_async_results(&self, buf: &BufferSink) -> Result<()> {
        let result = self.api.list_async_results().await?;
        let d = &self.descriptions;

        let AsyncResultSummary {
            active,
            total,
            max_async_result_id,
        } = derive::partition_async_results(&result.async_handles);

        let mut samples: Vec<Sample> = active
            .into_iter()
            .map(|(kind, count)| Sample::gauge(&d.async_results_active, count as f64, vec![kind]))
            .collect();
        samples.extend(
            total
                .into_iter()
                .map(|(kind, count)| Sample::gauge(&d.async_results, count as f64, vec![kind])),
        );
        samples.push(Sample::gauge(
            &d.max_async_result_id,
            max_async_result_id as f64,
            vec![],
        ));

        buf.emit_all(samples);
        Ok(())
    }
}

/// `volume_id`, `volume_name`, `account_id`
fn volume_labels(meta: &VolumeMetadata) -> Vec<String> {
    vec![
        meta.volume_id.to_string(),
        meta.name.clone(),
        meta.account_id.clone(),
    ]
}
