//! Prometheus Exposition Adapter
//!
//! Implements the `MetricSink` port by building `prometheus::proto`
//! metric families, and keeps the exporter's own scrape metrics in a
//! dedicated registry.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use prometheus::proto::{self, LabelPair, MetricFamily, MetricType};
use prometheus::{Encoder, Histogram, HistogramOpts, IntCounter, Registry, TextEncoder};

use crate::domain::MetricSink;
use crate::error::{Error, Result};
use crate::metrics::{HistogramValue, MetricDesc, MetricKind, Sample, SampleValue, ScrapeOutcome};

// =============================================================================
// Sink
// =============================================================================

/// Sink that turns samples into Prometheus metric families.
///
/// Samples of one descriptor land in one family. Histogram buckets are
/// converted from per-bucket counts to cumulative counts.
#[derive(Debug, Default)]
pub struct PrometheusSink {
    families: Mutex<HashMap<String, MetricFamily>>,
}

impl PrometheusSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Families in descriptor-table order. Families without samples are
    /// left out; unknown families follow in name order.
    pub fn into_families(self, order: &[Arc<MetricDesc>]) -> Vec<MetricFamily> {
        let mut families = self.families.into_inner();
        let mut out = Vec::with_capacity(families.len());

        for desc in order {
            if let Some(family) = families.remove(&desc.fq_name) {
                out.push(family);
            }
        }

        let mut rest: Vec<MetricFamily> = families.into_values().collect();
        rest.sort_by(|a, b| a.name().cmp(b.name()));
        out.extend(rest);
        out
    }
}

impl MetricSink for PrometheusSink {
    fn emit(&self, sample: Sample) {
        let metric = to_proto_metric(&sample);
        let mut families = self.families.lock();
        let family = families
            .entry(sample.desc.fq_name.clone())
            .or_insert_with(|| {
                let mut mf = MetricFamily::default();
                mf.set_name(sample.desc.fq_name.clone());
                mf.set_help(sample.desc.help.clone());
                mf.set_field_type(metric_type(sample.kind()));
                mf
            });
        family.mut_metric().push(metric);
    }
}

fn metric_type(kind: MetricKind) -> MetricType {
    match kind {
        MetricKind::Gauge => MetricType::GAUGE,
        MetricKind::Counter => MetricType::COUNTER,
        MetricKind::Histogram => MetricType::HISTOGRAM,
    }
}

fn to_proto_metric(sample: &Sample) -> proto::Metric {
    let mut metric = proto::Metric::default();

    let labels: Vec<LabelPair> = sample
        .desc
        .label_names
        .iter()
        .zip(sample.label_values.iter())
        .map(|(name, value)| {
            let mut lp = LabelPair::default();
            lp.set_name(name.clone());
            lp.set_value(value.clone());
            lp
        })
        .collect();
    metric.set_label(labels);

    match &sample.value {
        SampleValue::Gauge(v) => {
            let mut g = proto::Gauge::default();
            g.set_value(*v);
            metric.set_gauge(g);
        }
        SampleValue::Counter(v) => {
            let mut c = proto::Counter::default();
            c.set_value(*v);
            metric.set_counter(c);
        }
        SampleValue::Histogram(h) => metric.set_histogram(to_proto_histogram(h)),
    }

    metric
}

fn to_proto_histogram(value: &HistogramValue) -> proto::Histogram {
    let mut h = proto::Histogram::default();
    h.set_sample_count(value.sample_count);
    h.set_sample_sum(value.sample_sum);

    // The encoder writes the `+Inf` bucket from the sample count
    let buckets = value
        .buckets
        .cumulative()
        .into_iter()
        .filter(|(upper_bound, _)| upper_bound.is_finite())
        .map(|(upper_bound, cumulative_count)| {
            let mut b = proto::Bucket::default();
            b.set_upper_bound(upper_bound);
            b.set_cumulative_count(cumulative_count);
            b
        })
        .collect();
    h.set_bucket(buckets);
    h
}

/// Render families in the Prometheus text format.
pub fn encode_text(families: &[MetricFamily]) -> Result<String> {
    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();
    encoder.encode(families, &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| Error::Internal(format!("Non UTF-8 exposition: {}", e)))
}

// =============================================================================
// Exporter Self-Metrics
// =============================================================================

/// Counters about the exporter's own scrapes
#[derive(Clone)]
pub struct ExporterMetrics {
    registry: Registry,
    scrapes_total: IntCounter,
    scrape_failures_total: IntCounter,
    scrape_duration_seconds: Histogram,
}

impl ExporterMetrics {
    pub fn new(namespace: &str) -> Result<Self> {
        let registry = Registry::new();

        let scrapes_total = IntCounter::new(
            format!("{}_exporter_scrapes_total", namespace),
            "Total number of scrapes of the Element API",
        )?;
        let scrape_failures_total = IntCounter::new(
            format!("{}_exporter_scrape_failures_total", namespace),
            "Total number of scrapes that reported the cluster down",
        )?;
        let scrape_duration_seconds = Histogram::with_opts(
            HistogramOpts::new(
                format!("{}_exporter_scrape_duration_seconds", namespace),
                "Duration of scrapes of the Element API",
            )
            .buckets(vec![0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0]),
        )?;

        registry.register(Box::new(scrapes_total.clone()))?;
        registry.register(Box::new(scrape_failures_total.clone()))?;
        registry.register(Box::new(scrape_duration_seconds.clone()))?;

        Ok(Self {
            registry,
            scrapes_total,
            scrape_failures_total,
            scrape_duration_seconds,
        })
    }

    pub fn observe(&self, outcome: &ScrapeOutcome) {
        self.scrapes_total.inc();
        if !outcome.up {
            self.scrape_failures_total.inc();
        }
        self.scrape_duration_seconds
            .observe(outcome.duration.as_secs_f64());
    }

    pub fn gather(&self) -> Vec<MetricFamily> {
        self.registry.gather()
    }

    pub fn scrapes_total(&self) -> u64 {
        self.scrapes_total.get()
    }

    pub fn scrape_failures_total(&self) -> u64 {
        self.scrape_failures_total.get()
    }
}

impl std::fmt::Debug for ExporterMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExporterMetrics")
            .field("scrapes_total", &self.scrapes_total.get())
            .field("scrape_failures_total", &self.scrape_failures_total.get())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::BucketMap;
    use std::time::Duration;

    fn desc(name: &str, labels: &[&str]) -> Arc<MetricDesc> {
        Arc::new(MetricDesc::new(name, "help text", labels).unwrap())
    }

    #[test]
    fn test_gauge_and_counter_exposition() {
        let up = desc("sf_up", &[]);
        let reads = desc("sf_volume_read_ops_total", &["volume_id", "volume_name"]);

        let sink = PrometheusSink::new();
        sink.emit(Sample::counter(&reads, 42.0, vec!["1".into(), "db".into()]));
        sink.emit(Sample::gauge(&up, 1.0, vec![]));

        let families = sink.into_families(&[Arc::clone(&up), Arc::clone(&reads)]);
        assert_eq!(families.len(), 2);
        assert_eq!(families[0].name(), "sf_up");

        let text = encode_text(&families).unwrap();
        assert!(text.contains("# TYPE sf_up gauge"));
        assert!(text.contains("sf_up 1"));
        assert!(text.contains("# TYPE sf_volume_read_ops_total counter"));
        assert!(text.contains(r#"sf_volume_read_ops_total{volume_id="1",volume_name="db"} 42"#));
    }

    #[test]
    fn test_histogram_buckets_are_cumulative() {
        let load = desc("sf_node_load_histogram", &["node_id"]);
        let value = HistogramValue::from_buckets(
            BucketMap::from_pairs(&[(0.0, 2), (19.0, 3), (100.0, 5)]),
            Some(12),
        );

        let sink = PrometheusSink::new();
        sink.emit(Sample::histogram(&load, value, vec!["1".into()]));
        let text = encode_text(&sink.into_families(&[load])).unwrap();

        assert!(text.contains(r#"sf_node_load_histogram_bucket{node_id="1",le="0"} 2"#));
        assert!(text.contains(r#"sf_node_load_histogram_bucket{node_id="1",le="19"} 5"#));
        assert!(text.contains(r#"sf_node_load_histogram_bucket{node_id="1",le="100"} 10"#));
        assert!(text.contains(r#"sf_node_load_histogram_sum{node_id="1"} 10"#));
        assert!(text.contains(r#"sf_node_load_histogram_count{node_id="1"} 12"#));
    }

    #[test]
    fn test_open_ended_bucket_uses_plus_inf() {
        let sizes = desc("sf_volume_qos_write_block_size_bytes", &["volume_id"]);
        let value = HistogramValue::from_buckets(
            BucketMap::from_pairs(&[(8191.0, 20), (131071.0, 0), (f64::INFINITY, 2)]),
            None,
        );

        let sink = PrometheusSink::new();
        sink.emit(Sample::histogram(&sizes, value, vec!["1".into()]));
        let text = encode_text(&sink.into_families(&[sizes])).unwrap();

        assert!(text.contains(r#"sf_volume_qos_write_block_size_bytes_bucket{volume_id="1",le="131071"} 20"#));
        assert!(text.contains(r#"sf_volume_qos_write_block_size_bytes_bucket{volume_id="1",le="+Inf"} 22"#));
        assert!(!text.contains(r#"le="inf""#));
        assert_eq!(text.matches(r#"le="+Inf""#).count(), 1);
    }

    #[test]
    fn test_unknown_families_follow_table() {
        let known = desc("sf_a", &[]);
        let stray = desc("sf_b", &[]);

        let sink = PrometheusSink::new();
        sink.emit(Sample::gauge(&stray, 1.0, vec![]));
        sink.emit(Sample::gauge(&known, 1.0, vec![]));

        let names: Vec<String> = sink
            .into_families(&[known])
            .iter()
            .map(|f| f.name().to_string())
            .collect();
        assert_eq!(names, vec!["sf_a", "sf_b"]);
    }

    #[test]
    fn test_exporter_metrics() {
        let metrics = ExporterMetrics::new("sf").unwrap();
        metrics.observe(&ScrapeOutcome {
            up: true,
            samples_emitted: 10,
            duration: Duration::from_millis(300),
            error: None,
        });
        metrics.observe(&ScrapeOutcome {
            up: false,
            samples_emitted: 1,
            duration: Duration::from_millis(50),
            error: Some("boom".into()),
        });

        assert_eq!(metrics.scrapes_total(), 2);
        assert_eq!(metrics.scrape_failures_total(), 1);

        let text = encode_text(&metrics.gather()).unwrap();
        assert!(text.contains("sf_exporter_scrapes_total 2"));
        assert!(text.contains("sf_exporter_scrape_duration_seconds_count 2"));
    }

    #[test]
    fn test_invalid_namespace_rejected() {
        assert!(ExporterMetrics::new("bad-ns").is_err());
    }
}
