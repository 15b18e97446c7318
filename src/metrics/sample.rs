//! Samples and in-memory sinks
//!
//! A [`Sample`] is one value handed to a [`MetricSink`]: descriptor, kind,
//! value and label values in descriptor order.

use std::sync::Arc;

use parking_lot::Mutex;

use super::descriptors::MetricDesc;
use crate::domain::MetricSink;

// =============================================================================
// Metric Kind
// =============================================================================

/// Kind of a metric family
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricKind {
    Gauge,
    Counter,
    Histogram,
}

impl std::fmt::Display for MetricKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MetricKind::Gauge => write!(f, "gauge"),
            MetricKind::Counter => write!(f, "counter"),
            MetricKind::Histogram => write!(f, "histogram"),
        }
    }
}

// =============================================================================
// Bucket Map
// =============================================================================

/// Per-bucket observation counts keyed by inclusive upper bound.
///
/// Counts are NOT cumulative: each entry holds only the observations that
/// fell into that bucket. Entries are kept sorted by upper bound; the last
/// bound may be `f64::INFINITY`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BucketMap {
    buckets: Vec<(f64, u64)>,
}

impl BucketMap {
    /// Pair a fixed set of upper bounds with their counts.
    pub fn from_pairs(pairs: &[(f64, u64)]) -> Self {
        let mut buckets = pairs.to_vec();
        buckets.sort_by(|a, b| a.0.total_cmp(&b.0));
        Self { buckets }
    }

    /// Count recorded for the bucket with exactly this upper bound.
    pub fn get(&self, upper_bound: f64) -> Option<u64> {
        self.buckets
            .iter()
            .find(|(le, _)| *le == upper_bound)
            .map(|(_, count)| *count)
    }

    /// Upper bounds in ascending order.
    pub fn upper_bounds(&self) -> Vec<f64> {
        self.buckets.iter().map(|(le, _)| *le).collect()
    }

    /// Sum of every bucket's count.
    pub fn total(&self) -> u64 {
        self.buckets.iter().map(|(_, count)| *count).sum()
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (f64, u64)> + '_ {
        self.buckets.iter().copied()
    }

    /// Cumulative view: for each upper bound, the count of observations at
    /// or below it.
    pub fn cumulative(&self) -> Vec<(f64, u64)> {
        let mut running = 0u64;
        self.buckets
            .iter()
            .map(|(le, count)| {
                running = running.saturating_add(*count);
                (*le, running)
            })
            .collect()
    }
}

/// Histogram sample value
#[derive(Debug, Clone, PartialEq)]
pub struct HistogramValue {
    pub sample_count: u64,
    pub sample_sum: f64,
    pub buckets: BucketMap,
}

impl HistogramValue {
    /// Totals derived from the buckets. `count_override` replaces the sample
    /// count when the API reports one of its own.
    pub fn from_buckets(buckets: BucketMap, count_override: Option<u64>) -> Self {
        let total = buckets.total();
        Self {
            sample_count: count_override.unwrap_or(total),
            sample_sum: total as f64,
            buckets,
        }
    }
}

// =============================================================================
// Sample
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum SampleValue {
    Gauge(f64),
    Counter(f64),
    Histogram(HistogramValue),
}

/// One emitted value
#[derive(Debug, Clone)]
pub struct Sample {
    pub desc: Arc<MetricDesc>,
    pub value: SampleValue,
    pub label_values: Vec<String>,
}

impl Sample {
    pub fn gauge(desc: &Arc<MetricDesc>, value: f64, label_values: Vec<String>) -> Self {
        Self::new(desc, SampleValue::Gauge(value), label_values)
    }

    pub fn counter(desc: &Arc<MetricDesc>, value: f64, label_values: Vec<String>) -> Self {
        Self::new(desc, SampleValue::Counter(value), label_values)
    }

    pub fn histogram(
        desc: &Arc<MetricDesc>,
        value: HistogramValue,
        label_values: Vec<String>,
    ) -> Self {
        Self::new(desc, SampleValue::Histogram(value), label_values)
    }

    fn new(desc: &Arc<MetricDesc>, value: SampleValue, label_values: Vec<String>) -> Self {
        debug_assert_eq!(
            desc.label_names.len(),
            label_values.len(),
            "label arity mismatch for {}",
            desc.fq_name
        );
        Self {
            desc: Arc::clone(desc),
            value,
            label_values,
        }
    }

    pub fn kind(&self) -> MetricKind {
        match self.value {
            SampleValue::Gauge(_) => MetricKind::Gauge,
            SampleValue::Counter(_) => MetricKind::Counter,
            SampleValue::Histogram(_) => MetricKind::Histogram,
        }
    }

    /// Scalar value, `None` for histograms.
    pub fn scalar(&self) -> Option<f64> {
        match self.value {
            SampleValue::Gauge(v) | SampleValue::Counter(v) => Some(v),
            SampleValue::Histogram(_) => None,
        }
    }

    /// Value of the named label, if the descriptor declares it.
    pub fn label(&self, name: &str) -> Option<&str> {
        self.desc
            .label_names
            .iter()
            .position(|n| n == name)
            .and_then(|i| self.label_values.get(i))
            .map(String::as_str)
    }
}

// =============================================================================
// In-Memory Sink
// =============================================================================

/// Sink that keeps every sample in arrival order.
///
/// Used for phase-local buffering and for inspecting scrapes in tests.
#[derive(Debug, Default)]
pub struct BufferSink {
    samples: Mutex<Vec<Sample>>,
}

impl BufferSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of collected samples.
    pub fn samples(&self) -> Vec<Sample> {
        self.samples.lock().clone()
    }

    /// Take every collected sample, leaving the sink empty.
    pub fn drain(&self) -> Vec<Sample> {
        std::mem::take(&mut *self.samples.lock())
    }

    pub fn len(&self) -> usize {
        self.samples.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.lock().is_empty()
    }

    /// Samples belonging to the named family.
    pub fn family(&self, fq_name: &str) -> Vec<Sample> {
        self.samples
            .lock()
            .iter()
            .filter(|s| s.desc.fq_name == fq_name)
            .cloned()
            .collect()
    }
}

impl MetricSink for BufferSink {
    fn emit(&self, sample: Sample) {
        self.samples.lock().push(sample);
    }

    fn emit_all(&self, samples: Vec<Sample>) {
        self.samples.lock().extend(samples);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn desc(labels: &[&str]) -> Arc<MetricDesc> {
        Arc::new(MetricDesc::new("test_metric", "A test metric", labels).unwrap())
    }

    #[test]
    fn test_bucket_map_sorted_and_cumulative() {
        let buckets = BucketMap::from_pairs(&[(100.0, 1), (0.0, 3), (19.0, 4), (f64::INFINITY, 2)]);

        assert_eq!(buckets.upper_bounds(), vec![0.0, 19.0, 100.0, f64::INFINITY]);
        assert_eq!(buckets.total(), 10);
        assert_eq!(buckets.get(19.0), Some(4));
        assert_eq!(buckets.get(39.0), None);
        assert_eq!(
            buckets.cumulative(),
            vec![(0.0, 3), (19.0, 7), (100.0, 8), (f64::INFINITY, 10)]
        );
    }

    #[test]
    fn test_histogram_value_totals() {
        let buckets = BucketMap::from_pairs(&[(19.0, 2), (39.0, 5)]);

        let plain = HistogramValue::from_buckets(buckets.clone(), None);
        assert_eq!(plain.sample_count, 7);
        assert_eq!(plain.sample_sum, 7.0);

        let overridden = HistogramValue::from_buckets(buckets, Some(40));
        assert_eq!(overridden.sample_count, 40);
        assert_eq!(overridden.sample_sum, 7.0);
    }

    #[test]
    fn test_sample_label_lookup() {
        let d = desc(&["node_id", "node_name"]);
        let sample = Sample::gauge(&d, 1.0, vec!["3".into(), "sf-node-3".into()]);

        assert_eq!(sample.kind(), MetricKind::Gauge);
        assert_eq!(sample.scalar(), Some(1.0));
        assert_eq!(sample.label("node_name"), Some("sf-node-3"));
        assert_eq!(sample.label("missing"), None);
    }

    #[test]
    fn test_buffer_sink_collects_in_order() {
        let d = desc(&[]);
        let sink = BufferSink::new();
        assert!(sink.is_empty());

        sink.emit(Sample::counter(&d, 1.0, vec![]));
        sink.emit_all(vec![Sample::counter(&d, 2.0, vec![]), Sample::counter(&d, 3.0, vec![])]);

        let values: Vec<f64> = sink.samples().iter().filter_map(Sample::scalar).collect();
        assert_eq!(values, vec![1.0, 2.0, 3.0]);
        assert_eq!(sink.family("test_metric").len(), 3);

        let drained = sink.drain();
        assert_eq!(drained.len(), 3);
        assert!(sink.is_empty());
    }
}
