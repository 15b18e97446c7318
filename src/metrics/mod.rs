//! Metrics module
//!
//! The scrape core: descriptor table, identity cache, derivation rules and
//! the two-phase orchestrator that drives them.

pub mod cache;
mod collector;
pub mod derive;
pub mod descriptors;
pub mod fanout;
mod proptest;
mod sample;

pub use cache::{MetadataCache, NodeIdentity, VolumeMetadata};
pub use collector::{CollectorConfig, ScrapeOrchestrator, ScrapeOutcome};
pub use descriptors::{MetricDesc, MetricDescriptions};
pub use sample::{BucketMap, BufferSink, HistogramValue, MetricKind, Sample, SampleValue};
