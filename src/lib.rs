//! SolidFire Exporter
//!
//! A Prometheus exporter for NetApp SolidFire / Element storage clusters.
//! Every scrape queries the cluster's read-only JSON-RPC API and turns the
//! answers into gauges, counters and histograms.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐    ┌─────────────────────┐    ┌────────────────┐
//! │  ClusterApi  │───▶│ ScrapeOrchestrator  │───▶│   MetricSink   │
//! │ (Element API │    │  metadata cache +   │    │  (Prometheus   │
//! │  or fixtures)│    │  derivation rules   │    │   exposition)  │
//! └──────────────┘    └─────────────────────┘    └────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`adapters`] - Prometheus sink and exporter self-metrics
//! - [`config`] - YAML configuration and validation
//! - [`domain`] - Port traits
//! - [`error`] - Error types
//! - [`metrics`] - Descriptors, cache, derivation and the orchestrator
//! - [`server`] - HTTP exposition server
//! - [`solidfire`] - Element API clients and response types

pub mod adapters;
pub mod config;
pub mod domain;
pub mod error;
pub mod metrics;
pub mod server;
pub mod solidfire;

// Re-export commonly used types
pub use config::ExporterConfig;
pub use domain::{ClusterApi, MetricSink};
pub use error::{Error, Result};
pub use metrics::{CollectorConfig, ScrapeOrchestrator, ScrapeOutcome};
pub use server::Exporter;
pub use solidfire::{ClientConfig, ElementClient, FixtureClient};
