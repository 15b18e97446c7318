//! Infrastructure Adapters
//!
//! Adapter implementations for the domain ports.
//!
//! ```text
//! ┌───────────────────────────────┐
//! │  Ports (domain::ports)        │
//! │  ClusterApi │ MetricSink      │
//! └───────────────────────────────┘
//!          │            │
//!          ▼            ▼
//!  ElementClient   PrometheusSink
//!  FixtureClient   (this module)
//!  (solidfire)
//! ```
//!
//! The Element API clients live in [`crate::solidfire`]; this module holds
//! the Prometheus side.

pub mod prometheus;

pub use self::prometheus::{encode_text, ExporterMetrics, PrometheusSink};
