//! Domain Layer
//!
//! Port traits the scrape core is written against.
//!
//! - **Ports** (`ports.rs`) - the upstream query API and the downstream sink
//!
//! ```ignore
//! use solidfire_exporter::domain::{ClusterApi, MetricSink};
//!
//! async fn count_volumes<A: ClusterApi>(api: &A) -> Result<usize> {
//!     Ok(api.list_volumes().await?.volumes.len())
//! }
//! ```

pub mod ports;

pub use ports::{ClusterApi, MetricSink};
