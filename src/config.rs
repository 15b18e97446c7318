//! Exporter configuration
//!
//! Optional YAML file with `listen_addr`, `client` and `collector`
//! sections. Command-line flags override whatever the file sets.
//!
//! ```yaml
//! listen_addr: "0.0.0.0:9987"
//! client:
//!   rpc_server: "https://10.0.0.1"
//!   username: monitor
//!   password: secret
//!   insecure_skip_verify: true
//! collector:
//!   namespace: solidfire
//!   scrape_timeout_seconds: 30
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::metrics::CollectorConfig;
use crate::solidfire::ClientConfig;

pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:9987";

/// Connection section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ClientSection {
    pub rpc_server: String,
    pub username: String,
    pub password: String,
    pub api_version: String,
    pub insecure_skip_verify: bool,
    pub http_timeout_seconds: u64,
}

impl Default for ClientSection {
    fn default() -> Self {
        let defaults = ClientConfig::default();
        Self {
            rpc_server: String::new(),
            username: String::new(),
            password: String::new(),
            api_version: defaults.api_version,
            insecure_skip_verify: defaults.insecure_skip_verify,
            http_timeout_seconds: defaults.timeout.as_secs(),
        }
    }
}

/// Scrape section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CollectorSection {
    pub namespace: String,
    pub scrape_timeout_seconds: u64,
}

impl Default for CollectorSection {
    fn default() -> Self {
        let defaults = CollectorConfig::default();
        Self {
            namespace: defaults.namespace,
            scrape_timeout_seconds: defaults.scrape_timeout.as_secs(),
        }
    }
}

/// Complete exporter configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExporterConfig {
    pub listen_addr: String,
    /// Serve from JSON fixtures instead of a live cluster
    pub fixtures_dir: Option<PathBuf>,
    pub client: ClientSection,
    pub collector: CollectorSection,
}

impl Default for ExporterConfig {
    fn default() -> Self {
        Self {
            listen_addr: DEFAULT_LISTEN_ADDR.to_string(),
            fixtures_dir: None,
            client: ClientSection::default(),
            collector: CollectorSection::default(),
        }
    }
}

impl ExporterConfig {
    pub fn from_yaml_str(raw: &str) -> Result<Self> {
        serde_yaml::from_str(raw).map_err(|e| Error::Config(format!("Invalid YAML: {}", e)))
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Cannot read {}: {}", path.display(), e))
        })?;
        Self::from_yaml_str(&raw)
    }

    /// Reject settings the exporter cannot start with.
    pub fn validate(&self) -> Result<()> {
        if self.listen_addr.parse::<std::net::SocketAddr>().is_err() {
            return Err(Error::Config(format!(
                "listen_addr {:?} is not a socket address",
                self.listen_addr
            )));
        }
        if self.collector.namespace.is_empty() {
            return Err(Error::Config("collector.namespace must not be empty".into()));
        }
        if self.collector.scrape_timeout_seconds == 0 {
            return Err(Error::Config(
                "collector.scrape_timeout_seconds must be positive".into(),
            ));
        }
        if self.fixtures_dir.is_some() {
            return Ok(());
        }
        if self.client.rpc_server.is_empty() {
            return Err(Error::Config("client.rpc_server is required".into()));
        }
        if self.client.username.is_empty() || self.client.password.is_empty() {
            return Err(Error::Config(
                "client.username and client.password are required".into(),
            ));
        }
        if self.client.http_timeout_seconds == 0 {
            return Err(Error::Config(
                "client.http_timeout_seconds must be positive".into(),
            ));
        }
        Ok(())
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            endpoint: self.client.rpc_server.clone(),
            username: self.client.username.clone(),
            password: self.client.password.clone(),
            api_version: self.client.api_version.clone(),
            insecure_skip_verify: self.client.insecure_skip_verify,
            timeout: Duration::from_secs(self.client.http_timeout_seconds),
        }
    }

    pub fn collector_config(&self) -> CollectorConfig {
        CollectorConfig {
            namespace: self.collector.namespace.clone(),
            scrape_timeout: Duration::from_secs(self.collector.scrape_timeout_seconds),
        }
    }
}
