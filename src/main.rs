//! SolidFire Exporter
//!
//! Serves Prometheus metrics scraped live from a SolidFire cluster.
//!
//! ```text
//! Prometheus ──GET /metrics──▶ Exporter ──JSON-RPC──▶ SolidFire MVIP
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing::{error, info, warn, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use solidfire_exporter::config::ExporterConfig;
use solidfire_exporter::domain::ClusterApi;
use solidfire_exporter::server::{self, Exporter};
use solidfire_exporter::{ElementClient, Error, FixtureClient, Result, ScrapeOrchestrator};

// =============================================================================
// CLI Arguments
// =============================================================================

/// SolidFire Exporter - Prometheus metrics for Element clusters
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// YAML configuration file; flags below override it
    #[arg(long, env = "SOLIDFIRE_CONFIG")]
    config: Option<PathBuf>,

    /// Metrics server bind address
    #[arg(long, env = "SOLIDFIRE_LISTEN_ADDR")]
    listen_addr: Option<String>,

    /// Cluster management endpoint, e.g. https://10.0.0.1
    #[arg(long, env = "SOLIDFIRE_RPC_SERVER")]
    rpc_server: Option<String>,

    /// Cluster admin username
    #[arg(long, env = "SOLIDFIRE_USER")]
    username: Option<String>,

    /// Cluster admin password
    #[arg(long, env = "SOLIDFIRE_PASS", hide_env_values = true)]
    password: Option<String>,

    /// Element API version
    #[arg(long, env = "SOLIDFIRE_API_VERSION")]
    api_version: Option<String>,

    /// Accept self-signed cluster certificates
    #[arg(long, env = "INSECURE_SKIP_VERIFY")]
    insecure_skip_verify: bool,

    /// Per-request HTTP timeout in seconds
    #[arg(long, env = "SOLIDFIRE_HTTP_TIMEOUT_SECONDS")]
    http_timeout_seconds: Option<u64>,

    /// Whole-scrape timeout in seconds
    #[arg(long, env = "SOLIDFIRE_SCRAPE_TIMEOUT_SECONDS")]
    scrape_timeout_seconds: Option<u64>,

    /// Metric name prefix
    #[arg(long, env = "SOLIDFIRE_NAMESPACE")]
    namespace: Option<String>,

    /// Serve responses from JSON fixtures instead of a live cluster
    #[arg(long, env = "SOLIDFIRE_FIXTURES_DIR")]
    fixtures_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Output logs as JSON
    #[arg(long, env = "LOG_JSON")]
    log_json: bool,
}

impl Args {
    /// Load the config file, if any, and lay the flags over it.
    fn resolve(&self) -> Result<ExporterConfig> {
        let mut config = match &self.config {
            Some(path) => ExporterConfig::from_file(path)?,
            None => ExporterConfig::default(),
        };

        if let Some(addr) = &self.listen_addr {
            config.listen_addr = addr.clone();
        }
        if let Some(server) = &self.rpc_server {
            config.client.rpc_server = server.clone();
        }
        if let Some(username) = &self.username {
            config.client.username = username.clone();
        }
        if let Some(password) = &self.password {
            config.client.password = password.clone();
        }
        if let Some(version) = &self.api_version {
            config.client.api_version = version.clone();
        }
        if self.insecure_skip_verify {
            config.client.insecure_skip_verify = true;
        }
        if let Some(secs) = self.http_timeout_seconds {
            config.client.http_timeout_seconds = secs;
        }
        if let Some(secs) = self.scrape_timeout_seconds {
            config.collector.scrape_timeout_seconds = secs;
        }
        if let Some(namespace) = &self.namespace {
            config.collector.namespace = namespace.clone();
        }
        if let Some(dir) = &self.fixtures_dir {
            config.fixtures_dir = Some(dir.clone());
        }

        config.validate()?;
        Ok(config)
    }
}

// =============================================================================
// Main
// =============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&args);

    let config = args.resolve().map_err(|e| {
        error!("Invalid configuration: {}", e);
        e
    })?;

    info!("Starting SolidFire Exporter");
    info!("  Listen address: {}", config.listen_addr);
    info!("  Namespace: {}", config.collector.namespace);
    info!(
        "  Scrape timeout: {} seconds",
        config.collector.scrape_timeout_seconds
    );

    let api: Arc<dyn ClusterApi> = match &config.fixtures_dir {
        Some(dir) => {
            warn!("Serving fixtures from {}, no cluster will be queried", dir.display());
            Arc::new(FixtureClient::new(dir.clone()))
        }
        None => {
            let client_config = config.client_config();
            info!("  RPC server: {}", client_config.rpc_url());
            if client_config.insecure_skip_verify {
                warn!("TLS certificate verification is disabled");
            }
            Arc::new(ElementClient::new(client_config)?)
        }
    };

    let orchestrator = ScrapeOrchestrator::new(api, config.collector_config())?;
    let exporter = Arc::new(Exporter::new(Arc::new(orchestrator))?);

    let addr: SocketAddr = config
        .listen_addr
        .parse()
        .map_err(|e| Error::Config(format!("Invalid listen address: {}", e)))?;

    server::serve(exporter, addr).await?;

    info!("Exporter shutdown complete");
    Ok(())
}

// =============================================================================
// Logging Setup
// =============================================================================

fn init_logging(args: &Args) {
    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let mut filter = EnvFilter::from_default_env().add_directive(level.into());
    for directive in ["hyper=warn", "reqwest=warn", "rustls=warn"] {
        if let Ok(directive) = directive.parse() {
            filter = filter.add_directive(directive);
        }
    }

    if args.log_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true))
            .init();
    }
}
