//! HTTP exposition server
//!
//! `/metrics` runs one scrape and renders the cluster families followed by
//! the exporter's own metrics. `/healthz` answers `ok` without touching the
//! cluster.

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

use http_body_util::Full;
use hyper::body::{Bytes, Incoming};
use hyper::header::{HeaderValue, CONTENT_TYPE};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use tokio::net::TcpListener;
use tracing::{error, info, warn};

use crate::adapters::{encode_text, ExporterMetrics, PrometheusSink};
use crate::error::{Error, Result};
use crate::metrics::ScrapeOrchestrator;

const TEXT_FORMAT: &str = "text/plain; version=0.0.4";

/// Orchestrator plus the exporter's self-metrics
#[derive(Debug)]
pub struct Exporter {
    orchestrator: Arc<ScrapeOrchestrator>,
    metrics: ExporterMetrics,
}

impl Exporter {
    pub fn new(orchestrator: Arc<ScrapeOrchestrator>) -> Result<Self> {
        let metrics = ExporterMetrics::new(&orchestrator.config().namespace)?;
        Ok(Self {
            orchestrator,
            metrics,
        })
    }

    pub fn metrics(&self) -> &ExporterMetrics {
        &self.metrics
    }

    /// Scrape the cluster and render the exposition text.
    pub async fn render(&self) -> Result<String> {
        let sink = PrometheusSink::new();
        let outcome = self.orchestrator.collect(&sink).await;
        self.metrics.observe(&outcome);

        let mut families = sink.into_families(self.orchestrator.describe());
        families.extend(self.metrics.gather());
        encode_text(&families)
    }

    /// Route one request path.
    pub async fn handle(&self, path: &str) -> Response<Full<Bytes>> {
        match path {
            "/metrics" => match self.render().await {
                Ok(body) => {
                    let mut response = text_response(StatusCode::OK, body);
                    response
                        .headers_mut()
                        .insert(CONTENT_TYPE, HeaderValue::from_static(TEXT_FORMAT));
                    response
                }
                Err(e) => {
                    error!("Failed to render metrics: {}", e);
                    text_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
                }
            },
            "/healthz" => text_response(StatusCode::OK, "ok"),
            _ => text_response(StatusCode::NOT_FOUND, "not found"),
        }
    }
}

fn text_response(status: StatusCode, body: impl Into<Bytes>) -> Response<Full<Bytes>> {
    let mut response = Response::new(Full::new(body.into()));
    *response.status_mut() = status;
    response
}

// =============================================================================
// Server Loop
// =============================================================================

/// Accept connections until ctrl-c.
pub async fn serve(exporter: Arc<Exporter>, addr: SocketAddr) -> Result<()> {
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| Error::Internal(format!("Failed to bind metrics server: {}", e)))?;

    info!("Metrics server listening on {}", addr);

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        let (stream, peer) = tokio::select! {
            accepted = listener.accept() => accepted
                .map_err(|e| Error::Internal(format!("Metrics server accept error: {}", e)))?,
            _ = &mut shutdown => {
                info!("Shutdown signal received");
                return Ok(());
            }
        };

        let io = TokioIo::new(stream);
        let exporter = Arc::clone(&exporter);

        tokio::spawn(async move {
            let service = service_fn(move |req: Request<Incoming>| {
                let exporter = Arc::clone(&exporter);
                async move {
                    let path = req.uri().path().to_string();
                    Ok::<_, Infallible>(exporter.handle(&path).await)
                }
            });

            if let Err(e) = http1::Builder::new().serve_connection(io, service).await {
                warn!(%peer, "Metrics connection error: {}", e);
            }
        });
    }
}
