//! Element JSON-RPC client
//!
//! Issues read-only `List*`/`Get*` calls against the cluster management
//! virtual IP. Every request is a POST of
//! `{"id": 1, "method": <Method>, "params": {}}` to
//! `<endpoint>/json-rpc/<api_version>` with HTTP basic auth.

use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use super::into_result;
use super::types::*;
use crate::error::{Error, Result};

// =============================================================================
// Configuration
// =============================================================================

/// Connection settings for one Element cluster
#[derive(Clone)]
pub struct ClientConfig {
    /// Base URL of the management endpoint, e.g. `https://10.0.0.1`
    pub endpoint: String,

    pub username: String,

    pub password: String,

    /// Element API version in the request path
    pub api_version: String,

    /// Accept self-signed cluster certificates
    pub insecure_skip_verify: bool,

    /// Per-request timeout
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://127.0.0.1".to_string(),
            username: String::new(),
            password: String::new(),
            api_version: "11.3".to_string(),
            insecure_skip_verify: false,
            timeout: Duration::from_secs(30),
        }
    }
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("endpoint", &self.endpoint)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("api_version", &self.api_version)
            .field("insecure_skip_verify", &self.insecure_skip_verify)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl ClientConfig {
    /// Full JSON-RPC URL.
    pub fn rpc_url(&self) -> String {
        format!(
            "{}/json-rpc/{}",
            self.endpoint.trim_end_matches('/'),
            self.api_version
        )
    }
}

// =============================================================================
// Client
// =============================================================================

/// HTTP client for the Element management API
#[derive(Debug)]
pub struct ElementClient {
    http: Client,
    url: String,
    config: ClientConfig,
}

impl ElementClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .danger_accept_invalid_certs(config.insecure_skip_verify)
            .build()
            .map_err(|e| Error::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http,
            url: config.rpc_url(),
            config,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Issue one parameterless JSON-RPC call.
    #[instrument(skip(self), fields(method = %method))]
    pub async fn call<R: DeserializeOwned>(&self, method: Method) -> Result<R> {
        let body = serde_json::json!({
            "id": 1,
            "method": method.as_str(),
            "params": {},
        });

        let response = self
            .http
            .post(&self.url)
            .basic_auth(&self.config.username, Some(&self.config.password))
            .json(&body)
            .send()
            .await
            .map_err(|source| Error::ApiConnection {
                method: method.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::ApiStatus {
                method: method.to_string(),
                status: status.as_u16(),
            });
        }

        let envelope: RpcResponse<R> =
            response
                .json()
                .await
                .map_err(|e| Error::ApiResponseParse {
                    method: method.to_string(),
                    reason: e.to_string(),
                })?;

        debug!("Element API call succeeded");
        into_result(method, envelope)
    }
}

impl_cluster_api!(ElementClient);
