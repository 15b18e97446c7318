//! Fixture-backed cluster
//!
//! Serves every method from `<dir>/<Method>.json`, a file holding the same
//! JSON-RPC envelope a live cluster returns. Used for offline runs and
//! tests.

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use super::into_result;
use super::types::*;
use crate::error::{Error, Result};

#[derive(Debug, Clone)]
pub struct FixtureClient {
    dir: PathBuf,
}

impl FixtureClient {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File a method is served from.
    pub fn path_for(&self, method: Method) -> PathBuf {
        self.dir.join(format!("{}.json", method.as_str()))
    }

    #[instrument(skip(self), fields(method = %method))]
    pub async fn call<R: DeserializeOwned>(&self, method: Method) -> Result<R> {
        let path = self.path_for(method);
        let fixture_error = |reason: String| Error::Fixture {
            method: method.to_string(),
            path: path.display().to_string(),
            reason,
        };

        let raw = tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| fixture_error(e.to_string()))?;
        let envelope: RpcResponse<R> =
            serde_json::from_str(&raw).map_err(|e| fixture_error(e.to_string()))?;

        debug!(path = %path.display(), "Served fixture");
        into_result(method, envelope)
    }
}

impl_cluster_api!(FixtureClient);
