//! Error types for the SolidFire exporter

use std::time::Duration;

use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while scraping a SolidFire cluster
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)]
pub enum Error {
    // =========================================================================
    // Element API Errors
    // =========================================================================
    /// Transport failure talking to the Element API
    #[error("Element API connection error calling {method}: {source}")]
    ApiConnection {
        method: String,
        #[source]
        source: reqwest::Error,
    },

    /// Element API answered with a non-success HTTP status
    #[error("Element API call {method} failed with HTTP status {status}")]
    ApiStatus { method: String, status: u16 },

    /// Element API answered with a JSON-RPC error member
    #[error("Element API call {method} returned error {name} ({code}): {message}")]
    ApiResponse {
        method: String,
        name: String,
        code: i64,
        message: String,
    },

    /// Element API response could not be decoded
    #[error("Failed to parse Element API response for {method}: {reason}")]
    ApiResponseParse { method: String, reason: String },

    /// Fixture file missing or unreadable
    #[error("Fixture for {method} unavailable at {path}: {reason}")]
    Fixture {
        method: String,
        path: String,
        reason: String,
    },

    // =========================================================================
    // Scrape Errors
    // =========================================================================
    /// The scrape deadline elapsed before every task finished
    #[error("Scrape deadline of {0:?} exceeded")]
    ScrapeTimeout(Duration),

    /// Task stopped because a sibling task failed
    #[error("Scrape task {0} cancelled")]
    ScrapeCancelled(String),

    // =========================================================================
    // Ambient Errors
    // =========================================================================
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Prometheus descriptor or encoding error
    #[error("Prometheus error: {0}")]
    Metrics(#[from] prometheus::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// True for failures of a call against the remote management API.
    pub fn is_api_failure(&self) -> bool {
        matches!(
            self,
            Error::ApiConnection { .. }
                | Error::ApiStatus { .. }
                | Error::ApiResponse { .. }
                | Error::ApiResponseParse { .. }
                | Error::Fixture { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_failure_grouping() {
        let err = Error::ApiStatus {
            method: "ListVolumes".into(),
            status: 401,
        };
        assert!(err.is_api_failure());
        assert!(!Error::ScrapeTimeout(Duration::from_secs(1)).is_api_failure());
        assert!(!Error::Config("missing".into()).is_api_failure());
    }

    #[test]
    fn test_error_display() {
        let err = Error::ApiResponse {
            method: "GetClusterCapacity".into(),
            name: "xUnknownAPIMethod".into(),
            code: 500,
            message: "Unknown method".into(),
        };
        assert_eq!(
            err.to_string(),
            "Element API call GetClusterCapacity returned error xUnknownAPIMethod (500): Unknown method"
        );
    }
}
