//! Access to the external metrics service
//!
//! The service is an opaque collaborator: one GET per date range, one JSON
//! document back. [`MetricsClient`] is the seam the view talks to, and
//! [`HttpMetricsClient`] is the production implementation.

mod http;

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{DateRange, MetricsResult};

pub use http::{decode_response, HttpMetricsClient};

/// Why a fetch produced no metrics.
///
/// Payloads are plain strings so outcomes can be cloned into UI events.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FetchError {
    /// DNS, connection or redirect failure
    #[error("Transport error: {0}")]
    Transport(String),

    /// No complete response within the deadline
    #[error("Request timed out after {}", humantime::format_duration(*.0))]
    Timeout(Duration),

    /// Non-2xx HTTP response
    #[error("HTTP error: status {0}")]
    HttpStatus(u16),

    /// Body is not JSON or does not match the metrics shape
    #[error("Malformed response: {0}")]
    Decode(String),

    /// Well-formed body reporting `success: false` or a failing status
    #[error("Service reported failure (status {status}): {message}")]
    Service {
        /// Status reported in the body
        status: i64,
        /// Message or error text from the body
        message: String,
    },
}

/// Outcome of one fetch
pub type FetchOutcome = std::result::Result<MetricsResult, FetchError>;

/// Source of metrics for a date range
#[async_trait]
pub trait MetricsClient: Send + Sync {
    /// Fetch metrics for `range`. Exactly one request per call, no retry.
    async fn fetch(&self, range: &DateRange) -> FetchOutcome;
}
