//! HTTP implementation of the metrics client

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{redirect, Client};
use serde::Deserialize;
use tracing::{debug, info, warn};

use super::{FetchError, FetchOutcome, MetricsClient};
use crate::config::ServiceConfig;
use crate::error::{Error, Result};
use crate::models::{DateRange, MetricsResult};

/// Fetches metrics with a single GET against the configured endpoint
#[derive(Debug, Clone)]
pub struct HttpMetricsClient {
    client: Client,
    url: String,
    timeout: Duration,
}

impl HttpMetricsClient {
    /// Create a client for the configured service
    pub fn new(config: &ServiceConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .redirect(redirect_policy(config.max_redirects))
            .build()
            .map_err(|e| Error::config(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            url: config.url.clone(),
            timeout: config.timeout,
        })
    }

    /// Endpoint this client talks to
    pub fn url(&self) -> &str {
        &self.url
    }

    fn classify(&self, err: reqwest::Error) -> FetchError {
        if err.is_timeout() {
            FetchError::Timeout(self.timeout)
        } else if err.is_redirect() {
            FetchError::Transport(format!("too many redirects: {err}"))
        } else if err.is_decode() {
            FetchError::Decode(err.to_string())
        } else {
            FetchError::Transport(err.to_string())
        }
    }
}

/// Follow up to `max` redirects.
///
/// `attempt.previous()` includes the original URL, so the hop being
/// attempted is number `previous().len()`.
fn redirect_policy(max: usize) -> redirect::Policy {
    redirect::Policy::custom(move |attempt| {
        if attempt.previous().len() > max {
            attempt.error("too many redirects")
        } else {
            attempt.follow()
        }
    })
}

#[async_trait]
impl MetricsClient for HttpMetricsClient {
    async fn fetch(&self, range: &DateRange) -> FetchOutcome {
        info!(url = %self.url, range = %range, "Requesting metrics");

        let response = self
            .client
            .get(&self.url)
            .query(&range.query_pairs())
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), "Metrics service returned HTTP error");
            return Err(FetchError::HttpStatus(status.as_u16()));
        }

        let body = response.text().await.map_err(|e| self.classify(e))?;
        decode_response(&body)
    }
}

/// Outcome fields present on every service response, successful or not
#[derive(Debug, Deserialize)]
struct Envelope {
    success: Option<bool>,
    status: Option<i64>,
    message: Option<serde_json::Value>,
    error: Option<serde_json::Value>,
}

/// Readable text for a message field of any JSON type
fn message_text(value: serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::Null => None,
        serde_json::Value::String(text) => Some(text),
        other => Some(other.to_string()),
    }
}

impl Envelope {
    fn failure(self) -> Option<FetchError> {
        let status = self.status.unwrap_or(200);
        let failed = self.success == Some(false) || !(200..300).contains(&status);
        if !failed {
            return None;
        }

        let message = self
            .message
            .and_then(message_text)
            .or_else(|| self.error.and_then(message_text))
            .unwrap_or_else(|| "no message".to_string());
        Some(FetchError::Service { status, message })
    }
}

/// Decode a response body into metrics.
///
/// Service-reported failures are checked before the metrics shape, so a
/// failure body without totals is reported as a service failure rather
/// than a decoding error.
pub fn decode_response(body: &str) -> FetchOutcome {
    debug!(bytes = body.len(), "Decoding metrics response");

    let value: serde_json::Value =
        serde_json::from_str(body).map_err(|e| FetchError::Decode(e.to_string()))?;

    if !value.is_object() {
        return Err(FetchError::Decode("expected a JSON object".to_string()));
    }

    let envelope =
        Envelope::deserialize(&value).map_err(|e| FetchError::Decode(e.to_string()))?;
    if let Some(failure) = envelope.failure() {
        warn!(error = %failure, "Metrics service reported failure");
        return Err(failure);
    }

    MetricsResult::deserialize(value).map_err(|e| FetchError::Decode(e.to_string()))
}
