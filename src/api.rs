//! HTTP access for the source adapters, bounded by a per-call timeout.
//!
//! The pipeline never talks to `reqwest` directly. It goes through the
//! [`FetchJson`] trait so the aggregation logic can be exercised against
//! canned responses:
//! - [`FetchJson`]: Core trait, "GET this URL and give me JSON"
//! - [`HttpFetcher`]: The real implementation over a shared `reqwest::Client`
//! - [`fetch_with_timeout`]: Races any [`FetchJson`] call against a timer
//!
//! # Timeout Semantics
//!
//! The bound is client-side only. When the timer wins, the request future is
//! dropped and the caller sees [`FetchError::Timeout`]; nothing is sent to
//! the server to cancel the request.

use serde_json::Value;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, instrument, warn};

use crate::utils::truncate_for_log;

/// Browser-like user agent; some feed proxies reject unknown clients.
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Why a single source call produced nothing.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request timed out after {}ms", .0.as_millis())]
    Timeout(Duration),
    #[error("upstream responded with HTTP {0}")]
    Status(u16),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("response body is not JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Trait for fetching a JSON document over the network.
///
/// Implementors must report a non-success status as [`FetchError::Status`]
/// rather than handing back the error body.
pub trait FetchJson {
    async fn get_json(&self, url: &str) -> Result<Value, FetchError>;
}

/// [`FetchJson`] backed by `reqwest` with rustls.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Build a client that identifies as a browser and asks for JSON.
    pub fn new() -> Result<Self, FetchError> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::ACCEPT,
            reqwest::header::HeaderValue::from_static("application/json"),
        );
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .build()?;
        Ok(Self { client })
    }
}

impl FetchJson for HttpFetcher {
    #[instrument(level = "debug", skip(self))]
    async fn get_json(&self, url: &str) -> Result<Value, FetchError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        debug!(bytes = body.len(), "Received response body");
        serde_json::from_str(&body).map_err(|e| {
            warn!(error = %e, body_preview = %truncate_for_log(&body, 200), "Body did not parse as JSON");
            FetchError::Parse(e)
        })
    }
}

/// Fetch `url` through `fetcher`, giving up after `limit`.
///
/// Whichever of the request and the timer settles first decides the outcome.
/// On expiry the request future is dropped together with the timer, so
/// nothing is left pending once this returns.
#[instrument(level = "debug", skip(fetcher), fields(timeout_ms = limit.as_millis() as u64))]
pub async fn fetch_with_timeout<F>(
    fetcher: &F,
    url: &str,
    limit: Duration,
) -> Result<Value, FetchError>
where
    F: FetchJson,
{
    let t0 = Instant::now();
    let res = match tokio::time::timeout(limit, fetcher.get_json(url)).await {
        Ok(res) => res,
        Err(_) => Err(FetchError::Timeout(limit)),
    };
    debug!(elapsed_ms = t0.elapsed().as_millis() as u64, ok = res.is_ok(), "Fetch settled");
    res
}
