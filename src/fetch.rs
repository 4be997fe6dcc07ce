//! Page fetching.
//!
//! The crawler only needs "URL in, decoded text out", so the seam is the
//! small [`PageFetcher`] trait. [`HttpFetcher`] is the real implementation
//! built on `reqwest`; tests substitute in-memory fetchers.
//!
//! There is no retry here. A failed request is reported once and the caller
//! decides how to degrade.

use crate::config::HttpSettings;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, instrument, warn};
use url::Url;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid url {url}: {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("request timed out: {0}")]
    Timeout(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("failed to build http client: {0}")]
    Client(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Timeout(err.to_string())
        } else {
            FetchError::Network(err.to_string())
        }
    }
}

/// Anything that can turn a URL into page text.
pub trait PageFetcher {
    async fn fetch_text(&self, url: &str) -> Result<String, FetchError>;
}

/// `reqwest`-backed fetcher with a fixed header set and request timeout.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(settings: &HttpSettings) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        let agent = HeaderValue::from_str(&settings.user_agent)
            .map_err(|e| FetchError::Client(format!("user agent: {}", e)))?;
        headers.insert(USER_AGENT, agent);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(settings.timeout())
            .build()
            .map_err(|e| FetchError::Client(e.to_string()))?;
        Ok(Self { client })
    }
}

impl PageFetcher for HttpFetcher {
    /// GET `url` and decode the body as UTF-8, replacing invalid sequences.
    ///
    /// Non-success statuses are logged and their body is returned; only
    /// transport failures become errors.
    #[instrument(level = "debug", skip(self))]
    async fn fetch_text(&self, url: &str) -> Result<String, FetchError> {
        let parsed = Url::parse(url).map_err(|e| FetchError::InvalidUrl {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        let t0 = Instant::now();
        let response = self.client.get(parsed).send().await?;
        let status = response.status();
        if !status.is_success() {
            // Error pages are still scraped like any other page.
            warn!(status = status.as_u16(), %url, "Non-success status");
        }

        // The site serves UTF-8 regardless of what the headers claim.
        let bytes = response.bytes().await?;
        let text = String::from_utf8_lossy(&bytes).into_owned();
        debug!(
            bytes = bytes.len(),
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "Fetched page"
        );
        Ok(text)
    }
}
