//! Page fetching
//!
//! This module handles:
//! - The `PageRenderer` capability: turn a URL into page content
//! - An HTTP implementation with a realistic browser identity
//! - Classifying failures (network, timeout, anti-bot block)
//! - Pairing every fetch with a politeness pause

use crate::config::Config;
use crate::crawler::pacing::Pacer;
use crate::HarvestError;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE};
use reqwest::{Client, StatusCode};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Text the site serves instead of content once it has flagged the client
const BLOCK_NOTICE: &str = "This IP has been automatically blocked";

/// Why a single fetch failed
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    #[error("network failure for {url}: {reason}")]
    Network { url: String, reason: String },

    #[error("request timed out for {url}")]
    Timeout { url: String },

    #[error("blocked by site at {url} (HTTP {status})")]
    Blocked { url: String, status: u16 },

    #[error("unexpected HTTP {status} for {url}")]
    Status { url: String, status: u16 },
}

/// Turns a URL into the content a browser would see
///
/// The crawler core depends only on this trait, so tests can substitute a
/// renderer that serves canned pages.
#[async_trait]
pub trait PageRenderer: Send + Sync {
    async fn render(&self, url: &Url) -> Result<String, FetchError>;
}

/// Renders pages with a plain HTTP client presenting a desktop browser identity
pub struct HttpRenderer {
    client: Client,
}

impl HttpRenderer {
    /// Builds the HTTP client
    ///
    /// # Returns
    ///
    /// * `Ok(HttpRenderer)` - Client ready to fetch
    /// * `Err(HarvestError::FetcherInit)` - The client could not be constructed
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self, HarvestError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            ),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));

        let client = Client::builder()
            .user_agent(user_agent)
            .default_headers(headers)
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(10))
            .gzip(true)
            .brotli(true)
            .build()
            .map_err(|e| HarvestError::FetcherInit {
                reason: e.to_string(),
            })?;

        Ok(Self { client })
    }

    /// Builds a renderer from the `[user-agent]` and `[crawler]` sections
    pub fn from_config(config: &Config) -> Result<Self, HarvestError> {
        Self::new(&config.user_agent.value, config.crawler.request_timeout())
    }
}

#[async_trait]
impl PageRenderer for HttpRenderer {
    async fn render(&self, url: &Url) -> Result<String, FetchError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| classify_request_error(url, e))?;

        let status = response.status();
        if status == StatusCode::FORBIDDEN || status == StatusCode::TOO_MANY_REQUESTS {
            return Err(FetchError::Blocked {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| classify_request_error(url, e))?;

        if body.contains(BLOCK_NOTICE) {
            return Err(FetchError::Blocked {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(body)
    }
}

fn classify_request_error(url: &Url, error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
        }
    } else if error.is_connect() {
        FetchError::Network {
            url: url.to_string(),
            reason: "connection refused".to_string(),
        }
    } else {
        FetchError::Network {
            url: url.to_string(),
            reason: error.to_string(),
        }
    }
}

/// A renderer paired with a pacer
///
/// Every fetch, successful or not, waits for the pacer before returning.
/// No retries happen here; failures go straight back to the caller.
#[derive(Clone)]
pub struct Fetcher {
    renderer: Arc<dyn PageRenderer>,
    pacer: Arc<dyn Pacer>,
}

impl Fetcher {
    pub fn new(renderer: Arc<dyn PageRenderer>, pacer: Arc<dyn Pacer>) -> Self {
        Self { renderer, pacer }
    }

    pub async fn fetch(&self, url: &Url) -> Result<String, FetchError> {
        tracing::debug!("Fetching {}", url);
        let result = self.renderer.render(url).await;
        self.pacer.await_slot().await;
        result
    }
}
