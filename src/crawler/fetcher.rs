//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building HTTP clients with the configured user agent
//! - GET requests for pages (decoded text) and assets (raw bytes)
//! - Per-request timeouts
//! - Error classification
//!
//! Nothing here retries: a failed URL is recorded as visited and the crawl
//! moves on.

use reqwest::{Client, Response};
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Connection establishment timeout shared by all requests
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors raised while fetching a page or an asset
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request to {url} timed out")]
    Timeout { url: String },

    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("could not connect to {url}: {source}")]
    Connect {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("request to {url} failed: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

impl TransportError {
    fn from_reqwest(url: &Url, source: reqwest::Error) -> Self {
        let url = url.to_string();
        if source.is_timeout() {
            Self::Timeout { url }
        } else if source.is_connect() {
            Self::Connect { url, source }
        } else {
            Self::Network { url, source }
        }
    }
}

/// A successfully fetched text document
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// Final URL after redirects
    pub final_url: String,
    /// HTTP status code
    pub status_code: u16,
    /// Content-Type header value, if any
    pub content_type: Option<String>,
    /// Body decoded according to the response charset
    pub body: String,
}

/// Builds an HTTP client with proper configuration
///
/// # Example
///
/// ```no_run
/// use site2md::crawler::build_http_client;
///
/// let client = build_http_client("web-crawling-bot/1.0").unwrap();
/// ```
pub fn build_http_client(user_agent: &str) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent)
        .connect_timeout(CONNECT_TIMEOUT)
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a page and decodes its body as text
///
/// # Errors
///
/// | Condition | Result |
/// |-----------|--------|
/// | Non-2xx status | `TransportError::Status` |
/// | Request or body read exceeds `timeout` | `TransportError::Timeout` |
/// | Connection refused, DNS or TLS failure | `TransportError::Connect` |
/// | Anything else | `TransportError::Network` |
pub async fn fetch_page(
    client: &Client,
    url: &Url,
    timeout: Duration,
) -> Result<FetchedPage, TransportError> {
    let response = send(client, url, timeout).await?;

    let final_url = response.url().to_string();
    let status_code = response.status().as_u16();
    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let body = response
        .text()
        .await
        .map_err(|e| TransportError::from_reqwest(url, e))?;

    Ok(FetchedPage {
        final_url,
        status_code,
        content_type,
        body,
    })
}

/// Fetches a binary resource
pub async fn fetch_bytes(
    client: &Client,
    url: &Url,
    timeout: Duration,
) -> Result<Vec<u8>, TransportError> {
    let response = send(client, url, timeout).await?;
    let bytes = response
        .bytes()
        .await
        .map_err(|e| TransportError::from_reqwest(url, e))?;
    Ok(bytes.to_vec())
}

async fn send(client: &Client, url: &Url, timeout: Duration) -> Result<Response, TransportError> {
    let response = client
        .get(url.clone())
        .timeout(timeout)
        .send()
        .await
        .map_err(|e| TransportError::from_reqwest(url, e))?;

    let status = response.status();
    if !status.is_success() {
        return Err(TransportError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    Ok(response)
}
