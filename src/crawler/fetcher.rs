//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building HTTP clients with the identifying request headers
//! - GET requests with a per-request timeout and bounded redirects
//! - Aborting in-flight requests on cancellation
//! - Error classification
//!
//! Fetching never fails from the caller's point of view: every problem is
//! folded into a [`PageOutcome`] whose status is the server status when one
//! was received, or `0` otherwise.

use crate::config::UserAgentConfig;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::{redirect::Policy, Client};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Maximum redirect hops followed for a single fetch
pub const MAX_REDIRECTS: usize = 3;

/// `Accept` header sent with every request
pub const ACCEPT_HTML: &str = "text/html,application/xhtml+xml";

/// Result of fetching a single page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageOutcome {
    /// The URL that was requested
    pub url: String,

    /// HTTP status code, or 0 for transport failures and cancellation
    pub status: u16,

    /// Response body; empty on any failure
    pub html: String,
}

impl PageOutcome {
    fn failure(url: &str, status: u16) -> Self {
        Self {
            url: url.to_string(),
            status,
            html: String::new(),
        }
    }

    /// Returns true if the page should be mined for contacts and links
    pub fn has_content(&self) -> bool {
        self.status == 200 && !self.html.is_empty()
    }
}

/// Builds an HTTP client with the crawler's identifying headers
///
/// # Arguments
///
/// * `config` - The user agent configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use sumi_trawl::config::UserAgentConfig;
/// use sumi_trawl::crawler::build_http_client;
///
/// let client = build_http_client(&UserAgentConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &UserAgentConfig) -> Result<Client, reqwest::Error> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_HTML));

    Client::builder()
        .user_agent(config.header_value())
        .default_headers(headers)
        .redirect(Policy::limited(MAX_REDIRECTS))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a page, racing the request against the cancellation token
///
/// If the token fires while the request is in flight, the request future is
/// dropped (closing the connection) and a status 0 outcome is returned.
///
/// # Arguments
///
/// * `client` - The HTTP client to use
/// * `url` - The URL to fetch
/// * `timeout` - Timeout covering connect, headers and body
/// * `cancel` - Token observed for the whole duration of the request
pub async fn fetch_page(
    client: &Client,
    url: &str,
    timeout: Duration,
    cancel: &CancellationToken,
) -> PageOutcome {
    tokio::select! {
        biased;

        _ = cancel.cancelled() => {
            tracing::debug!("Fetch of {} aborted by cancellation", url);
            PageOutcome::failure(url, 0)
        }

        outcome = request_page(client, url, timeout) => outcome,
    }
}

async fn request_page(client: &Client, url: &str, timeout: Duration) -> PageOutcome {
    let response = match client.get(url).timeout(timeout).send().await {
        Ok(response) => response,
        Err(e) => {
            let status = e.status().map(|s| s.as_u16()).unwrap_or(0);
            tracing::warn!("Failed to fetch {}: {} ({})", url, classify_error(&e), e);
            return PageOutcome::failure(url, status);
        }
    };

    let status = response.status();
    if !status.is_success() {
        tracing::debug!("HTTP {} for {}", status.as_u16(), url);
        return PageOutcome::failure(url, status.as_u16());
    }

    match response.text().await {
        Ok(html) => PageOutcome {
            url: url.to_string(),
            status: status.as_u16(),
            html,
        },
        Err(e) => {
            tracing::warn!(
                "Failed to read body of {}: {} ({})",
                url,
                classify_error(&e),
                e
            );
            PageOutcome::failure(url, 0)
        }
    }
}

/// Short human readable category for a request error
fn classify_error(e: &reqwest::Error) -> &'static str {
    if e.is_timeout() {
        "request timeout"
    } else if e.is_redirect() {
        "too many redirects"
    } else if e.is_connect() {
        "connection failed"
    } else if e.is_body() || e.is_decode() {
        "body error"
    } else {
        "request error"
    }
}
