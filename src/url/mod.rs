//! URL handling module for Sumi-Trawl
//!
//! This module provides seed URL validation, origin computation for the crawl
//! scope check, and resolution of link targets against the page they appear on.

mod origin;
mod resolve;

use crate::{UrlError, UrlResult};
use url::Url;

// Re-export main types and functions
pub use origin::Origin;
pub use resolve::resolve_link;

/// Parses a seed URL, accepting only absolute `http`/`https` URLs with a host
///
/// # Examples
///
/// ```
/// use sumi_trawl::url::parse_start_url;
///
/// assert!(parse_start_url("https://example.com/contact").is_ok());
/// assert!(parse_start_url("example.com").is_err());
/// assert!(parse_start_url("file:///etc/hosts").is_err());
/// ```
pub fn parse_start_url(raw: &str) -> UrlResult<Url> {
    let url = Url::parse(raw).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(UrlError::MissingHost);
    }

    Ok(url)
}
