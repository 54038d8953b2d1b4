use crate::config::types::{CrawlConfig, CrawlDefaults, CrawlRequest, Settings, UserAgentConfig};
use crate::url::parse_start_url;
use crate::{ConfigError, ConfigResult};
use std::time::Duration;
use url::Url;

/// Validates the entire settings file
pub fn validate_settings(settings: &Settings) -> ConfigResult<()> {
    validate_crawl_defaults(&settings.crawl)?;
    validate_user_agent_config(&settings.user_agent)?;
    Ok(())
}

/// Validates a start request and turns it into an immutable crawl configuration
///
/// The seed URL must be an absolute `http` or `https` URL with a host.
///
/// # Example
///
/// ```
/// use sumi_trawl::config::{validate_request, CrawlRequest};
///
/// let config = validate_request(&CrawlRequest::new("https://example.com/")).unwrap();
/// assert_eq!(config.max_pages, 8);
///
/// assert!(validate_request(&CrawlRequest::new("ftp://example.com/")).is_err());
/// ```
pub fn validate_request(request: &CrawlRequest) -> ConfigResult<CrawlConfig> {
    let start_url = parse_start_url(&request.start_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("startUrl '{}': {}", request.start_url, e)))?;

    validate_max_pages(request.max_pages)?;
    validate_timeout(request.timeout_ms)?;

    Ok(CrawlConfig {
        target: request.start_url.clone(),
        start_url,
        max_pages: request.max_pages,
        include_tel: request.include_tel,
        include_mailto: request.include_mailto,
        delay: Duration::from_millis(request.delay_ms),
        timeout: Duration::from_millis(request.timeout_ms),
    })
}

fn validate_crawl_defaults(defaults: &CrawlDefaults) -> ConfigResult<()> {
    validate_max_pages(defaults.max_pages)?;
    validate_timeout(defaults.timeout_ms)?;
    Ok(())
}

fn validate_max_pages(max_pages: usize) -> ConfigResult<()> {
    if max_pages < 1 {
        return Err(ConfigError::Validation(format!(
            "max_pages must be >= 1, got {}",
            max_pages
        )));
    }
    Ok(())
}

fn validate_timeout(timeout_ms: u64) -> ConfigResult<()> {
    if timeout_ms == 0 {
        return Err(ConfigError::Validation(
            "timeout_ms must be a positive number of milliseconds".to_string(),
        ));
    }
    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> ConfigResult<()> {
    // Crawler name: non-empty, alphanumeric + hyphens only
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler_name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler_name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    if config.crawler_version.trim().is_empty() {
        return Err(ConfigError::Validation(
            "crawler_version cannot be empty".to_string(),
        ));
    }

    Url::parse(&config.contact_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact_url: {}", e)))?;

    Ok(())
}
