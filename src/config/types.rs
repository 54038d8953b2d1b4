use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

/// Default page budget for a crawl
pub const DEFAULT_MAX_PAGES: usize = 8;

/// Default politeness delay between pages (milliseconds)
pub const DEFAULT_DELAY_MS: u64 = 200;

/// Default per-request timeout (milliseconds)
pub const DEFAULT_TIMEOUT_MS: u64 = 15_000;

/// Settings loaded from the optional TOML configuration file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub crawl: CrawlDefaults,

    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
}

/// Defaults applied to crawl requests that do not override them
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlDefaults {
    /// Maximum number of pages fetched per crawl
    #[serde(rename = "max-pages")]
    pub max_pages: usize,

    /// Scrape `tel:` links in addition to the phone pattern
    #[serde(rename = "include-tel")]
    pub include_tel: bool,

    /// Scrape `mailto:` links in addition to the email pattern
    #[serde(rename = "include-mailto")]
    pub include_mailto: bool,

    /// Politeness delay between sequential fetches (milliseconds)
    #[serde(rename = "delay-ms")]
    pub delay_ms: u64,

    /// Per-request timeout (milliseconds)
    #[serde(rename = "timeout-ms")]
    pub timeout_ms: u64,
}

impl Default for CrawlDefaults {
    fn default() -> Self {
        Self {
            max_pages: DEFAULT_MAX_PAGES,
            include_tel: true,
            include_mailto: true,
            delay_ms: DEFAULT_DELAY_MS,
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: "ContactScraperBot".to_string(),
            crawler_version: "1.0".to_string(),
            contact_url: "https://example.invalid/bot".to_string(),
        }
    }
}

impl UserAgentConfig {
    /// Formats the `User-Agent` header value sent with every request
    pub fn header_value(&self) -> String {
        format!(
            "Mozilla/5.0 (compatible; {}/{}; +{})",
            self.crawler_name, self.crawler_version, self.contact_url
        )
    }
}

/// A request to start a crawl, as received from a transport
///
/// Field names follow the camelCase wire format. Everything except
/// `startUrl` is optional and falls back to the built-in defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrawlRequest {
    pub start_url: String,

    #[serde(default = "default_max_pages")]
    pub max_pages: usize,

    #[serde(default = "default_true")]
    pub include_tel: bool,

    #[serde(default = "default_true")]
    pub include_mailto: bool,

    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,

    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_max_pages() -> usize {
    DEFAULT_MAX_PAGES
}

fn default_true() -> bool {
    true
}

fn default_delay_ms() -> u64 {
    DEFAULT_DELAY_MS
}

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

impl CrawlRequest {
    /// Creates a request for `start_url` using the built-in defaults
    pub fn new(start_url: impl Into<String>) -> Self {
        Self::with_defaults(start_url, &CrawlDefaults::default())
    }

    /// Creates a request for `start_url` using defaults from the settings file
    pub fn with_defaults(start_url: impl Into<String>, defaults: &CrawlDefaults) -> Self {
        Self {
            start_url: start_url.into(),
            max_pages: defaults.max_pages,
            include_tel: defaults.include_tel,
            include_mailto: defaults.include_mailto,
            delay_ms: defaults.delay_ms,
            timeout_ms: defaults.timeout_ms,
        }
    }
}

/// Validated, immutable configuration for a single crawl
#[derive(Debug, Clone)]
pub struct CrawlConfig {
    /// Seed URL exactly as the caller gave it, reported back as the crawl target
    pub target: String,

    /// Parsed seed URL (absolute http/https)
    pub start_url: Url,

    /// Page budget, at least 1
    pub max_pages: usize,

    pub include_tel: bool,

    pub include_mailto: bool,

    /// Politeness delay; zero disables it
    pub delay: Duration,

    /// Per-request timeout, never zero
    pub timeout: Duration,
}
