//! Sumi-Trawl: a polite contact trawler
//!
//! This crate crawls a single website breadth-first from a seed URL, staying on
//! the seed's origin, and streams the email addresses and phone numbers it finds
//! as the crawl progresses. Crawls run as cancellable background jobs.

pub mod config;
pub mod crawler;
pub mod job;
pub mod output;
pub mod url;

use thiserror::Error;

/// Main error type for Sumi-Trawl operations
#[derive(Debug, Error)]
pub enum TrawlError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("A crawl is already running for this session (target: {target})")]
    JobAlreadyRunning { target: String },

    #[error("Crawl task failed: {0}")]
    Engine(String),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing host in URL")]
    MissingHost,
}

/// Result type alias for Sumi-Trawl operations
pub type Result<T> = std::result::Result<T, TrawlError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::{CrawlConfig, CrawlRequest, Settings};
pub use crawler::{extract_contacts, CrawlEvent, Contacts, ExtractOptions};
pub use job::{CancelHandle, CrawlJob, JobStatus, Session};
pub use crate::url::Origin;
