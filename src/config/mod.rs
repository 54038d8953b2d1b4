//! Configuration module for Sumi-Trawl
//!
//! This module handles the optional TOML settings file and the validation of
//! crawl requests into immutable [`CrawlConfig`] values.
//!
//! # Example
//!
//! ```no_run
//! use sumi_trawl::config::load_config;
//! use std::path::Path;
//!
//! let settings = load_config(Path::new("trawl.toml")).unwrap();
//! println!("Default page budget: {}", settings.crawl.max_pages);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    CrawlConfig, CrawlDefaults, CrawlRequest, Settings, UserAgentConfig, DEFAULT_DELAY_MS,
    DEFAULT_MAX_PAGES, DEFAULT_TIMEOUT_MS,
};

// Re-export parser and validation functions
pub use parser::{load_config, parse_config};
pub use validation::{validate_request, validate_settings};
