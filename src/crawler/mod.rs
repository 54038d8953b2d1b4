//! Crawler module for page fetching and contact extraction
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with timeouts, bounded redirects and cancellation
//! - Contact extraction by pattern and by `mailto:`/`tel:` links
//! - Link discovery and the breadth-first frontier
//! - The streaming crawl loop and its events

mod engine;
mod events;
mod extractor;
mod fetcher;
mod frontier;
mod parser;

pub use engine::{CrawlEngine, CrawlOutcome, EngineState};
pub use events::{CrawlEvent, DoneEvent, ErrorEvent, EventSink, FoundEvent, PageEvent};
pub use extractor::{extract_contacts, Contacts, ExtractOptions};
pub use fetcher::{build_http_client, fetch_page, PageOutcome, ACCEPT_HTML, MAX_REDIRECTS};
pub use frontier::Frontier;
pub use parser::discover_links;
