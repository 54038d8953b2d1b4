//! Crawl engine - the streaming crawl loop
//!
//! The engine drives one page at a time through fetch, contact extraction,
//! link discovery and enqueueing, streaming events to an [`EventSink`] as it
//! goes. It observes a [`CancellationToken`] at the top of every iteration and
//! at both suspension points (the fetch and the politeness delay).
//!
//! # State machine
//!
//! ```text
//! Idle --run--> Running --frontier empty / budget spent--> Completed
//!                  |
//!                  +--token cancelled--> Cancelled
//! ```
//!
//! Only `Completed` emits a `done` event. Once cancellation is observed no
//! further events are emitted.

use crate::config::CrawlConfig;
use crate::crawler::events::{DoneEvent, EventSink, FoundEvent, PageEvent};
use crate::crawler::extractor::{extract_from_document, Contacts, ExtractOptions};
use crate::crawler::fetcher::{fetch_page, PageOutcome};
use crate::crawler::frontier::Frontier;
use crate::crawler::parser::links_from_document;
use crate::TrawlError;
use reqwest::Client;
use scraper::Html;
use std::collections::HashSet;
use std::time::Instant;
use tokio_util::sync::CancellationToken;
use url::Url;

/// Lifecycle of a single crawl
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EngineState {
    Idle,
    Running,
    Completed,
    Cancelled,
}

/// How a crawl ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CrawlOutcome {
    /// The crawl ran out of work; carries the summary that was emitted
    Completed(DoneEvent),

    /// The crawl was stopped; carries the pages visited before it stopped
    Cancelled { pages_visited: Vec<String> },
}

/// Running totals of every contact reported so far
#[derive(Debug, Default)]
struct ContactLedger {
    emails: Vec<String>,
    phones: Vec<String>,
    seen_emails: HashSet<String>,
    seen_phones: HashSet<String>,
}

impl ContactLedger {
    /// Records `found` and returns only the values not seen before
    fn absorb(&mut self, found: Contacts) -> Contacts {
        let mut fresh = Contacts::default();

        for email in found.emails {
            if self.seen_emails.insert(email.clone()) {
                self.emails.push(email.clone());
                fresh.emails.push(email);
            }
        }

        for phone in found.phones {
            if self.seen_phones.insert(phone.clone()) {
                self.phones.push(phone.clone());
                fresh.phones.push(phone);
            }
        }

        fresh
    }
}

/// What a successfully fetched page yielded
struct MinedPage {
    contacts: Contacts,
    links: Vec<String>,
}

/// A single crawl over one origin
pub struct CrawlEngine {
    config: CrawlConfig,
    client: Client,
    cancel: CancellationToken,
    state: EngineState,
}

impl CrawlEngine {
    /// Creates an idle engine
    ///
    /// # Arguments
    ///
    /// * `config` - Validated crawl configuration
    /// * `client` - HTTP client carrying the identifying headers
    /// * `cancel` - Token that stops the crawl when cancelled
    pub fn new(config: CrawlConfig, client: Client, cancel: CancellationToken) -> Self {
        Self {
            config,
            client,
            cancel,
            state: EngineState::Idle,
        }
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    /// Runs the crawl to completion or cancellation
    ///
    /// Per-page failures never end the crawl; they surface as the status of
    /// the page event. An error is returned only if the crawl cannot begin.
    pub async fn run<S: EventSink>(&mut self, sink: &S) -> crate::Result<CrawlOutcome> {
        if self.state != EngineState::Idle {
            return Err(TrawlError::Engine(format!(
                "engine already used (state {:?})",
                self.state
            )));
        }

        let mut frontier = Frontier::new(&self.config.start_url, self.config.max_pages)?;
        let mut ledger = ContactLedger::default();
        let options = ExtractOptions {
            include_tel: self.config.include_tel,
            include_mailto: self.config.include_mailto,
        };

        self.state = EngineState::Running;
        let start_time = Instant::now();
        tracing::info!(
            "Starting crawl of {} (origin {}, budget {} pages)",
            self.config.start_url,
            frontier.origin(),
            self.config.max_pages
        );

        loop {
            if self.cancel.is_cancelled() {
                return Ok(self.cancelled(frontier));
            }

            let Some(url) = frontier.next_url() else {
                break;
            };

            tracing::debug!("Fetching {}", url);
            let outcome =
                fetch_page(&self.client, &url, self.config.timeout, &self.cancel).await;

            if self.cancel.is_cancelled() {
                return Ok(self.cancelled(frontier));
            }

            sink.page(PageEvent {
                url: outcome.url.clone(),
                status: outcome.status,
            });

            if outcome.has_content() {
                let mined = mine_page(&outcome, &options);

                let fresh = ledger.absorb(mined.contacts);
                if !fresh.is_empty() {
                    tracing::info!(
                        "{}: {} new email(s), {} new phone(s)",
                        url,
                        fresh.emails.len(),
                        fresh.phones.len()
                    );
                    sink.found(FoundEvent {
                        emails: fresh.emails,
                        phones: fresh.phones,
                    });
                }

                let discovered = mined.links.len();
                let queued = mined
                    .links
                    .into_iter()
                    .filter(|link| frontier.enqueue(link.clone()))
                    .count();
                tracing::debug!(
                    "{}: {} link(s) found, {} queued, {} in frontier",
                    url,
                    discovered,
                    queued,
                    frontier.len()
                );
            }

            if !self.config.delay.is_zero() && !frontier.is_exhausted() {
                tokio::select! {
                    biased;

                    _ = self.cancel.cancelled() => {
                        return Ok(self.cancelled(frontier));
                    }

                    _ = tokio::time::sleep(self.config.delay) => {}
                }
            }
        }

        // A cancel racing the last iteration still suppresses the summary
        if self.cancel.is_cancelled() {
            return Ok(self.cancelled(frontier));
        }

        let done = DoneEvent {
            target: self.config.target.clone(),
            pages_visited: frontier.into_visited(),
            total_emails: ledger.emails.len(),
            total_phones: ledger.phones.len(),
            emails: ledger.emails,
            phones: ledger.phones,
        };

        self.state = EngineState::Completed;
        tracing::info!(
            "Crawl of {} completed: {} page(s), {} email(s), {} phone(s) in {:?}",
            done.target,
            done.pages_visited.len(),
            done.total_emails,
            done.total_phones,
            start_time.elapsed()
        );

        sink.done(done.clone());
        Ok(CrawlOutcome::Completed(done))
    }

    fn cancelled(&mut self, frontier: Frontier) -> CrawlOutcome {
        self.state = EngineState::Cancelled;
        let pages_visited = frontier.into_visited();
        tracing::info!(
            "Crawl of {} cancelled after {} page(s)",
            self.config.start_url,
            pages_visited.len()
        );
        CrawlOutcome::Cancelled { pages_visited }
    }
}

/// Parses a fetched page once and pulls out its contacts and links
fn mine_page(outcome: &PageOutcome, options: &ExtractOptions) -> MinedPage {
    let document = Html::parse_document(&outcome.html);
    let contacts = extract_from_document(&outcome.html, &document, options);

    let links = match Url::parse(&outcome.url) {
        Ok(page_url) => links_from_document(&document, &page_url),
        Err(e) => {
            tracing::warn!("Cannot resolve links on {}: {}", outcome.url, e);
            Vec::new()
        }
    };

    MinedPage { contacts, links }
}
