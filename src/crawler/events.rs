//! Progress events streamed while a crawl runs
//!
//! Serialized as `{"event": "<name>", "data": {...}}` with camelCase fields.

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::UnboundedSender;

/// Emitted once for every URL taken off the frontier and fetched
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageEvent {
    pub url: String,
    pub status: u16,
}

/// Contacts seen for the first time in this crawl
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FoundEvent {
    pub emails: Vec<String>,
    pub phones: Vec<String>,
}

/// Summary emitted exactly once when a crawl completes without cancellation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DoneEvent {
    pub target: String,
    pub pages_visited: Vec<String>,
    pub total_emails: usize,
    pub total_phones: usize,
    pub emails: Vec<String>,
    pub phones: Vec<String>,
}

/// A crawl could not run to completion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEvent {
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "lowercase")]
pub enum CrawlEvent {
    Page(PageEvent),
    Found(FoundEvent),
    Done(DoneEvent),
    Error(ErrorEvent),
}

/// Receiver of crawl events
///
/// Delivery is fire-and-forget: a sink whose consumer has gone away simply
/// drops events, it never stalls or fails the crawl.
pub trait EventSink {
    fn emit(&self, event: CrawlEvent);

    fn page(&self, event: PageEvent) {
        self.emit(CrawlEvent::Page(event));
    }

    fn found(&self, event: FoundEvent) {
        self.emit(CrawlEvent::Found(event));
    }

    fn done(&self, event: DoneEvent) {
        self.emit(CrawlEvent::Done(event));
    }

    fn error(&self, message: String) {
        self.emit(CrawlEvent::Error(ErrorEvent { message }));
    }
}

impl EventSink for UnboundedSender<CrawlEvent> {
    fn emit(&self, event: CrawlEvent) {
        if self.send(event).is_err() {
            tracing::trace!("Event receiver dropped, discarding event");
        }
    }
}
