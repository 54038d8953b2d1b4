//! Output module for presenting crawl events
//!
//! This module handles:
//! - Rendering events as human readable console lines
//! - Rendering events as JSON lines for other programs
//! - Printing the end-of-crawl contact summary

use crate::crawler::{CrawlEvent, DoneEvent};

/// How events are written to stdout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Renders a single event in the given format
///
/// Text rendering of a `done` event is the full summary produced by
/// [`format_summary`].
pub fn render_event(event: &CrawlEvent, format: OutputFormat) -> Result<String, serde_json::Error> {
    match format {
        OutputFormat::Json => serde_json::to_string(event),
        OutputFormat::Text => Ok(render_text(event)),
    }
}

fn render_text(event: &CrawlEvent) -> String {
    match event {
        CrawlEvent::Page(page) => {
            let status = if page.status == 0 {
                "failed".to_string()
            } else {
                page.status.to_string()
            };
            format!("[page] {} ({})", page.url, status)
        }
        CrawlEvent::Found(found) => {
            let mut parts = Vec::new();
            if !found.emails.is_empty() {
                parts.push(format!("emails: {}", found.emails.join(", ")));
            }
            if !found.phones.is_empty() {
                parts.push(format!("phones: {}", found.phones.join(", ")));
            }
            format!("[found] {}", parts.join("; "))
        }
        CrawlEvent::Done(done) => format_summary(done),
        CrawlEvent::Error(error) => format!("[error] {}", error.message),
    }
}

/// Formats the end-of-crawl summary
pub fn format_summary(done: &DoneEvent) -> String {
    let mut out = String::new();

    out.push_str("\n=== Crawl Summary ===\n\n");
    out.push_str(&format!("Target: {}\n", done.target));
    out.push_str(&format!("Pages visited: {}\n", done.pages_visited.len()));
    for page in &done.pages_visited {
        out.push_str(&format!("  - {}\n", page));
    }

    out.push_str(&format!("\nEmails ({}):\n", done.total_emails));
    for email in &done.emails {
        out.push_str(&format!("  - {}\n", email));
    }

    out.push_str(&format!("\nPhones ({}):\n", done.total_phones));
    for phone in &done.phones {
        out.push_str(&format!("  - {}\n", phone));
    }

    out
}
