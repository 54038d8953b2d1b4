//! Job control for crawls
//!
//! - `Session`: one caller's controller, enforcing a single running crawl
//! - `CrawlJob`: the event stream and cancellation handle of a started crawl
//! - `JobStatus`: what the session's most recent crawl is doing

mod controller;
mod status;

pub use controller::{CancelHandle, CrawlJob, Session};
pub use status::JobStatus;
