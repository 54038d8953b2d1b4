//! Session-scoped crawl jobs
//!
//! A [`Session`] belongs to one caller (one connection, one CLI run). It
//! allows a single crawl at a time, hands out a cancellation handle and an
//! event stream for each crawl, and frees itself for the next crawl when the
//! current one ends, however it ends.

use crate::config::{validate_request, CrawlRequest, Settings};
use crate::crawler::{build_http_client, CrawlEngine, CrawlEvent, CrawlOutcome, EventSink};
use crate::job::status::JobStatus;
use crate::TrawlError;
use reqwest::Client;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Mutable per-session bookkeeping
#[derive(Debug, Default)]
struct JobSlot {
    status: JobStatus,

    /// Incremented for every started crawl
    job_id: u64,

    target: Option<String>,

    cancel: Option<CancellationToken>,
}

/// One caller's crawl controller
#[derive(Clone)]
pub struct Session {
    client: Client,
    slot: Arc<Mutex<JobSlot>>,
}

impl Session {
    /// Creates a session whose HTTP client is built from the settings
    pub fn new(settings: &Settings) -> crate::Result<Self> {
        let client = build_http_client(&settings.user_agent)?;
        Ok(Self::with_client(client))
    }

    /// Creates a session that fetches with the given client
    pub fn with_client(client: Client) -> Self {
        Self {
            client,
            slot: Arc::new(Mutex::new(JobSlot::default())),
        }
    }

    /// Status of the most recent crawl
    pub fn status(&self) -> JobStatus {
        lock(&self.slot).status
    }

    /// Starts a crawl in the background
    ///
    /// Must be called from within a Tokio runtime.
    ///
    /// # Errors
    ///
    /// * `TrawlError::Config` - The request is invalid (bad seed URL, zero budget, ...)
    /// * `TrawlError::JobAlreadyRunning` - This session already has a running crawl;
    ///   the running crawl is left untouched
    pub fn start(&self, request: &CrawlRequest) -> crate::Result<CrawlJob> {
        let config = validate_request(request)?;
        let token = CancellationToken::new();

        let job_id = {
            let mut slot = lock(&self.slot);
            if !slot.status.accepts_start() {
                return Err(TrawlError::JobAlreadyRunning {
                    target: slot.target.clone().unwrap_or_default(),
                });
            }

            slot.job_id += 1;
            slot.status = JobStatus::Running;
            slot.target = Some(config.target.clone());
            slot.cancel = Some(token.clone());
            slot.job_id
        };

        tracing::info!("Job {} started for {}", job_id, config.start_url);

        let (tx, rx) = unbounded_channel();
        let guard = RunningGuard {
            slot: Arc::clone(&self.slot),
            job_id,
            released: false,
        };
        let engine = CrawlEngine::new(config, self.client.clone(), token.clone());
        let task = tokio::spawn(run_job(engine, tx, guard));

        Ok(CrawlJob {
            events: rx,
            cancel: CancelHandle { token },
            task,
        })
    }

    /// Cancels the running crawl, if any
    pub fn cancel(&self) {
        let slot = lock(&self.slot);
        if slot.status == JobStatus::Running {
            if let Some(token) = &slot.cancel {
                tracing::info!("Cancelling job {}", slot.job_id);
                token.cancel();
            }
        }
    }
}

async fn run_job(
    mut engine: CrawlEngine,
    tx: UnboundedSender<CrawlEvent>,
    guard: RunningGuard,
) {
    let status = match engine.run(&tx).await {
        Ok(CrawlOutcome::Completed(_)) => JobStatus::Completed,
        Ok(CrawlOutcome::Cancelled { .. }) => JobStatus::Cancelled,
        Err(e) => {
            tracing::error!("Job {} failed: {}", guard.job_id, e);
            tx.error(e.to_string());
            JobStatus::Idle
        }
    };

    guard.release(status);
}

/// Frees the session slot when a job ends, including by panic or abort
struct RunningGuard {
    slot: Arc<Mutex<JobSlot>>,
    job_id: u64,
    released: bool,
}

impl RunningGuard {
    fn release(mut self, status: JobStatus) {
        self.set_status(status);
        self.released = true;
    }

    fn set_status(&self, status: JobStatus) {
        let mut slot = lock(&self.slot);
        if slot.job_id == self.job_id {
            slot.status = status;
            slot.cancel = None;
        }
    }
}

impl Drop for RunningGuard {
    fn drop(&mut self) {
        if !self.released {
            tracing::warn!("Job {} ended abnormally, releasing session", self.job_id);
            self.set_status(JobStatus::Idle);
        }
    }
}

fn lock(slot: &Mutex<JobSlot>) -> MutexGuard<'_, JobSlot> {
    slot.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Idempotent handle that stops a crawl
#[derive(Debug, Clone)]
pub struct CancelHandle {
    token: CancellationToken,
}

impl CancelHandle {
    /// Requests cancellation; repeated calls and calls after completion are no-ops
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

/// A started crawl: its event stream and its cancellation handle
pub struct CrawlJob {
    events: UnboundedReceiver<CrawlEvent>,
    cancel: CancelHandle,
    task: JoinHandle<()>,
}

impl CrawlJob {
    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Waits for the next event; None once the crawl has ended and all events are drained
    pub async fn next_event(&mut self) -> Option<CrawlEvent> {
        self.events.recv().await
    }

    /// Drains every remaining event until the crawl ends
    pub async fn collect(mut self) -> Vec<CrawlEvent> {
        let mut events = Vec::new();
        while let Some(event) = self.events.recv().await {
            events.push(event);
        }
        self.wait().await;
        events
    }

    /// Waits for the crawl task to finish
    pub async fn wait(self) {
        if let Err(e) = self.task.await {
            tracing::error!("Crawl task did not finish cleanly: {}", e);
        }
    }
}
