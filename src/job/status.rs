//! Job status definitions for a crawl session

use std::fmt;

/// Represents the state of the most recent crawl on a session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum JobStatus {
    /// No crawl has run yet, or the last one failed to run
    #[default]
    Idle,

    /// A crawl is in progress; new starts are rejected
    Running,

    /// The last crawl ran out of work and emitted its summary
    Completed,

    /// The last crawl was cancelled
    Cancelled,
}

impl JobStatus {
    /// Returns true if a new crawl may be started
    pub fn accepts_start(&self) -> bool {
        !matches!(self, Self::Running)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
