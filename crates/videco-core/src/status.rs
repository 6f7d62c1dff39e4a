//! Terminal status of a Job.

use serde::{Deserialize, Serialize};

/// Outcome of a single job.
///
/// Jobs have no observable intermediate lifecycle: they are enumerated,
/// executed once, and land in exactly one of these states. A failed job
/// never aborts its siblings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobStatus {
    /// The external tool exited zero and the output passed any
    /// configured verification.
    Completed,
    /// The external tool exited non-zero, verification failed, or a
    /// filesystem step for this job failed.
    Failed,
}

impl JobStatus {
    /// Returns true if the job finished successfully.
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Completed)
    }
}
