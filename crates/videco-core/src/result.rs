//! Per-job outcomes, consumed by the log stream and nothing else.

use crate::{Job, JobId, JobStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Outcome of running a single Job.
///
/// Produced by a worker, logged, and dropped: results are never persisted
/// beyond the log stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobResult {
    /// Identifier of the job this result belongs to.
    pub job_id: JobId,

    /// Display name of the job (its output file name).
    pub name: String,

    /// Terminal status.
    pub status: JobStatus,

    /// When the worker picked the job up.
    pub started_at: DateTime<Utc>,

    /// When the job reached its terminal state.
    pub finished_at: DateTime<Utc>,

    /// Wall-clock time the job spent running: the external tool's run
    /// time on success, time from pickup to failure otherwise.
    pub elapsed: Duration,

    /// Size of the produced output file; absent on failure.
    pub output_size: Option<u64>,

    /// Scraped quality/speed metric, if one was requested.
    pub metric: Option<String>,

    /// Error text for failed jobs (exit code and captured stderr).
    pub error: Option<String>,
}

impl JobResult {
    /// Record a successful job.
    pub fn completed(job: &Job, started_at: DateTime<Utc>, elapsed: Duration) -> Self {
        Self {
            job_id: job.id.clone(),
            name: job.name(),
            status: JobStatus::Completed,
            started_at,
            finished_at: Utc::now(),
            elapsed,
            output_size: None,
            metric: None,
            error: None,
        }
    }

    /// Record a failed job. Elapsed time is the pickup-to-failure delta,
    /// so slow failures are visible in the log too.
    pub fn failed(job: &Job, started_at: DateTime<Utc>, error: impl Into<String>) -> Self {
        let finished_at = Utc::now();
        let elapsed = (finished_at - started_at).to_std().unwrap_or(Duration::ZERO);
        Self {
            job_id: job.id.clone(),
            name: job.name(),
            status: JobStatus::Failed,
            started_at,
            finished_at,
            elapsed,
            output_size: None,
            metric: None,
            error: Some(error.into()),
        }
    }

    /// Builder method to attach the output file size.
    pub fn with_output_size(mut self, size: u64) -> Self {
        self.output_size = Some(size);
        self
    }

    /// Builder method to attach a scraped metric.
    pub fn with_metric(mut self, metric: impl Into<String>) -> Self {
        self.metric = Some(metric.into());
        self
    }

    /// Returns true if the job finished successfully.
    pub fn is_ok(&self) -> bool {
        self.status.is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job() -> Job {
        Job::new("/in/a.mp4", "/out/a.mp4", vec![])
    }

    #[test]
    fn test_completed_result() {
        let j = job();
        let r = JobResult::completed(&j, Utc::now(), Duration::from_secs(3))
            .with_output_size(1024)
            .with_metric("93.42");
        assert!(r.is_ok());
        assert_eq!(r.output_size, Some(1024));
        assert_eq!(r.metric.as_deref(), Some("93.42"));
        assert!(r.error.is_none());
    }

    #[test]
    fn test_failed_result_carries_error_text() {
        let j = job();
        let r = JobResult::failed(&j, Utc::now(), "exit code 1: unknown encoder");
        assert!(!r.is_ok());
        assert_eq!(r.name, "a.mp4");
        assert!(r.error.as_deref().unwrap().contains("unknown encoder"));
    }

    #[test]
    fn test_failed_result_records_time_spent() {
        let j = job();
        let started_at = Utc::now() - chrono::Duration::seconds(2);
        let r = JobResult::failed(&j, started_at, "tool crashed");
        assert!(r.elapsed >= Duration::from_secs(2));
        assert!(r.finished_at >= r.started_at);
    }
}
