//! Bounded-concurrency job scheduling.
//!
//! Admission control is a semaphore: a submitting task waits for a permit
//! before spawning each job, so at most `limit` jobs run at any moment
//! and the next pending job is admitted the instant a permit frees up.
//! There is no polling and no sleep.
//!
//! A job failure never aborts its siblings; this is a best-effort batch,
//! not a transaction. The harness exit code reflects only harness
//! failures, so callers must read the log stream (or the returned
//! results) for per-job outcomes.
//!
//! Termination of the harness does not propagate into already-started
//! child processes; they may be orphaned.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use thiserror::Error;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{error, info};
use videco_core::{Job, JobResult};

/// What a job's worker produced on success.
#[derive(Debug, Clone, Default)]
pub struct JobOutput {
    /// Wall-clock time spent in the external tool.
    pub elapsed: Duration,

    /// Size of the produced output file, when it could be stated.
    pub output_size: Option<u64>,

    /// Scraped metric to log alongside the job.
    pub metric: Option<String>,
}

/// Per-job failure, caught at the job boundary and logged.
#[derive(Debug, Error)]
pub enum JobError {
    /// The external tool failed for this job.
    #[error(transparent)]
    Ffmpeg(#[from] videco_ffmpeg::FfmpegError),

    /// A filesystem step for this job failed.
    #[error("{context}: {source}")]
    Filesystem {
        context: String,
        source: std::io::Error,
    },
}

/// Execution seam between the scheduler and the external tool, so the
/// scheduler is testable without spawning real processes.
#[async_trait]
pub trait JobExecutor: Send + Sync + 'static {
    /// Run one job to completion.
    async fn execute(&self, job: &Job) -> Result<JobOutput, JobError>;
}

/// Run every job with at most `limit` in flight, in submission order.
///
/// Returns once every job has reached a terminal state; no result is
/// dropped. The result order follows completion, not submission.
pub async fn run_jobs<E: JobExecutor>(
    jobs: impl IntoIterator<Item = Job>,
    limit: usize,
    executor: Arc<E>,
) -> Vec<JobResult> {
    let limit = limit.max(1);
    let semaphore = Arc::new(Semaphore::new(limit));
    let mut set = JoinSet::new();
    let mut submitted = 0usize;

    for job in jobs {
        // Blocks admission until a running job releases its permit. The
        // semaphore is never closed while we hold an Arc to it.
        let permit = semaphore
            .clone()
            .acquire_owned()
            .await
            .expect("semaphore closed");
        submitted += 1;
        let executor = executor.clone();

        set.spawn(async move {
            let _permit = permit;
            let name = job.name();
            let started_at = Utc::now();
            info!(job = %name, input = %job.input.display(), "starting");

            match executor.execute(&job).await {
                Ok(out) => {
                    let mut result = JobResult::completed(&job, started_at, out.elapsed);
                    if let Some(size) = out.output_size {
                        result = result.with_output_size(size);
                    }
                    if let Some(metric) = out.metric {
                        result = result.with_metric(metric);
                    }
                    info!(
                        job = %name,
                        elapsed_secs = out.elapsed.as_secs_f64(),
                        size = result.output_size,
                        metric = result.metric.as_deref(),
                        "finished"
                    );
                    result
                }
                Err(e) => {
                    error!(job = %name, error = %e, "error");
                    JobResult::failed(&job, started_at, e.to_string())
                }
            }
        });
    }

    let mut results = Vec::with_capacity(submitted);
    while let Some(joined) = set.join_next().await {
        match joined {
            Ok(result) => results.push(result),
            // A panic inside an executor is a harness bug, not a job
            // failure; surface it loudly but keep draining.
            Err(e) => error!(error = %e, "job task panicked"),
        }
    }
    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use videco_core::JobId;

    /// Mock executor that tracks concurrency and attempts.
    struct MockExecutor {
        running: AtomicUsize,
        high_water: AtomicUsize,
        attempts: Mutex<Vec<JobId>>,
        fail_name: Option<String>,
    }

    impl MockExecutor {
        fn new(fail_name: Option<&str>) -> Self {
            Self {
                running: AtomicUsize::new(0),
                high_water: AtomicUsize::new(0),
                attempts: Mutex::new(Vec::new()),
                fail_name: fail_name.map(str::to_owned),
            }
        }
    }

    #[async_trait]
    impl JobExecutor for MockExecutor {
        async fn execute(&self, job: &Job) -> Result<JobOutput, JobError> {
            let now = self.running.fetch_add(1, Ordering::SeqCst) + 1;
            self.high_water.fetch_max(now, Ordering::SeqCst);
            self.attempts.lock().unwrap().push(job.id.clone());

            tokio::time::sleep(Duration::from_millis(10)).await;
            self.running.fetch_sub(1, Ordering::SeqCst);

            if self.fail_name.as_deref() == Some(job.name().as_str()) {
                return Err(JobError::Filesystem {
                    context: "simulated tool failure".to_string(),
                    source: std::io::Error::other("exit code 1"),
                });
            }
            Ok(JobOutput {
                elapsed: Duration::from_millis(10),
                output_size: Some(100),
                metric: None,
            })
        }
    }

    fn jobs(count: usize) -> Vec<Job> {
        (0..count)
            .map(|i| Job::new(format!("in/{i}.mp4"), format!("out/{i}.mp4"), vec![]))
            .collect()
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrency_never_exceeds_limit() {
        for limit in [1usize, 2, 3] {
            let executor = Arc::new(MockExecutor::new(None));
            let results = run_jobs(jobs(9), limit, executor.clone()).await;
            assert_eq!(results.len(), 9);
            assert!(
                executor.high_water.load(Ordering::SeqCst) <= limit,
                "limit {limit} exceeded"
            );
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_every_job_attempted_exactly_once() {
        let executor = Arc::new(MockExecutor::new(None));
        let input = jobs(7);
        let expected: HashSet<JobId> = input.iter().map(|j| j.id.clone()).collect();

        let results = run_jobs(input, 3, executor.clone()).await;

        assert_eq!(results.len(), 7);
        let attempts = executor.attempts.lock().unwrap();
        assert_eq!(attempts.len(), 7);
        let attempted: HashSet<JobId> = attempts.iter().cloned().collect();
        assert_eq!(attempted, expected);
    }

    #[tokio::test]
    async fn test_zero_jobs_is_a_noop() {
        let executor = Arc::new(MockExecutor::new(None));
        let results = run_jobs(jobs(0), 2, executor).await;
        assert!(results.is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_single_failure_does_not_stop_siblings() {
        let executor = Arc::new(MockExecutor::new(Some("2.mp4")));
        let results = run_jobs(jobs(5), 2, executor).await;

        assert_eq!(results.len(), 5);
        let failed: Vec<_> = results.iter().filter(|r| !r.is_ok()).collect();
        assert_eq!(failed.len(), 1);
        assert_eq!(failed[0].name, "2.mp4");
        let error = failed[0].error.as_deref().unwrap();
        assert!(error.contains("simulated tool failure"));
        assert!(error.contains("exit code 1"));
        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 4);
    }

    #[tokio::test]
    async fn test_limit_zero_is_clamped_to_one() {
        let executor = Arc::new(MockExecutor::new(None));
        let results = run_jobs(jobs(2), 0, executor.clone()).await;
        assert_eq!(results.len(), 2);
        assert_eq!(executor.high_water.load(Ordering::SeqCst), 1);
    }
}
