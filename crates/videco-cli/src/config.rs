//! Harness configuration.
//!
//! Built once from the command line and passed by reference into the
//! enumerator and scheduler. There is no global mutable configuration.

use videco_ffmpeg::FfmpegInvoker;

/// Immutable configuration for one batch run.
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum number of concurrently running jobs.
    pub jobs: usize,

    /// Invoker carrying the tool binary prefix.
    pub invoker: FfmpegInvoker,

    /// Probe each produced file after a clean encoder exit and fail the
    /// job when the prober cannot read it.
    pub verify: bool,
}

impl Config {
    /// Default concurrency: one job per available processing unit.
    pub fn default_jobs() -> usize {
        std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(4)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            jobs: Self::default_jobs(),
            invoker: FfmpegInvoker::new(),
            verify: false,
        }
    }
}
