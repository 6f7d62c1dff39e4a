//! Job executors: how each subcommand turns a Job into tool invocations.
//!
//! All executors share the same failure contract: the partial output file
//! is removed when the encode fails, soft metadata problems downgrade to
//! warnings, and anything else surfaces as a per-job error for the
//! scheduler to log.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use filetime::FileTime;
use tracing::{debug, warn};
use videco_core::Job;
use videco_ffmpeg::{FfmpegInvoker, Invocation, Metric};

use crate::scheduler::{JobError, JobExecutor, JobOutput};

fn fs_err(context: impl Into<String>, source: std::io::Error) -> JobError {
    JobError::Filesystem {
        context: context.into(),
        source,
    }
}

/// Remove a partial output left behind by a failed encode.
async fn remove_partial(output: &Path) {
    match tokio::fs::remove_file(output).await {
        Ok(()) => debug!(output = %output.display(), "Removed partial output"),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => warn!(output = %output.display(), error = %e, "Failed to remove partial output"),
    }
}

async fn output_size(output: &Path) -> Result<u64, JobError> {
    tokio::fs::metadata(output)
        .await
        .map(|m| m.len())
        .map_err(|e| fs_err(format!("stat output '{}'", output.display()), e))
}

/// Copy the source file's mtime onto the output.
fn copy_mtime(src: &Path, dst: &Path) -> std::io::Result<()> {
    let meta = std::fs::metadata(src)?;
    filetime::set_file_mtime(dst, FileTime::from_last_modification_time(&meta))
}

/// Run the encode for a job, clean up on failure, and optionally verify
/// the produced file with the prober.
async fn encode_job(
    invoker: &FfmpegInvoker,
    job: &Job,
    extra_args: &[String],
    verify: bool,
) -> Result<Invocation, JobError> {
    let mut args = job.args.clone();
    args.extend_from_slice(extra_args);

    let inv = match invoker
        .run_ffmpeg(&job.input, &args, job.output.as_os_str())
        .await
    {
        Ok(inv) => inv,
        Err(e) => {
            remove_partial(&job.output).await;
            return Err(e.into());
        }
    };

    if verify {
        if let Err(e) = invoker.verify_readable(&job.output).await {
            remove_partial(&job.output).await;
            return Err(e.into());
        }
    }

    Ok(inv)
}

/// Plain executor: runs a job's arguments as-is. Used for remuxing and
/// any job whose argument vector is fully determined at enumeration time.
pub struct EncodeExecutor {
    invoker: FfmpegInvoker,
    verify: bool,
}

impl EncodeExecutor {
    pub fn new(invoker: FfmpegInvoker, verify: bool) -> Self {
        Self { invoker, verify }
    }
}

#[async_trait]
impl JobExecutor for EncodeExecutor {
    async fn execute(&self, job: &Job) -> Result<JobOutput, JobError> {
        let inv = encode_job(&self.invoker, job, &[], self.verify).await?;
        let size = output_size(&job.output).await?;
        Ok(JobOutput {
            elapsed: inv.elapsed,
            output_size: Some(size),
            metric: Some(format!("fps={}", Metric::Fps.extract_or_unknown(&inv.stderr))),
        })
    }
}

/// Directory-conversion executor: carries the source timestamps across
/// the encode and optionally moves processed sources aside.
pub struct ConvertExecutor {
    invoker: FfmpegInvoker,
    verify: bool,
    move_to: Option<PathBuf>,
}

impl ConvertExecutor {
    pub fn new(invoker: FfmpegInvoker, verify: bool, move_to: Option<PathBuf>) -> Self {
        Self {
            invoker,
            verify,
            move_to,
        }
    }
}

#[async_trait]
impl JobExecutor for ConvertExecutor {
    async fn execute(&self, job: &Job) -> Result<JobOutput, JobError> {
        // Container creation_time survives the encode only if re-stated
        // explicitly. Any probe failure (missing tag, unreadable file,
        // prober not installed) means encoding without the tag, never
        // failing the job before the encoder has run.
        let mut extra_args = Vec::new();
        match self.invoker.probe_creation_time(&job.input).await {
            Ok(ts) => {
                extra_args.push("-metadata".to_string());
                extra_args.push(format!("creation_time={ts}"));
            }
            Err(e) => {
                warn!(input = %job.input.display(), error = %e, "no metadata timestamp");
            }
        }

        let inv = encode_job(&self.invoker, job, &extra_args, self.verify).await?;

        if let Err(e) = copy_mtime(&job.input, &job.output) {
            warn!(input = %job.input.display(), error = %e, "no filesystem timestamp");
        }

        if let Some(dir) = &self.move_to {
            let dest = dir.join(job.input.file_name().unwrap_or(job.input.as_os_str()));
            tokio::fs::rename(&job.input, &dest)
                .await
                .map_err(|e| fs_err(format!("move source to '{}'", dest.display()), e))?;
        }

        let size = output_size(&job.output).await?;
        Ok(JobOutput {
            elapsed: inv.elapsed,
            output_size: Some(size),
            metric: None,
        })
    }
}

/// Parameter-sweep executor: reports output size relative to the source
/// and, when enabled, a VMAF score of the encode against it.
pub struct SweepExecutor {
    invoker: FfmpegInvoker,
    reference: PathBuf,
    reference_size: u64,
    vmaf: bool,
    verify: bool,
}

impl SweepExecutor {
    pub fn new(
        invoker: FfmpegInvoker,
        reference: PathBuf,
        reference_size: u64,
        vmaf: bool,
        verify: bool,
    ) -> Self {
        Self {
            invoker,
            reference,
            reference_size,
            vmaf,
            verify,
        }
    }
}

#[async_trait]
impl JobExecutor for SweepExecutor {
    async fn execute(&self, job: &Job) -> Result<JobOutput, JobError> {
        let inv = encode_job(&self.invoker, job, &[], self.verify).await?;
        let size = output_size(&job.output).await?;
        let ratio = if self.reference_size > 0 {
            size as f64 / self.reference_size as f64 * 100.0
        } else {
            0.0
        };

        let metric = if self.vmaf {
            let score = match self.invoker.score_vmaf(&self.reference, &job.output).await {
                Ok(score) => score,
                Err(e) => {
                    warn!(job = %job.name(), error = %e, "VMAF scoring failed");
                    videco_ffmpeg::UNKNOWN.to_string()
                }
            };
            format!("{ratio:.2}% VMAF {score}")
        } else {
            format!(
                "{ratio:.2}% fps={}",
                Metric::Fps.extract_or_unknown(&inv.stderr)
            )
        };

        Ok(JobOutput {
            elapsed: inv.elapsed,
            output_size: Some(size),
            metric: Some(metric),
        })
    }
}
