//! Subprocess invocation for the external encoder.
//!
//! Builds an argument vector, spawns the tool via `tokio::process`, waits
//! for it to exit, and captures both output streams as text. The output
//! file on disk is a side effect owned by the caller afterwards.

use std::ffi::OsStr;
use std::path::Path;
use std::process::Stdio;
use std::time::{Duration, Instant};

use tokio::process::Command;
use tracing::{debug, info};

use crate::error::FfmpegError;
use crate::scrape::Metric;

/// Captured outcome of one successful tool run.
#[derive(Debug, Clone)]
pub struct Invocation {
    /// Wall-clock time from spawn to exit.
    pub elapsed: Duration,

    /// Captured standard output.
    pub stdout: String,

    /// Captured standard error. ffmpeg writes its progress and score
    /// lines here.
    pub stderr: String,
}

/// Invoker for the ffmpeg/ffprobe binaries.
///
/// The prefix is prepended verbatim to the tool name, so a directory
/// prefix must keep its trailing separator (`/opt/ffmpeg/bin/`). An empty
/// prefix resolves the tools through `PATH`.
#[derive(Debug, Clone, Default)]
pub struct FfmpegInvoker {
    bin_prefix: String,
}

impl FfmpegInvoker {
    /// Create an invoker that resolves tools through `PATH`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an invoker with a binary prefix.
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            bin_prefix: prefix.into(),
        }
    }

    /// Resolved ffmpeg binary name.
    pub fn ffmpeg_bin(&self) -> String {
        format!("{}ffmpeg", self.bin_prefix)
    }

    /// Resolved ffprobe binary name.
    pub fn ffprobe_bin(&self) -> String {
        format!("{}ffprobe", self.bin_prefix)
    }

    /// Run an arbitrary tool to completion, capturing its output.
    ///
    /// Returns `ProcessFailure` with the exit code and captured stderr on
    /// non-zero exit.
    pub async fn run_tool<I, S>(&self, program: &str, args: I) -> Result<Invocation, FfmpegError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let mut cmd = Command::new(program);
        cmd.args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        debug!(program = %program, "Spawning tool: {:?}", cmd);

        let start = Instant::now();
        let output = cmd.output().await.map_err(|e| FfmpegError::Spawn {
            program: program.to_string(),
            source: e,
        })?;
        let elapsed = start.elapsed();

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

        if !output.status.success() {
            let code = output.status.code().unwrap_or(-1);
            info!(program = %program, code = code, "Tool exited non-zero");
            return Err(FfmpegError::ProcessFailure {
                program: program.to_string(),
                code,
                stderr,
            });
        }

        Ok(Invocation {
            elapsed,
            stdout,
            stderr,
        })
    }

    /// Run an encode: `ffmpeg -hide_banner -v info -nostdin -y -i <input>
    /// <args...> <output>`.
    pub async fn run_ffmpeg(
        &self,
        input: &Path,
        args: &[String],
        output: &OsStr,
    ) -> Result<Invocation, FfmpegError> {
        let mut argv: Vec<std::ffi::OsString> = vec![
            "-hide_banner".into(),
            "-v".into(),
            "info".into(),
            "-nostdin".into(),
            "-y".into(),
            "-i".into(),
            input.as_os_str().to_owned(),
        ];
        argv.extend(args.iter().map(Into::into));
        argv.push(output.to_owned());

        self.run_tool(&self.ffmpeg_bin(), argv).await
    }

    /// Score a distorted encode against its reference with libvmaf.
    ///
    /// Returns the score as scraped text, or the unknown sentinel when the
    /// score line is absent from a successful run.
    pub async fn score_vmaf(
        &self,
        reference: &Path,
        distorted: &Path,
    ) -> Result<String, FfmpegError> {
        let args = vec![
            "-i".to_string(),
            reference.display().to_string(),
            "-lavfi".to_string(),
            "libvmaf".to_string(),
            "-f".to_string(),
            "null".to_string(),
        ];
        let inv = self.run_ffmpeg(distorted, &args, OsStr::new("-")).await?;
        Ok(Metric::VmafScore.extract_or_unknown(&inv.stderr))
    }
}
