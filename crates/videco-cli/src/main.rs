//! Videco - batch harness over external encoder/prober binaries.
//!
//! The harness enumerates jobs (a directory of files or a parameter
//! grid), runs the external tool for each with a bounded number in
//! flight, and reports per-job outcomes on the log stream. The process
//! exit code reflects only harness health: individual job failures are
//! logged, never fatal.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::info;

use videco_core::JobResult;
use videco_ffmpeg::FfmpegInvoker;

mod config;
mod enumerate;
mod executor;
mod logging;
mod remux;
mod scheduler;

use config::Config;
use enumerate::{dir_jobs, grid_jobs};
use executor::{ConvertExecutor, EncodeExecutor, SweepExecutor};
use scheduler::run_jobs;

/// Videco - batch transcode, quality-sweep and remux driver
#[derive(Parser)]
#[command(name = "videco")]
#[command(about = "Batch transcoding harness over ffmpeg/ffprobe", long_about = None)]
struct Cli {
    /// Maximum concurrently running jobs (default: available CPUs)
    #[arg(short = 'j', long, global = true)]
    jobs: Option<usize>,

    /// Prefix prepended to tool names, e.g. '/opt/ffmpeg/bin/'
    #[arg(long, default_value = "", global = true)]
    exe: String,

    /// Append-only log file
    #[arg(long, default_value = "videco.log", global = true)]
    log_file: PathBuf,

    /// Probe each produced file and fail the job when it is unreadable
    #[arg(long, global = true)]
    verify: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Re-encode every file in a directory
    Convert {
        /// Directory with source files
        #[arg(short, long)]
        input: PathBuf,

        /// Directory for encoded results
        #[arg(short, long)]
        output: PathBuf,

        /// Move successfully converted sources into this directory
        #[arg(short = 'm', long = "move")]
        move_to: Option<PathBuf>,

        /// Only convert files whose name matches this glob
        #[arg(long)]
        glob: Option<String>,

        /// Video codec
        #[arg(short, long, default_value = "libx265")]
        codec: String,

        /// Encoder preset
        #[arg(short, long, default_value = "medium")]
        preset: String,

        /// Constant rate factor
        #[arg(long, default_value_t = 27)]
        crf: u32,
    },

    /// Encode one file across a codec/preset/quality grid
    Sweep {
        /// Reference input file
        #[arg(short, long)]
        input: PathBuf,

        /// Directory for encoded results
        #[arg(short, long)]
        output: PathBuf,

        /// Codecs to sweep
        #[arg(long, num_args = 1.., required = true)]
        codecs: Vec<String>,

        /// Presets to sweep
        #[arg(long, num_args = 1.., required = true)]
        presets: Vec<String>,

        /// Quality (-cq) values to sweep
        #[arg(long, num_args = 1.., required = true)]
        qualities: Vec<u32>,

        /// Score each encode against the source with libvmaf
        #[arg(long)]
        vmaf: bool,
    },

    /// Merge app/voice audio tracks of screen recordings
    Remux {
        /// Directory with source recordings
        #[arg(short, long)]
        input: PathBuf,

        /// Directory for remuxed results
        #[arg(short, long)]
        output: PathBuf,

        /// Only remux files whose name matches this glob
        #[arg(long)]
        glob: Option<String>,

        /// Pass-through video arguments
        #[arg(long, default_value = "-c:v copy")]
        video_args: String,

        /// Volume applied to the application track
        #[arg(long, default_value_t = 1.0)]
        app_volume: f64,

        /// Volume applied to the voice track
        #[arg(long, default_value_t = 1.0)]
        voice_volume: f64,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let _guard = logging::init(&cli.log_file)?;

    let config = Config {
        jobs: cli.jobs.unwrap_or_else(Config::default_jobs),
        invoker: FfmpegInvoker::with_prefix(cli.exe),
        verify: cli.verify,
    };

    info!(jobs = config.jobs, verify = config.verify, "Starting videco batch");

    let results = match cli.command {
        Commands::Convert {
            input,
            output,
            move_to,
            glob,
            codec,
            preset,
            crf,
        } => convert(&config, input, output, move_to, glob, codec, preset, crf).await?,
        Commands::Sweep {
            input,
            output,
            codecs,
            presets,
            qualities,
            vmaf,
        } => sweep(&config, input, output, codecs, presets, qualities, vmaf).await?,
        Commands::Remux {
            input,
            output,
            glob,
            video_args,
            app_volume,
            voice_volume,
        } => {
            remux_dir(
                &config,
                input,
                output,
                glob,
                video_args,
                app_volume,
                voice_volume,
            )
            .await?
        }
    };

    let failed = results.iter().filter(|r| !r.is_ok()).count();
    info!(
        total = results.len(),
        completed = results.len() - failed,
        failed = failed,
        "batch finished"
    );

    // Per-job failures are visible on the log stream only: the exit code
    // stays zero unless the harness itself failed.
    Ok(())
}

#[allow(clippy::too_many_arguments)]
async fn convert(
    config: &Config,
    input: PathBuf,
    output: PathBuf,
    move_to: Option<PathBuf>,
    glob: Option<String>,
    codec: String,
    preset: String,
    crf: u32,
) -> Result<Vec<JobResult>, Box<dyn std::error::Error>> {
    let base_args = vec![
        "-c:a".to_string(),
        "copy".to_string(),
        "-c:v".to_string(),
        codec,
        "-preset".to_string(),
        preset,
        "-crf".to_string(),
        crf.to_string(),
    ];

    let jobs = dir_jobs(&input, &output, glob.as_deref(), &base_args)?;
    info!(count = jobs.len(), input = %input.display(), "Enumerated conversion jobs");

    tokio::fs::create_dir_all(&output).await?;
    if let Some(dir) = &move_to {
        tokio::fs::create_dir_all(dir).await?;
    }

    let executor = Arc::new(ConvertExecutor::new(
        config.invoker.clone(),
        config.verify,
        move_to,
    ));
    Ok(run_jobs(jobs, config.jobs, executor).await)
}

async fn sweep(
    config: &Config,
    input: PathBuf,
    output: PathBuf,
    codecs: Vec<String>,
    presets: Vec<String>,
    qualities: Vec<u32>,
    vmaf: bool,
) -> Result<Vec<JobResult>, Box<dyn std::error::Error>> {
    let reference_size = tokio::fs::metadata(&input).await?.len();
    tokio::fs::create_dir_all(&output).await?;

    let jobs: Vec<_> = grid_jobs(&input, &output, &codecs, &presets, &qualities).collect();
    info!(count = jobs.len(), input = %input.display(), "Enumerated sweep jobs");

    let executor = Arc::new(SweepExecutor::new(
        config.invoker.clone(),
        input,
        reference_size,
        vmaf,
        config.verify,
    ));
    Ok(run_jobs(jobs, config.jobs, executor).await)
}

async fn remux_dir(
    config: &Config,
    input: PathBuf,
    output: PathBuf,
    glob: Option<String>,
    video_args: String,
    app_volume: f64,
    voice_volume: f64,
) -> Result<Vec<JobResult>, Box<dyn std::error::Error>> {
    let args = remux::remux_args(&video_args, app_volume, voice_volume);
    let jobs = dir_jobs(&input, &output, glob.as_deref(), &args)?;
    info!(count = jobs.len(), input = %input.display(), "Enumerated remux jobs");

    tokio::fs::create_dir_all(&output).await?;

    let executor = Arc::new(EncodeExecutor::new(config.invoker.clone(), config.verify));
    Ok(run_jobs(jobs, config.jobs, executor).await)
}
