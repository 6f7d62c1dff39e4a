//! Error types for the ffmpeg SDK.

use thiserror::Error;

/// Errors that can occur while driving the external tools.
#[derive(Debug, Error)]
pub enum FfmpegError {
    /// Failed to spawn the child process (binary missing, permissions).
    #[error("Failed to spawn '{program}': {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },

    /// The child process exited non-zero.
    #[error("'{program}' exited with code {code}: {stderr}")]
    ProcessFailure {
        program: String,
        /// Exit code, or -1 when the process was killed by a signal.
        code: i32,
        stderr: String,
    },

    /// ffprobe produced JSON we could not parse.
    #[error("Failed to parse ffprobe output: {0}")]
    ProbeParse(#[from] serde_json::Error),

    /// The probed file carries no creation_time tag.
    #[error("No creation_time tag in '{0}'")]
    MissingCreationTime(String),
}
