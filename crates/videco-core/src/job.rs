//! The Job type: one unit of batch work.

use crate::JobId;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A Job describes one input-to-output run of the external encoder.
///
/// Jobs are created by an enumerator, handed to a worker exactly once, and
/// never mutated. The `args` carry the encoder parameters that sit between
/// the input and the output path on the tool's command line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    /// Unique job identifier.
    pub id: JobId,

    /// Source media file.
    pub input: PathBuf,

    /// Destination file, created or overwritten by the external tool.
    pub output: PathBuf,

    /// Encoder arguments inserted between `-i <input>` and `<output>`.
    pub args: Vec<String>,
}

impl Job {
    /// Create a new Job.
    pub fn new(
        input: impl Into<PathBuf>,
        output: impl Into<PathBuf>,
        args: Vec<String>,
    ) -> Self {
        Self {
            id: JobId::generate(),
            input: input.into(),
            output: output.into(),
            args,
        }
    }

    /// Human-readable job name: the output file name, falling back to the
    /// full output path when it has no final component.
    pub fn name(&self) -> String {
        self.output
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.output.display().to_string())
    }
}
