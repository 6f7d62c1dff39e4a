//! ffprobe metadata queries.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::error::FfmpegError;
use crate::invoke::FfmpegInvoker;

#[derive(Debug, Deserialize)]
struct ProbeOutput {
    #[serde(default)]
    format: FormatSection,
}

#[derive(Debug, Default, Deserialize)]
struct FormatSection {
    #[serde(default)]
    tags: HashMap<String, String>,
}

/// Pull the creation_time tag out of `ffprobe -of json -show_format` text.
fn parse_creation_time(json: &str, path: &Path) -> Result<String, FfmpegError> {
    let probe: ProbeOutput = serde_json::from_str(json)?;
    probe
        .format
        .tags
        .get("creation_time")
        .cloned()
        .ok_or_else(|| FfmpegError::MissingCreationTime(path.display().to_string()))
}

impl FfmpegInvoker {
    /// Read the container-level creation_time tag of a media file.
    ///
    /// Callers that can encode without the tag treat any error here as a
    /// warning, not a job failure.
    pub async fn probe_creation_time(&self, path: &Path) -> Result<String, FfmpegError> {
        let inv = self
            .run_tool(
                &self.ffprobe_bin(),
                [
                    "-v".as_ref(),
                    "error".as_ref(),
                    "-of".as_ref(),
                    "json".as_ref(),
                    "-show_format".as_ref(),
                    path.as_os_str(),
                ],
            )
            .await?;
        let ts = parse_creation_time(&inv.stdout, path)?;
        debug!(path = %path.display(), creation_time = %ts, "Probed creation time");
        Ok(ts)
    }

    /// Check that a produced file is readable by the prober.
    ///
    /// Used by the optional post-encode verification policy: a clean exit
    /// from the encoder does not guarantee a readable container.
    pub async fn verify_readable(&self, path: &Path) -> Result<(), FfmpegError> {
        self.run_tool(
            &self.ffprobe_bin(),
            [
                "-v".as_ref(),
                "error".as_ref(),
                "-show_format".as_ref(),
                path.as_os_str(),
            ],
        )
        .await?;
        Ok(())
    }
}
