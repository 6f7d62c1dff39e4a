//! ffmpeg/ffprobe SDK for Videco.
//!
//! This crate treats the encoder and prober as opaque command-line tools:
//! argument vector in, exit code plus captured stdout/stderr text out.
//! Nothing here inspects media bitstreams; the only contract with the
//! tools is "non-zero exit means failure" and "known line patterns appear
//! in the captured output on success".
//!
//! The line patterns (`fps=`, `VMAF score:`) are an external, versioned
//! contract this crate is fragile to. They are isolated in [`scrape`] so a
//! tool upgrade that changes them is a one-module fix.

pub mod error;
pub mod invoke;
pub mod probe;
pub mod scrape;

pub use error::FfmpegError;
pub use invoke::{FfmpegInvoker, Invocation};
pub use scrape::{Metric, UNKNOWN};
