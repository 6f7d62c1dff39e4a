//! Metric scraping from captured tool output.
//!
//! The patterns here match specific lines the encoder prints on stderr.
//! They are version-sensitive: an encoder upgrade can change them without
//! any other observable break. Keeping them behind this one interface
//! means callers never touch the regexes directly.

use regex::Regex;
use std::sync::OnceLock;

/// Sentinel returned when a metric pattern is absent from the output.
pub const UNKNOWN: &str = "?";

/// A single numeric field scraped from captured tool output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    /// Encoding speed from the progress line, e.g. `fps=  24.1`.
    Fps,
    /// Quality score from the libvmaf filter, e.g. `VMAF score: 93.42`.
    VmafScore,
}

impl Metric {
    fn regex(&self) -> &'static Regex {
        static FPS: OnceLock<Regex> = OnceLock::new();
        static VMAF: OnceLock<Regex> = OnceLock::new();
        match self {
            // unwrap: patterns are compile-time constants
            Metric::Fps => FPS.get_or_init(|| Regex::new(r"fps=\s*([\d.]+)").unwrap()),
            Metric::VmafScore => {
                VMAF.get_or_init(|| Regex::new(r"VMAF score: ([.\d]+)").unwrap())
            }
        }
    }

    /// Extract the metric from captured text, if present.
    ///
    /// The encoder repeats its progress line as it runs; the last
    /// occurrence is the final value, so that is the one returned.
    pub fn extract<'t>(&self, text: &'t str) -> Option<&'t str> {
        self.regex()
            .captures_iter(text)
            .last()
            .and_then(|c| c.get(1))
            .map(|m| m.as_str())
    }

    /// Extract the metric, substituting the [`UNKNOWN`] sentinel when the
    /// pattern is absent. Absence is not an error: the run that produced
    /// the text already succeeded.
    pub fn extract_or_unknown(&self, text: &str) -> String {
        self.extract(text)
            .map(str::to_owned)
            .unwrap_or_else(|| UNKNOWN.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fps_extraction() {
        let text = "frame= 240 fps=  24.1 q=28.0 size= 1024KiB";
        assert_eq!(Metric::Fps.extract(text), Some("24.1"));
    }

    #[test]
    fn test_fps_last_occurrence_wins() {
        let text = "frame= 100 fps= 30.5 ...\nframe= 240 fps= 24.1 ...";
        assert_eq!(Metric::Fps.extract(text), Some("24.1"));
    }

    #[test]
    fn test_vmaf_extraction() {
        let text = "[libvmaf @ 0x55] VMAF score: 93.42\n";
        assert_eq!(Metric::VmafScore.extract(text), Some("93.42"));
    }

    #[test]
    fn test_absent_pattern_yields_unknown() {
        assert_eq!(Metric::VmafScore.extract_or_unknown("no score here"), "?");
        assert_eq!(Metric::Fps.extract("speed=1.2x"), None);
    }
}
