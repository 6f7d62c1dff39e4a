//! Job enumeration: parameter grids and directory listings.
//!
//! Both variants are pure apart from the directory read. The grid is a
//! lazy cartesian product with a deterministic order; the directory
//! listing yields files in whatever order the platform's `read_dir`
//! produces them, which is not guaranteed to be stable across platforms.

use std::io;
use std::path::{Path, PathBuf};

use globset::{Glob, GlobMatcher};
use thiserror::Error;
use tracing::debug;
use videco_core::{sweep_output_name, Job};

/// Errors from job enumeration.
#[derive(Debug, Error)]
pub enum EnumerateError {
    /// The glob pattern did not compile.
    #[error("Invalid glob pattern '{pattern}': {source}")]
    BadGlob {
        pattern: String,
        source: globset::Error,
    },

    /// The input directory could not be listed.
    #[error("Failed to read directory '{dir}': {source}")]
    ReadDir { dir: PathBuf, source: io::Error },
}

/// Lazily enumerate the cartesian product of codecs x presets x qualities
/// for one input file.
///
/// Order is deterministic: codec-major, then preset, then quality. Each
/// job encodes `input` into `out_dir` under the
/// `{stem}_{codec}_{preset}_{quality}.{ext}` naming convention with
/// `-c:v/-preset/-cq` arguments.
pub fn grid_jobs<'a>(
    input: &'a Path,
    out_dir: &'a Path,
    codecs: &'a [String],
    presets: &'a [String],
    qualities: &'a [u32],
) -> impl Iterator<Item = Job> + 'a {
    codecs.iter().flat_map(move |codec| {
        presets.iter().flat_map(move |preset| {
            qualities.iter().map(move |&quality| {
                let output = out_dir.join(sweep_output_name(input, codec, preset, quality));
                let args = vec![
                    "-c:v".to_string(),
                    codec.clone(),
                    "-preset".to_string(),
                    preset.clone(),
                    "-cq".to_string(),
                    quality.to_string(),
                ];
                Job::new(input, output, args)
            })
        })
    })
}

/// Enumerate one job per regular file in `in_dir` whose file name matches
/// `glob` (all files when `glob` is `None`).
///
/// Subdirectories and non-matching entries are skipped. Each job maps the
/// input to `out_dir/<same file name>` with the given base encoder
/// arguments.
pub fn dir_jobs(
    in_dir: &Path,
    out_dir: &Path,
    glob: Option<&str>,
    base_args: &[String],
) -> Result<Vec<Job>, EnumerateError> {
    let matcher: Option<GlobMatcher> = match glob {
        Some(pattern) => Some(
            Glob::new(pattern)
                .map_err(|source| EnumerateError::BadGlob {
                    pattern: pattern.to_string(),
                    source,
                })?
                .compile_matcher(),
        ),
        None => None,
    };

    let entries = std::fs::read_dir(in_dir).map_err(|source| EnumerateError::ReadDir {
        dir: in_dir.to_path_buf(),
        source,
    })?;

    let mut jobs = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| EnumerateError::ReadDir {
            dir: in_dir.to_path_buf(),
            source,
        })?;
        let file_type = entry.file_type().map_err(|source| EnumerateError::ReadDir {
            dir: in_dir.to_path_buf(),
            source,
        })?;
        if !file_type.is_file() {
            debug!(entry = %entry.path().display(), "Skipping non-file entry");
            continue;
        }
        let name = entry.file_name();
        if let Some(m) = &matcher {
            if !m.is_match(Path::new(&name)) {
                debug!(entry = %entry.path().display(), "Skipping non-matching entry");
                continue;
            }
        }
        jobs.push(Job::new(
            entry.path(),
            out_dir.join(&name),
            base_args.to_vec(),
        ));
    }
    Ok(jobs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::fs;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_grid_produces_full_product_with_unique_names() {
        let codecs = strings(&["c1"]);
        let presets = strings(&["p1", "p2"]);
        let qualities = [10u32, 20];
        let jobs: Vec<Job> = grid_jobs(
            Path::new("clip.mp4"),
            Path::new("out"),
            &codecs,
            &presets,
            &qualities,
        )
        .collect();

        assert_eq!(jobs.len(), 4);
        let names: HashSet<String> = jobs.iter().map(|j| j.name()).collect();
        assert_eq!(names.len(), 4, "output names must be collision-free");
        assert!(names.contains("clip_c1_p2_20.mp4"));
    }

    #[test]
    fn test_grid_order_is_deterministic() {
        let codecs = strings(&["c1", "c2"]);
        let presets = strings(&["p1"]);
        let qualities = [10u32, 20];
        let first: Vec<String> = grid_jobs(
            Path::new("a.mp4"),
            Path::new("out"),
            &codecs,
            &presets,
            &qualities,
        )
        .map(|j| j.name())
        .collect();
        let second: Vec<String> = grid_jobs(
            Path::new("a.mp4"),
            Path::new("out"),
            &codecs,
            &presets,
            &qualities,
        )
        .map(|j| j.name())
        .collect();
        assert_eq!(first, second);
        assert_eq!(first[0], "a_c1_p1_10.mp4");
        assert_eq!(first[3], "a_c2_p1_20.mp4");
    }

    #[test]
    fn test_grid_args_carry_the_triple() {
        let codecs = strings(&["hevc_nvenc"]);
        let presets = strings(&["fast"]);
        let qualities = [30u32];
        let job = grid_jobs(
            Path::new("a.mp4"),
            Path::new("out"),
            &codecs,
            &presets,
            &qualities,
        )
        .next()
        .unwrap();
        assert_eq!(
            job.args,
            strings(&["-c:v", "hevc_nvenc", "-preset", "fast", "-cq", "30"])
        );
    }

    #[test]
    fn test_dir_jobs_skips_subdirectories() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["a.mp4", "b.mp4", "c.mkv"] {
            fs::write(dir.path().join(name), b"x").unwrap();
        }
        fs::create_dir(dir.path().join("nested")).unwrap();

        let jobs = dir_jobs(dir.path(), Path::new("out"), None, &[]).unwrap();
        assert_eq!(jobs.len(), 3);
        assert!(jobs.iter().all(|j| j.output.starts_with("out")));
    }

    #[test]
    fn test_dir_jobs_applies_glob() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["a.mp4", "b.mp4", "c.mkv"] {
            fs::write(dir.path().join(name), b"x").unwrap();
        }

        let jobs = dir_jobs(dir.path(), Path::new("out"), Some("*.mp4"), &[]).unwrap();
        assert_eq!(jobs.len(), 2);
        assert!(jobs.iter().all(|j| j.name().ends_with(".mp4")));
    }

    #[test]
    fn test_dir_jobs_bad_glob() {
        let dir = tempfile::tempdir().unwrap();
        let err = dir_jobs(dir.path(), Path::new("out"), Some("a{"), &[]).unwrap_err();
        assert!(matches!(err, EnumerateError::BadGlob { .. }));
    }

    #[test]
    fn test_dir_jobs_missing_directory() {
        let err = dir_jobs(Path::new("/no/such/dir"), Path::new("out"), None, &[]).unwrap_err();
        assert!(matches!(err, EnumerateError::ReadDir { .. }));
    }
}
