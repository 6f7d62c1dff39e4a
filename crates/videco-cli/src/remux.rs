//! Argument construction for the two-track remux.
//!
//! Screen recordings carry two audio tracks (application and voice). The
//! remux keeps the video untouched by default, mixes both tracks into a
//! new default AAC track, and keeps the originals behind it with
//! descriptive titles and cleared dispositions.

/// Build the full encoder argument vector for one remux job.
///
/// `video_args` is the free-form pass-through string for the video
/// streams, split on whitespace (`-c:v copy` by default).
pub fn remux_args(video_args: &str, app_volume: f64, voice_volume: f64) -> Vec<String> {
    let filter = format!(
        "[0:a:0]volume={app_volume}[a0]; [0:a:1]volume={voice_volume}[a1]; [a0][a1]amix[a]"
    );

    let mut args: Vec<String> = vec!["-map".into(), "0:v".into()];
    args.extend(video_args.split_whitespace().map(str::to_owned));
    args.extend(
        [
            "-filter_complex",
            &filter,
            "-map",
            "[a]",
            "-map",
            "0:a",
            "-c:a:0",
            "aac",
            "-disposition:a",
            "none",
            "-disposition:a:0",
            "default",
            "-metadata:s:a:0",
            "title=Merged",
            "-metadata:s:a:1",
            "title=App",
            "-metadata:s:a:2",
            "title=Voice",
        ]
        .iter()
        .map(|s| s.to_string()),
    );
    args
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remux_args_mix_filter() {
        let args = remux_args("-c:v copy", 1.0, 0.5);
        let filter_pos = args.iter().position(|a| a == "-filter_complex").unwrap();
        let filter = &args[filter_pos + 1];
        assert!(filter.contains("volume=1[a0]"));
        assert!(filter.contains("volume=0.5[a1]"));
        assert!(filter.contains("amix[a]"));
    }

    #[test]
    fn test_video_args_are_split_and_passed_through() {
        let args = remux_args("-c:v libx264 -crf 20", 1.0, 1.0);
        let video: Vec<_> = args[2..6].to_vec();
        assert_eq!(video, vec!["-c:v", "libx264", "-crf", "20"]);
    }

    #[test]
    fn test_merged_track_becomes_default() {
        let args = remux_args("-c:v copy", 1.0, 1.0);
        let pos = args.iter().position(|a| a == "-disposition:a:0").unwrap();
        assert_eq!(args[pos + 1], "default");
        assert!(args.contains(&"title=Merged".to_string()));
    }
}
