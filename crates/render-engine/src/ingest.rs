//! Media ingestion: probe files with ffprobe and turn them into clip input.

use std::path::Path;
use std::process::Command;

use cutline_common::error::{CutlineError, CutlineResult};
use cutline_timeline::IngestedMedia;

use crate::ffmpeg;

/// Probe `path` for its duration and wrap it for [`Timeline::add_ingested`].
///
/// [`Timeline::add_ingested`]: cutline_timeline::Timeline::add_ingested
pub fn probe_media(path: impl AsRef<Path>) -> CutlineResult<IngestedMedia> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(CutlineError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let output = Command::new("ffprobe")
        .args([
            "-v",
            "error",
            "-show_entries",
            "format=duration",
            "-of",
            "default=noprint_wrappers=1:nokey=1",
        ])
        .arg(path)
        .output()
        .map_err(|e| CutlineError::ingest(format!("Failed to start ffprobe: {e}")))?;

    if !output.status.success() {
        return Err(CutlineError::ingest(format!(
            "ffprobe failed for {} (status {}): {}",
            path.display(),
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let duration = parse_probe_duration(&stdout).ok_or_else(|| {
        CutlineError::ingest(format!("No usable duration reported for {}", path.display()))
    })?;

    let media = IngestedMedia {
        url: path.display().to_string(),
        duration,
        name: media_name(path),
    };
    tracing::info!(
        url = %media.url,
        duration_secs = media.duration,
        "Probed media"
    );
    Ok(media)
}

/// Extract the audio stream of `input` into an MP3 at `output` and probe it.
pub fn extract_audio(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
) -> CutlineResult<IngestedMedia> {
    let input = input.as_ref();
    let output = output.as_ref();
    if !input.exists() {
        return Err(CutlineError::FileNotFound {
            path: input.to_path_buf(),
        });
    }

    ffmpeg::run_ffmpeg(&extract_audio_args(input, output), "audio extraction")
        .map_err(|e| CutlineError::ingest(e.to_string()))?;

    let mut media = probe_media(output)?;
    media.name = format!("{}.mp3", media_name(input));
    Ok(media)
}

pub fn extract_audio_args(input: &Path, output: &Path) -> Vec<String> {
    vec![
        "-y".to_string(),
        "-hide_banner".to_string(),
        "-loglevel".to_string(),
        "error".to_string(),
        "-i".to_string(),
        input.display().to_string(),
        "-vn".to_string(),
        "-acodec".to_string(),
        "libmp3lame".to_string(),
        output.display().to_string(),
    ]
}

/// First line of ffprobe output as a positive, finite duration.
pub fn parse_probe_duration(raw: &str) -> Option<f64> {
    let value = raw.lines().next()?.trim().parse::<f64>().ok()?;
    (value.is_finite() && value > 0.0).then_some(value)
}

/// File stem, or the whole path when there is none.
fn media_name(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
