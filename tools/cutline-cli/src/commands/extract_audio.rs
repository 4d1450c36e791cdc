//! Pull the audio out of a video file, optionally adding it to a timeline.

use std::path::{Path, PathBuf};

use cutline_render::extract_audio;
use cutline_timeline::{TrackId, TrackKind};

use super::{load_document, resolve_track, save_document};

pub fn run(
    media: PathBuf,
    output: Option<PathBuf>,
    add_to: Option<PathBuf>,
    track: Option<TrackId>,
) -> anyhow::Result<()> {
    let output = output.unwrap_or_else(|| default_output(&media));
    if output == media {
        anyhow::bail!("Output {} would overwrite the input", output.display());
    }
    println!("Extracting audio from {}", media.display());

    let extracted = extract_audio(&media, &output)?;
    println!(
        "  Wrote {} ({:.2}s)",
        output.display(),
        extracted.duration
    );

    if let Some(path) = add_to {
        let mut document = load_document(&path)?;
        let track_id = resolve_track(&document.timeline, track, TrackKind::Audio)?;
        let clip_id = document.timeline.add_ingested(track_id, extracted)?;
        save_document(&mut document, &path)?;
        println!("  Added {clip_id} to {track_id} in {}", path.display());
    }

    Ok(())
}

/// `clip.mp4` -> `clip.mp3` next to the input.
fn default_output(media: &Path) -> PathBuf {
    media.with_extension("mp3")
}
