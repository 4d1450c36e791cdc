//! Ingest a media file and place it on a track.

use std::path::PathBuf;

use cutline_render::probe_media;
use cutline_timeline::{ClipSpec, TrackId, TrackKind};

use super::{load_document, resolve_track, save_document};

pub fn run(
    path: PathBuf,
    media: PathBuf,
    track: Option<TrackId>,
    kind: TrackKind,
    at: Option<f64>,
) -> anyhow::Result<()> {
    let mut document = load_document(&path)?;
    let track_id = resolve_track(&document.timeline, track, kind)?;

    let ingested = probe_media(&media)?;
    println!(
        "Probed {} ({:.2}s)",
        ingested.url, ingested.duration
    );

    let clip_id = match at {
        Some(start) => document
            .timeline
            .add_clip_at(track_id, ClipSpec::from(ingested), start)?,
        None => document.timeline.add_ingested(track_id, ingested)?,
    };

    if let Some((_, clip)) = document.timeline.find_clip(clip_id) {
        println!(
            "Added {} to {} at {:.2}s..{:.2}s",
            clip_id,
            track_id,
            clip.start_time,
            clip.end_time()
        );
    }

    save_document(&mut document, &path)?;
    println!("Saved {}", path.display());
    Ok(())
}
