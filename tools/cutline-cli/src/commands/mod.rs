//! Subcommand implementations.

pub mod add;
pub mod export;
pub mod extract_audio;
pub mod info;
pub mod init;
pub mod plan;
pub mod probe;
pub mod validate;

use std::path::Path;

use anyhow::Context;
use cutline_timeline::{Timeline, TimelineDocument, TrackId, TrackKind};

/// Load a timeline document, attaching the path to any failure.
pub fn load_document(path: &Path) -> anyhow::Result<TimelineDocument> {
    TimelineDocument::load(path)
        .with_context(|| format!("Failed to load timeline document {}", path.display()))
}

/// Stamp and write a document back to disk.
pub fn save_document(document: &mut TimelineDocument, path: &Path) -> anyhow::Result<()> {
    document.touch();
    document
        .save(path)
        .with_context(|| format!("Failed to save timeline document {}", path.display()))
}

/// Accepts both `7` and the displayed `track-7` form.
pub fn parse_track_id(raw: &str) -> Result<TrackId, String> {
    let digits = raw.trim().strip_prefix("track-").unwrap_or(raw.trim());
    digits
        .parse::<u64>()
        .map(TrackId)
        .map_err(|_| format!("'{raw}' is not a track id (expected e.g. 3 or track-3)"))
}

/// The requested track, or the topmost track of `kind` when none was given.
pub fn resolve_track(
    timeline: &Timeline,
    requested: Option<TrackId>,
    kind: TrackKind,
) -> anyhow::Result<TrackId> {
    match requested {
        Some(id) => {
            let track = timeline
                .track(id)
                .ok_or_else(|| anyhow::anyhow!("No track with id {id}"))?;
            if track.kind != kind {
                anyhow::bail!("{id} is a {} track, expected {kind}", track.kind);
            }
            Ok(id)
        }
        None => timeline
            .tracks()
            .iter()
            .find(|track| track.kind == kind)
            .map(|track| track.id)
            .ok_or_else(|| anyhow::anyhow!("Timeline has no {kind} track")),
    }
}
