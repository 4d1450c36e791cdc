//! Create a new timeline document.

use std::path::PathBuf;

use cutline_common::config::EditorDefaults;
use cutline_timeline::{Timeline, TimelineDocument, TimelineSettings};

pub fn run(
    path: PathBuf,
    name: Option<String>,
    force: bool,
    editor: &EditorDefaults,
) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "{} already exists (use --force to overwrite)",
            path.display()
        );
    }

    let name = name.unwrap_or_else(|| {
        path.file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| "Untitled".to_string())
    });

    let timeline = Timeline::with_settings(settings_from(editor));
    let document = TimelineDocument::new(&name, timeline);
    document
        .save(&path)
        .map_err(|e| anyhow::anyhow!("Failed to create timeline: {e}"))?;

    println!("Created timeline '{}' at {}", name, path.display());
    for track in document.timeline.tracks() {
        println!("  {} ({}, {})", track.name, track.id, track.kind);
    }
    println!(
        "  Minimum clip length: {}s",
        document.timeline.settings().min_clip_duration
    );

    Ok(())
}

pub fn settings_from(editor: &EditorDefaults) -> TimelineSettings {
    TimelineSettings {
        min_clip_duration: editor.min_clip_duration,
        display_floor_secs: editor.display_floor_secs,
        default_clip_duration: editor.default_clip_duration,
    }
}
