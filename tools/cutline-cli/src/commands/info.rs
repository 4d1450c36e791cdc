//! Show timeline information.

use std::path::PathBuf;

use cutline_processing::clip_coverage;
use cutline_timeline::interval::total_length;
use cutline_timeline::{ClipMedia, TrackKind};

use super::load_document;

pub fn run(path: PathBuf) -> anyhow::Result<()> {
    let document = load_document(&path)?;
    let timeline = &document.timeline;

    println!("Timeline: {}", document.name);
    println!("  Version: {}", document.version);
    println!("  Created: {}", document.created_at);
    println!("  Modified: {}", document.modified_at);
    println!(
        "  Duration: {:.2}s (content ends at {:.2}s)",
        timeline.duration(),
        timeline.content_end()
    );
    println!("  Clips: {}", timeline.clip_count());
    println!();

    println!("Tracks (top to bottom):");
    for (index, track) in timeline.tracks().iter().enumerate() {
        println!(
            "  [{index}] {} ({}, {}, {} clip(s))",
            track.name,
            track.id,
            track.kind,
            track.clips.len()
        );
        for clip in &track.clips {
            println!(
                "      {} '{}' {:.2}s..{:.2}s  source {:.2}s..{:.2}s of {:.2}s",
                clip.id,
                clip.name,
                clip.start_time,
                clip.end_time(),
                clip.trim_start,
                clip.trim_end,
                clip.original_duration
            );
            match &clip.media {
                ClipMedia::Video(video) => {
                    if track.kind == TrackKind::Video && index > 0 {
                        let coverage = clip_coverage(timeline, index, clip);
                        println!(
                            "        visible {:.2}s of {:.2}s",
                            total_length(&coverage.visible),
                            clip.duration
                        );
                    }
                    if !video.crop.is_full() || video.scale != 1.0 {
                        println!(
                            "        crop {:.2},{:.2} {:.2}x{:.2}  scale {:.2}",
                            video.crop.x,
                            video.crop.y,
                            video.crop.width,
                            video.crop.height,
                            video.scale
                        );
                    }
                }
                ClipMedia::Audio(audio) => {
                    println!(
                        "        volume {:.2}{}",
                        audio.volume,
                        if audio.muted { " (muted)" } else { "" }
                    );
                }
            }
            if clip.source.is_none() {
                println!("        no source (renders black)");
            }
        }
    }

    Ok(())
}
