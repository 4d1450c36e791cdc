//! Validate a timeline document.

use std::path::{Path, PathBuf};

use cutline_timeline::{Timeline, TimelineDocument};

pub fn run(path: PathBuf) -> anyhow::Result<()> {
    println!("Validating timeline at: {}", path.display());

    let json = std::fs::read_to_string(&path)
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {e}", path.display()))?;
    let document = TimelineDocument::from_json(&json)
        .map_err(|e| anyhow::anyhow!("Failed to parse {}: {e}", path.display()))?;

    println!("  Name: {}", document.name);
    println!("  Version: {}", document.version);
    println!("  Tracks: {}", document.timeline.tracks().len());
    println!("  Clips: {}", document.timeline.clip_count());

    let mut issues = document.timeline.validate();
    issues.extend(missing_sources(&document.timeline));

    if issues.is_empty() {
        println!("  Sources: All present");
        println!("\nTimeline is valid.");
        return Ok(());
    }

    println!("\nValidation issues:");
    for issue in &issues {
        println!("  - {issue}");
    }
    anyhow::bail!("{} issue(s) found", issues.len())
}

/// Local source paths that no longer exist. URLs are not checked.
fn missing_sources(timeline: &Timeline) -> Vec<String> {
    timeline
        .clips()
        .filter_map(|(_, clip)| clip.source.as_deref().map(|source| (clip, source)))
        .filter(|(_, source)| !source.contains("://") && !Path::new(source).exists())
        .map(|(clip, source)| format!("{}: source file missing: {source}", clip.id))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use cutline_timeline::ClipSpec;

    #[test]
    fn test_missing_sources_skips_urls() {
        let mut timeline = Timeline::new();
        let video = timeline.tracks()[0].id;
        timeline
            .add_clip(video, ClipSpec::new("a", "/nonexistent/cutline/a.mp4", 2.0))
            .unwrap();
        timeline
            .add_clip(video, ClipSpec::new("b", "https://cdn.example/b.mp4", 2.0))
            .unwrap();

        let missing = missing_sources(&timeline);
        assert_eq!(missing.len(), 1);
        assert!(missing[0].contains("a.mp4"));
    }
}
