//! Layered occlusion: which parts of each video clip actually reach the
//! output frame.
//!
//! # Algorithm
//!
//! For a video clip `C` on the track at index `t`:
//!
//! 1. **Collect** every clip on a video track with index `< t` whose span
//!    intersects `C`, clipped to `C`'s span.
//! 2. **Merge** the collected spans into a sorted, minimal cover.
//! 3. **Complement** the cover within `[C.start, C.end)`; each remaining
//!    gap is a visible section.
//! 4. **Map** each section back to the source:
//!    `trim_start' = C.trim_start + (vs - C.start)`.
//!
//! Audio tracks never occlude anything and are skipped entirely.

use serde::{Deserialize, Serialize};
use tracing::debug;

use cutline_timeline::{
    merge, overlaps, subtract, Clip, ClipId, Interval, Timeline, TrackKind, VideoParams,
};

/// A visible slice of one video clip, with its source trim window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisibleSection {
    pub clip_id: ClipId,

    /// Index of the owning track in the timeline's track list.
    pub track_index: usize,

    /// Source media of the owning clip, if any.
    pub source: Option<String>,

    pub visible_start: f64,
    pub visible_end: f64,

    /// Source offset matching `visible_start`.
    pub trim_start: f64,

    /// Source offset matching `visible_end`.
    pub trim_end: f64,

    /// Crop / scale / position of the owning clip.
    pub video: VideoParams,
}

impl VisibleSection {
    pub fn duration(&self) -> f64 {
        self.visible_end - self.visible_start
    }

    pub fn span(&self) -> Interval {
        (self.visible_start, self.visible_end)
    }
}

/// Visible and covered parts of one clip; together they tile its span.
#[derive(Debug, Clone, PartialEq)]
pub struct ClipCoverage {
    pub clip_id: ClipId,
    pub track_index: usize,
    pub visible: Vec<Interval>,
    pub covered: Vec<Interval>,
}

/// Merged spans of higher-priority video clips that intersect `span`,
/// clipped to `span`.
pub fn covered_intervals(timeline: &Timeline, track_index: usize, span: Interval) -> Vec<Interval> {
    let (start, end) = span;
    let hits: Vec<Interval> = timeline
        .tracks()
        .iter()
        .take(track_index)
        .filter(|track| track.kind == TrackKind::Video)
        .flat_map(|track| track.clips.iter())
        .filter(|clip| overlaps(start, end, clip.start_time, clip.end_time()))
        .map(|clip| (clip.start_time.max(start), clip.end_time().min(end)))
        .collect();
    merge(&hits)
}

/// Coverage breakdown for a single clip on the track at `track_index`.
pub fn clip_coverage(timeline: &Timeline, track_index: usize, clip: &Clip) -> ClipCoverage {
    let covered = covered_intervals(timeline, track_index, clip.span());
    let visible = subtract(clip.span(), &covered);
    ClipCoverage {
        clip_id: clip.id,
        track_index,
        visible,
        covered,
    }
}

/// Visible sections of one clip, mapped to its source.
///
/// Returns nothing for audio clips.
pub fn visible_sections_for_clip(
    timeline: &Timeline,
    track_index: usize,
    clip: &Clip,
) -> Vec<VisibleSection> {
    let Some(video) = clip.video() else {
        return Vec::new();
    };

    clip_coverage(timeline, track_index, clip)
        .visible
        .into_iter()
        .map(|(vs, ve)| {
            let trim_start = clip.trim_start + (vs - clip.start_time);
            VisibleSection {
                clip_id: clip.id,
                track_index,
                source: clip.source.clone(),
                visible_start: vs,
                visible_end: ve,
                trim_start,
                trim_end: trim_start + (ve - vs),
                video: *video,
            }
        })
        .collect()
}

/// Visible sections of every video clip in the timeline.
///
/// Output is grouped by track then clip; callers that need timeline order
/// sort by `visible_start`.
pub fn resolve_visible_sections(timeline: &Timeline) -> Vec<VisibleSection> {
    let mut sections = Vec::new();
    for (track_index, track) in timeline.tracks().iter().enumerate() {
        if track.kind != TrackKind::Video {
            continue;
        }
        for clip in &track.clips {
            sections.extend(visible_sections_for_clip(timeline, track_index, clip));
        }
    }
    debug!(
        tracks = timeline.tracks().len(),
        sections = sections.len(),
        "Resolved visible sections"
    );
    sections
}

/// The video clip that owns the frame at `time`, as `(track_index, clip_id)`.
pub fn frame_owner_at(timeline: &Timeline, time: f64) -> Option<(usize, ClipId)> {
    timeline
        .tracks()
        .iter()
        .enumerate()
        .filter(|(_, track)| track.kind == TrackKind::Video)
        .find_map(|(index, track)| track.clip_at_time(time).map(|clip| (index, clip.id)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use cutline_timeline::{ClipSpec, TrackId, TrimSide};
    use proptest::prelude::*;

    /// Two stacked video tracks above an audio track.
    fn stacked() -> (Timeline, TrackId, TrackId) {
        let mut timeline = Timeline::empty();
        let top = timeline.add_track(TrackKind::Video);
        let bottom = timeline.add_track(TrackKind::Video);
        timeline.add_track(TrackKind::Audio);
        (timeline, top, bottom)
    }

    #[test]
    fn test_single_clip_is_fully_visible() {
        let (mut timeline, top, _) = stacked();
        let id = timeline
            .add_clip(top, ClipSpec::new("a", "a.mp4", 10.0))
            .unwrap();

        let sections = resolve_visible_sections(&timeline);
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].clip_id, id);
        assert_eq!(sections[0].span(), (0.0, 10.0));
        assert_eq!(sections[0].trim_start, 0.0);
        assert_eq!(sections[0].trim_end, 10.0);
    }

    #[test]
    fn test_upper_clip_splits_lower_clip() {
        let (mut timeline, top, bottom) = stacked();
        timeline
            .add_clip_at(top, ClipSpec::new("top", "top.mp4", 3.0), 2.0)
            .unwrap();
        let lower = timeline
            .add_clip(bottom, ClipSpec::new("bottom", "bottom.mp4", 10.0))
            .unwrap();

        let mut sections: Vec<_> = resolve_visible_sections(&timeline)
            .into_iter()
            .filter(|s| s.clip_id == lower)
            .collect();
        sections.sort_by(|a, b| a.visible_start.total_cmp(&b.visible_start));

        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].span(), (0.0, 2.0));
        assert_eq!((sections[0].trim_start, sections[0].trim_end), (0.0, 2.0));
        assert_eq!(sections[1].span(), (5.0, 10.0));
        assert_eq!((sections[1].trim_start, sections[1].trim_end), (5.0, 10.0));
        assert!(sections.iter().all(|s| s.track_index == 1));
    }

    #[test]
    fn test_trim_window_follows_clip_trim() {
        let (mut timeline, top, bottom) = stacked();
        timeline
            .add_clip_at(top, ClipSpec::new("top", "top.mp4", 2.0), 4.0)
            .unwrap();
        let lower = timeline
            .add_clip_at(bottom, ClipSpec::new("bottom", "bottom.mp4", 10.0), 0.0)
            .unwrap();
        timeline.trim(bottom, lower, TrimSide::Start, 3.0).unwrap();

        let sections = resolve_visible_sections(&timeline);
        let tail = sections
            .iter()
            .find(|s| s.clip_id == lower && s.visible_start == 6.0)
            .unwrap();
        assert_eq!(tail.trim_start, 6.0);
        assert_eq!(tail.trim_end, 10.0);

        let head = sections
            .iter()
            .find(|s| s.clip_id == lower && s.visible_start == 3.0)
            .unwrap();
        assert_eq!((head.trim_start, head.trim_end), (3.0, 4.0));
    }

    #[test]
    fn test_fully_covered_clip_has_no_sections() {
        let (mut timeline, top, bottom) = stacked();
        timeline
            .add_clip(top, ClipSpec::new("top", "top.mp4", 10.0))
            .unwrap();
        let lower = timeline
            .add_clip_at(bottom, ClipSpec::new("bottom", "bottom.mp4", 4.0), 3.0)
            .unwrap();

        assert!(resolve_visible_sections(&timeline)
            .iter()
            .all(|s| s.clip_id != lower));
    }

    #[test]
    fn test_audio_tracks_do_not_occlude() {
        let mut timeline = Timeline::empty();
        let audio = timeline.add_track(TrackKind::Audio);
        let video = timeline.add_track(TrackKind::Video);
        timeline
            .add_clip(audio, ClipSpec::new("music", "music.mp3", 10.0))
            .unwrap();
        timeline
            .add_clip(video, ClipSpec::new("a", "a.mp4", 10.0))
            .unwrap();

        let sections = resolve_visible_sections(&timeline);
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].span(), (0.0, 10.0));
        assert_eq!(sections[0].track_index, 1);
    }

    #[test]
    fn test_frame_owner_prefers_lower_index() {
        let (mut timeline, top, bottom) = stacked();
        let upper = timeline
            .add_clip_at(top, ClipSpec::new("top", "top.mp4", 3.0), 2.0)
            .unwrap();
        let lower = timeline
            .add_clip(bottom, ClipSpec::new("bottom", "bottom.mp4", 10.0))
            .unwrap();

        assert_eq!(frame_owner_at(&timeline, 1.0), Some((1, lower)));
        assert_eq!(frame_owner_at(&timeline, 2.0), Some((0, upper)));
        assert_eq!(frame_owner_at(&timeline, 5.0), Some((1, lower)));
        assert_eq!(frame_owner_at(&timeline, 10.0), None);
    }

    proptest! {
        #[test]
        fn prop_sections_and_cover_tile_each_clip(
            placements in proptest::collection::vec((0usize..3, 0.0f64..40.0, 0.5f64..10.0), 1..20),
        ) {
            let mut timeline = Timeline::empty();
            let tracks: Vec<TrackId> = (0..3).map(|_| timeline.add_track(TrackKind::Video)).collect();
            for (track, start, duration) in placements {
                // Overlapping placements are rejected; the rest stack up.
                let _ = timeline.add_clip_at(tracks[track], ClipSpec::new("c", "c.mp4", duration), start);
            }

            for (track_index, clip) in timeline.clips() {
                let coverage = clip_coverage(&timeline, track_index, clip);
                let visible: f64 = coverage.visible.iter().map(|(s, e)| e - s).sum();
                let covered: f64 = coverage.covered.iter().map(|(s, e)| e - s).sum();
                prop_assert!((visible + covered - clip.duration).abs() < 1e-6);

                for section in visible_sections_for_clip(&timeline, track_index, clip) {
                    prop_assert!(section.visible_start >= clip.start_time - 1e-9);
                    prop_assert!(section.visible_end <= clip.end_time() + 1e-9);
                    prop_assert!((section.trim_end - section.trim_start - section.duration()).abs() < 1e-9);
                    prop_assert!(section.trim_start >= clip.trim_start - 1e-9);
                    prop_assert!(section.trim_end <= clip.trim_end + 1e-6);
                }
            }
        }
    }
}
