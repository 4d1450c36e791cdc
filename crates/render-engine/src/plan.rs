//! Export planning: turn a timeline into an ordered segment list and an
//! audio mix plan.
//!
//! Both outputs are plain data. The media engine concatenates the segments
//! in order and mixes every entry of the mix plan on top.

use serde::{Deserialize, Serialize};

use cutline_processing::{resolve_visible_sections, VisibleSection};
use cutline_timeline::{ClipId, Timeline, TrackKind, VideoParams};

/// Sections and gaps shorter than this are dropped.
pub const PLAN_EPSILON: f64 = 1e-9;

/// Knobs for [`build_export_plan`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanOptions {
    /// Build the audio mix plan. The fallback plan turns this off.
    pub include_audio: bool,
}

impl Default for PlanOptions {
    fn default() -> Self {
        Self {
            include_audio: true,
        }
    }
}

impl PlanOptions {
    /// Video-only plan used when an encode with audio fails.
    pub fn fallback() -> Self {
        Self {
            include_audio: false,
        }
    }
}

/// One entry of the ordered video segment list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Segment {
    /// Black frames.
    Black { start: f64, duration: f64 },

    /// A trimmed window of one source.
    Clip(ClipSegment),
}

impl Segment {
    pub fn start(&self) -> f64 {
        match self {
            Segment::Black { start, .. } => *start,
            Segment::Clip(clip) => clip.start,
        }
    }

    pub fn duration(&self) -> f64 {
        match self {
            Segment::Black { duration, .. } => *duration,
            Segment::Clip(clip) => clip.duration,
        }
    }

    pub fn is_black(&self) -> bool {
        matches!(self, Segment::Black { .. })
    }
}

/// A visible section ready for the encoder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClipSegment {
    pub clip_id: ClipId,
    pub track_index: usize,
    pub source: String,

    /// Timeline position of the segment.
    pub start: f64,
    pub duration: f64,

    /// Source window `[trim_start, trim_end)`.
    pub trim_start: f64,
    pub trim_end: f64,

    pub video: VideoParams,
}

/// One audio clip to trim, delay, scale, and sum into the mix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MixEntry {
    pub clip_id: ClipId,
    pub source: String,
    pub trim_start: f64,
    pub duration: f64,

    /// Timeline offset the entry lands at.
    pub delay: f64,
    pub volume: f64,
}

impl MixEntry {
    pub fn end(&self) -> f64 {
        self.delay + self.duration
    }
}

/// Complete render plan for one timeline snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportPlan {
    /// Timeline duration the segments cover.
    pub duration: f64,
    pub segments: Vec<Segment>,
    pub mix: Vec<MixEntry>,
}

impl ExportPlan {
    /// Sum of all segment durations.
    pub fn total_duration(&self) -> f64 {
        self.segments.iter().map(Segment::duration).sum()
    }

    /// Length of the mixed audio: the longest entry end, or 0.
    pub fn mix_length(&self) -> f64 {
        self.mix.iter().map(MixEntry::end).fold(0.0, f64::max)
    }

    pub fn has_audio(&self) -> bool {
        !self.mix.is_empty()
    }

    pub fn clip_segments(&self) -> impl Iterator<Item = &ClipSegment> {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Clip(clip) => Some(clip),
            Segment::Black { .. } => None,
        })
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Build the render plan for `timeline`.
///
/// An empty timeline yields one black segment spanning the whole duration.
pub fn build_export_plan(timeline: &Timeline, options: PlanOptions) -> ExportPlan {
    let duration = timeline.duration();
    let segments = build_segments(resolve_visible_sections(timeline), duration);
    let mix = if options.include_audio {
        build_mix(timeline)
    } else {
        Vec::new()
    };

    tracing::info!(
        duration_secs = duration,
        segments = segments.len(),
        black_segments = segments.iter().filter(|s| s.is_black()).count(),
        mix_entries = mix.len(),
        include_audio = options.include_audio,
        "Export plan built"
    );

    ExportPlan {
        duration,
        segments,
        mix,
    }
}

/// Walk sorted sections with a cursor, filling holes with black.
fn build_segments(mut sections: Vec<VisibleSection>, duration: f64) -> Vec<Segment> {
    sections.sort_by(|a, b| {
        a.visible_start
            .total_cmp(&b.visible_start)
            .then(a.track_index.cmp(&b.track_index))
            .then(a.clip_id.cmp(&b.clip_id))
    });

    let mut segments = Vec::new();
    let mut cursor = 0.0f64;

    for section in sections {
        let start = section.visible_start.max(cursor);
        let end = section.visible_end;
        if end - start <= PLAN_EPSILON {
            continue;
        }
        if start - cursor > PLAN_EPSILON {
            push_black(&mut segments, cursor, start - cursor);
        }

        match section.source {
            Some(source) => segments.push(Segment::Clip(ClipSegment {
                clip_id: section.clip_id,
                track_index: section.track_index,
                source,
                start,
                duration: end - start,
                trim_start: section.trim_start + (start - section.visible_start),
                trim_end: section.trim_end,
                video: section.video,
            })),
            None => push_black(&mut segments, start, end - start),
        }
        cursor = end;
    }

    if duration - cursor > PLAN_EPSILON {
        push_black(&mut segments, cursor, duration - cursor);
    }
    segments
}

/// Append black, extending the previous segment if it is black too.
fn push_black(segments: &mut Vec<Segment>, start: f64, duration: f64) {
    if let Some(Segment::Black {
        duration: previous, ..
    }) = segments.last_mut()
    {
        *previous += duration;
        return;
    }
    segments.push(Segment::Black { start, duration });
}

/// Every unmuted audio clip with a source, in track then start order.
fn build_mix(timeline: &Timeline) -> Vec<MixEntry> {
    timeline
        .tracks()
        .iter()
        .filter(|track| track.kind == TrackKind::Audio)
        .flat_map(|track| track.clips.iter())
        .filter_map(|clip| {
            let audio = clip.audio()?;
            if audio.muted {
                return None;
            }
            let source = clip.source.clone()?;
            Some(MixEntry {
                clip_id: clip.id,
                source,
                trim_start: clip.trim_start,
                duration: clip.duration,
                delay: clip.start_time,
                volume: audio.volume,
            })
        })
        .collect()
}
