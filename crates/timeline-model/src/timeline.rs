//! The timeline store: ordered tracks plus structural operations.
//!
//! Clip-level edits (move, trim, cut, property changes) live in
//! [`crate::edit`]. Both halves share one contract: on `Err` nothing changed.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::clip::{
    Clip, ClipId, ClipMedia, ClipSpec, IngestedMedia, TrackKind, MIN_DURATION, TIME_EPSILON,
};
use crate::error::{EditError, EditResult};
use crate::track::{Track, TrackId};

/// Default lower bound for the reported timeline duration (seconds).
pub const DEFAULT_DISPLAY_FLOOR: f64 = 10.0;

/// Default length of clips added without an explicit duration (seconds).
pub const DEFAULT_CLIP_DURATION: f64 = 5.0;

/// Tunables that mutations and derived values depend on.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineSettings {
    pub min_clip_duration: f64,
    pub display_floor_secs: f64,
    pub default_clip_duration: f64,
}

impl Default for TimelineSettings {
    fn default() -> Self {
        Self {
            min_clip_duration: MIN_DURATION,
            display_floor_secs: DEFAULT_DISPLAY_FLOOR,
            default_clip_duration: DEFAULT_CLIP_DURATION,
        }
    }
}

impl TimelineSettings {
    /// Settings every clip invariant can hold under.
    ///
    /// A non-positive or non-finite minimum falls back to [`MIN_DURATION`],
    /// a negative floor becomes 0, and the default clip length is raised to
    /// at least the minimum.
    pub fn sanitized(self) -> Self {
        let min_clip_duration =
            if self.min_clip_duration.is_finite() && self.min_clip_duration > 0.0 {
                self.min_clip_duration
            } else {
                MIN_DURATION
            };
        let display_floor_secs = if self.display_floor_secs.is_finite() {
            self.display_floor_secs.max(0.0)
        } else {
            DEFAULT_DISPLAY_FLOOR
        };
        let default_clip_duration =
            if self.default_clip_duration.is_finite() && self.default_clip_duration > 0.0 {
                self.default_clip_duration
            } else {
                DEFAULT_CLIP_DURATION
            };
        Self {
            min_clip_duration,
            display_floor_secs,
            default_clip_duration: default_clip_duration.max(min_clip_duration),
        }
    }
}

fn checked_settings(settings: TimelineSettings) -> TimelineSettings {
    let sanitized = settings.sanitized();
    if sanitized != settings {
        warn!(
            requested = ?settings,
            applied = ?sanitized,
            "timeline settings out of range, clamped"
        );
    }
    sanitized
}

/// Ordered list of tracks. Index 0 is the top of the video stack.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Timeline {
    tracks: Vec<Track>,

    /// Next id handed out to a track or clip.
    next_id: u64,

    #[serde(default)]
    settings: TimelineSettings,
}

impl Default for Timeline {
    fn default() -> Self {
        Self::new()
    }
}

impl Timeline {
    /// One empty video track above one empty audio track.
    pub fn new() -> Self {
        Self::with_settings(TimelineSettings::default())
    }

    /// Like [`Timeline::new`] with explicit settings.
    pub fn with_settings(settings: TimelineSettings) -> Self {
        let mut timeline = Self::empty_with_settings(settings);
        timeline.add_track(TrackKind::Video);
        timeline.add_track(TrackKind::Audio);
        timeline
    }

    /// A timeline with no tracks.
    pub fn empty() -> Self {
        Self::empty_with_settings(TimelineSettings::default())
    }

    pub fn empty_with_settings(settings: TimelineSettings) -> Self {
        Self {
            tracks: Vec::new(),
            next_id: 1,
            settings: checked_settings(settings),
        }
    }

    pub fn settings(&self) -> &TimelineSettings {
        &self.settings
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn track(&self, track_id: TrackId) -> Option<&Track> {
        self.tracks.iter().find(|track| track.id == track_id)
    }

    pub fn track_index(&self, track_id: TrackId) -> Option<usize> {
        self.tracks.iter().position(|track| track.id == track_id)
    }

    /// Look a clip up across every track, returning its track index.
    pub fn find_clip(&self, clip_id: ClipId) -> Option<(usize, &Clip)> {
        self.tracks
            .iter()
            .enumerate()
            .find_map(|(index, track)| track.clip(clip_id).map(|clip| (index, clip)))
    }

    pub fn clip_count(&self) -> usize {
        self.tracks.iter().map(|track| track.clips.len()).sum()
    }

    /// Every clip with the index of the track that owns it.
    pub fn clips(&self) -> impl Iterator<Item = (usize, &Clip)> {
        self.tracks
            .iter()
            .enumerate()
            .flat_map(|(index, track)| track.clips.iter().map(move |clip| (index, clip)))
    }

    /// Latest clip end across all tracks, without the display floor.
    pub fn content_end(&self) -> f64 {
        self.clips()
            .map(|(_, clip)| clip.end_time())
            .fold(0.0, f64::max)
    }

    /// Derived timeline length: content end floored at the display minimum.
    pub fn duration(&self) -> f64 {
        self.content_end().max(self.settings.display_floor_secs)
    }

    // ── Track structure ─────────────────────────────────────────

    /// Append a new empty track named "<Kind> Track N".
    pub fn add_track(&mut self, kind: TrackKind) -> TrackId {
        let id = TrackId(self.alloc_id());
        let ordinal = self.tracks.iter().filter(|t| t.kind == kind).count() + 1;
        let name = format!("{} Track {ordinal}", kind.label());
        debug!(track_id = %id, kind = %kind, name = %name, "track added");
        self.tracks.push(Track::new(id, kind, name));
        id
    }

    /// Remove a track together with all of its clips.
    pub fn delete_track(&mut self, track_id: TrackId) -> EditResult<Track> {
        let index = self.require_track_index(track_id)?;
        let removed = self.tracks.remove(index);
        debug!(
            track_id = %track_id,
            clips_removed = removed.clips.len(),
            "track deleted"
        );
        Ok(removed)
    }

    /// Move the track at `from_index` so it ends up at `to_index`.
    pub fn reorder_tracks(&mut self, from_index: usize, to_index: usize) -> EditResult<()> {
        let len = self.tracks.len();
        for index in [from_index, to_index] {
            if index >= len {
                warn!(index, len, "reorder rejected: index out of range");
                return Err(EditError::InvalidIndex { index, len });
            }
        }
        let track = self.tracks.remove(from_index);
        self.tracks.insert(to_index, track);
        debug!(from_index, to_index, "tracks reordered");
        Ok(())
    }

    pub fn set_track_name(&mut self, track_id: TrackId, name: impl Into<String>) -> EditResult<()> {
        let track = self.track_mut(track_id)?;
        track.name = name.into();
        Ok(())
    }

    // ── Clip creation / removal ─────────────────────────────────

    /// Append a clip after the last clip of the track.
    pub fn add_clip(&mut self, track_id: TrackId, spec: ClipSpec) -> EditResult<ClipId> {
        let start = self.require_track(track_id)?.last_end();
        self.add_clip_at(track_id, spec, start)
    }

    /// Place a clip at an explicit start time.
    pub fn add_clip_at(
        &mut self,
        track_id: TrackId,
        spec: ClipSpec,
        start_time: f64,
    ) -> EditResult<ClipId> {
        let index = self.require_track_index(track_id)?;
        let kind = self.tracks[index].kind;
        let (duration, original_duration) = self.resolve_durations(&spec)?;
        if !start_time.is_finite() {
            return Err(EditError::InvalidValue {
                field: "start_time",
                value: start_time,
            });
        }
        let start_time = start_time.max(0.0);

        if self.tracks[index].would_overlap(None, start_time, duration) {
            warn!(track_id = %track_id, start_time, duration, "add rejected: overlap");
            return Err(EditError::WouldOverlap {
                clip: "new clip".to_string(),
                track_id,
                start: start_time,
                end: start_time + duration,
            });
        }

        let id = ClipId(self.alloc_id());
        let clip = Clip {
            id,
            name: spec.name,
            start_time,
            duration,
            trim_start: 0.0,
            trim_end: duration,
            original_duration,
            source: spec.source,
            media: ClipMedia::default_for(kind),
        };
        debug!(
            track_id = %track_id,
            clip_id = %id,
            start_time,
            duration,
            original_duration,
            "clip added"
        );
        let track = &mut self.tracks[index];
        track.clips.push(clip);
        track.sort_clips();
        Ok(id)
    }

    /// Wrap an ingested file into a clip with default parameters.
    pub fn add_ingested(&mut self, track_id: TrackId, media: IngestedMedia) -> EditResult<ClipId> {
        self.add_clip(track_id, ClipSpec::from(media))
    }

    pub fn delete_clip(&mut self, track_id: TrackId, clip_id: ClipId) -> EditResult<Clip> {
        let track = self.track_mut(track_id)?;
        let position = track
            .position(clip_id)
            .ok_or(EditError::ClipNotFound { clip_id })?;
        let removed = track.clips.remove(position);
        debug!(track_id = %track_id, clip_id = %clip_id, "clip deleted");
        Ok(removed)
    }

    // ── Validation ──────────────────────────────────────────────

    /// Re-check every invariant; an empty list means the timeline is sound.
    pub fn validate(&self) -> Vec<String> {
        let mut problems = Vec::new();
        let mut seen_clips = std::collections::HashSet::new();
        let mut seen_tracks = std::collections::HashSet::new();

        for track in &self.tracks {
            if !seen_tracks.insert(track.id) {
                problems.push(format!("duplicate track id {}", track.id));
            }
            if track.id.0 >= self.next_id {
                problems.push(format!("{} not below id counter {}", track.id, self.next_id));
            }
            for clip in &track.clips {
                if !seen_clips.insert(clip.id) {
                    problems.push(format!("duplicate clip id {}", clip.id));
                }
                if clip.id.0 >= self.next_id {
                    problems.push(format!("{} not below id counter {}", clip.id, self.next_id));
                }
                if clip.kind() != track.kind {
                    problems.push(format!(
                        "{}: {} clip on {} track {}",
                        clip.id,
                        clip.kind(),
                        track.kind,
                        track.id
                    ));
                }
                problems.extend(clip.violations(self.settings.min_clip_duration));
            }
            for (a, b) in track.overlapping_pairs() {
                problems.push(format!("{a} overlaps {b} on {}", track.id));
            }
        }
        problems
    }

    // ── Internals shared with edit.rs ───────────────────────────

    pub(crate) fn alloc_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Raise the id counter above every id in use (after deserializing).
    pub(crate) fn resync_id_counter(&mut self) {
        let max_track = self.tracks.iter().map(|t| t.id.0).max().unwrap_or(0);
        let max_clip = self.clips().map(|(_, c)| c.id.0).max().unwrap_or(0);
        self.next_id = self.next_id.max(max_track.max(max_clip) + 1);
    }

    pub(crate) fn require_track_index(&self, track_id: TrackId) -> EditResult<usize> {
        self.track_index(track_id).ok_or_else(|| {
            warn!(track_id = %track_id, "track not found");
            EditError::TrackNotFound { track_id }
        })
    }

    pub(crate) fn require_track(&self, track_id: TrackId) -> EditResult<&Track> {
        let index = self.require_track_index(track_id)?;
        Ok(&self.tracks[index])
    }

    pub(crate) fn track_mut(&mut self, track_id: TrackId) -> EditResult<&mut Track> {
        let index = self.require_track_index(track_id)?;
        Ok(&mut self.tracks[index])
    }

    /// Clamp settings that came from outside (e.g. a loaded document).
    pub(crate) fn sanitize_settings(&mut self) {
        self.settings = checked_settings(self.settings);
    }

    pub(crate) fn tracks_mut(&mut self) -> &mut Vec<Track> {
        &mut self.tracks
    }

    fn resolve_durations(&self, spec: &ClipSpec) -> EditResult<(f64, f64)> {
        let min = self.settings.min_clip_duration;
        let original = spec
            .original_duration
            .or(spec.duration)
            .unwrap_or(self.settings.default_clip_duration);
        if !original.is_finite() || original < min - TIME_EPSILON {
            return Err(EditError::InvalidMedia {
                message: format!("source length {original:.3}s is shorter than {min:.3}s"),
            });
        }
        let duration = spec
            .duration
            .unwrap_or(self.settings.default_clip_duration.min(original));
        if !duration.is_finite() || duration <= 0.0 {
            return Err(EditError::InvalidMedia {
                message: format!("clip duration {duration} must be positive"),
            });
        }
        Ok((duration.min(original).max(min.min(original)), original))
    }
}
