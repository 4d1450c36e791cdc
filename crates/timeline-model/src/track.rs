//! Track types for the timeline.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::clip::{Clip, ClipId, TrackKind};
use crate::interval::overlaps;

/// Timeline-wide unique track identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackId(pub u64);

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "track-{}", self.0)
    }
}

/// A typed container of non-overlapping clips, kept sorted by start time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub id: TrackId,
    pub kind: TrackKind,
    pub name: String,
    pub clips: Vec<Clip>,
}

impl Track {
    pub fn new(id: TrackId, kind: TrackKind, name: impl Into<String>) -> Self {
        Self {
            id,
            kind,
            name: name.into(),
            clips: Vec::new(),
        }
    }

    /// End of the last clip, or 0 for an empty track.
    pub fn last_end(&self) -> f64 {
        self.clips
            .iter()
            .map(Clip::end_time)
            .fold(0.0, f64::max)
    }

    /// Whether `[new_start, new_start + new_duration)` would intersect any
    /// clip other than `exclude`.
    pub fn would_overlap(&self, exclude: Option<ClipId>, new_start: f64, new_duration: f64) -> bool {
        let new_end = new_start + new_duration;
        self.clips
            .iter()
            .filter(|clip| Some(clip.id) != exclude)
            .any(|clip| overlaps(new_start, new_end, clip.start_time, clip.end_time()))
    }

    pub fn clip(&self, id: ClipId) -> Option<&Clip> {
        self.clips.iter().find(|clip| clip.id == id)
    }

    pub(crate) fn clip_mut(&mut self, id: ClipId) -> Option<&mut Clip> {
        self.clips.iter_mut().find(|clip| clip.id == id)
    }

    pub(crate) fn position(&self, id: ClipId) -> Option<usize> {
        self.clips.iter().position(|clip| clip.id == id)
    }

    /// Clip whose span contains `t` (start inclusive, end exclusive).
    pub fn clip_at_time(&self, t: f64) -> Option<&Clip> {
        self.clips
            .iter()
            .find(|clip| clip.start_time <= t && t < clip.end_time())
    }

    pub(crate) fn sort_clips(&mut self) {
        self.clips
            .sort_by(|a, b| a.start_time.total_cmp(&b.start_time).then(a.id.cmp(&b.id)));
    }

    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }

    /// Pairs of clip ids whose spans intersect.
    pub fn overlapping_pairs(&self) -> Vec<(ClipId, ClipId)> {
        let mut pairs = Vec::new();
        for (i, a) in self.clips.iter().enumerate() {
            for b in &self.clips[i + 1..] {
                if overlaps(a.start_time, a.end_time(), b.start_time, b.end_time()) {
                    pairs.push((a.id, b.id));
                }
            }
        }
        pairs
    }
}
