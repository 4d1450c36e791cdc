//! Rejections returned by timeline mutations.
//!
//! Every variant means the timeline was left exactly as it was.

use crate::clip::{ClipId, TrackKind};
use crate::track::TrackId;

/// Why a timeline mutation was refused.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EditError {
    #[error("Track not found: {track_id}")]
    TrackNotFound { track_id: TrackId },

    #[error("Clip not found: {clip_id}")]
    ClipNotFound { clip_id: ClipId },

    #[error("Placing {clip} at {start:.3}..{end:.3} would overlap another clip on {track_id}")]
    WouldOverlap {
        clip: String,
        track_id: TrackId,
        start: f64,
        end: f64,
    },

    #[error("{clip_kind} clip cannot be placed on {track_kind} track")]
    KindMismatch {
        clip_kind: TrackKind,
        track_kind: TrackKind,
    },

    #[error("Cut point {at:.3} is not strictly inside {clip_id}")]
    CutOutsideClip { clip_id: ClipId, at: f64 },

    #[error("Cut point {at:.3} would leave a piece of {clip_id} shorter than {min_duration:.3}s")]
    CutTooShort {
        clip_id: ClipId,
        at: f64,
        min_duration: f64,
    },

    #[error("Track index {index} out of range (track count {len})")]
    InvalidIndex { index: usize, len: usize },

    #[error("Invalid media: {message}")]
    InvalidMedia { message: String },

    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: &'static str, value: f64 },
}

impl EditError {
    /// NotFound rejections, which UIs usually swallow silently.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            EditError::TrackNotFound { .. } | EditError::ClipNotFound { .. }
        )
    }

    /// Rejections that protect a timeline invariant.
    pub fn is_invariant_violation(&self) -> bool {
        !self.is_not_found()
    }
}

/// Result alias for timeline mutations.
pub type EditResult<T> = Result<T, EditError>;
