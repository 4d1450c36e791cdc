//! Clip edit operations: move, trim, cut, and property changes.
//!
//! Placement-affecting edits are validated against the no-overlap rule of
//! the destination track before anything is written.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::clip::{Clip, ClipId, ClipMedia, Crop, Position, MIN_SCALE, TIME_EPSILON};
use crate::error::{EditError, EditResult};
use crate::timeline::Timeline;
use crate::track::TrackId;

/// Which edge of a clip a trim drags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrimSide {
    Start,
    End,
}

impl Timeline {
    /// The no-overlap check for `track_id`, ignoring `exclude`.
    pub fn would_overlap(
        &self,
        track_id: TrackId,
        exclude: Option<ClipId>,
        new_start: f64,
        new_duration: f64,
    ) -> EditResult<bool> {
        Ok(self
            .require_track(track_id)?
            .would_overlap(exclude, new_start, new_duration))
    }

    /// Move a clip within its track. Negative starts are pinned to 0.
    pub fn move_clip(
        &mut self,
        track_id: TrackId,
        clip_id: ClipId,
        new_start: f64,
    ) -> EditResult<()> {
        let new_start = finite("start_time", new_start)?.max(0.0);
        let track = self.require_track(track_id)?;
        let clip = track
            .clip(clip_id)
            .ok_or(EditError::ClipNotFound { clip_id })?;
        let duration = clip.duration;

        if track.would_overlap(Some(clip_id), new_start, duration) {
            warn!(track_id = %track_id, clip_id = %clip_id, new_start, "move rejected: overlap");
            return Err(overlap_error(clip_id, track_id, new_start, duration));
        }

        let track = self.track_mut(track_id)?;
        if let Some(clip) = track.clip_mut(clip_id) {
            clip.start_time = new_start;
        }
        track.sort_clips();
        debug!(track_id = %track_id, clip_id = %clip_id, new_start, "move accepted");
        Ok(())
    }

    /// Move a clip to another track, keeping its id.
    ///
    /// Refused when the destination holds a different media kind or the new
    /// span would overlap there; both tracks are then left untouched.
    pub fn move_clip_to_track(
        &mut self,
        from_track: TrackId,
        to_track: TrackId,
        clip_id: ClipId,
        new_start: f64,
    ) -> EditResult<()> {
        if from_track == to_track {
            return self.move_clip(from_track, clip_id, new_start);
        }

        let new_start = finite("start_time", new_start)?.max(0.0);
        let from_index = self.require_track_index(from_track)?;
        let to_index = self.require_track_index(to_track)?;

        let clip = self.tracks()[from_index]
            .clip(clip_id)
            .ok_or(EditError::ClipNotFound { clip_id })?;
        let destination = &self.tracks()[to_index];

        if clip.kind() != destination.kind {
            warn!(
                clip_id = %clip_id,
                clip_kind = %clip.kind(),
                track_kind = %destination.kind,
                "cross-track move rejected: kind mismatch"
            );
            return Err(EditError::KindMismatch {
                clip_kind: clip.kind(),
                track_kind: destination.kind,
            });
        }
        if destination.would_overlap(Some(clip_id), new_start, clip.duration) {
            warn!(
                clip_id = %clip_id,
                to_track = %to_track,
                new_start,
                "cross-track move rejected: overlap"
            );
            return Err(overlap_error(clip_id, to_track, new_start, clip.duration));
        }

        let tracks = self.tracks_mut();
        let Some(position) = tracks[from_index].position(clip_id) else {
            return Err(EditError::ClipNotFound { clip_id });
        };
        let mut moved = tracks[from_index].clips.remove(position);
        moved.start_time = new_start;
        tracks[to_index].clips.push(moved);
        tracks[to_index].sort_clips();

        debug!(
            clip_id = %clip_id,
            from_track = %from_track,
            to_track = %to_track,
            new_start,
            "cross-track move accepted"
        );
        Ok(())
    }

    /// Drag one edge of a clip by `delta` seconds.
    ///
    /// The delta is clamped so the trim window stays inside the source, the
    /// clip stays at or after 0, and the duration stays at or above the
    /// minimum. Returns the delta that was actually applied.
    pub fn trim(
        &mut self,
        track_id: TrackId,
        clip_id: ClipId,
        side: TrimSide,
        delta: f64,
    ) -> EditResult<f64> {
        let delta = finite("delta", delta)?;
        let min = self.settings().min_clip_duration;
        let track = self.require_track(track_id)?;
        let clip = track
            .clip(clip_id)
            .ok_or(EditError::ClipNotFound { clip_id })?;

        let trimmed = match side {
            TrimSide::Start => trim_start_edge(clip, delta, min),
            TrimSide::End => trim_end_edge(clip, delta, min),
        };

        if track.would_overlap(Some(clip_id), trimmed.start_time, trimmed.duration) {
            warn!(
                track_id = %track_id,
                clip_id = %clip_id,
                side = ?side,
                delta,
                "trim rejected: overlap"
            );
            return Err(overlap_error(
                clip_id,
                track_id,
                trimmed.start_time,
                trimmed.duration,
            ));
        }

        let applied = trimmed.applied;
        let track = self.track_mut(track_id)?;
        if let Some(clip) = track.clip_mut(clip_id) {
            clip.start_time = trimmed.start_time;
            clip.duration = trimmed.duration;
            clip.trim_start = trimmed.trim_start;
            clip.trim_end = trimmed.trim_end;
        }
        track.sort_clips();
        debug!(
            track_id = %track_id,
            clip_id = %clip_id,
            side = ?side,
            requested = delta,
            applied,
            "trim accepted"
        );
        Ok(applied)
    }

    /// Set start and duration directly, keeping `trim_start` fixed.
    ///
    /// Duration is clamped to the minimum and to the source remaining after
    /// `trim_start`.
    pub fn set_timing(
        &mut self,
        track_id: TrackId,
        clip_id: ClipId,
        start_time: f64,
        duration: f64,
    ) -> EditResult<()> {
        let start_time = finite("start_time", start_time)?.max(0.0);
        let duration = finite("duration", duration)?;
        let min = self.settings().min_clip_duration;
        let track = self.require_track(track_id)?;
        let clip = track
            .clip(clip_id)
            .ok_or(EditError::ClipNotFound { clip_id })?;

        let available = clip.original_duration - clip.trim_start;
        let duration = duration.min(available).max(min.min(available));

        if track.would_overlap(Some(clip_id), start_time, duration) {
            warn!(track_id = %track_id, clip_id = %clip_id, start_time, duration, "timing rejected: overlap");
            return Err(overlap_error(clip_id, track_id, start_time, duration));
        }

        let track = self.track_mut(track_id)?;
        if let Some(clip) = track.clip_mut(clip_id) {
            clip.start_time = start_time;
            clip.duration = duration;
            clip.trim_end = clip.trim_start + duration;
        }
        track.sort_clips();
        debug!(track_id = %track_id, clip_id = %clip_id, start_time, duration, "timing accepted");
        Ok(())
    }

    /// Split a clip at `at_time` into two clips with fresh ids.
    ///
    /// The cut must fall strictly inside the clip and leave both halves at or
    /// above the minimum duration.
    pub fn cut(
        &mut self,
        track_id: TrackId,
        clip_id: ClipId,
        at_time: f64,
    ) -> EditResult<(ClipId, ClipId)> {
        let min = self.settings().min_clip_duration;
        let track = self.require_track(track_id)?;
        let clip = track
            .clip(clip_id)
            .ok_or(EditError::ClipNotFound { clip_id })?;

        if !at_time.is_finite() || !clip.contains_strictly(at_time) {
            warn!(track_id = %track_id, clip_id = %clip_id, at_time, "cut rejected: outside clip");
            return Err(EditError::CutOutsideClip {
                clip_id,
                at: at_time,
            });
        }

        let first_duration = at_time - clip.start_time;
        let second_duration = clip.duration - first_duration;
        if first_duration < min - TIME_EPSILON || second_duration < min - TIME_EPSILON {
            warn!(track_id = %track_id, clip_id = %clip_id, at_time, "cut rejected: piece too short");
            return Err(EditError::CutTooShort {
                clip_id,
                at: at_time,
                min_duration: min,
            });
        }

        let original = clip.clone();
        let first_id = ClipId(self.alloc_id());
        let second_id = ClipId(self.alloc_id());

        let first = Clip {
            id: first_id,
            duration: first_duration,
            trim_end: original.trim_start + first_duration,
            ..original.clone()
        };
        let second = Clip {
            id: second_id,
            start_time: at_time,
            duration: second_duration,
            trim_start: original.trim_start + first_duration,
            ..original
        };

        let track = self.track_mut(track_id)?;
        let Some(position) = track.position(clip_id) else {
            return Err(EditError::ClipNotFound { clip_id });
        };
        track.clips.splice(position..=position, [first, second]);
        track.sort_clips();

        debug!(
            track_id = %track_id,
            clip_id = %clip_id,
            at_time,
            first_id = %first_id,
            second_id = %second_id,
            first_duration,
            second_duration,
            "cut accepted"
        );
        Ok((first_id, second_id))
    }

    /// Replace a video clip's crop, clamped into the frame.
    pub fn set_crop(&mut self, track_id: TrackId, clip_id: ClipId, crop: Crop) -> EditResult<()> {
        for (field, value) in [
            ("crop.x", crop.x),
            ("crop.y", crop.y),
            ("crop.width", crop.width),
            ("crop.height", crop.height),
        ] {
            finite(field, value)?;
        }
        let clip = self.clip_mut(track_id, clip_id)?;
        match &mut clip.media {
            ClipMedia::Video(params) => {
                params.crop = crop.clamped();
                Ok(())
            }
            ClipMedia::Audio(_) => Err(audio_not_video()),
        }
    }

    /// Replace a video clip's scale; values below the minimum are raised.
    pub fn set_scale(&mut self, track_id: TrackId, clip_id: ClipId, scale: f64) -> EditResult<()> {
        let scale = finite("scale", scale)?.max(MIN_SCALE);
        let clip = self.clip_mut(track_id, clip_id)?;
        match &mut clip.media {
            ClipMedia::Video(params) => {
                params.scale = scale;
                Ok(())
            }
            ClipMedia::Audio(_) => Err(audio_not_video()),
        }
    }

    pub fn set_position(
        &mut self,
        track_id: TrackId,
        clip_id: ClipId,
        position: Position,
    ) -> EditResult<()> {
        finite("position.x", position.x)?;
        finite("position.y", position.y)?;
        let clip = self.clip_mut(track_id, clip_id)?;
        match &mut clip.media {
            ClipMedia::Video(params) => {
                params.position = position;
                Ok(())
            }
            ClipMedia::Audio(_) => Err(audio_not_video()),
        }
    }

    /// Replace an audio clip's volume, clamped to `[0, 1]`.
    pub fn set_volume(&mut self, track_id: TrackId, clip_id: ClipId, volume: f64) -> EditResult<()> {
        let volume = finite("volume", volume)?.clamp(0.0, 1.0);
        let clip = self.clip_mut(track_id, clip_id)?;
        match &mut clip.media {
            ClipMedia::Audio(params) => {
                params.volume = volume;
                Ok(())
            }
            ClipMedia::Video(_) => Err(video_not_audio()),
        }
    }

    pub fn set_muted(&mut self, track_id: TrackId, clip_id: ClipId, muted: bool) -> EditResult<()> {
        let clip = self.clip_mut(track_id, clip_id)?;
        match &mut clip.media {
            ClipMedia::Audio(params) => {
                params.muted = muted;
                Ok(())
            }
            ClipMedia::Video(_) => Err(video_not_audio()),
        }
    }

    pub fn set_clip_name(
        &mut self,
        track_id: TrackId,
        clip_id: ClipId,
        name: impl Into<String>,
    ) -> EditResult<()> {
        self.clip_mut(track_id, clip_id)?.name = name.into();
        Ok(())
    }

    fn clip_mut(&mut self, track_id: TrackId, clip_id: ClipId) -> EditResult<&mut Clip> {
        self.track_mut(track_id)?
            .clip_mut(clip_id)
            .ok_or(EditError::ClipNotFound { clip_id })
    }
}

/// Resulting geometry of a trim, before the overlap check.
#[derive(Debug, Clone, Copy)]
struct Trimmed {
    start_time: f64,
    duration: f64,
    trim_start: f64,
    trim_end: f64,
    applied: f64,
}

fn trim_start_edge(clip: &Clip, delta: f64, min: f64) -> Trimmed {
    let lower = -clip.trim_start.min(clip.start_time).max(0.0);
    let upper = (clip.duration - min).max(0.0);
    let applied = delta.clamp(lower, upper);

    let duration = if applied >= upper {
        clip.duration.min(min)
    } else {
        clip.duration - applied
    };
    let shift = clip.duration - duration;

    Trimmed {
        start_time: clip.start_time + shift,
        duration,
        trim_start: clip.trim_start + shift,
        trim_end: clip.trim_end,
        applied: shift,
    }
}

fn trim_end_edge(clip: &Clip, delta: f64, min: f64) -> Trimmed {
    let lower = (min - clip.duration).min(0.0);
    let upper = (clip.original_duration - clip.trim_end).max(0.0);
    let applied = delta.clamp(lower, upper);

    let (duration, trim_end) = if applied >= upper && applied > 0.0 {
        (
            clip.original_duration - clip.trim_start,
            clip.original_duration,
        )
    } else if applied <= lower && applied < 0.0 {
        (min, clip.trim_start + min)
    } else {
        let duration = clip.duration + applied;
        (duration, clip.trim_start + duration)
    };

    Trimmed {
        start_time: clip.start_time,
        duration,
        trim_start: clip.trim_start,
        trim_end,
        applied: duration - clip.duration,
    }
}

fn finite(field: &'static str, value: f64) -> EditResult<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(EditError::InvalidValue { field, value })
    }
}

fn overlap_error(clip_id: ClipId, track_id: TrackId, start: f64, duration: f64) -> EditError {
    EditError::WouldOverlap {
        clip: clip_id.to_string(),
        track_id,
        start,
        end: start + duration,
    }
}

fn audio_not_video() -> EditError {
    EditError::KindMismatch {
        clip_kind: crate::clip::TrackKind::Audio,
        track_kind: crate::clip::TrackKind::Video,
    }
}

fn video_not_audio() -> EditError {
    EditError::KindMismatch {
        clip_kind: crate::clip::TrackKind::Video,
        track_kind: crate::clip::TrackKind::Audio,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clip::{ClipSpec, TrackKind};

    fn timeline_with_clip(start: f64, duration: f64) -> (Timeline, TrackId, ClipId) {
        let mut timeline = Timeline::new();
        let video = timeline.tracks()[0].id;
        let clip = timeline
            .add_clip_at(video, ClipSpec::new("a", "a.mp4", duration), start)
            .unwrap();
        (timeline, video, clip)
    }

    fn clip(timeline: &Timeline, id: ClipId) -> Clip {
        timeline.find_clip(id).unwrap().1.clone()
    }

    #[test]
    fn test_move_clip_updates_start() {
        let (mut timeline, video, id) = timeline_with_clip(0.0, 5.0);
        timeline.move_clip(video, id, 3.0).unwrap();
        assert_eq!(clip(&timeline, id).start_time, 3.0);
    }

    #[test]
    fn test_move_clip_onto_neighbor_is_rejected() {
        let (mut timeline, video, id) = timeline_with_clip(0.0, 5.0);
        timeline
            .add_clip_at(video, ClipSpec::new("b", "b.mp4", 5.0), 10.0)
            .unwrap();
        let before = timeline.clone();

        let err = timeline.move_clip(video, id, 8.0).unwrap_err();
        assert!(matches!(err, EditError::WouldOverlap { .. }));
        assert_eq!(timeline, before);
    }

    #[test]
    fn test_move_clip_pins_negative_start() {
        let (mut timeline, video, id) = timeline_with_clip(2.0, 5.0);
        timeline.move_clip(video, id, -4.0).unwrap();
        assert_eq!(clip(&timeline, id).start_time, 0.0);
    }

    #[test]
    fn test_move_unknown_clip_is_not_found() {
        let (mut timeline, video, _) = timeline_with_clip(0.0, 5.0);
        let err = timeline.move_clip(video, ClipId(404), 1.0).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_cross_track_move_keeps_id() {
        let (mut timeline, video, id) = timeline_with_clip(0.0, 5.0);
        let upper = timeline.add_track(TrackKind::Video);
        timeline.move_clip_to_track(video, upper, id, 2.0).unwrap();

        let (index, moved) = timeline.find_clip(id).unwrap();
        assert_eq!(timeline.tracks()[index].id, upper);
        assert_eq!(moved.start_time, 2.0);
        assert!(timeline.track(video).unwrap().is_empty());
    }

    #[test]
    fn test_cross_track_move_rejects_kind_mismatch() {
        let (mut timeline, video, id) = timeline_with_clip(0.0, 5.0);
        let audio = timeline.tracks()[1].id;
        let before = timeline.clone();

        let err = timeline.move_clip_to_track(video, audio, id, 0.0).unwrap_err();
        assert_eq!(
            err,
            EditError::KindMismatch {
                clip_kind: TrackKind::Video,
                track_kind: TrackKind::Audio
            }
        );
        assert_eq!(timeline, before);
    }

    #[test]
    fn test_cross_track_move_rejects_overlap_on_destination() {
        let (mut timeline, video, id) = timeline_with_clip(0.0, 5.0);
        let upper = timeline.add_track(TrackKind::Video);
        timeline
            .add_clip_at(upper, ClipSpec::new("b", "b.mp4", 4.0), 0.0)
            .unwrap();
        let before = timeline.clone();

        assert!(timeline.move_clip_to_track(video, upper, id, 1.0).is_err());
        assert_eq!(timeline, before);
    }

    #[test]
    fn test_trim_start_shrinks_from_left() {
        let (mut timeline, video, id) = timeline_with_clip(2.0, 10.0);
        let applied = timeline.trim(video, id, TrimSide::Start, 3.0).unwrap();
        let c = clip(&timeline, id);
        assert_eq!(applied, 3.0);
        assert_eq!(c.start_time, 5.0);
        assert_eq!(c.duration, 7.0);
        assert_eq!(c.trim_start, 3.0);
        assert_eq!(c.trim_end, 10.0);
    }

    #[test]
    fn test_trim_start_clamps_to_minimum_duration() {
        let (mut timeline, video, id) = timeline_with_clip(0.0, 10.0);
        timeline.trim(video, id, TrimSide::Start, 50.0).unwrap();
        let c = clip(&timeline, id);
        assert_eq!(c.duration, 0.5);
        assert_eq!(c.start_time, 9.5);
        assert_eq!(c.trim_start, 9.5);
        assert_eq!(c.trim_end, 10.0);
    }

    #[test]
    fn test_trim_start_cannot_extend_before_source() {
        let (mut timeline, video, id) = timeline_with_clip(5.0, 10.0);
        timeline.trim(video, id, TrimSide::Start, 2.0).unwrap();
        let applied = timeline.trim(video, id, TrimSide::Start, -6.0).unwrap();
        let c = clip(&timeline, id);
        assert_eq!(applied, -2.0);
        assert_eq!(c.trim_start, 0.0);
        assert_eq!(c.start_time, 5.0);
        assert_eq!(c.duration, 10.0);
    }

    #[test]
    fn test_trim_end_clamps_to_source_length() {
        let (mut timeline, video, id) = timeline_with_clip(0.0, 10.0);
        timeline.trim(video, id, TrimSide::End, -4.0).unwrap();
        assert_eq!(clip(&timeline, id).duration, 6.0);

        timeline.trim(video, id, TrimSide::End, 100.0).unwrap();
        let c = clip(&timeline, id);
        assert_eq!(c.duration, 10.0);
        assert_eq!(c.trim_end, 10.0);
    }

    #[test]
    fn test_trim_end_clamps_to_minimum_duration() {
        let (mut timeline, video, id) = timeline_with_clip(0.0, 10.0);
        timeline.trim(video, id, TrimSide::End, -50.0).unwrap();
        let c = clip(&timeline, id);
        assert_eq!(c.duration, 0.5);
        assert_eq!(c.trim_end, 0.5);
    }

    #[test]
    fn test_trim_into_neighbor_is_rejected() {
        let (mut timeline, video, id) = timeline_with_clip(0.0, 10.0);
        timeline.trim(video, id, TrimSide::End, -5.0).unwrap();
        timeline
            .add_clip_at(video, ClipSpec::new("b", "b.mp4", 2.0), 6.0)
            .unwrap();
        let before = timeline.clone();

        let err = timeline.trim(video, id, TrimSide::End, 3.0).unwrap_err();
        assert!(matches!(err, EditError::WouldOverlap { .. }));
        assert_eq!(timeline, before);
    }

    #[test]
    fn test_cut_splits_clip_in_two() {
        let (mut timeline, video, id) = timeline_with_clip(2.0, 10.0);
        timeline.trim(video, id, TrimSide::Start, 1.0).unwrap();
        let original = clip(&timeline, id);

        let (first_id, second_id) = timeline.cut(video, id, 6.0).unwrap();
        let first = clip(&timeline, first_id);
        let second = clip(&timeline, second_id);

        assert!(timeline.find_clip(id).is_none());
        assert_eq!(first.start_time, original.start_time);
        assert_eq!(first.duration, 3.0);
        assert_eq!(second.start_time, 6.0);
        assert!((first.duration + second.duration - original.duration).abs() < 1e-9);
        assert_eq!(first.trim_end, second.trim_start);
        assert_eq!(first.source, second.source);
        assert_eq!(first.original_duration, second.original_duration);

        let order: Vec<ClipId> = timeline.track(video).unwrap().clips.iter().map(|c| c.id).collect();
        assert_eq!(order, vec![first_id, second_id]);
    }

    #[test]
    fn test_cut_at_boundary_is_rejected() {
        let (mut timeline, video, id) = timeline_with_clip(2.0, 10.0);
        let before = timeline.clone();
        for at in [2.0, 12.0, 0.0, 20.0] {
            let err = timeline.cut(video, id, at).unwrap_err();
            assert!(matches!(err, EditError::CutOutsideClip { .. }));
        }
        assert_eq!(timeline, before);
    }

    #[test]
    fn test_cut_too_close_to_edge_is_rejected() {
        let (mut timeline, video, id) = timeline_with_clip(0.0, 10.0);
        let err = timeline.cut(video, id, 0.2).unwrap_err();
        assert!(matches!(err, EditError::CutTooShort { .. }));
    }

    #[test]
    fn test_set_crop_clamps_rectangle() {
        let (mut timeline, video, id) = timeline_with_clip(0.0, 5.0);
        timeline
            .set_crop(video, id, Crop::new(50.0, 10.0, 80.0, 95.0))
            .unwrap();
        let crop = clip(&timeline, id).video().unwrap().crop;
        assert_eq!(crop, Crop::new(50.0, 10.0, 50.0, 90.0));
    }

    #[test]
    fn test_set_volume_on_video_clip_is_kind_mismatch() {
        let (mut timeline, video, id) = timeline_with_clip(0.0, 5.0);
        assert!(matches!(
            timeline.set_volume(video, id, 0.5),
            Err(EditError::KindMismatch { .. })
        ));
    }

    #[test]
    fn test_set_volume_clamps() {
        let mut timeline = Timeline::new();
        let audio = timeline.tracks()[1].id;
        let id = timeline
            .add_clip(audio, ClipSpec::new("m", "m.mp3", 4.0))
            .unwrap();
        timeline.set_volume(audio, id, 1.7).unwrap();
        assert_eq!(clip(&timeline, id).audio().unwrap().volume, 1.0);
        timeline.set_volume(audio, id, -1.0).unwrap();
        assert_eq!(clip(&timeline, id).audio().unwrap().volume, 0.0);
        assert!(timeline.set_volume(audio, id, f64::NAN).is_err());
    }

    #[test]
    fn test_set_scale_and_position() {
        let (mut timeline, video, id) = timeline_with_clip(0.0, 5.0);
        timeline.set_scale(video, id, 0.0).unwrap();
        timeline.set_position(video, id, Position::new(10.0, -5.0)).unwrap();
        let params = *clip(&timeline, id).video().unwrap();
        assert_eq!(params.scale, MIN_SCALE);
        assert_eq!(params.position, Position::new(10.0, -5.0));
    }

    #[test]
    fn test_set_timing_clamps_to_remaining_source() {
        let (mut timeline, video, id) = timeline_with_clip(0.0, 10.0);
        timeline.trim(video, id, TrimSide::Start, 4.0).unwrap();
        timeline.set_timing(video, id, 1.0, 30.0).unwrap();
        let c = clip(&timeline, id);
        assert_eq!(c.start_time, 1.0);
        assert_eq!(c.duration, 6.0);
        assert_eq!(c.trim_end, 10.0);
    }
}
