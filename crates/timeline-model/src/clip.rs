//! Clip types: placed, trimmed references to source media.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Shortest duration a clip may have (seconds).
pub const MIN_DURATION: f64 = 0.5;

/// Tolerance used when comparing derived times.
pub const TIME_EPSILON: f64 = 1e-9;

/// Smallest crop rectangle edge, in percent of the frame.
pub const MIN_CROP_PERCENT: f64 = 1.0;

/// Smallest allowed scale multiplier.
pub const MIN_SCALE: f64 = 0.01;

/// Timeline-wide unique clip identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClipId(pub u64);

impl fmt::Display for ClipId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "clip-{}", self.0)
    }
}

/// Media kind shared by tracks and the clips they hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackKind {
    Video,
    Audio,
}

impl TrackKind {
    pub fn label(self) -> &'static str {
        match self {
            TrackKind::Video => "Video",
            TrackKind::Audio => "Audio",
        }
    }
}

impl fmt::Display for TrackKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Crop rectangle in percent of the source frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Crop {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Crop {
    /// The whole frame.
    pub const FULL: Crop = Crop {
        x: 0.0,
        y: 0.0,
        width: 100.0,
        height: 100.0,
    };

    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Clamp so the rectangle stays inside `[0, 100]` on both axes.
    pub fn clamped(self) -> Self {
        let x = self.x.clamp(0.0, 100.0 - MIN_CROP_PERCENT);
        let y = self.y.clamp(0.0, 100.0 - MIN_CROP_PERCENT);
        Self {
            x,
            y,
            width: self.width.clamp(MIN_CROP_PERCENT, 100.0 - x),
            height: self.height.clamp(MIN_CROP_PERCENT, 100.0 - y),
        }
    }

    pub fn is_full(&self) -> bool {
        *self == Crop::FULL
    }

    fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.width.is_finite() && self.height.is_finite()
    }
}

impl Default for Crop {
    fn default() -> Self {
        Crop::FULL
    }
}

/// Offset from frame center, in percent of the output frame.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub const CENTER: Position = Position { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Video-only clip parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VideoParams {
    pub crop: Crop,
    pub scale: f64,
    pub position: Position,
}

impl Default for VideoParams {
    fn default() -> Self {
        Self {
            crop: Crop::FULL,
            scale: 1.0,
            position: Position::CENTER,
        }
    }
}

/// Audio-only clip parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AudioParams {
    /// Linear gain in `[0, 1]`.
    pub volume: f64,
    /// Muted clips are left out of the mix.
    #[serde(default)]
    pub muted: bool,
}

impl Default for AudioParams {
    fn default() -> Self {
        Self {
            volume: 1.0,
            muted: false,
        }
    }
}

/// Kind-specific parameters; the variant always matches the owning track.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClipMedia {
    Video(VideoParams),
    Audio(AudioParams),
}

impl ClipMedia {
    /// Default parameters for a clip placed on a track of `kind`.
    pub fn default_for(kind: TrackKind) -> Self {
        match kind {
            TrackKind::Video => ClipMedia::Video(VideoParams::default()),
            TrackKind::Audio => ClipMedia::Audio(AudioParams::default()),
        }
    }

    pub fn kind(&self) -> TrackKind {
        match self {
            ClipMedia::Video(_) => TrackKind::Video,
            ClipMedia::Audio(_) => TrackKind::Audio,
        }
    }
}

/// A placed, trimmed reference to a source media file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Clip {
    pub id: ClipId,

    /// Display name (usually the source file name).
    #[serde(default)]
    pub name: String,

    /// Timeline position of the first frame.
    pub start_time: f64,

    /// Timeline length; always equals `trim_end - trim_start`.
    pub duration: f64,

    /// Source offset of the first used frame.
    pub trim_start: f64,

    /// Source offset one past the last used frame.
    pub trim_end: f64,

    /// Full length of the source media.
    pub original_duration: f64,

    /// Opaque handle or URL owned by the ingestion layer.
    pub source: Option<String>,

    #[serde(flatten)]
    pub media: ClipMedia,
}

impl Clip {
    /// Timeline end (exclusive).
    pub fn end_time(&self) -> f64 {
        self.start_time + self.duration
    }

    /// `[start_time, end_time)`.
    pub fn span(&self) -> (f64, f64) {
        (self.start_time, self.end_time())
    }

    pub fn kind(&self) -> TrackKind {
        self.media.kind()
    }

    pub fn video(&self) -> Option<&VideoParams> {
        match &self.media {
            ClipMedia::Video(params) => Some(params),
            ClipMedia::Audio(_) => None,
        }
    }

    pub fn audio(&self) -> Option<&AudioParams> {
        match &self.media {
            ClipMedia::Audio(params) => Some(params),
            ClipMedia::Video(_) => None,
        }
    }

    /// Whether `t` lies strictly inside the clip span.
    pub fn contains_strictly(&self, t: f64) -> bool {
        t > self.start_time + TIME_EPSILON && t < self.end_time() - TIME_EPSILON
    }

    /// Map a timeline time inside the clip to the source offset it shows.
    pub fn source_offset_at(&self, t: f64) -> f64 {
        self.trim_start + (t - self.start_time)
    }

    /// Invariant violations for this clip, given the minimum duration.
    pub fn violations(&self, min_duration: f64) -> Vec<String> {
        let mut problems = Vec::new();
        if !(self.start_time.is_finite() && self.duration.is_finite()) {
            problems.push(format!("{}: non-finite timing", self.id));
            return problems;
        }
        if self.start_time < -TIME_EPSILON {
            problems.push(format!("{}: negative start {:.3}", self.id, self.start_time));
        }
        if self.duration < min_duration - TIME_EPSILON {
            problems.push(format!(
                "{}: duration {:.3}s below minimum {:.3}s",
                self.id, self.duration, min_duration
            ));
        }
        if ((self.trim_end - self.trim_start) - self.duration).abs() > 1e-6 {
            problems.push(format!(
                "{}: trim window {:.3}..{:.3} does not match duration {:.3}",
                self.id, self.trim_start, self.trim_end, self.duration
            ));
        }
        if self.trim_start < -TIME_EPSILON
            || self.trim_end > self.original_duration + 1e-6
            || self.trim_start >= self.trim_end
        {
            problems.push(format!(
                "{}: trim window {:.3}..{:.3} outside source length {:.3}",
                self.id, self.trim_start, self.trim_end, self.original_duration
            ));
        }
        if let ClipMedia::Video(params) = &self.media {
            if !params.crop.is_finite() || params.crop.clamped() != params.crop {
                problems.push(format!("{}: crop rectangle out of frame", self.id));
            }
            if !(params.scale.is_finite() && params.scale >= MIN_SCALE) {
                problems.push(format!("{}: scale must be positive", self.id));
            }
        }
        if let ClipMedia::Audio(params) = &self.media {
            if !(0.0..=1.0).contains(&params.volume) {
                problems.push(format!("{}: volume {} outside [0, 1]", self.id, params.volume));
            }
        }
        problems
    }
}

/// What callers supply to create a clip; the timeline assigns the id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClipSpec {
    pub name: String,
    pub source: Option<String>,
    /// Initial timeline length; the configured default when absent.
    pub duration: Option<f64>,
    /// Full source length; the clip duration when absent.
    pub original_duration: Option<f64>,
}

impl ClipSpec {
    pub fn new(name: impl Into<String>, source: impl Into<String>, duration: f64) -> Self {
        Self {
            name: name.into(),
            source: Some(source.into()),
            duration: Some(duration),
            original_duration: Some(duration),
        }
    }
}

/// Result of ingesting an uploaded file: `(url, duration, name)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngestedMedia {
    pub url: String,
    pub duration: f64,
    pub name: String,
}

impl From<IngestedMedia> for ClipSpec {
    fn from(media: IngestedMedia) -> Self {
        ClipSpec {
            name: media.name,
            source: Some(media.url),
            duration: Some(media.duration),
            original_duration: Some(media.duration),
        }
    }
}
