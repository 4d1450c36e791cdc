//! Export configuration and job management.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use cutline_common::config::ExportDefaults;
use cutline_common::error::{CutlineError, CutlineResult};
use cutline_timeline::Timeline;

use crate::ffmpeg;
use crate::plan::{build_export_plan, ExportPlan, PlanOptions, Segment};

/// Container and codec family of the exported file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExportFormat {
    #[serde(rename = "mp4-h264")]
    Mp4H264,
    #[serde(rename = "webm")]
    Webm,
}

impl ExportFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            ExportFormat::Mp4H264 => "mp4-h264",
            ExportFormat::Webm => "webm",
        }
    }

    /// File extension for segments and output.
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Mp4H264 => "mp4",
            ExportFormat::Webm => "webm",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExportFormat {
    type Err = CutlineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mp4" | "mp4-h264" | "h264" => Ok(ExportFormat::Mp4H264),
            "webm" | "vp9" => Ok(ExportFormat::Webm),
            other => Err(CutlineError::config(format!(
                "Unknown export format '{other}' (expected mp4-h264 or webm)"
            ))),
        }
    }
}

/// Encoder settings for one export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportSettings {
    pub width: u32,
    pub height: u32,
    pub fps: u32,
    pub format: ExportFormat,

    /// Target video bitrate; 0 leaves rate control to the encoder.
    pub video_bitrate_kbps: u32,
    pub audio_bitrate_kbps: u32,

    /// x264 preset.
    pub preset: String,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            fps: 30,
            format: ExportFormat::Mp4H264,
            video_bitrate_kbps: 0,
            audio_bitrate_kbps: 192,
            preset: "ultrafast".to_string(),
        }
    }
}

impl ExportSettings {
    pub fn from_defaults(defaults: &ExportDefaults) -> CutlineResult<Self> {
        let settings = Self {
            width: defaults.width,
            height: defaults.height,
            fps: defaults.fps,
            format: defaults.format.parse()?,
            video_bitrate_kbps: defaults.video_bitrate_kbps,
            audio_bitrate_kbps: defaults.audio_bitrate_kbps,
            preset: defaults.preset.clone(),
        };
        settings.validate()?;
        Ok(settings)
    }

    /// yuv420p needs even, non-zero dimensions.
    pub fn validate(&self) -> CutlineResult<()> {
        if self.width == 0 || self.height == 0 || self.width % 2 != 0 || self.height % 2 != 0 {
            return Err(CutlineError::config(format!(
                "Output size {}x{} must be non-zero and even",
                self.width, self.height
            )));
        }
        if !(1..=240).contains(&self.fps) {
            return Err(CutlineError::config(format!(
                "Frame rate {} out of range 1..=240",
                self.fps
            )));
        }
        if self.preset.trim().is_empty() {
            return Err(CutlineError::config("Encoder preset must not be empty"));
        }
        Ok(())
    }
}

/// An export job ready to be rendered.
#[derive(Debug, Clone)]
pub struct ExportJob {
    /// Frozen snapshot of the timeline to render.
    pub timeline: Timeline,

    /// Output file path.
    pub output_path: PathBuf,

    pub settings: ExportSettings,

    /// Directory for intermediate segments; a fresh temp dir when `None`.
    pub work_dir: Option<PathBuf>,

    /// Leave intermediate files behind for debugging.
    pub keep_work_dir: bool,
}

impl ExportJob {
    pub fn new(
        timeline: Timeline,
        output_path: impl Into<PathBuf>,
        settings: ExportSettings,
    ) -> Self {
        Self {
            timeline,
            output_path: output_path.into(),
            settings,
            work_dir: None,
            keep_work_dir: false,
        }
    }
}

/// Progress callback for export rendering.
pub type ProgressCallback = Box<dyn Fn(ExportProgress) + Send>;

/// Export progress report.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportProgress {
    /// Current progress [0.0, 1.0].
    pub fraction: f64,

    /// Human-readable status line.
    pub message: String,

    pub stage: ExportStage,
}

impl ExportProgress {
    pub fn new(fraction: f64, message: impl Into<String>, stage: ExportStage) -> Self {
        Self {
            fraction: fraction.clamp(0.0, 1.0),
            message: message.into(),
            stage,
        }
    }
}

/// Stages of the export process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportStage {
    Preparing,
    Rendering,
    Mixing,
    Concatenating,
    Finalizing,
    Complete,
    Failed,
}

/// Share of the progress bar spent rendering video segments.
const SEGMENTS_FRACTION: f64 = 0.7;

/// Trait for render backends.
pub trait RenderBackend: Send {
    /// Render `plan` to `job.output_path`.
    fn render(
        &mut self,
        plan: &ExportPlan,
        job: &ExportJob,
        progress: Option<&ProgressCallback>,
    ) -> CutlineResult<()>;

    /// Check if this backend is available on the system.
    fn is_available(&self) -> bool;

    /// Backend name.
    fn name(&self) -> &str;
}

/// What an export produced.
#[derive(Debug, Clone)]
pub struct ExportOutcome {
    pub output_path: PathBuf,

    /// The plan that was rendered successfully.
    pub plan: ExportPlan,

    /// Whether the audio-free fallback plan had to be used.
    pub used_fallback: bool,
}

/// Export the timeline snapshot in `job` to a video file.
///
/// This is the main entry point for rendering. Encoding runs on the
/// blocking pool; an encoder failure is retried once without audio.
pub async fn export_timeline(
    job: ExportJob,
    progress: Option<ProgressCallback>,
) -> CutlineResult<ExportOutcome> {
    tracing::info!(
        output = %job.output_path.display(),
        format = %job.settings.format,
        width = job.settings.width,
        height = job.settings.height,
        "Starting export"
    );

    validate_job(&job)?;

    if let Some(parent) = job.output_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let backend = FfmpegBackend::new();
    if !backend.is_available() {
        return Err(CutlineError::unsupported(
            "No supported render backend found (expected ffmpeg in PATH)",
        ));
    }
    tracing::info!(backend = backend.name(), "Using render backend");

    tokio::task::spawn_blocking(move || {
        let mut backend = backend;
        render_with_fallback(&mut backend, &job, progress.as_ref())
    })
    .await
    .map_err(|e| CutlineError::render(format!("Export task failed: {e}")))?
}

/// Reject jobs that cannot produce a valid file.
pub fn validate_job(job: &ExportJob) -> CutlineResult<()> {
    job.settings.validate()?;

    let problems = job.timeline.validate();
    if !problems.is_empty() {
        return Err(CutlineError::document(format!(
            "Timeline failed validation: {}",
            problems.join("; ")
        )));
    }

    if job.output_path.as_os_str().is_empty() {
        return Err(CutlineError::config("Output path must not be empty"));
    }
    Ok(())
}

/// Render the full plan, retrying with the audio-free plan if the encoder
/// fails and there was audio to drop.
pub fn render_with_fallback(
    backend: &mut dyn RenderBackend,
    job: &ExportJob,
    progress: Option<&ProgressCallback>,
) -> CutlineResult<ExportOutcome> {
    let started = std::time::Instant::now();
    report(progress, 0.0, "Planning export...", ExportStage::Preparing);

    let plan = build_export_plan(&job.timeline, PlanOptions::default());
    let first_error = match backend.render(&plan, job, progress) {
        Ok(()) => {
            tracing::info!(
                elapsed_secs = started.elapsed().as_secs_f64(),
                "Export finished"
            );
            return Ok(ExportOutcome {
                output_path: job.output_path.clone(),
                plan,
                used_fallback: false,
            });
        }
        Err(err) => err,
    };

    if !first_error.is_recoverable() || !plan.has_audio() {
        report(progress, 1.0, first_error.to_string(), ExportStage::Failed);
        return Err(first_error);
    }

    tracing::warn!(
        error = %first_error,
        mix_entries = plan.mix.len(),
        "Export failed; retrying without audio"
    );
    report(
        progress,
        0.0,
        "Retrying export without audio...",
        ExportStage::Preparing,
    );

    let fallback = build_export_plan(&job.timeline, PlanOptions::fallback());
    match backend.render(&fallback, job, progress) {
        Ok(()) => {
            tracing::info!(
                elapsed_secs = started.elapsed().as_secs_f64(),
                "Export finished without audio"
            );
            Ok(ExportOutcome {
                output_path: job.output_path.clone(),
                plan: fallback,
                used_fallback: true,
            })
        }
        Err(err) => {
            report(progress, 1.0, err.to_string(), ExportStage::Failed);
            Err(err)
        }
    }
}

fn report(
    progress: Option<&ProgressCallback>,
    fraction: f64,
    message: impl Into<String>,
    stage: ExportStage,
) {
    if let Some(cb) = progress {
        cb(ExportProgress::new(fraction, message, stage));
    }
}

/// Renders a plan by shelling out to ffmpeg once per segment, once for the
/// audio mix, and once for the final concat/mux.
#[derive(Debug, Default)]
pub struct FfmpegBackend;

impl FfmpegBackend {
    pub fn new() -> Self {
        Self
    }

    fn render_segments(
        &self,
        plan: &ExportPlan,
        job: &ExportJob,
        work_dir: &Path,
        progress: Option<&ProgressCallback>,
    ) -> CutlineResult<Vec<PathBuf>> {
        let extension = job.settings.format.extension();
        let total = plan.segments.len();
        let mut outputs = Vec::with_capacity(total);

        for (index, segment) in plan.segments.iter().enumerate() {
            let output = work_dir.join(segment_file_name(index, segment, extension));
            let (label, args) = match segment {
                Segment::Black { duration, .. } => (
                    "black segment",
                    ffmpeg::black_segment_args(*duration, &job.settings, &output),
                ),
                Segment::Clip(clip) => (
                    "clip segment",
                    ffmpeg::clip_segment_args(clip, &job.settings, &output),
                ),
            };

            ffmpeg::run_ffmpeg(&args, label)?;
            outputs.push(output);

            report(
                progress,
                SEGMENTS_FRACTION * (index + 1) as f64 / total.max(1) as f64,
                format!("Rendered segment {}/{total}", index + 1),
                ExportStage::Rendering,
            );
        }
        Ok(outputs)
    }

    fn render_in(
        &self,
        plan: &ExportPlan,
        job: &ExportJob,
        work_dir: &Path,
        progress: Option<&ProgressCallback>,
    ) -> CutlineResult<()> {
        let segments = self.render_segments(plan, job, work_dir, progress)?;

        let list_path = work_dir.join(CONCAT_LIST_FILE);
        std::fs::write(&list_path, ffmpeg::concat_list(&segments))?;

        report(
            progress,
            SEGMENTS_FRACTION,
            "Processing audio tracks...",
            ExportStage::Mixing,
        );
        let mixed_audio = if plan.has_audio() {
            let mixed = work_dir.join(MIXED_AUDIO_FILE);
            ffmpeg::run_ffmpeg(&ffmpeg::mix_args(&plan.mix, &mixed), "audio mix")?;
            tracing::info!(
                entries = plan.mix.len(),
                mix_length_secs = plan.mix_length(),
                "Mixed audio tracks"
            );
            Some(mixed)
        } else {
            None
        };

        report(
            progress,
            0.8,
            "Concatenating segments...",
            ExportStage::Concatenating,
        );
        let args = ffmpeg::mux_args(
            &list_path,
            mixed_audio.as_deref(),
            &job.settings,
            &job.output_path,
        );
        ffmpeg::run_ffmpeg(&args, "concat")?;

        report(progress, 0.95, "Finalizing...", ExportStage::Finalizing);
        Ok(())
    }
}

impl RenderBackend for FfmpegBackend {
    fn render(
        &mut self,
        plan: &ExportPlan,
        job: &ExportJob,
        progress: Option<&ProgressCallback>,
    ) -> CutlineResult<()> {
        let (work_dir, owned) = match &job.work_dir {
            Some(dir) => (dir.clone(), false),
            None => (fresh_work_dir(), true),
        };
        std::fs::create_dir_all(&work_dir)?;
        tracing::info!(
            work_dir = %work_dir.display(),
            segments = plan.segments.len(),
            mix_entries = plan.mix.len(),
            duration_secs = plan.duration,
            "Rendering export plan"
        );

        let result = self.render_in(plan, job, &work_dir, progress);

        if !job.keep_work_dir {
            clean_work_dir(&work_dir, owned, plan, job.settings.format);
        }

        result?;
        report(progress, 1.0, "Export complete!", ExportStage::Complete);
        Ok(())
    }

    fn is_available(&self) -> bool {
        ffmpeg::command_exists("ffmpeg")
    }

    fn name(&self) -> &str {
        "ffmpeg"
    }
}

const CONCAT_LIST_FILE: &str = "concat_list.txt";
const MIXED_AUDIO_FILE: &str = "mixed_audio.wav";

fn segment_file_name(index: usize, segment: &Segment, extension: &str) -> String {
    match segment {
        Segment::Black { .. } => format!("black_{index}.{extension}"),
        Segment::Clip(_) => format!("section_{index}.{extension}"),
    }
}

/// Every intermediate file rendering `plan` can leave in `work_dir`.
fn intermediate_files(plan: &ExportPlan, format: ExportFormat, work_dir: &Path) -> Vec<PathBuf> {
    plan.segments
        .iter()
        .enumerate()
        .map(|(index, segment)| segment_file_name(index, segment, format.extension()))
        .chain([CONCAT_LIST_FILE.to_string(), MIXED_AUDIO_FILE.to_string()])
        .map(|name| work_dir.join(name))
        .collect()
}

/// Remove what the export wrote. A directory the backend created goes away
/// entirely; a caller-supplied one only loses the intermediate files.
fn clean_work_dir(work_dir: &Path, owned: bool, plan: &ExportPlan, format: ExportFormat) {
    if owned {
        if let Err(err) = std::fs::remove_dir_all(work_dir) {
            tracing::warn!(
                error = %err,
                path = %work_dir.display(),
                "Failed to remove export work dir"
            );
        }
        return;
    }

    for file in intermediate_files(plan, format, work_dir) {
        match std::fs::remove_file(&file) {
            Ok(()) => {}
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
            Err(err) => tracing::warn!(
                error = %err,
                path = %file.display(),
                "Failed to remove intermediate export file"
            ),
        }
    }
}

fn fresh_work_dir() -> PathBuf {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);
    std::env::temp_dir().join(format!("cutline-export-{}-{nanos}", std::process::id()))
}
