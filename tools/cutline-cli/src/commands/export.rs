//! Export a timeline to a video file.

use std::io::Write;
use std::path::PathBuf;

use cutline_common::config::ExportDefaults;
use cutline_render::export::{
    export_timeline, ExportFormat, ExportJob, ExportProgress, ExportSettings, ProgressCallback,
};

use super::load_document;

/// Command-line overrides for the configured export defaults.
#[derive(Debug, Default)]
pub struct ExportOverrides {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub fps: Option<u32>,
    pub format: Option<String>,
}

pub async fn run(
    path: PathBuf,
    output: Option<PathBuf>,
    overrides: ExportOverrides,
    keep_work_dir: bool,
    defaults: &ExportDefaults,
) -> anyhow::Result<()> {
    println!("Exporting timeline at: {}", path.display());

    let document = load_document(&path)?;
    let settings = resolve_settings(defaults, overrides)?;
    tracing::debug!(?settings, "Resolved export settings");
    let output_path = output.unwrap_or_else(|| {
        path.with_file_name(format!("{}.{}", document.name, settings.format.extension()))
    });

    println!("  Output: {}", output_path.display());
    println!("  Format: {}", settings.format);
    println!(
        "  Resolution: {}x{} @ {}fps",
        settings.width, settings.height, settings.fps
    );
    println!("  Duration: {:.2}s", document.timeline.duration());

    let mut job = ExportJob::new(document.timeline, &output_path, settings);
    job.keep_work_dir = keep_work_dir;

    let progress_cb: ProgressCallback = Box::new(|p: ExportProgress| {
        print!("\r  Progress: {:>5.1}% {:<40}", p.fraction * 100.0, p.message);
        let _ = std::io::stdout().flush();
    });

    let outcome = export_timeline(job, Some(progress_cb)).await;
    println!();
    let outcome = outcome.map_err(|e| anyhow::anyhow!("Export failed: {e}"))?;

    if outcome.used_fallback {
        println!("  Audio mixing failed; exported without audio.");
    }
    println!(
        "Export complete: {} ({} segment(s))",
        outcome.output_path.display(),
        outcome.plan.segments.len()
    );
    Ok(())
}

fn resolve_settings(
    defaults: &ExportDefaults,
    overrides: ExportOverrides,
) -> anyhow::Result<ExportSettings> {
    let mut settings = ExportSettings::from_defaults(defaults)?;
    if let Some(width) = overrides.width {
        settings.width = width;
    }
    if let Some(height) = overrides.height {
        settings.height = height;
    }
    if let Some(fps) = overrides.fps {
        settings.fps = fps;
    }
    if let Some(format) = overrides.format {
        settings.format = format.parse::<ExportFormat>()?;
    }
    settings.validate()?;
    Ok(settings)
}
