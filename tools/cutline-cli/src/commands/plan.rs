//! Print the export plan for a timeline.

use std::path::PathBuf;

use cutline_render::{build_export_plan, PlanOptions};

use super::load_document;

pub fn run(path: PathBuf, no_audio: bool) -> anyhow::Result<()> {
    let document = load_document(&path)?;
    let options = if no_audio {
        PlanOptions::fallback()
    } else {
        PlanOptions::default()
    };

    let plan = build_export_plan(&document.timeline, options);
    println!("{}", plan.to_json()?);
    Ok(())
}
