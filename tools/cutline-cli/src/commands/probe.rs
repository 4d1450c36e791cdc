//! Probe a media file the way `add` would.

use std::path::PathBuf;

use cutline_render::probe_media;

pub fn run(media: PathBuf) -> anyhow::Result<()> {
    let ingested = probe_media(&media)?;
    println!("{}", serde_json::to_string_pretty(&ingested)?);
    Ok(())
}
