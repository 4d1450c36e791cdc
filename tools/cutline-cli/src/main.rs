//! Cutline CLI — build, inspect, plan, and export timelines from the shell.
//!
//! Usage:
//!   cutline init <PATH>              Create an empty timeline document
//!   cutline info <PATH>              Show tracks, clips and duration
//!   cutline validate <PATH>          Check timeline invariants and sources
//!   cutline add <PATH> <MEDIA>       Probe a media file and add it as a clip
//!   cutline plan <PATH>              Print the export plan as JSON
//!   cutline export <PATH>            Render the timeline with ffmpeg
//!   cutline probe <MEDIA>            Show what ingestion sees for a file
//!   cutline extract-audio <MEDIA>    Pull the audio track out as MP3

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use cutline_common::config::AppConfig;
use cutline_timeline::{TrackId, TrackKind};

mod commands;

#[derive(Parser)]
#[command(
    name = "cutline",
    about = "Non-destructive multi-track video timeline editor",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file (defaults to $XDG_CONFIG_HOME/cutline/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum KindArg {
    Video,
    Audio,
}

impl From<KindArg> for TrackKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Video => TrackKind::Video,
            KindArg::Audio => TrackKind::Audio,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new timeline document with one video and one audio track
    Init {
        /// Path of the document to create
        path: PathBuf,

        /// Timeline name (defaults to the file stem)
        #[arg(short, long)]
        name: Option<String>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Show timeline information
    Info {
        /// Path to the timeline document
        path: PathBuf,
    },

    /// Validate a timeline document
    Validate {
        /// Path to the timeline document
        path: PathBuf,
    },

    /// Probe a media file and add it to a track
    Add {
        /// Path to the timeline document
        path: PathBuf,

        /// Media file to ingest
        media: PathBuf,

        /// Target track id (e.g. 3 or track-3)
        #[arg(short, long, value_parser = commands::parse_track_id)]
        track: Option<TrackId>,

        /// Track kind used when no track id is given
        #[arg(long, value_enum, default_value = "video")]
        kind: KindArg,

        /// Start time in seconds (defaults to after the last clip)
        #[arg(long)]
        at: Option<f64>,
    },

    /// Print the export plan as JSON
    Plan {
        /// Path to the timeline document
        path: PathBuf,

        /// Plan without the audio mix
        #[arg(long)]
        no_audio: bool,
    },

    /// Export a timeline to video
    Export {
        /// Path to the timeline document
        path: PathBuf,

        /// Output file path
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format: mp4-h264 | webm
        #[arg(long)]
        format: Option<String>,

        /// Output width
        #[arg(long)]
        width: Option<u32>,

        /// Output height
        #[arg(long)]
        height: Option<u32>,

        /// Output frame rate
        #[arg(long)]
        fps: Option<u32>,

        /// Keep intermediate segment files
        #[arg(long)]
        keep_work_dir: bool,
    },

    /// Show the ingestion result for a media file
    Probe {
        /// Media file to probe
        media: PathBuf,
    },

    /// Extract the audio of a video file to MP3
    ExtractAudio {
        /// Input video file
        media: PathBuf,

        /// Output file (defaults to the input with an .mp3 extension)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Also add the extracted audio to this timeline document
        #[arg(long)]
        add: Option<PathBuf>,

        /// Audio track id for --add
        #[arg(short, long, value_parser = commands::parse_track_id, requires = "add")]
        track: Option<TrackId>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => AppConfig::load_from(path),
        None => AppConfig::load(),
    };
    if cli.verbose {
        config.logging.level = "debug".to_string();
    }
    cutline_common::logging::init_logging(&config.logging);

    match cli.command {
        Commands::Init { path, name, force } => {
            commands::init::run(path, name, force, &config.editor)
        }
        Commands::Info { path } => commands::info::run(path),
        Commands::Validate { path } => commands::validate::run(path),
        Commands::Add {
            path,
            media,
            track,
            kind,
            at,
        } => commands::add::run(path, media, track, kind.into(), at),
        Commands::Plan { path, no_audio } => commands::plan::run(path, no_audio),
        Commands::Export {
            path,
            output,
            format,
            width,
            height,
            fps,
            keep_work_dir,
        } => {
            let overrides = commands::export::ExportOverrides {
                width,
                height,
                fps,
                format,
            };
            commands::export::run(path, output, overrides, keep_work_dir, &config.export).await
        }
        Commands::Probe { media } => commands::probe::run(media),
        Commands::ExtractAudio {
            media,
            output,
            add,
            track,
        } => commands::extract_audio::run(media, output, add, track),
    }
}
