//! Cutline Render Engine
//!
//! Turns a timeline snapshot into an encoded video file.
//!
//! # Pipeline Architecture
//!
//! ```text
//! timeline ──┬── occlusion ── visible sections ──┐
//!            │                                    ├── ExportPlan
//!            └── audio tracks ── mix entries ─────┘       │
//!                                                         ▼
//!                                   black / clip segments (ffmpeg)
//!                                                         │
//!                                   concat list + amix ───┤
//!                                                         ▼
//!                                                   output.mp4
//! ```

pub mod export;
pub mod ffmpeg;
pub mod ingest;
pub mod plan;

pub use export::*;
pub use ingest::{extract_audio, probe_media};
pub use plan::{build_export_plan, ClipSegment, ExportPlan, MixEntry, PlanOptions, Segment};
