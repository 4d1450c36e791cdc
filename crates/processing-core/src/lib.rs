//! Cutline Processing Core
//!
//! Derives render decisions from a timeline:
//! - **Occlusion:** Resolve which slices of each video clip are visible once
//!   higher tracks are layered on top, and map them back to source offsets
//!
//! This crate is pure computation: no I/O, no external processes.
//! All inputs are data; all outputs are data.

pub mod occlusion;

pub use occlusion::{
    clip_coverage, covered_intervals, frame_owner_at, resolve_visible_sections,
    visible_sections_for_clip, ClipCoverage, VisibleSection,
};
