//! Cutline Timeline Model
//!
//! Defines the non-destructive editing model:
//! - **Intervals:** Half-open `[start, end)` helpers (overlap, merge, subtract)
//! - **Clips:** Trimmed, placed references to source media
//! - **Tracks:** Typed containers of non-overlapping clips
//! - **Timeline:** The ordered track list and every mutation that keeps it
//!   consistent
//! - **Document:** JSON envelope used to hand timelines between tools
//!
//! All times are seconds as `f64`. Every mutation either applies fully or
//! returns an [`EditError`] with the timeline left untouched.

pub mod clip;
pub mod document;
pub mod edit;
pub mod error;
pub mod interval;
pub mod timeline;
pub mod track;

pub use clip::*;
pub use document::*;
pub use edit::TrimSide;
pub use error::*;
pub use interval::{merge, overlaps, subtract, Interval};
pub use timeline::*;
pub use track::*;
