//! JSON document envelope used to hand a timeline between tools.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::timeline::Timeline;

/// Current on-disk document version.
pub const DOCUMENT_VERSION: &str = "1.0";

/// A named, timestamped timeline as stored on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineDocument {
    /// Schema version.
    pub version: String,

    /// Human-readable name.
    pub name: String,

    /// Creation time (RFC 3339).
    pub created_at: String,

    /// Last save time (RFC 3339).
    pub modified_at: String,

    pub timeline: Timeline,
}

impl TimelineDocument {
    /// Wrap a timeline in a fresh document stamped with the current time.
    pub fn new(name: impl Into<String>, timeline: Timeline) -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        Self {
            version: DOCUMENT_VERSION.to_string(),
            name: name.into(),
            created_at: now.clone(),
            modified_at: now,
            timeline,
        }
    }

    /// Load and validate a document.
    ///
    /// Out-of-range settings are clamped. The id counter is raised above every stored id so later edits never
    /// reuse one.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DocumentError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| DocumentError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        let mut document = Self::from_json(&json).map_err(|e| DocumentError::Parse {
            path: path.to_path_buf(),
            source: e,
        })?;

        document.timeline.sanitize_settings();
        document.timeline.resync_id_counter();
        let problems = document.timeline.validate();
        if !problems.is_empty() {
            return Err(DocumentError::Validation {
                message: problems.join("; "),
            });
        }

        info!(
            path = %path.display(),
            tracks = document.timeline.tracks().len(),
            clips = document.timeline.clip_count(),
            "Loaded timeline document"
        );
        Ok(document)
    }

    /// Write the document as pretty JSON, creating parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), DocumentError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| DocumentError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let json = self.to_json().map_err(|e| DocumentError::Parse {
            path: path.to_path_buf(),
            source: e,
        })?;
        std::fs::write(path, json).map_err(|e| DocumentError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        debug!(path = %path.display(), "Saved timeline document");
        Ok(())
    }

    /// Bump `modified_at` to now.
    pub fn touch(&mut self) {
        self.modified_at = chrono::Utc::now().to_rfc3339();
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Errors from reading or writing a [`TimelineDocument`].
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Parse error in {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Invalid timeline: {message}")]
    Validation { message: String },
}
