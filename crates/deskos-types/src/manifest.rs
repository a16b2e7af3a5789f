//! App manifests.
//!
//! Every installable app ships an `app.json` at
//! `/system/apps/<dir>/app.json`. The kernel's app registry parses these
//! with serde and skips anything that fails [`AppManifest::validate`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a manifest was rejected by [`AppManifest::validate`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ManifestError {
    #[error("manifest has no id")]
    MissingId,
    #[error("manifest has no entry point")]
    MissingEntry,
    #[error("entry point is not absolute: {0}")]
    RelativeEntry(String),
}

/// Parsed `app.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppManifest {
    /// Unique app identifier, e.g. `"music"`.
    pub id: String,
    /// Human-readable name shown in the launcher.
    #[serde(default)]
    pub name: String,
    /// Absolute VFS path of the entry-point source, e.g.
    /// `/system/apps/music/index.js`.
    pub entry: String,
    /// Optional icon path within the app's directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

impl AppManifest {
    /// Check the invariants the app registry relies on.
    pub fn validate(&self) -> Result<(), ManifestError> {
        if self.id.trim().is_empty() {
            return Err(ManifestError::MissingId);
        }
        if self.entry.trim().is_empty() {
            return Err(ManifestError::MissingEntry);
        }
        if !self.entry.starts_with('/') {
            return Err(ManifestError::RelativeEntry(self.entry.clone()));
        }
        Ok(())
    }
}
