//! App registry: scans `/system/apps` for manifests.

use std::collections::HashMap;

use deskos_types::AppManifest;
use tracing::{debug, warn};

use super::{APPS_DIR, MANIFEST_NAME};
use crate::paths::{join, normalize};
use crate::vfs::{Filesystem, FsResult};

/// Registry of installed apps, keyed by manifest id.
#[derive(Debug, Default)]
pub struct AppRegistry {
    by_id: HashMap<String, AppManifest>,
}

impl AppRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Scan `/system/apps` and register every valid manifest found.
    ///
    /// A missing apps directory is not an error — a bare system simply has
    /// no apps. A manifest that fails to parse or validate is logged and
    /// skipped; one bad bundle must not take the desktop down. Returns the
    /// number of apps registered by this scan.
    pub async fn load_from_system(&mut self, fs: &dyn Filesystem) -> FsResult<usize> {
        if !fs.exists(APPS_DIR).await {
            debug!(dir = APPS_DIR, "no apps directory; skipping scan");
            return Ok(0);
        }

        let mut loaded = 0;
        for dir in fs.readdir(APPS_DIR).await? {
            let manifest_path = join(&join(APPS_DIR, &dir), MANIFEST_NAME);
            if !fs.exists(&manifest_path).await {
                continue;
            }
            let json = fs.read_to_string(&manifest_path).await?;
            let manifest: AppManifest = match serde_json::from_str(&json) {
                Ok(m) => m,
                Err(err) => {
                    warn!(path = %manifest_path, %err, "bad manifest, skipping");
                    continue;
                }
            };
            if let Err(err) = manifest.validate() {
                warn!(path = %manifest_path, %err, "invalid manifest, skipping");
                continue;
            }
            debug!(id = %manifest.id, "registered app");
            self.by_id.insert(manifest.id.clone(), manifest);
            loaded += 1;
        }
        Ok(loaded)
    }

    /// Register a manifest directly (used by tests and embedders).
    pub fn register(&mut self, manifest: AppManifest) {
        self.by_id.insert(manifest.id.clone(), manifest);
    }

    /// Look up an app by id.
    pub fn get(&self, id: &str) -> Option<&AppManifest> {
        self.by_id.get(id)
    }

    /// All registered apps, sorted by id.
    pub fn list(&self) -> Vec<&AppManifest> {
        let mut apps: Vec<_> = self.by_id.values().collect();
        apps.sort_by(|a, b| a.id.cmp(&b.id));
        apps
    }

    /// Normalized absolute entry path for an app, if registered.
    pub fn resolve_entry(&self, id: &str) -> Option<String> {
        self.by_id.get(id).map(|m| normalize(&m.entry))
    }

    /// Number of registered apps.
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}
