//! Overlay filesystem: a writable upper layer over a read-only lower layer.
//!
//! Reads prefer `upper` and fall through to `lower`. Writes always land in
//! `upper` (copy-on-write, parents created implicitly). Deletions never
//! touch `lower` — they are recorded as tombstones, a set of canonical
//! paths kept beside the upper backend. A tombstoned path reads as absent
//! even while `lower` still holds it.
//!
//! Both layers are ordinary [`Filesystem`] implementations, so overlays
//! stack: the lower side of one overlay can itself be another overlay.
//!
//! Invariants:
//! - `lower` is never mutated. An overlay over an immutable lower backend
//!   can be discarded and rebuilt without losing the lower's content.
//! - A path never simultaneously has live upper data and a tombstone:
//!   writing clears the tombstone first, deleting removes the upper copy
//!   before laying one.
//!
//! Tombstones mask exactly the recorded path, not its descendants.

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::error::{FsError, FsResult};
use super::traits::{Filesystem, Metadata, MkdirOptions, WriteOptions};
use crate::paths::{join, normalize};

/// Writable upper over read-only lower, with tombstone deletes.
pub struct OverlayFs {
    upper: Arc<dyn Filesystem>,
    lower: Arc<dyn Filesystem>,
    tombstones: RwLock<HashSet<String>>,
}

impl OverlayFs {
    /// Build an overlay. `upper` takes every write; `lower` is treated as
    /// read-only (by convention — nothing enforces it).
    pub fn new(upper: Arc<dyn Filesystem>, lower: Arc<dyn Filesystem>) -> Self {
        Self {
            upper,
            lower,
            tombstones: RwLock::new(HashSet::new()),
        }
    }

    /// Direct handle to the lower layer, mostly for inspection in tests
    /// and boot diagnostics.
    pub fn lower(&self) -> &Arc<dyn Filesystem> {
        &self.lower
    }

    /// Direct handle to the upper layer.
    pub fn upper(&self) -> &Arc<dyn Filesystem> {
        &self.upper
    }

    async fn is_masked(&self, canonical: &str) -> bool {
        self.tombstones.read().await.contains(canonical)
    }

    async fn mask(&self, canonical: &str) {
        self.tombstones.write().await.insert(canonical.to_string());
    }

    async fn unmask(&self, canonical: &str) {
        self.tombstones.write().await.remove(canonical);
    }
}

impl std::fmt::Debug for OverlayFs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OverlayFs").finish_non_exhaustive()
    }
}

#[async_trait]
impl Filesystem for OverlayFs {
    async fn read(&self, path: &str) -> FsResult<Vec<u8>> {
        let p = normalize(path);
        if self.is_masked(&p).await {
            return Err(FsError::NotFound(p));
        }
        if self.upper.exists(&p).await {
            return self.upper.read(&p).await;
        }
        self.lower.read(&p).await
    }

    async fn write(&self, path: &str, data: &[u8], _opts: WriteOptions) -> FsResult<()> {
        let p = normalize(path);
        self.unmask(&p).await;
        // Copy-on-write target: parents always materialize in upper.
        self.upper.write(&p, data, WriteOptions::create_dirs()).await
    }

    async fn readdir(&self, path: &str) -> FsResult<Vec<String>> {
        let p = normalize(path);
        // Best-effort union: either side may lack the directory entirely.
        let mut names: HashSet<String> = HashSet::new();
        if let Ok(entries) = self.lower.readdir(&p).await {
            names.extend(entries);
        }
        if let Ok(entries) = self.upper.readdir(&p).await {
            names.extend(entries);
        }

        let tombstones = self.tombstones.read().await;
        let mut result: Vec<String> = names
            .into_iter()
            .filter(|name| !tombstones.contains(&join(&p, name)))
            .collect();
        result.sort();
        Ok(result)
    }

    async fn mkdir(&self, path: &str, _opts: MkdirOptions) -> FsResult<()> {
        let p = normalize(path);
        self.unmask(&p).await;
        // Directories only live in upper.
        self.upper.mkdir(&p, MkdirOptions::recursive()).await
    }

    async fn stat(&self, path: &str) -> FsResult<Metadata> {
        let p = normalize(path);
        if self.is_masked(&p).await {
            return Err(FsError::NotFound(p));
        }
        if self.upper.exists(&p).await {
            return self.upper.stat(&p).await;
        }
        self.lower.stat(&p).await
    }

    /// Emulated as read → write → unlink. Not atomic: a concurrent
    /// observer can see the path at both locations, or at neither.
    async fn rename(&self, old: &str, new: &str) -> FsResult<()> {
        let data = self.read(old).await?;
        self.write(new, &data, WriteOptions::create_dirs()).await?;
        self.unlink(old).await
    }

    async fn unlink(&self, path: &str) -> FsResult<()> {
        let p = normalize(path);
        if self.upper.exists(&p).await {
            self.upper.unlink(&p).await?;
        }
        // Unconditional: lower may have a same-named entry to hide.
        self.mask(&p).await;
        Ok(())
    }

    async fn exists(&self, path: &str) -> bool {
        let p = normalize(path);
        if self.is_masked(&p).await {
            return false;
        }
        self.upper.exists(&p).await || self.lower.exists(&p).await
    }
}
