//! Directory views.
//!
//! A [`SubdirFs`] presents one directory of another backend as a root of
//! its own: every incoming path is rewritten under the prefix before
//! delegating. It is a *view*, not a copy — the underlying tree is shared
//! by reference, and mutations through the view are mutations of the
//! original. Callers live under the same single-threaded async discipline
//! as everything else.

use async_trait::async_trait;
use std::sync::Arc;

use super::error::FsResult;
use super::traits::{Filesystem, Metadata, MkdirOptions, WriteOptions};
use crate::paths::{join, normalize};

/// A prefix-rewriting view over another filesystem.
pub struct SubdirFs {
    inner: Arc<dyn Filesystem>,
    base: String,
}

impl SubdirFs {
    /// View `prefix` of `inner` as a filesystem root.
    pub fn new(inner: Arc<dyn Filesystem>, prefix: &str) -> Self {
        Self {
            inner,
            base: normalize(prefix),
        }
    }

    fn wrap(&self, path: &str) -> String {
        join(&self.base, path)
    }
}

impl std::fmt::Debug for SubdirFs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubdirFs").field("base", &self.base).finish()
    }
}

#[async_trait]
impl Filesystem for SubdirFs {
    async fn read(&self, path: &str) -> FsResult<Vec<u8>> {
        self.inner.read(&self.wrap(path)).await
    }

    async fn write(&self, path: &str, data: &[u8], opts: WriteOptions) -> FsResult<()> {
        self.inner.write(&self.wrap(path), data, opts).await
    }

    async fn readdir(&self, path: &str) -> FsResult<Vec<String>> {
        self.inner.readdir(&self.wrap(path)).await
    }

    async fn mkdir(&self, path: &str, opts: MkdirOptions) -> FsResult<()> {
        self.inner.mkdir(&self.wrap(path), opts).await
    }

    async fn stat(&self, path: &str) -> FsResult<Metadata> {
        self.inner.stat(&self.wrap(path)).await
    }

    async fn rename(&self, old: &str, new: &str) -> FsResult<()> {
        self.inner.rename(&self.wrap(old), &self.wrap(new)).await
    }

    async fn unlink(&self, path: &str) -> FsResult<()> {
        self.inner.unlink(&self.wrap(path)).await
    }

    async fn exists(&self, path: &str) -> bool {
        self.inner.exists(&self.wrap(path)).await
    }

    fn read_only(&self) -> bool {
        self.inner.read_only()
    }
}
