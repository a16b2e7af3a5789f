//! Core VFS traits and types.

use async_trait::async_trait;
use std::time::SystemTime;

use super::error::FsResult;

/// Discriminant for what a path resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    File,
    Directory,
}

/// Metadata about a file or directory.
#[derive(Debug, Clone)]
pub struct Metadata {
    /// What the path resolves to.
    pub kind: NodeKind,
    /// Size in bytes (0 for directories).
    pub size: u64,
    /// Creation time, if the backend tracks it.
    pub created: Option<SystemTime>,
    /// Last modification time, if the backend tracks it.
    pub modified: Option<SystemTime>,
}

impl Metadata {
    /// True if this is a directory.
    pub fn is_dir(&self) -> bool {
        self.kind == NodeKind::Directory
    }

    /// True if this is a file.
    pub fn is_file(&self) -> bool {
        self.kind == NodeKind::File
    }

    /// Metadata for a directory whose timestamps are unknown (synthesized
    /// entries like a router's root).
    pub fn synthetic_dir() -> Self {
        Self {
            kind: NodeKind::Directory,
            size: 0,
            created: None,
            modified: None,
        }
    }
}

/// Options for [`Filesystem::write`].
#[derive(Debug, Clone, Copy, Default)]
pub struct WriteOptions {
    /// Create missing parent directories instead of failing with `NotFound`.
    pub create_dirs: bool,
}

impl WriteOptions {
    /// Options with `create_dirs` set.
    pub fn create_dirs() -> Self {
        Self { create_dirs: true }
    }
}

/// Options for [`Filesystem::mkdir`].
#[derive(Debug, Clone, Copy, Default)]
pub struct MkdirOptions {
    /// Create missing parent directories instead of failing with `NotFound`.
    pub recursive: bool,
}

impl MkdirOptions {
    /// Options with `recursive` set.
    pub fn recursive() -> Self {
        Self { recursive: true }
    }
}

/// Abstract filesystem interface.
///
/// Paths are absolute, slash-separated virtual paths; every implementation
/// canonicalizes with [`crate::paths::normalize`] before resolving, so
/// callers may pass un-normalized input.
///
/// All operations are async. The in-memory backend never genuinely blocks,
/// but composites (overlay, router) suspend at every delegation boundary,
/// and that interleaving is the only concurrency this VFS models — there
/// is no locking across operations and no transaction boundary.
#[async_trait]
pub trait Filesystem: Send + Sync {
    /// Read the entire contents of a file.
    ///
    /// Fails with `NotFound` unless the path resolves to a file.
    async fn read(&self, path: &str) -> FsResult<Vec<u8>>;

    /// Read a file and decode it as UTF-8, lossily.
    ///
    /// Invalid sequences become replacement characters rather than errors,
    /// matching how the desktop shell decodes app sources and manifests.
    async fn read_to_string(&self, path: &str) -> FsResult<String> {
        let bytes = self.read(path).await?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Replace or create the file at `path`.
    ///
    /// Fails with `NotFound` if the parent directory is missing and
    /// `opts.create_dirs` is unset, and with `NotADirectory` if the parent
    /// resolves to a file.
    async fn write(&self, path: &str, data: &[u8], opts: WriteOptions) -> FsResult<()>;

    /// List child names of a directory, sorted lexicographically.
    ///
    /// Fails with `NotADirectory` if the path is a file or absent.
    async fn readdir(&self, path: &str) -> FsResult<Vec<String>>;

    /// Create a directory.
    ///
    /// Succeeds idempotently if `path` already is a directory; fails with
    /// `NotADirectory` if it is a file. Without `opts.recursive` a missing
    /// parent fails with `NotFound`.
    async fn mkdir(&self, path: &str, opts: MkdirOptions) -> FsResult<()>;

    /// Get metadata for a file or directory. Fails with `NotFound` if absent.
    async fn stat(&self, path: &str) -> FsResult<Metadata>;

    /// Move a node (and, for directories, its whole subtree) to a new path,
    /// creating the destination's intermediate directories as needed.
    ///
    /// Fails with `NotFound` if `old` is absent.
    async fn rename(&self, old: &str, new: &str) -> FsResult<()>;

    /// Remove the entry at `path` from its parent's mapping.
    ///
    /// Fails with `NotFound` if absent.
    async fn unlink(&self, path: &str) -> FsResult<()>;

    /// Check whether a path exists. Never fails.
    async fn exists(&self, path: &str) -> bool {
        self.stat(path).await.is_ok()
    }

    /// Advisory read-only flag. The overlay's lower layer is conventionally
    /// read-only; nothing enforces it.
    fn read_only(&self) -> bool {
        false
    }
}
