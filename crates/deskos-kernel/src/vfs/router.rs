//! Mountable filesystem router.
//!
//! Maps path prefixes to independently-backed filesystems and dispatches
//! every operation to the longest matching prefix. Backends can be
//! anything implementing [`Filesystem`] — plain memory, an overlay, a
//! subdir view, or another router.

use async_trait::async_trait;
use std::collections::BTreeSet;
use std::sync::Arc;

use super::error::{FsError, FsResult};
use super::traits::{Filesystem, Metadata, MkdirOptions, WriteOptions};
use crate::paths::normalize;

/// Information about a mount point.
#[derive(Debug, Clone)]
pub struct MountInfo {
    /// The mount prefix (e.g. `"/system"`).
    pub prefix: String,
    /// Whether the mounted backend reports itself read-only.
    pub read_only: bool,
}

struct Mount {
    prefix: String,
    fs: Arc<dyn Filesystem>,
}

/// Routes filesystem operations to mounted backends by longest prefix.
///
/// A path matches a mount if it equals the prefix, starts with
/// `prefix + "/"`, or the prefix is the `"/"` catch-all. The selected
/// backend receives the path with the prefix stripped; the mount root
/// itself becomes `"/"`.
#[derive(Default)]
pub struct MountableFs {
    /// Kept sorted by descending prefix length, so resolution is a linear
    /// scan taking the first match.
    mounts: Vec<Mount>,
}

impl std::fmt::Debug for MountableFs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MountableFs")
            .field(
                "mounts",
                &self.mounts.iter().map(|m| &m.prefix).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl MountableFs {
    /// Create a router with no mounts.
    pub fn new() -> Self {
        Self { mounts: Vec::new() }
    }

    /// Mount a filesystem at `prefix`, replacing any existing mount with
    /// the identical prefix. Returns `&mut Self` so boot code can chain
    /// mounts.
    pub fn mount(&mut self, prefix: &str, fs: impl Filesystem + 'static) -> &mut Self {
        self.mount_arc(prefix, Arc::new(fs))
    }

    /// Mount a filesystem that is already behind an `Arc`.
    pub fn mount_arc(&mut self, prefix: &str, fs: Arc<dyn Filesystem>) -> &mut Self {
        let prefix = normalize(prefix);
        self.mounts.retain(|m| m.prefix != prefix);
        self.mounts.push(Mount { prefix, fs });
        self.mounts
            .sort_by(|a, b| b.prefix.len().cmp(&a.prefix.len()));
        self
    }

    /// List all current mounts, longest prefix first.
    pub fn list_mounts(&self) -> Vec<MountInfo> {
        self.mounts
            .iter()
            .map(|m| MountInfo {
                prefix: m.prefix.clone(),
                read_only: m.fs.read_only(),
            })
            .collect()
    }

    /// Find the backend for a path, returning it with the prefix-stripped
    /// inner path.
    fn resolve(&self, path: &str) -> FsResult<(Arc<dyn Filesystem>, String)> {
        let p = normalize(path);
        for m in &self.mounts {
            if m.prefix == "/" {
                // Universal fallback: the backend sees the full path.
                return Ok((Arc::clone(&m.fs), p));
            }
            if p == m.prefix {
                return Ok((Arc::clone(&m.fs), "/".to_string()));
            }
            if let Some(inner) = p.strip_prefix(&format!("{}/", m.prefix)) {
                return Ok((Arc::clone(&m.fs), format!("/{}", inner)));
            }
        }
        Err(FsError::NoMount(p))
    }

    /// Synthesize the root listing: the first path segment of every
    /// non-root mount prefix, deduplicated and sorted. No single backend
    /// owns `/`, but its mount points are always visible there.
    fn list_root(&self) -> Vec<String> {
        let mut names = BTreeSet::new();
        for m in &self.mounts {
            if m.prefix == "/" {
                continue;
            }
            let first = m.prefix.trim_start_matches('/').split('/').next().unwrap_or("");
            if !first.is_empty() {
                names.insert(first.to_string());
            }
        }
        names.into_iter().collect()
    }
}

#[async_trait]
impl Filesystem for MountableFs {
    async fn read(&self, path: &str) -> FsResult<Vec<u8>> {
        let (fs, inner) = self.resolve(path)?;
        fs.read(&inner).await
    }

    async fn write(&self, path: &str, data: &[u8], opts: WriteOptions) -> FsResult<()> {
        let (fs, inner) = self.resolve(path)?;
        fs.write(&inner, data, opts).await
    }

    async fn readdir(&self, path: &str) -> FsResult<Vec<String>> {
        let p = normalize(path);
        if p == "/" {
            return Ok(self.list_root());
        }
        let (fs, inner) = self.resolve(&p)?;
        fs.readdir(&inner).await
    }

    async fn mkdir(&self, path: &str, opts: MkdirOptions) -> FsResult<()> {
        let (fs, inner) = self.resolve(path)?;
        fs.mkdir(&inner, opts).await
    }

    async fn stat(&self, path: &str) -> FsResult<Metadata> {
        let (fs, inner) = self.resolve(path)?;
        fs.stat(&inner).await
    }

    /// Within one backend this delegates to the backend's own `rename`.
    /// Across backends it is emulated as read → write → unlink, which is
    /// not atomic: a concurrent observer can see the file at both paths,
    /// or at neither.
    async fn rename(&self, old: &str, new: &str) -> FsResult<()> {
        let (old_fs, old_inner) = self.resolve(old)?;
        let (new_fs, new_inner) = self.resolve(new)?;

        if Arc::ptr_eq(&old_fs, &new_fs) {
            return old_fs.rename(&old_inner, &new_inner).await;
        }

        let data = old_fs.read(&old_inner).await?;
        new_fs
            .write(&new_inner, &data, WriteOptions::create_dirs())
            .await?;
        old_fs.unlink(&old_inner).await
    }

    async fn unlink(&self, path: &str) -> FsResult<()> {
        let (fs, inner) = self.resolve(path)?;
        fs.unlink(&inner).await
    }

    async fn exists(&self, path: &str) -> bool {
        match self.resolve(path) {
            Ok((fs, inner)) => fs.exists(&inner).await,
            // No mount is not an error for a probe.
            Err(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vfs::memory::MemoryFs;

    #[tokio::test]
    async fn basic_mount_dispatch() {
        let mut router = MountableFs::new();
        let home = MemoryFs::new();
        home.write("/notes.txt", b"hello", WriteOptions::default())
            .await
            .unwrap();
        router.mount("/home", home);

        assert_eq!(router.read("/home/notes.txt").await.unwrap(), b"hello");
    }

    #[tokio::test]
    async fn longest_prefix_wins() {
        let mut router = MountableFs::new();

        let catchall = MemoryFs::new();
        catchall
            .write("/system/apps/a.js", b"wrong", WriteOptions::create_dirs())
            .await
            .unwrap();

        let system = MemoryFs::new();
        system
            .write("/apps/a.js", b"right", WriteOptions::create_dirs())
            .await
            .unwrap();

        router.mount("/", catchall).mount("/system", system);

        // Dispatched to the /system backend with the prefix stripped.
        assert_eq!(router.read("/system/apps/a.js").await.unwrap(), b"right");
    }

    #[tokio::test]
    async fn mount_root_becomes_slash() {
        let mut router = MountableFs::new();
        let m = MemoryFs::new();
        m.write("/top.txt", b"t", WriteOptions::default()).await.unwrap();
        router.mount("/data", m);

        // Statting the mount point itself reaches the backend's root.
        assert!(router.stat("/data").await.unwrap().is_dir());
        assert_eq!(router.readdir("/data").await.unwrap(), ["top.txt"]);
    }

    #[tokio::test]
    async fn root_listing_synthesizes_mount_points() {
        for order in [
            ["/system", "/home", "/music"],
            ["/music", "/system", "/home"],
        ] {
            let mut router = MountableFs::new();
            for prefix in order {
                router.mount(prefix, MemoryFs::new());
            }
            assert_eq!(
                router.readdir("/").await.unwrap(),
                ["home", "music", "system"],
                "mount order must not matter"
            );
        }
    }

    #[tokio::test]
    async fn root_listing_dedupes_nested_prefixes() {
        let mut router = MountableFs::new();
        router
            .mount("/mnt/a", MemoryFs::new())
            .mount("/mnt/b", MemoryFs::new())
            .mount("/", MemoryFs::new());

        assert_eq!(router.readdir("/").await.unwrap(), ["mnt"]);
    }

    #[tokio::test]
    async fn remounting_replaces() {
        let mut router = MountableFs::new();
        let first = MemoryFs::new();
        first.write("/f", b"1", WriteOptions::default()).await.unwrap();
        router.mount("/data", first);

        router.mount("/data", MemoryFs::new());
        assert!(!router.exists("/data/f").await);
        assert_eq!(router.list_mounts().len(), 1);
    }

    #[tokio::test]
    async fn no_mount_is_an_error_except_for_exists() {
        let router = MountableFs::new();
        assert_eq!(
            router.read("/nothing/here.txt").await.unwrap_err(),
            FsError::NoMount("/nothing/here.txt".into())
        );
        assert!(!router.exists("/nothing/here.txt").await);
    }

    #[tokio::test]
    async fn catchall_receives_full_path() {
        let mut router = MountableFs::new();
        let root = MemoryFs::new();
        root.write("/at-root.txt", b"root file", WriteOptions::default())
            .await
            .unwrap();
        router.mount("/", root);

        assert_eq!(router.read("/at-root.txt").await.unwrap(), b"root file");
    }

    #[tokio::test]
    async fn rename_within_one_backend_delegates() {
        let mut router = MountableFs::new();
        let m = MemoryFs::new();
        m.write("/dir/a", b"a", WriteOptions::create_dirs()).await.unwrap();
        router.mount("/home", m);

        // Directory rename works natively inside a single backend.
        router.rename("/home/dir", "/home/moved").await.unwrap();
        assert_eq!(router.read("/home/moved/a").await.unwrap(), b"a");
        assert!(!router.exists("/home/dir").await);
    }

    #[tokio::test]
    async fn rename_across_backends_copies_then_unlinks() {
        let mut router = MountableFs::new();
        let src = MemoryFs::new();
        src.write("/song.mp3", b"tune", WriteOptions::default())
            .await
            .unwrap();
        router.mount("/music", src).mount("/home", MemoryFs::new());

        router
            .rename("/music/song.mp3", "/home/backup/song.mp3")
            .await
            .unwrap();

        // Post-conditions only: the move is not atomic.
        assert_eq!(
            router.read("/home/backup/song.mp3").await.unwrap(),
            b"tune"
        );
        assert!(!router.exists("/music/song.mp3").await);
    }

    #[tokio::test]
    async fn write_through_router() {
        let mut router = MountableFs::new();
        router.mount("/home", MemoryFs::new());

        router
            .write("/home/new.txt", b"created", WriteOptions::default())
            .await
            .unwrap();
        assert_eq!(router.read("/home/new.txt").await.unwrap(), b"created");
    }

    #[tokio::test]
    async fn list_mounts_reports_prefixes() {
        let mut router = MountableFs::new();
        router.mount("/home", MemoryFs::new()).mount("/", MemoryFs::new());

        let mounts = router.list_mounts();
        let prefixes: Vec<_> = mounts.iter().map(|m| m.prefix.as_str()).collect();
        assert_eq!(prefixes, ["/home", "/"]);
    }
}
