//! Per-app home directories.
//!
//! The first time an app boots it gets `/home/<id>`, created lazily and
//! guarded by a sentinel file so re-seeding is a no-op even after the app
//! has deleted everything else in its home.

use tracing::debug;

use crate::paths::join;
use crate::vfs::{Filesystem, FsResult, MkdirOptions, WriteOptions};

/// Root of all app home directories.
pub const HOME_ROOT: &str = "/home";

/// Sentinel file marking a home directory as seeded.
pub const SEED_SENTINEL: &str = ".seeded";

/// Ensure `/home/<app_id>` exists, seeding it if this is the first boot.
///
/// Returns `true` if the home was seeded by this call, `false` if the
/// sentinel was already present. Idempotent.
pub async fn seed_home(fs: &dyn Filesystem, app_id: &str) -> FsResult<bool> {
    let home = join(HOME_ROOT, app_id);
    let sentinel = join(&home, SEED_SENTINEL);

    if fs.exists(&sentinel).await {
        return Ok(false);
    }

    fs.mkdir(&home, MkdirOptions::recursive()).await?;
    fs.write(&sentinel, b"", WriteOptions::create_dirs()).await?;
    debug!(home = %home, "seeded app home");
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vfs::MemoryFs;

    #[tokio::test]
    async fn seeds_once() {
        let fs = MemoryFs::new();

        assert!(seed_home(&fs, "music").await.unwrap());
        assert!(fs.exists("/home/music/.seeded").await);

        // Second boot: nothing to do.
        assert!(!seed_home(&fs, "music").await.unwrap());
    }

    #[tokio::test]
    async fn reseed_respects_the_sentinel() {
        let fs = MemoryFs::new();
        seed_home(&fs, "notes").await.unwrap();

        // The app wrote data, then wiped a file; the sentinel still gates.
        fs.write("/home/notes/draft.txt", b"x", WriteOptions::default())
            .await
            .unwrap();
        fs.unlink("/home/notes/draft.txt").await.unwrap();

        assert!(!seed_home(&fs, "notes").await.unwrap());
        assert!(!fs.exists("/home/notes/draft.txt").await);
    }

    #[tokio::test]
    async fn different_apps_get_separate_homes() {
        let fs = MemoryFs::new();
        assert!(seed_home(&fs, "a").await.unwrap());
        assert!(seed_home(&fs, "b").await.unwrap());
        assert_eq!(fs.readdir("/home").await.unwrap(), ["a", "b"]);
    }
}
