//! Entry-point loading.
//!
//! The kernel's half of app loading: read the entry source out of the
//! VFS. Turning that source into a running module is the shell's job
//! (in the browser build, a blob-URL dynamic import).

use deskos_types::AppManifest;
use tracing::debug;

use crate::paths::normalize;
use crate::vfs::{Filesystem, FsResult};

/// Read an app's entry-point source text.
pub async fn load_entry_source(fs: &dyn Filesystem, manifest: &AppManifest) -> FsResult<String> {
    let entry = normalize(&manifest.entry);
    let source = fs.read_to_string(&entry).await?;
    debug!(id = %manifest.id, entry = %entry, bytes = source.len(), "loaded entry source");
    Ok(source)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vfs::{MemoryFs, WriteOptions};

    fn manifest(id: &str, entry: &str) -> AppManifest {
        AppManifest {
            id: id.to_string(),
            name: String::new(),
            entry: entry.to_string(),
            icon: None,
        }
    }

    #[tokio::test]
    async fn reads_entry_source() {
        let fs = MemoryFs::new();
        fs.write(
            "/system/apps/music/index.js",
            b"export const mount = () => {};",
            WriteOptions::create_dirs(),
        )
        .await
        .unwrap();

        let m = manifest("music", "/system/apps/music//index.js");
        let source = load_entry_source(&fs, &m).await.unwrap();
        assert!(source.contains("mount"));
    }

    #[tokio::test]
    async fn missing_entry_is_not_found() {
        let fs = MemoryFs::new();
        let m = manifest("ghost", "/system/apps/ghost/index.js");
        assert!(load_entry_source(&fs, &m).await.unwrap_err().is_not_found());
    }
}
