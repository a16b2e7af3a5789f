//! System images.
//!
//! A [`SystemImage`] is the bundle that seeds the read-only lower layer of
//! the `/system` overlay at boot: a flat list of (path, payload) entries,
//! serialized as JSON with base64 payloads. [`SystemImage::unpack`] writes
//! every entry into a fresh [`MemoryFs`] under its canonical absolute
//! path, creating parents as it goes — unpacked once, then treated as
//! immutable for the lifetime of the desktop.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

use crate::paths::normalize;
use crate::vfs::{Filesystem, FsError, MemoryFs, WriteOptions};

/// Current image format version.
pub const IMAGE_VERSION: u32 = 1;

/// Errors from decoding or unpacking a system image.
#[derive(Debug, Error)]
pub enum ImageError {
    #[error("invalid image json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid payload for {path}: {source}")]
    Base64 {
        path: String,
        source: base64::DecodeError,
    },
    #[error("unsupported image version {0}")]
    Version(u32),
    #[error(transparent)]
    Fs(#[from] FsError),
}

/// One file inside the image. Payloads are base64 so the container stays
/// valid JSON regardless of content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageEntry {
    /// Path the file unpacks to, relative to the mount the image seeds.
    pub path: String,
    /// Base64-encoded file contents.
    pub data: String,
}

/// A bundle of files that seeds a read-only filesystem layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemImage {
    pub version: u32,
    pub entries: Vec<ImageEntry>,
}

impl Default for SystemImage {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemImage {
    /// An empty image.
    pub fn new() -> Self {
        Self {
            version: IMAGE_VERSION,
            entries: Vec::new(),
        }
    }

    /// Add a file to the image. The path is stored as given and
    /// canonicalized at unpack time.
    pub fn push(&mut self, path: impl Into<String>, data: &[u8]) -> &mut Self {
        self.entries.push(ImageEntry {
            path: path.into(),
            data: BASE64.encode(data),
        });
        self
    }

    /// Parse an image from its JSON form.
    pub fn from_json(json: &str) -> Result<Self, ImageError> {
        let image: SystemImage = serde_json::from_str(json)?;
        if image.version != IMAGE_VERSION {
            return Err(ImageError::Version(image.version));
        }
        Ok(image)
    }

    /// Serialize to the JSON form.
    pub fn to_json(&self) -> Result<String, ImageError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Number of files in the image.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if the image holds no files.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Unpack into a fresh `MemoryFs`, every entry under its canonical
    /// absolute path with parents created as needed.
    pub async fn unpack(&self) -> Result<Arc<MemoryFs>, ImageError> {
        let fs = Arc::new(MemoryFs::new());
        for entry in &self.entries {
            let path = normalize(&entry.path);
            if path == "/" {
                // A nameless entry can't land anywhere; skip it like the
                // boot loader skips bare directory records.
                continue;
            }
            let bytes = BASE64.decode(&entry.data).map_err(|source| ImageError::Base64 {
                path: entry.path.clone(),
                source,
            })?;
            fs.write(&path, &bytes, WriteOptions::create_dirs()).await?;
        }
        tracing::debug!(files = self.entries.len(), "unpacked system image");
        Ok(fs)
    }
}
