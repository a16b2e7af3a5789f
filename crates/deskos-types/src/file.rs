//! File descriptors and the file-kind discriminant.
//!
//! A [`FileDescriptor`] is how the shell talks about a file it wants opened:
//! a name, a kind, and optionally the virtual path it came from. The kernel's
//! capability registry dispatches on [`FileKind`] to pick a handler.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// What kind of content a file holds, for capability dispatch.
///
/// This is a closed set. Apps that ship new content types get a variant
/// added here rather than inventing ad-hoc type strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FileKind {
    /// Playable audio (opens in the music player).
    Audio,
    /// Raster or vector image.
    Image,
    /// Plain or rich text.
    Text,
    /// An installable app bundle (manifest + entry source).
    AppBundle,
    /// Anything without a more specific handler.
    Data,
}

impl std::fmt::Display for FileKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            FileKind::Audio => "audio",
            FileKind::Image => "image",
            FileKind::Text => "text",
            FileKind::AppBundle => "app-bundle",
            FileKind::Data => "data",
        };
        f.write_str(s)
    }
}

/// A file as the shell hands it to the kernel for opening.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileDescriptor {
    /// Stable identifier assigned by whoever produced the descriptor.
    pub id: String,
    /// Display name (usually the basename).
    pub name: String,
    /// Content kind, used for capability dispatch.
    pub kind: FileKind,
    /// Virtual path the descriptor refers to, if it lives in the VFS.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Size in bytes, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    /// Free-form metadata for the handler (duration, dimensions, ...).
    #[serde(default, skip_serializing_if = "JsonValue::is_null")]
    pub meta: JsonValue,
}

impl FileDescriptor {
    /// Create a descriptor for a file at a virtual path.
    pub fn at_path(id: impl Into<String>, name: impl Into<String>, kind: FileKind, path: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
            path: Some(path.into()),
            size: None,
            meta: JsonValue::Null,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_kind_serializes_kebab_case() {
        let json = serde_json::to_string(&FileKind::AppBundle).unwrap();
        assert_eq!(json, "\"app-bundle\"");

        let back: FileKind = serde_json::from_str("\"audio\"").unwrap();
        assert_eq!(back, FileKind::Audio);
    }

    #[test]
    fn descriptor_roundtrip() {
        let desc = FileDescriptor::at_path("f1", "song.mp3", FileKind::Audio, "/music/song.mp3");
        let json = serde_json::to_string(&desc).unwrap();
        let back: FileDescriptor = serde_json::from_str(&json).unwrap();
        assert_eq!(back.id, "f1");
        assert_eq!(back.kind, FileKind::Audio);
        assert_eq!(back.path.as_deref(), Some("/music/song.mp3"));
    }

    #[test]
    fn meta_defaults_to_null() {
        let back: FileDescriptor =
            serde_json::from_str(r#"{"id":"x","name":"x.bin","kind":"data"}"#).unwrap();
        assert!(back.meta.is_null());
        assert!(back.size.is_none());
    }
}
