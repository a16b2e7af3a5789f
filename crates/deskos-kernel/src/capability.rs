//! Capability dispatch: which handler opens which kind of file.
//!
//! The desktop opens files by [`FileKind`], not by guessing from names:
//! audio goes to the music player, app bundles to the launcher, and so
//! on. Handlers register against a kind; dispatch for an unregistered
//! kind is a single, typed error.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

use deskos_types::{FileDescriptor, FileKind};

/// Capability dispatch errors.
#[derive(Debug, Clone, Error)]
pub enum CapabilityError {
    #[error("no capability registered for kind: {0}")]
    NoHandler(FileKind),
    #[error("handler failed: {0}")]
    Handler(String),
}

/// A handler that can open files of one kind.
#[async_trait]
pub trait Capability: Send + Sync {
    /// Open the file. The descriptor carries everything the handler gets.
    async fn open(&self, file: &FileDescriptor) -> Result<(), CapabilityError>;
}

/// Registry of capability handlers, keyed by [`FileKind`].
#[derive(Default)]
pub struct CapabilityRegistry {
    handlers: HashMap<FileKind, Arc<dyn Capability>>,
}

impl CapabilityRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for a kind, replacing any existing one.
    pub fn register(&mut self, kind: FileKind, handler: impl Capability + 'static) {
        self.handlers.insert(kind, Arc::new(handler));
    }

    /// Register a handler that's already in an `Arc`.
    pub fn register_arc(&mut self, kind: FileKind, handler: Arc<dyn Capability>) {
        self.handlers.insert(kind, handler);
    }

    /// Look up the handler for a kind.
    pub fn get(&self, kind: FileKind) -> Option<Arc<dyn Capability>> {
        self.handlers.get(&kind).cloned()
    }

    /// Check if a kind has a handler.
    pub fn contains(&self, kind: FileKind) -> bool {
        self.handlers.contains_key(&kind)
    }

    /// List registered kinds, sorted by display name.
    pub fn kinds(&self) -> Vec<FileKind> {
        let mut kinds: Vec<_> = self.handlers.keys().copied().collect();
        kinds.sort_by_key(|k| k.to_string());
        kinds
    }

    /// Number of registered handlers.
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Dispatch a file to the handler for its kind.
    pub async fn open(&self, file: &FileDescriptor) -> Result<(), CapabilityError> {
        let handler = self
            .get(file.kind)
            .ok_or(CapabilityError::NoHandler(file.kind))?;
        handler.open(file).await
    }
}

impl std::fmt::Debug for CapabilityRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CapabilityRegistry")
            .field("kinds", &self.kinds())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingHandler {
        opened: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl Capability for CountingHandler {
        async fn open(&self, _file: &FileDescriptor) -> Result<(), CapabilityError> {
            self.opened.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    fn audio_file() -> FileDescriptor {
        FileDescriptor::at_path("f1", "mix.mp3", FileKind::Audio, "/music/mix.mp3")
    }

    #[tokio::test]
    async fn dispatches_to_registered_handler() {
        let opened = Arc::new(AtomicUsize::new(0));
        let mut registry = CapabilityRegistry::new();
        registry.register(FileKind::Audio, CountingHandler { opened: opened.clone() });

        registry.open(&audio_file()).await.unwrap();
        assert_eq!(opened.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn unregistered_kind_is_a_typed_error() {
        let registry = CapabilityRegistry::new();
        let err = registry.open(&audio_file()).await.unwrap_err();
        assert!(matches!(err, CapabilityError::NoHandler(FileKind::Audio)));
    }

    #[tokio::test]
    async fn reregistering_replaces() {
        let first = Arc::new(AtomicUsize::new(0));
        let second = Arc::new(AtomicUsize::new(0));

        let mut registry = CapabilityRegistry::new();
        registry.register(FileKind::Audio, CountingHandler { opened: first.clone() });
        registry.register(FileKind::Audio, CountingHandler { opened: second.clone() });

        registry.open(&audio_file()).await.unwrap();
        assert_eq!(first.load(Ordering::SeqCst), 0);
        assert_eq!(second.load(Ordering::SeqCst), 1);
        assert_eq!(registry.len(), 1);
    }
}
