//! Pure data types for deskos — app manifests, file descriptors, file kinds.
//!
//! This crate is a leaf dependency with no async runtime and no I/O. It
//! exists so that consumers (the kernel, app bundles, external tools) can
//! exchange deskos's data shapes without pulling in the kernel's runtime.

pub mod file;
pub mod manifest;

// Flat re-exports for convenience
pub use file::*;
pub use manifest::*;
