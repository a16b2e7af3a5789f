//! deskos-kernel: the core of deskos.
//!
//! This crate provides:
//!
//! - **Paths**: canonical slash-separated virtual paths
//! - **VFS**: memory, overlay, and mountable-router filesystems behind one
//!   async `Filesystem` trait
//! - **System image**: the bundle that seeds `/system`'s read-only layer
//! - **Kernel**: the boot sequencer and context object owning the composed
//!   filesystem, the app registry, capability dispatch, and the event bus
//!
//! The window manager, app UI, and everything else that makes the desktop
//! visible consume all of this through `Kernel::fs()` and the event bus.

pub mod apps;
pub mod capability;
pub mod events;
pub mod image;
pub mod kernel;
pub mod paths;
pub mod vfs;

pub use capability::{Capability, CapabilityError, CapabilityRegistry};
pub use events::{EventBus, KernelEvent};
pub use image::{ImageEntry, ImageError, SystemImage};
pub use kernel::{Kernel, KernelConfig, LaunchedApp};
pub use vfs::{
    Filesystem, FsError, FsResult, MemoryFs, Metadata, MkdirOptions, MountInfo, MountableFs,
    NodeKind, OverlayFs, SubdirFs, WriteOptions,
};
