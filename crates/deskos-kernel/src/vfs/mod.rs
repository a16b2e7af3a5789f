//! Virtual filesystem for deskos.
//!
//! The VFS is composed from three small backends behind one trait:
//!
//! - **MemoryFs**: an owned in-memory node tree (ephemeral)
//! - **OverlayFs**: writable upper over read-only lower, with tombstone
//!   deletes — the lower layer is never mutated
//! - **MountableFs**: longest-prefix routing to mounted backends
//!
//! # Design
//!
//! The boot sequencer owns the composition. A typical desktop looks like:
//!
//! ```text
//! /                       MountableFs
//! ├── /system             OverlayFs(MemoryFs, system image)
//! ├── /home               MemoryFs
//! └── /music              MemoryFs
//! ```
//!
//! The router finds the longest matching mount prefix and delegates with
//! the prefix stripped. Backends compose freely: an overlay's layers can
//! be subdir views, other overlays, or whole routers.

pub mod error;
pub mod memory;
pub mod overlay;
pub mod router;
pub mod subdir;
pub mod traits;

pub use error::{FsError, FsResult};
pub use memory::MemoryFs;
pub use overlay::OverlayFs;
pub use router::{MountInfo, MountableFs};
pub use subdir::SubdirFs;
pub use traits::{Filesystem, Metadata, MkdirOptions, NodeKind, WriteOptions};
