//! VFS error taxonomy.

use thiserror::Error;

/// Result type for filesystem operations.
pub type FsResult<T> = Result<T, FsError>;

/// Filesystem operation errors.
///
/// Every failure a backend can produce is one of these three kinds. They
/// surface immediately to the caller; the only places a failed probe is
/// swallowed are `MountableFs::exists` (no mount → `false`) and the
/// overlay's best-effort `readdir` union.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FsError {
    /// The path does not resolve to any node (or, for `read`, not to a file).
    #[error("not found: {0}")]
    NotFound(String),
    /// A directory was expected and a file was found, or vice versa.
    #[error("not a directory: {0}")]
    NotADirectory(String),
    /// A router received a path with no matching mount prefix. Should not
    /// occur once a `"/"` catch-all is mounted; otherwise it is a wiring
    /// mistake in the boot sequencer.
    #[error("no mount for path: {0}")]
    NoMount(String),
}

impl FsError {
    /// True if this is the `NotFound` kind.
    pub fn is_not_found(&self) -> bool {
        matches!(self, FsError::NotFound(_))
    }
}
