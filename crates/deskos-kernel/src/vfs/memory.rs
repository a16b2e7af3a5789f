//! In-memory filesystem.
//!
//! The backing store is a single owned tree: directories hold their
//! children in a `BTreeMap` (so listings come out sorted), files own their
//! byte buffer. There are no back-references, so the tree is acyclic by
//! construction and a rename is pointer re-parenting, never a deep copy.
//! All data is lost when the instance drops — this backend is the volatile
//! scratch space of the desktop, not storage.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::SystemTime;
use tokio::sync::RwLock;

use super::error::{FsError, FsResult};
use super::subdir::SubdirFs;
use super::traits::{Filesystem, Metadata, MkdirOptions, NodeKind, WriteOptions};
use crate::paths::{basename, dirname, normalize};

/// A node in the tree. Exclusively owned by its parent's child map.
#[derive(Debug, Clone)]
enum Node {
    File {
        data: Vec<u8>,
        created: SystemTime,
        modified: SystemTime,
    },
    Dir {
        children: BTreeMap<String, Node>,
        created: SystemTime,
        modified: SystemTime,
    },
}

impl Node {
    fn new_dir() -> Self {
        let now = SystemTime::now();
        Node::Dir {
            children: BTreeMap::new(),
            created: now,
            modified: now,
        }
    }

    fn new_file(data: Vec<u8>) -> Self {
        let now = SystemTime::now();
        Node::File {
            data,
            created: now,
            modified: now,
        }
    }

    fn metadata(&self) -> Metadata {
        match self {
            Node::File {
                data,
                created,
                modified,
            } => Metadata {
                kind: NodeKind::File,
                size: data.len() as u64,
                created: Some(*created),
                modified: Some(*modified),
            },
            Node::Dir {
                created, modified, ..
            } => Metadata {
                kind: NodeKind::Directory,
                size: 0,
                created: Some(*created),
                modified: Some(*modified),
            },
        }
    }
}

/// Iterate the segments of an already-normalized path. Empty for `"/"`.
fn segments(canonical: &str) -> impl Iterator<Item = &str> {
    canonical.split('/').filter(|s| !s.is_empty())
}

/// Walk the tree to the node at `canonical`, if any.
fn lookup<'a>(root: &'a Node, canonical: &str) -> Option<&'a Node> {
    let mut cur = root;
    for seg in segments(canonical) {
        match cur {
            Node::Dir { children, .. } => cur = children.get(seg)?,
            Node::File { .. } => return None,
        }
    }
    Some(cur)
}

fn lookup_mut<'a>(root: &'a mut Node, canonical: &str) -> Option<&'a mut Node> {
    let mut cur = root;
    for seg in segments(canonical) {
        match cur {
            Node::Dir { children, .. } => cur = children.get_mut(seg)?,
            Node::File { .. } => return None,
        }
    }
    Some(cur)
}

/// Walk to `canonical`, creating missing directories along the way.
///
/// Fails with `NotADirectory` if any segment resolves to a file.
fn ensure_dir<'a>(root: &'a mut Node, canonical: &str) -> FsResult<&'a mut Node> {
    let mut cur = root;
    for seg in segments(canonical) {
        match cur {
            Node::Dir { children, .. } => {
                cur = children.entry(seg.to_string()).or_insert_with(Node::new_dir);
            }
            Node::File { .. } => {
                return Err(FsError::NotADirectory(canonical.to_string()));
            }
        }
    }
    match cur {
        Node::Dir { .. } => Ok(cur),
        Node::File { .. } => Err(FsError::NotADirectory(canonical.to_string())),
    }
}

/// In-memory filesystem.
///
/// Thread-safe via an internal `RwLock` over the whole tree; every
/// operation takes the lock once, walks, mutates, and releases — there are
/// no partial effects left behind by a failed walk.
#[derive(Debug)]
pub struct MemoryFs {
    root: RwLock<Node>,
}

impl Default for MemoryFs {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryFs {
    /// Create a new empty in-memory filesystem. The root directory always
    /// exists.
    pub fn new() -> Self {
        Self {
            root: RwLock::new(Node::new_dir()),
        }
    }

    /// A view of `prefix` as the root of its own filesystem.
    ///
    /// The view shares this tree by reference: writes through it land here,
    /// under `prefix`. Useful for mounting one corner of a backend somewhere
    /// else entirely.
    pub fn subdir(self: &Arc<Self>, prefix: &str) -> SubdirFs {
        SubdirFs::new(Arc::clone(self) as Arc<dyn Filesystem>, prefix)
    }
}

#[async_trait]
impl Filesystem for MemoryFs {
    async fn read(&self, path: &str) -> FsResult<Vec<u8>> {
        let p = normalize(path);
        let root = self.root.read().await;
        match lookup(&root, &p) {
            Some(Node::File { data, .. }) => Ok(data.clone()),
            // A directory does not "resolve to a File" — same NotFound as absence.
            _ => Err(FsError::NotFound(p)),
        }
    }

    async fn write(&self, path: &str, data: &[u8], opts: WriteOptions) -> FsResult<()> {
        let p = normalize(path);
        if p == "/" {
            return Err(FsError::NotADirectory(p));
        }
        let parent = dirname(&p);
        let name = basename(&p);

        let mut root = self.root.write().await;
        let parent_node = if opts.create_dirs {
            ensure_dir(&mut root, &parent)?
        } else {
            match lookup_mut(&mut root, &parent) {
                Some(Node::File { .. }) => return Err(FsError::NotADirectory(parent)),
                None => return Err(FsError::NotFound(parent)),
                Some(node) => node,
            }
        };

        let Node::Dir { children, .. } = parent_node else {
            return Err(FsError::NotADirectory(parent));
        };
        let node = match children.remove(&name) {
            // Replacing a file keeps its creation time.
            Some(Node::File { created, .. }) => Node::File {
                data: data.to_vec(),
                created,
                modified: SystemTime::now(),
            },
            _ => Node::new_file(data.to_vec()),
        };
        children.insert(name, node);
        Ok(())
    }

    async fn readdir(&self, path: &str) -> FsResult<Vec<String>> {
        let p = normalize(path);
        let root = self.root.read().await;
        match lookup(&root, &p) {
            Some(Node::Dir { children, .. }) => Ok(children.keys().cloned().collect()),
            _ => Err(FsError::NotADirectory(p)),
        }
    }

    async fn mkdir(&self, path: &str, opts: MkdirOptions) -> FsResult<()> {
        let p = normalize(path);
        let mut root = self.root.write().await;
        match lookup(&root, &p) {
            Some(Node::Dir { .. }) => return Ok(()),
            Some(Node::File { .. }) => return Err(FsError::NotADirectory(p)),
            None => {}
        }
        if !opts.recursive {
            let parent = dirname(&p);
            match lookup(&root, &parent) {
                Some(Node::Dir { .. }) => {}
                Some(Node::File { .. }) => return Err(FsError::NotADirectory(parent)),
                None => return Err(FsError::NotFound(parent)),
            }
        }
        ensure_dir(&mut root, &p)?;
        Ok(())
    }

    async fn stat(&self, path: &str) -> FsResult<Metadata> {
        let p = normalize(path);
        let root = self.root.read().await;
        lookup(&root, &p)
            .map(Node::metadata)
            .ok_or(FsError::NotFound(p))
    }

    async fn rename(&self, old: &str, new: &str) -> FsResult<()> {
        let old_p = normalize(old);
        let new_p = normalize(new);
        if old_p == "/" {
            return Err(FsError::NotFound(old_p));
        }

        let mut root = self.root.write().await;
        if lookup(&root, &old_p).is_none() {
            return Err(FsError::NotFound(old_p));
        }

        // Destination parents first, while the source is still in place.
        let new_parent = dirname(&new_p);
        ensure_dir(&mut root, &new_parent)?;

        let old_parent = dirname(&old_p);
        let node = match lookup_mut(&mut root, &old_parent) {
            Some(Node::Dir { children, .. }) => children
                .remove(&basename(&old_p))
                .ok_or_else(|| FsError::NotFound(old_p.clone()))?,
            _ => return Err(FsError::NotFound(old_p)),
        };

        match lookup_mut(&mut root, &new_parent) {
            Some(Node::Dir { children, .. }) => {
                children.insert(basename(&new_p), node);
                Ok(())
            }
            // The destination parent was inside the subtree we just detached.
            _ => {
                if let Some(Node::Dir { children, .. }) = lookup_mut(&mut root, &old_parent) {
                    children.insert(basename(&old_p), node);
                }
                Err(FsError::NotFound(new_parent))
            }
        }
    }

    async fn unlink(&self, path: &str) -> FsResult<()> {
        let p = normalize(path);
        let parent = dirname(&p);
        let mut root = self.root.write().await;
        match lookup_mut(&mut root, &parent) {
            Some(Node::Dir { children, .. }) => {
                children.remove(&basename(&p)).ok_or(FsError::NotFound(p))?;
                Ok(())
            }
            _ => Err(FsError::NotFound(p)),
        }
    }

    async fn exists(&self, path: &str) -> bool {
        let p = normalize(path);
        lookup(&*self.root.read().await, &p).is_some()
    }
}
