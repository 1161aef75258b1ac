use chrono::{DateTime, Utc};
use std::sync::Arc;

use crate::EntryType;
use crate::error::{Error, Result};
use crate::node::GraphNode;
use crate::path::DagPath;

/// Permission bits reported for everything; nothing here is enforced.
pub const PERMISSIVE: u32 = 0o777;

const S_IFREG: u32 = 0o100000;
const S_IFDIR: u32 = 0o040000;

/// Type plus permission bits, fixed when the handle or entry is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FileMode {
    entry_type: EntryType,
    perm: u32,
}

impl FileMode {
    pub fn new(entry_type: EntryType, perm: u32) -> Self {
        Self {
            entry_type,
            perm: perm & PERMISSIVE,
        }
    }

    pub fn regular() -> Self {
        Self::new(EntryType::File, PERMISSIVE)
    }

    pub fn directory() -> Self {
        Self::new(EntryType::Directory, PERMISSIVE)
    }

    pub fn entry_type(&self) -> EntryType {
        self.entry_type
    }

    pub fn perm(&self) -> u32 {
        self.perm
    }

    pub fn is_dir(&self) -> bool {
        self.entry_type.is_dir()
    }

    /// Unix `st_mode` style bits.
    pub fn bits(&self) -> u32 {
        let kind = match self.entry_type {
            EntryType::File => S_IFREG,
            EntryType::Directory => S_IFDIR,
        };
        kind | self.perm
    }
}

impl std::fmt::Display for FileMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut s = String::with_capacity(10);
        s.push(if self.is_dir() { 'd' } else { '-' });
        for shift in [6u32, 3, 0] {
            let bits = (self.perm >> shift) & 0o7;
            s.push(if bits & 0o4 != 0 { 'r' } else { '-' });
            s.push(if bits & 0o2 != 0 { 'w' } else { '-' });
            s.push(if bits & 0o1 != 0 { 'x' } else { '-' });
        }
        f.write_str(&s)
    }
}

/// Result of a stat call.
#[derive(Debug, Clone, PartialEq)]
pub struct FileInfo {
    name: String,
    size: u64,
    mode: FileMode,
}

impl FileInfo {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn mode(&self) -> FileMode {
        self.mode
    }

    pub fn is_dir(&self) -> bool {
        self.mode.is_dir()
    }

    /// Always the Unix epoch: the object graph carries no timestamps.
    pub fn mod_time(&self) -> DateTime<Utc> {
        DateTime::UNIX_EPOCH
    }
}

/// Resolved path, fixed mode and the graph node that answers size queries.
#[derive(Clone)]
pub struct MetadataNode {
    path: DagPath,
    mode: FileMode,
    node: Arc<dyn GraphNode>,
}

impl MetadataNode {
    pub fn new(path: DagPath, mode: FileMode, node: Arc<dyn GraphNode>) -> Self {
        Self { path, mode, node }
    }

    pub fn path(&self) -> &DagPath {
        &self.path
    }

    pub fn mode(&self) -> FileMode {
        self.mode
    }

    pub fn node(&self) -> &Arc<dyn GraphNode> {
        &self.node
    }

    pub async fn stat(&self) -> Result<FileInfo> {
        let size = self.node.size().await.map_err(|source| Error::SizeUnavailable {
            path: self.path.to_string(),
            source,
        })?;
        Ok(FileInfo {
            name: self.path.basename(),
            size,
            mode: self.mode,
        })
    }
}

impl std::fmt::Debug for MetadataNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetadataNode")
            .field("path", &self.path)
            .field("mode", &self.mode)
            .field("cid", &self.node.cid())
            .finish()
    }
}
