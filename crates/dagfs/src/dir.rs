use futures::StreamExt;
use std::sync::Arc;

use crate::EntryType;
use crate::error::{Error, Result};
use crate::metadata::{FileInfo, FileMode, MetadataNode, PERMISSIVE};
use crate::node::{EntryStream, GraphNode};
use crate::path::DagPath;

/// An open directory.
///
/// The enumeration stream is owned by the handle and consumed in order,
/// so successive [`DirHandle::read_dir`] calls continue where the last one
/// stopped.
pub struct DirHandle {
    entries: EntryStream,
    meta: MetadataNode,
}

/// One page of a directory listing.
#[derive(Debug, Default)]
pub struct Listing {
    pub entries: Vec<DirEntry>,
    /// Set when a bounded read ran out of entries before filling the page.
    pub end_of_sequence: bool,
}

/// A child of a listed directory. Size is only fetched when
/// [`DirEntry::info`] is called.
#[derive(Clone, Debug)]
pub struct DirEntry {
    meta: MetadataNode,
}

impl DirHandle {
    pub fn new(entries: EntryStream, meta: MetadataNode) -> Self {
        Self { entries, meta }
    }

    /// Directories are not byte-readable.
    pub async fn read(&mut self, _buf: &mut [u8]) -> Result<usize> {
        Err(Error::invalid_operation("read", self.meta.path().as_str()))
    }

    pub async fn stat(&self) -> Result<FileInfo> {
        self.meta.stat().await
    }

    pub fn metadata(&self) -> &MetadataNode {
        &self.meta
    }

    /// Read up to `n` entries.
    ///
    /// With `n <= 0` the rest of the directory is returned and
    /// `end_of_sequence` stays false. With `n > 0` exactly `n` entries are
    /// returned while that many remain; a shorter page comes back with
    /// `end_of_sequence` set. An enumeration error discards the page.
    pub async fn read_dir(&mut self, n: isize) -> Result<Listing> {
        let limit = usize::try_from(n).ok().filter(|n| *n > 0);
        let mut entries = Vec::new();

        while limit.is_none_or(|limit| entries.len() < limit) {
            match self.entries.next().await {
                Some(Ok((name, node))) => entries.push(DirEntry::from_enumeration(name, node)),
                Some(Err(e)) => return Err(Error::Node(e)),
                None => break,
            }
        }

        let end_of_sequence = limit.is_some_and(|limit| entries.len() < limit);
        diagnostics::debug!(
            "read_dir {path}: {count} entries, end {end_of_sequence}",
            path: self.meta.path().as_str(),
            count: entries.len(),
            end_of_sequence
        );
        Ok(Listing {
            entries,
            end_of_sequence,
        })
    }

    /// Drain the remaining entries.
    pub async fn entries(&mut self) -> Result<Vec<DirEntry>> {
        Ok(self.read_dir(0).await?.entries)
    }

    pub async fn close(self) -> Result<()> {
        drop(self.entries);
        Ok(())
    }
}

impl std::fmt::Debug for DirHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DirHandle").field("meta", &self.meta).finish()
    }
}

impl DirEntry {
    /// Build an entry from an enumerated child. The type comes from the
    /// name alone: a trailing separator means directory.
    pub fn from_enumeration(name: String, node: Arc<dyn GraphNode>) -> Self {
        let mode = FileMode::new(EntryType::from_entry_name(&name), PERMISSIVE);
        Self {
            meta: MetadataNode::new(DagPath::from_string(name), mode, node),
        }
    }

    /// Base name, without any directory marker.
    pub fn name(&self) -> String {
        self.meta.path().basename()
    }

    pub fn is_dir(&self) -> bool {
        self.meta.mode().is_dir()
    }

    pub fn entry_type(&self) -> EntryType {
        self.meta.mode().entry_type()
    }

    pub fn mode(&self) -> FileMode {
        self.meta.mode()
    }

    pub fn node(&self) -> &Arc<dyn GraphNode> {
        self.meta.node()
    }

    pub async fn info(&self) -> Result<FileInfo> {
        self.meta.stat().await
    }
}
