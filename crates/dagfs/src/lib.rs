//! Read-only hierarchical filesystem view over a content-addressed
//! storage node.
//!
//! [`DagFs::open`] resolves a path such as `/ipfs/<cid>/docs/readme`
//! through the node's resolver, fetches the graph node, reconstructs it
//! and returns a [`Handle`]: a [`FileHandle`] to read bytes from or a
//! [`DirHandle`] to list in pages.

mod cid;
mod codec;
mod config;
mod context;
mod dir;
mod entry_type;
mod error;
mod file;
mod fs;
mod handle;
mod metadata;
mod node;
mod path;

pub mod memory;

#[cfg(test)]
mod tests;

pub use cid::{Cid, Codec};
pub use codec::{BlockFormat, CodecRegistry, load_codecs};
pub use config::{CHUNK_SIZE_ENV, Config, DEFAULT_CHUNK_SIZE, TIMEOUT_ENV};
pub use context::Context;
pub use dir::{DirEntry, DirHandle, Listing};
pub use entry_type::EntryType;
pub use error::{Error, NodeError, NodeResult, Result};
pub use file::FileHandle;
pub use fs::DagFs;
pub use handle::Handle;
pub use metadata::{FileInfo, FileMode, MetadataNode, PERMISSIVE};
pub use node::{ByteStream, EntryStream, GraphNode, ObjectStore, Reconstructor, Resolver, StorageNode, UnifiedNode};
pub use path::{DagPath, IPFS_NAMESPACE, IPNS_NAMESPACE, SEPARATOR, basename};
