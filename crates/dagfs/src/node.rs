//! Contracts of the storage node this crate adapts.
//!
//! The adapter only consumes these; `crate::memory` provides one
//! implementation.

use async_trait::async_trait;
use futures::stream::Stream;
use std::any::Any;
use std::pin::Pin;
use std::sync::Arc;
use tokio::io::AsyncRead;

use crate::cid::Cid;
use crate::context::Context;
use crate::error::NodeResult;
use crate::path::DagPath;

/// Sequential byte stream of a reconstructed file.
pub type ByteStream = Pin<Box<dyn AsyncRead + Send>>;

/// Stateful enumeration of a reconstructed directory. Names of directory
/// children carry a trailing separator.
pub type EntryStream = Pin<Box<dyn Stream<Item = NodeResult<(String, Arc<dyn GraphNode>)>> + Send>>;

/// Opaque handle into the object graph.
#[async_trait]
pub trait GraphNode: Send + Sync {
    fn cid(&self) -> Cid;

    /// Total size of the content under this node. May fail when the
    /// content is not locally available.
    async fn size(&self) -> NodeResult<u64>;

    /// Downcast support for reconstruction services that know the
    /// concrete node type.
    fn as_any(&self) -> &dyn Any;
}

/// Result of reconstructing a graph node.
pub enum UnifiedNode {
    File(ByteStream),
    Directory(EntryStream),
    /// A shape the reconstruction understood but that is neither a file
    /// nor a directory, named by kind.
    Unsupported(String),
}

impl UnifiedNode {
    pub fn kind(&self) -> &str {
        match self {
            UnifiedNode::File(_) => "file",
            UnifiedNode::Directory(_) => "directory",
            UnifiedNode::Unsupported(kind) => kind,
        }
    }
}

impl std::fmt::Debug for UnifiedNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({})", self.kind())
    }
}

#[async_trait]
pub trait Resolver: Send + Sync {
    /// Resolve `path` to the identifier of the last graph node it names.
    /// Path segments the node's format cannot traverse are returned as the
    /// remainder.
    async fn resolve_to_last_node(&self, ctx: &Context, path: &DagPath) -> NodeResult<(Cid, Vec<String>)>;
}

#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn get(&self, ctx: &Context, cid: &Cid) -> NodeResult<Arc<dyn GraphNode>>;
}

#[async_trait]
pub trait Reconstructor: Send + Sync {
    async fn build(
        &self,
        ctx: &Context,
        store: Arc<dyn ObjectStore>,
        node: Arc<dyn GraphNode>,
    ) -> NodeResult<UnifiedNode>;
}

/// Long-lived storage node handle.
pub trait StorageNode: Send + Sync {
    fn resolver(&self) -> &dyn Resolver;

    fn store(&self) -> Arc<dyn ObjectStore>;

    fn reconstructor(&self) -> &dyn Reconstructor;

    /// The node's own execution context; lookups run in children of it.
    fn context(&self) -> Context;
}
