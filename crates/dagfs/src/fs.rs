use std::sync::Arc;

use crate::config::Config;
use crate::context::Context;
use crate::dir::DirHandle;
use crate::error::{Error, NodeError, Result};
use crate::file::FileHandle;
use crate::handle::Handle;
use crate::metadata::{FileMode, MetadataNode};
use crate::node::{StorageNode, UnifiedNode};
use crate::path::DagPath;

/// Read-only filesystem view of a storage node.
///
/// Cheap to clone; clones share the node. Every `open` resolves the path
/// afresh, so nothing is cached between lookups.
#[derive(Clone)]
pub struct DagFs {
    node: Arc<dyn StorageNode>,
    config: Config,
}

impl DagFs {
    pub fn new<N: StorageNode + 'static>(node: N) -> Self {
        Self::from_arc(Arc::new(node), Config::default())
    }

    pub fn with_config<N: StorageNode + 'static>(node: N, config: Config) -> Self {
        Self::from_arc(Arc::new(node), config)
    }

    pub fn from_arc(node: Arc<dyn StorageNode>, config: Config) -> Self {
        _ = crate::codec::load_codecs();
        Self { node, config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Open `name` in the storage node's own context.
    pub async fn open<S: AsRef<str>>(&self, name: S) -> Result<Handle> {
        let ctx = self.node.context();
        self.open_with(&ctx, name).await
    }

    /// Open `name`, honoring cancellation and deadline of `ctx`.
    pub async fn open_with<S: AsRef<str>>(&self, ctx: &Context, name: S) -> Result<Handle> {
        ctx.check().map_err(|e| match e {
            NodeError::DeadlineExceeded => Error::DeadlineExceeded,
            _ => Error::Cancelled,
        })?;
        let ctx = match self.config.timeout {
            Some(timeout) => ctx.with_timeout(timeout),
            None => ctx.child(),
        };

        let path = DagPath::from_string(name.as_ref());
        // TODO: resolve /ipns/ names to an /ipfs/ path before this point.
        let (cid, remainder) = ctx
            .run(self.node.resolver().resolve_to_last_node(&ctx, &path))
            .await
            .map_err(|source| Error::Resolution {
                path: path.to_string(),
                source,
            })?;
        if !remainder.is_empty() {
            let remainder = remainder.join("/");
            diagnostics::debug!("open {path}: ignoring unresolved remainder {remainder}", path: path.as_str(), remainder);
        }

        let store = self.node.store();
        let graph_node = ctx
            .run(store.get(&ctx, &cid))
            .await
            .map_err(|source| Error::Fetch { cid, source })?;

        let unified = ctx
            .run(self.node.reconstructor().build(&ctx, store, graph_node.clone()))
            .await
            .map_err(|source| Error::Reconstruction { cid, source })?;

        let handle = match unified {
            UnifiedNode::File(stream) => {
                let meta = MetadataNode::new(path, FileMode::regular(), graph_node);
                Handle::File(FileHandle::new(stream, meta))
            }
            UnifiedNode::Directory(entries) => {
                let meta = MetadataNode::new(path, FileMode::directory(), graph_node);
                Handle::Directory(DirHandle::new(entries, meta))
            }
            UnifiedNode::Unsupported(kind) => return Err(Error::unsupported_type(kind)),
        };

        let cid = cid.to_string();
        diagnostics::debug!(
            "opened {path} as {kind} ({cid})",
            path: handle.metadata().path().as_str(),
            kind: handle.metadata().mode().entry_type().as_str(),
            cid
        );
        Ok(handle)
    }
}

impl std::fmt::Debug for DagFs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DagFs").field("config", &self.config).finish()
    }
}
