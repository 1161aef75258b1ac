//! In-memory storage node.
//!
//! Blocks live in a [`BlockStore`]; the node adds content through
//! builders that mirror the shapes the reconstruction service reads back:
//! - raw blocks for small files and file chunks
//! - dag-json file nodes listing chunk links for larger files
//! - dag-json directory nodes with named, typed, sized links
//!
//! Used by the tests and by anything that wants a self-contained node.

mod block;
mod reconstruct;
mod resolver;
mod store;

pub use block::{Block, ChunkLink, DagNode, Decoded, DirLink, LinkNode};
pub use reconstruct::UnixfsBuilder;
pub use resolver::LinkResolver;
pub use store::BlockStore;

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::cid::{Cid, Codec};
use crate::config::Config;
use crate::context::Context;
use crate::error::{NodeError, NodeResult};
use crate::node::{ObjectStore, Reconstructor, Resolver, StorageNode};
use crate::path::SEPARATOR;

/// Storage node over an in-memory block store.
#[derive(Clone)]
pub struct MemoryNode {
    blocks: BlockStore,
    resolver: LinkResolver,
    builder: UnixfsBuilder,
    chunk_size: usize,
    ctx: Context,
}

impl Default for MemoryNode {
    fn default() -> Self {
        Self::with_config(&Config::default())
    }
}

impl MemoryNode {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: &Config) -> Self {
        let blocks = BlockStore::default();
        Self {
            resolver: LinkResolver::new(blocks.clone()),
            builder: UnixfsBuilder::new(blocks.clone()),
            blocks,
            chunk_size: config.chunk_size.max(1),
            ctx: Context::new(),
        }
    }

    pub fn blocks(&self) -> &BlockStore {
        &self.blocks
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Cancel the node context, and with it every lookup started from it.
    pub fn shutdown(&self) {
        self.ctx.cancel();
    }

    pub async fn put_block(&self, codec: Codec, data: impl Into<bytes::Bytes>) -> Cid {
        self.blocks.put(codec, data).await
    }

    pub async fn remove_block(&self, cid: &Cid) -> bool {
        self.blocks.remove(cid).await
    }

    pub async fn has_block(&self, cid: &Cid) -> bool {
        self.blocks.contains(cid).await
    }

    /// Add file content. Content that fits in one chunk is a single raw
    /// block; anything larger becomes raw leaves under a file node.
    pub async fn add_bytes(&self, data: &[u8]) -> NodeResult<Cid> {
        if data.len() <= self.chunk_size {
            return Ok(self.blocks.put(Codec::RAW, data.to_vec()).await);
        }

        let mut chunks = Vec::with_capacity(data.len().div_ceil(self.chunk_size));
        for chunk in data.chunks(self.chunk_size) {
            let cid = self.blocks.put(Codec::RAW, chunk.to_vec()).await;
            chunks.push(ChunkLink {
                cid,
                size: chunk.len() as u64,
            });
        }
        let node = DagNode::File {
            size: data.len() as u64,
            chunks,
        };
        Ok(self.blocks.put(Codec::DAG_JSON, node.encode()?).await)
    }

    /// Add a directory whose children are already in the store. Links are
    /// ordered by name.
    pub async fn add_directory<I, S>(&self, entries: I) -> NodeResult<Cid>
    where
        I: IntoIterator<Item = (S, Cid)>,
        S: Into<String>,
    {
        let mut named = BTreeMap::new();
        for (name, cid) in entries {
            let name = name.into();
            if name.is_empty() || name.contains(SEPARATOR) || name == "." || name == ".." {
                return Err(NodeError::MalformedPath(name));
            }
            if named.contains_key(&name) {
                return Err(NodeError::AlreadyExists(name));
            }
            _ = named.insert(name, cid);
        }

        let mut links = Vec::with_capacity(named.len());
        for (name, cid) in named {
            let block = self.blocks.get_block(&cid).await?;
            links.push(DirLink {
                name,
                cid,
                kind: block.link_kind()?,
                size: block.total_size()?,
            });
        }
        let node = DagNode::Directory { links };
        Ok(self.blocks.put(Codec::DAG_JSON, node.encode()?).await)
    }

    pub async fn add_symlink<S: Into<String>>(&self, target: S) -> NodeResult<Cid> {
        let node = DagNode::Symlink { target: target.into() };
        Ok(self.blocks.put(Codec::DAG_JSON, node.encode()?).await)
    }
}

impl StorageNode for MemoryNode {
    fn resolver(&self) -> &dyn Resolver {
        &self.resolver
    }

    fn store(&self) -> Arc<dyn ObjectStore> {
        Arc::new(self.blocks.clone())
    }

    fn reconstructor(&self) -> &dyn Reconstructor {
        &self.builder
    }

    fn context(&self) -> Context {
        self.ctx.clone()
    }
}
