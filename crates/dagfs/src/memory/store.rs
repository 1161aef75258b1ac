use async_trait::async_trait;
use bytes::Bytes;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::cid::{Cid, Codec};
use crate::context::Context;
use crate::error::{NodeError, NodeResult};
use crate::node::{GraphNode, ObjectStore};

use super::block::Block;

/// Content-addressed block store held in memory.
///
/// Cloning shares the underlying blocks.
#[derive(Clone, Default)]
pub struct BlockStore(Arc<Mutex<State>>);

#[derive(Default)]
struct State {
    blocks: HashMap<Cid, Bytes>,
}

impl BlockStore {
    /// Store `data` under the cid derived from its bytes and `codec`.
    pub async fn put(&self, codec: Codec, data: impl Into<Bytes>) -> Cid {
        self.0.lock().await.put(codec, data.into())
    }

    pub async fn get_block(&self, cid: &Cid) -> NodeResult<Block> {
        self.0.lock().await.get(cid)
    }

    /// Drop a block, as if it had never been fetched locally.
    pub async fn remove(&self, cid: &Cid) -> bool {
        self.0.lock().await.blocks.remove(cid).is_some()
    }

    pub async fn contains(&self, cid: &Cid) -> bool {
        self.0.lock().await.blocks.contains_key(cid)
    }

    pub async fn len(&self) -> usize {
        self.0.lock().await.blocks.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl State {
    fn put(&mut self, codec: Codec, data: Bytes) -> Cid {
        let cid = Cid::from_block(codec, &data);
        _ = self.blocks.entry(cid).or_insert(data);
        cid
    }

    fn get(&self, cid: &Cid) -> NodeResult<Block> {
        self.blocks
            .get(cid)
            .map(|data| Block::new(*cid, data.clone()))
            .ok_or(NodeError::NotFound(*cid))
    }
}

#[async_trait]
impl ObjectStore for BlockStore {
    async fn get(&self, ctx: &Context, cid: &Cid) -> NodeResult<Arc<dyn GraphNode>> {
        ctx.check()?;
        let block = self.get_block(cid).await?;
        Ok(Arc::new(block))
    }
}
