//! Turns fetched blocks into file streams and directory enumerations.

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::{self, StreamExt};
use std::io::Cursor;
use std::sync::Arc;
use tokio_util::io::StreamReader;

use crate::EntryType;
use crate::context::Context;
use crate::error::{NodeError, NodeResult};
use crate::node::{ByteStream, EntryStream, GraphNode, ObjectStore, Reconstructor, UnifiedNode};
use crate::path::SEPARATOR;

use super::BlockStore;
use super::block::{Block, ChunkLink, DagNode, Decoded, DirLink, LinkNode};

/// Reconstruction service for blocks held in a [`BlockStore`].
#[derive(Clone)]
pub struct UnixfsBuilder {
    blocks: BlockStore,
}

impl UnixfsBuilder {
    pub fn new(blocks: BlockStore) -> Self {
        Self { blocks }
    }

    fn chunked_reader(&self, chunks: Vec<ChunkLink>) -> ByteStream {
        let blocks = self.blocks.clone();
        let chunk_stream = async_stream::try_stream! {
            for link in chunks {
                let block = blocks.get_block(&link.cid).await?;
                let data: Bytes = match block.decode()? {
                    Decoded::Raw(data) => data,
                    Decoded::Node(_) => Err::<Bytes, _>(NodeError::decode(format!("chunk {} is not a raw leaf", link.cid)))?,
                };
                if data.len() as u64 != link.size {
                    Err::<(), _>(NodeError::decode(format!(
                        "chunk {} has {} bytes, link says {}",
                        link.cid,
                        data.len(),
                        link.size
                    )))?;
                }
                yield data;
            }
        };
        let chunk_stream = chunk_stream.map(|res: NodeResult<Bytes>| res.map_err(std::io::Error::from));
        Box::pin(StreamReader::new(Box::pin(chunk_stream)))
    }

    fn entry_stream(&self, links: Vec<DirLink>) -> EntryStream {
        let blocks = self.blocks.clone();
        Box::pin(stream::iter(links).map(move |link| {
            let name = match link.kind {
                EntryType::Directory => format!("{}{}", link.name, SEPARATOR),
                EntryType::File => link.name,
            };
            let node: Arc<dyn GraphNode> = LinkNode::new(link.cid, blocks.clone());
            Ok((name, node))
        }))
    }
}

#[async_trait]
impl Reconstructor for UnixfsBuilder {
    async fn build(
        &self,
        ctx: &Context,
        store: Arc<dyn ObjectStore>,
        node: Arc<dyn GraphNode>,
    ) -> NodeResult<UnifiedNode> {
        ctx.check()?;
        let block = match node.as_any().downcast_ref::<Block>() {
            Some(block) => block.clone(),
            None => {
                let fetched = store.get(ctx, &node.cid()).await?;
                fetched
                    .as_any()
                    .downcast_ref::<Block>()
                    .cloned()
                    .ok_or_else(|| NodeError::decode(format!("{} is not a stored block", node.cid())))?
            }
        };

        Ok(match block.decode()? {
            Decoded::Raw(data) => UnifiedNode::File(Box::pin(Cursor::new(data))),
            Decoded::Node(DagNode::File { chunks, .. }) => UnifiedNode::File(self.chunked_reader(chunks)),
            Decoded::Node(DagNode::Directory { links }) => UnifiedNode::Directory(self.entry_stream(links)),
            Decoded::Node(DagNode::Symlink { .. }) => UnifiedNode::Unsupported("symlink".to_string()),
        })
    }
}
