use async_trait::async_trait;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::sync::Arc;

use crate::EntryType;
use crate::cid::{Cid, Codec};
use crate::codec::{BlockFormat, registry};
use crate::error::{NodeError, NodeResult};
use crate::node::GraphNode;

use super::BlockStore;

/// Link from a chunked file node to one of its leaves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkLink {
    pub cid: Cid,
    pub size: u64,
}

/// Named link from a directory node. `size` is the cumulative size of the
/// child, recorded when the directory was built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirLink {
    pub name: String,
    pub cid: Cid,
    pub kind: EntryType,
    pub size: u64,
}

/// Structured node shapes stored under the dag-json codec.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase", deny_unknown_fields)]
pub enum DagNode {
    File { size: u64, chunks: Vec<ChunkLink> },
    Directory { links: Vec<DirLink> },
    Symlink { target: String },
}

impl DagNode {
    pub fn encode(&self) -> NodeResult<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }
}

/// A block decoded according to its codec.
#[derive(Debug)]
pub enum Decoded {
    Raw(Bytes),
    Node(DagNode),
}

/// A fetched block.
#[derive(Debug, Clone)]
pub struct Block {
    cid: Cid,
    data: Bytes,
}

impl Block {
    pub fn new(cid: Cid, data: Bytes) -> Self {
        Self { cid, data }
    }

    pub fn data(&self) -> &Bytes {
        &self.data
    }

    pub fn codec(&self) -> Codec {
        self.cid.codec()
    }

    pub fn decode(&self) -> NodeResult<Decoded> {
        match registry().format(self.codec())? {
            BlockFormat::Raw => Ok(Decoded::Raw(self.data.clone())),
            BlockFormat::Json => Ok(Decoded::Node(serde_json::from_slice(&self.data)?)),
        }
    }

    /// Cumulative size: content bytes for files, block plus children for
    /// directories.
    pub fn total_size(&self) -> NodeResult<u64> {
        match self.decode()? {
            Decoded::Raw(data) => Ok(data.len() as u64),
            Decoded::Node(DagNode::File { size, .. }) => Ok(size),
            Decoded::Node(DagNode::Directory { links }) => {
                Ok(self.data.len() as u64 + links.iter().map(|l| l.size).sum::<u64>())
            }
            Decoded::Node(DagNode::Symlink { target }) => Ok(target.len() as u64),
        }
    }

    /// Kind a directory records for this block when linking to it.
    pub fn link_kind(&self) -> NodeResult<EntryType> {
        match self.decode()? {
            Decoded::Node(DagNode::Directory { .. }) => Ok(EntryType::Directory),
            Decoded::Raw(_) | Decoded::Node(DagNode::File { .. }) => Ok(EntryType::File),
            Decoded::Node(DagNode::Symlink { .. }) => Err(NodeError::decode(format!(
                "cannot link symlink {} into a directory",
                self.cid
            ))),
        }
    }
}

#[async_trait]
impl GraphNode for Block {
    fn cid(&self) -> Cid {
        self.cid
    }

    async fn size(&self) -> NodeResult<u64> {
        self.total_size()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// A directory child that has not been fetched. Size queries load the
/// block on demand and fail if it is not in the store.
pub struct LinkNode {
    cid: Cid,
    store: BlockStore,
}

impl LinkNode {
    pub fn new(cid: Cid, store: BlockStore) -> Arc<Self> {
        Arc::new(Self { cid, store })
    }
}

#[async_trait]
impl GraphNode for LinkNode {
    fn cid(&self) -> Cid {
        self.cid
    }

    async fn size(&self) -> NodeResult<u64> {
        self.store.get_block(&self.cid).await?.total_size()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn json_block(node: &DagNode) -> Block {
        let data = node.encode().unwrap();
        Block::new(Cid::from_block(Codec::DAG_JSON, &data), data.into())
    }

    #[test]
    fn test_raw_block_size() {
        let block = Block::new(Cid::raw_from_bytes(b"abc"), Bytes::from_static(b"abc"));
        assert_eq!(block.total_size().unwrap(), 3);
        assert_eq!(block.link_kind().unwrap(), EntryType::File);
    }

    #[test]
    fn test_directory_size_includes_children() {
        let child = Cid::raw_from_bytes(b"x");
        let block = json_block(&DagNode::Directory {
            links: vec![DirLink {
                name: "x".into(),
                cid: child,
                kind: EntryType::File,
                size: 100,
            }],
        });
        assert_eq!(block.total_size().unwrap(), block.data().len() as u64 + 100);
        assert_eq!(block.link_kind().unwrap(), EntryType::Directory);
    }

    #[test]
    fn test_json_shape() {
        let node = DagNode::Symlink { target: "/a".into() };
        let text = String::from_utf8(node.encode().unwrap()).unwrap();
        assert_eq!(text, r#"{"type":"symlink","target":"/a"}"#);
    }

    #[test]
    fn test_decode_errors() {
        let data = br#"{"type":"socket"}"#;
        let block = Block::new(Cid::from_block(Codec::DAG_JSON, data), Bytes::from_static(data));
        assert!(matches!(block.decode(), Err(NodeError::Decode(_))));

        let block = Block::new(Cid::from_block(Codec::DAG_CBOR, b"\xa0"), Bytes::from_static(b"\xa0"));
        assert!(matches!(block.decode(), Err(NodeError::UnknownCodec(0x71))));
    }
}
