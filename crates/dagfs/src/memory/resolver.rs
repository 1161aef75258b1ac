use async_trait::async_trait;

use crate::cid::Cid;
use crate::context::Context;
use crate::error::{NodeError, NodeResult};
use crate::node::Resolver;
use crate::path::{DagPath, IPFS_NAMESPACE, IPNS_NAMESPACE};

use super::BlockStore;
use super::block::{DagNode, Decoded};

/// Walks directory links from the root cid of a path.
#[derive(Clone)]
pub struct LinkResolver {
    store: BlockStore,
}

impl LinkResolver {
    pub fn new(store: BlockStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Resolver for LinkResolver {
    async fn resolve_to_last_node(&self, ctx: &Context, path: &DagPath) -> NodeResult<(Cid, Vec<String>)> {
        ctx.check()?;

        let mut segments = path.segments();
        match path.namespace() {
            Some(IPNS_NAMESPACE) => return Err(NodeError::UnsupportedNamespace(IPNS_NAMESPACE.to_string())),
            Some(IPFS_NAMESPACE) => {
                _ = segments.next();
            }
            _ => {}
        }

        let root = segments
            .next()
            .ok_or_else(|| NodeError::MalformedPath(path.to_string()))?;
        let mut cid = Cid::parse(root)?;
        let rest: Vec<&str> = segments.collect();

        for (i, name) in rest.iter().enumerate() {
            ctx.check()?;
            let block = self.store.get_block(&cid).await?;
            match block.decode()? {
                Decoded::Raw(_) => {
                    let remainder = rest[i..].iter().map(|s| s.to_string()).collect();
                    return Ok((cid, remainder));
                }
                Decoded::Node(DagNode::Directory { links }) => {
                    cid = links
                        .iter()
                        .find(|l| l.name == *name)
                        .map(|l| l.cid)
                        .ok_or_else(|| NodeError::no_link(cid, name))?;
                }
                Decoded::Node(_) => return Err(NodeError::NotADirectory(cid)),
            }
        }

        Ok((cid, Vec::new()))
    }
}
