mod read_dir;

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

use crate::cid::Cid;
use crate::context::Context;
use crate::error::NodeResult;
use crate::fs::DagFs;
use crate::memory::MemoryNode;
use crate::node::{GraphNode, ObjectStore, Reconstructor, Resolver, StorageNode, UnifiedNode};
use crate::path::DagPath;

pub(crate) const README: &[u8] = b"Hello from the content graph.\n";

/// A node holding:
///
/// ```text
/// <root>/
///   readme
///   docs/
///     notes.txt
/// ```
pub(crate) struct Fixture {
    pub node: MemoryNode,
    pub fs: DagFs,
    pub root: Cid,
    pub readme: Cid,
    pub docs: Cid,
}

pub(crate) async fn fixture() -> Fixture {
    let node = MemoryNode::new();
    let readme = node.add_bytes(README).await.unwrap();
    let notes = node.add_bytes(b"remember the milk").await.unwrap();
    let docs = node.add_directory([("notes.txt", notes)]).await.unwrap();
    let root = node.add_directory([("readme", readme), ("docs", docs)]).await.unwrap();
    let fs = DagFs::new(node.clone());
    Fixture {
        node,
        fs,
        root,
        readme,
        docs,
    }
}

/// Directory of `k` small files named `f000`, `f001`, ...
pub(crate) async fn wide_directory(node: &MemoryNode, k: usize) -> Cid {
    let mut entries = Vec::with_capacity(k);
    for i in 0..k {
        let cid = node.add_bytes(format!("file {i}").as_bytes()).await.unwrap();
        entries.push((format!("f{i:03}"), cid));
    }
    node.add_directory(entries).await.unwrap()
}

/// Wraps a memory node and delays the resolver and object store, so
/// cancellation can land while they run.
pub(crate) struct SlowNode {
    inner: MemoryNode,
    resolver: SlowResolver,
    store_delay: Duration,
}

pub(crate) struct SlowResolver {
    inner: MemoryNode,
    delay: Duration,
}

pub(crate) struct SlowStore {
    inner: Arc<dyn ObjectStore>,
    delay: Duration,
}

impl SlowNode {
    pub fn new(inner: MemoryNode, resolve_delay: Duration, store_delay: Duration) -> Self {
        Self {
            resolver: SlowResolver {
                inner: inner.clone(),
                delay: resolve_delay,
            },
            inner,
            store_delay,
        }
    }
}

#[async_trait]
impl Resolver for SlowResolver {
    async fn resolve_to_last_node(&self, ctx: &Context, path: &DagPath) -> NodeResult<(Cid, Vec<String>)> {
        tokio::time::sleep(self.delay).await;
        self.inner.resolver().resolve_to_last_node(ctx, path).await
    }
}

#[async_trait]
impl ObjectStore for SlowStore {
    async fn get(&self, ctx: &Context, cid: &Cid) -> NodeResult<Arc<dyn GraphNode>> {
        tokio::time::sleep(self.delay).await;
        self.inner.get(ctx, cid).await
    }
}

impl StorageNode for SlowNode {
    fn resolver(&self) -> &dyn Resolver {
        &self.resolver
    }

    fn store(&self) -> Arc<dyn ObjectStore> {
        Arc::new(SlowStore {
            inner: self.inner.store(),
            delay: self.store_delay,
        })
    }

    fn reconstructor(&self) -> &dyn Reconstructor {
        self.inner.reconstructor()
    }

    fn context(&self) -> Context {
        self.inner.context()
    }
}

/// Reconstruction that hands back whatever the test scripted.
pub(crate) struct ScriptedBuilder<F>(pub F);

#[async_trait]
impl<F> Reconstructor for ScriptedBuilder<F>
where
    F: Fn() -> UnifiedNode + Send + Sync,
{
    async fn build(
        &self,
        _ctx: &Context,
        _store: Arc<dyn ObjectStore>,
        _node: Arc<dyn GraphNode>,
    ) -> NodeResult<UnifiedNode> {
        Ok((self.0)())
    }
}

/// A memory node whose reconstruction is scripted.
pub(crate) struct ScriptedNode<F> {
    pub inner: MemoryNode,
    pub builder: ScriptedBuilder<F>,
}

impl<F> StorageNode for ScriptedNode<F>
where
    F: Fn() -> UnifiedNode + Send + Sync,
{
    fn resolver(&self) -> &dyn Resolver {
        self.inner.resolver()
    }

    fn store(&self) -> Arc<dyn ObjectStore> {
        self.inner.store()
    }

    fn reconstructor(&self) -> &dyn Reconstructor {
        &self.builder
    }

    fn context(&self) -> Context {
        self.inner.context()
    }
}
