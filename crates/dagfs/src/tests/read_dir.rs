use super::*;

use futures::stream;

use crate::dir::DirHandle;
use crate::error::{Error, NodeError};
use crate::metadata::{FileMode, MetadataNode};

async fn open_wide(k: usize) -> (MemoryNode, DirHandle) {
    let node = MemoryNode::new();
    let root = wide_directory(&node, k).await;
    let fs = DagFs::new(node.clone());
    let dir = fs.open(root.to_string()).await.unwrap().into_dir().unwrap();
    (node, dir)
}

#[tokio::test]
async fn test_pagination_covers_every_entry_once() {
    for (k, n) in [(7, 3), (6, 3), (1, 1), (5, 10), (10, 1), (0, 2)] {
        let (_node, mut dir) = open_wide(k).await;

        let mut seen = Vec::new();
        let mut data_pages = 0;
        loop {
            let listing = dir.read_dir(n as isize).await.unwrap();
            assert!(listing.entries.len() <= n);
            if !listing.entries.is_empty() {
                data_pages += 1;
            }
            seen.extend(listing.entries.iter().map(|e| e.name()));
            if listing.end_of_sequence {
                break;
            }
            assert_eq!(listing.entries.len(), n, "k={k} n={n}: short page without end");
        }

        assert_eq!(data_pages, k.div_ceil(n), "k={k} n={n}");
        let expected: Vec<String> = (0..k).map(|i| format!("f{i:03}")).collect();
        assert_eq!(seen, expected, "k={k} n={n}");
    }
}

#[tokio::test]
async fn test_exact_multiple_needs_one_more_call() {
    let (_node, mut dir) = open_wide(4).await;

    let first = dir.read_dir(2).await.unwrap();
    assert_eq!(first.entries.len(), 2);
    assert!(!first.end_of_sequence);

    let second = dir.read_dir(2).await.unwrap();
    assert_eq!(second.entries.len(), 2);
    assert!(!second.end_of_sequence);

    let last = dir.read_dir(2).await.unwrap();
    assert!(last.entries.is_empty());
    assert!(last.end_of_sequence);
}

#[tokio::test]
async fn test_unbounded_read_returns_everything() {
    let (_node, mut dir) = open_wide(5).await;

    let listing = dir.read_dir(0).await.unwrap();
    assert_eq!(listing.entries.len(), 5);
    assert!(!listing.end_of_sequence);

    // Exhausted: bounded reads report the end, unbounded reads do not.
    let again = dir.read_dir(-1).await.unwrap();
    assert!(again.entries.is_empty());
    assert!(!again.end_of_sequence);

    let bounded = dir.read_dir(3).await.unwrap();
    assert!(bounded.entries.is_empty());
    assert!(bounded.end_of_sequence);
}

#[tokio::test]
async fn test_unbounded_read_after_partial_page() {
    let (_node, mut dir) = open_wide(5).await;

    assert_eq!(dir.read_dir(2).await.unwrap().entries.len(), 2);
    let rest = dir.entries().await.unwrap();
    let names: Vec<String> = rest.iter().map(|e| e.name()).collect();
    assert_eq!(names, ["f002", "f003", "f004"]);
}

#[tokio::test]
async fn test_entry_names_have_no_separator() {
    let fx = fixture().await;
    let nested = fx.node.add_directory([("inner", fx.docs), ("leaf", fx.readme)]).await.unwrap();

    let mut dir = fx.fs.open(nested.to_string()).await.unwrap().into_dir().unwrap();
    let entries = dir.entries().await.unwrap();
    assert_eq!(entries.len(), 2);
    for entry in &entries {
        assert!(!entry.name().contains('/'), "{}", entry.name());
    }

    let inner = &entries[0];
    assert_eq!(inner.name(), "inner");
    assert!(inner.is_dir());
    assert_eq!(inner.entry_type(), crate::EntryType::Directory);

    let leaf = &entries[1];
    assert_eq!(leaf.name(), "leaf");
    assert!(!leaf.is_dir());
}

#[tokio::test]
async fn test_entry_info_is_lazy() {
    let fx = fixture().await;
    let mut dir = fx.fs.open(fx.root.to_string()).await.unwrap().into_dir().unwrap();
    let entries = dir.entries().await.unwrap();
    let readme = entries.iter().find(|e| e.name() == "readme").unwrap();

    let info = readme.info().await.unwrap();
    assert_eq!(info.name(), "readme");
    assert_eq!(info.size(), README.len() as u64);
    assert_eq!(info.mode(), readme.mode());

    // Listing succeeded; the size is only looked up on demand.
    assert!(fx.node.remove_block(&fx.readme).await);
    match readme.info().await {
        Err(Error::SizeUnavailable { path, source }) => {
            assert_eq!(path, "readme");
            assert!(matches!(source, NodeError::NotFound(_)));
        }
        other => panic!("expected size unavailable, got {other:?}"),
    }
}

#[tokio::test]
async fn test_directory_entry_info_reports_directory() {
    let fx = fixture().await;
    let mut dir = fx.fs.open(fx.root.to_string()).await.unwrap().into_dir().unwrap();
    let entries = dir.entries().await.unwrap();
    let docs = entries.iter().find(|e| e.name() == "docs").unwrap();

    let info = docs.info().await.unwrap();
    assert_eq!(info.name(), "docs");
    assert!(info.is_dir());
    assert!(info.size() > 0);
}

fn scripted_dir(items: Vec<NodeResult<(String, Arc<dyn GraphNode>)>>) -> DirHandle {
    let node: Arc<dyn GraphNode> = crate::memory::LinkNode::new(Cid::raw_from_bytes(b"d"), Default::default());
    let meta = MetadataNode::new(DagPath::from_string("/scripted"), FileMode::directory(), node);
    DirHandle::new(Box::pin(stream::iter(items)), meta)
}

fn leaf(name: &str) -> NodeResult<(String, Arc<dyn GraphNode>)> {
    let node: Arc<dyn GraphNode> = crate::memory::LinkNode::new(Cid::raw_from_bytes(name.as_bytes()), Default::default());
    Ok((name.to_string(), node))
}

#[tokio::test]
async fn test_enumeration_error_discards_page() {
    let mut dir = scripted_dir(vec![
        leaf("a"),
        leaf("b"),
        Err(NodeError::decode("truncated directory")),
        leaf("c"),
    ]);

    match dir.read_dir(3).await {
        Err(Error::Node(NodeError::Decode(msg))) => assert_eq!(msg, "truncated directory"),
        other => panic!("expected enumeration error, got {other:?}"),
    }

    // Enumeration continues after the failed item.
    let rest = dir.read_dir(0).await.unwrap();
    let names: Vec<String> = rest.entries.iter().map(|e| e.name()).collect();
    assert_eq!(names, ["c"]);
}

#[tokio::test]
async fn test_enumeration_error_after_full_page_is_deferred() {
    let mut dir = scripted_dir(vec![leaf("a"), leaf("b"), Err(NodeError::decode("bad link"))]);

    let page = dir.read_dir(2).await.unwrap();
    assert_eq!(page.entries.len(), 2);
    assert!(!page.end_of_sequence);

    assert!(matches!(dir.read_dir(2).await, Err(Error::Node(_))));
}

#[tokio::test]
async fn test_scripted_directory_markers() {
    let mut dir = scripted_dir(vec![leaf("sub/"), leaf("plain")]);

    let entries = dir.entries().await.unwrap();
    assert_eq!(entries[0].name(), "sub");
    assert!(entries[0].is_dir());
    assert_eq!(entries[1].name(), "plain");
    assert!(!entries[1].is_dir());
}

#[tokio::test]
async fn test_close_releases_enumeration() {
    let (_node, mut dir) = open_wide(3).await;
    assert_eq!(dir.read_dir(1).await.unwrap().entries.len(), 1);
    dir.close().await.unwrap();
}
