//! Node types and per-node metadata
//!
//! A node's content is a closed sum: either a file-shaped artifact (bytes
//! plus digests and MIME envelope) or an extractor-produced data payload
//! (a tag such as `URL` or `TEXT` plus bytes). All access branches on the
//! tag exhaustively.
//!
//! Ownership: parents own children through `Rc`; the `parent` link is a
//! `Weak` back-reference and never keeps a node alive.

use crate::tree::flavor::Flavor;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::{Rc, Weak};

/// Shared handle to a node
pub type NodeRef = Rc<RefCell<Node>>;

/// File-shaped artifact: an on-disk file or a buffer supplied as one
#[derive(Debug, Clone, Default)]
pub struct FileContent {
    pub path: String,
    pub name: String,
    pub size: u64,
    pub mime_type: String,
    pub extension: String,
    pub md5: String,
    pub sha1: String,
    pub sha256: String,
    pub bytes: Vec<u8>,
}

/// Extractor-produced payload
#[derive(Debug, Clone, Default)]
pub struct DataContent {
    /// Extractor-defined tag: `URL`, `QRCODE`, `OCR`, or `TEXT`
    pub tag: String,
    pub bytes: Vec<u8>,
}

/// Node content variants
#[derive(Debug, Clone)]
pub enum NodeContent {
    File(FileContent),
    Data(DataContent),
}

impl NodeContent {
    /// The raw bytes regardless of variant.
    pub fn bytes(&self) -> &[u8] {
        match self {
            NodeContent::File(file) => &file.bytes,
            NodeContent::Data(data) => &data.bytes,
        }
    }
}

/// Per-node metadata: three disjoint maps written by the driver and the
/// extractors during the node's digest step
#[derive(Debug, Clone, Default)]
pub struct Meta {
    pub map_string: BTreeMap<String, String>,
    pub map_number: BTreeMap<String, i64>,
    pub map_bool: BTreeMap<String, bool>,
}

/// One node of the digested tree
#[derive(Debug)]
pub struct Node {
    /// Unique within a process run; 0 means "not yet assigned"
    pub id: u64,
    /// Random 128-bit identifier in hyphenated text form
    pub uuid: String,
    /// Non-owning link to the parent; empty for the root
    pub parent: Weak<RefCell<Node>>,
    /// Owned children, in extraction order
    pub children: Vec<NodeRef>,
    pub content: NodeContent,
    /// Classified category; selects the extractors to run
    pub flavor: Flavor,
    /// Candidate archive passwords, inherited from the request
    pub passwords: Vec<String>,
    pub meta: Meta,
}

impl Node {
    /// Wrap `content` in a fresh unattached node handle.
    pub fn new(content: NodeContent) -> NodeRef {
        Rc::new(RefCell::new(Node {
            id: 0,
            uuid: String::new(),
            parent: Weak::new(),
            children: Vec::new(),
            content,
            flavor: Flavor::Other,
            passwords: Vec::new(),
            meta: Meta::default(),
        }))
    }

    /// A data node carrying an extractor payload.
    pub fn data(tag: &str, bytes: Vec<u8>) -> NodeRef {
        Node::new(NodeContent::Data(DataContent {
            tag: tag.to_string(),
            bytes,
        }))
    }

    /// A file node for an archive entry: path and name are the entry path.
    pub fn file_entry(entry_path: String, bytes: Vec<u8>) -> NodeRef {
        Node::new(NodeContent::File(FileContent {
            path: entry_path.clone(),
            name: entry_path,
            bytes,
            ..FileContent::default()
        }))
    }

    /// The root file node for an inspection request.
    pub fn root_file(path: String, name: String, bytes: Vec<u8>) -> NodeRef {
        Node::new(NodeContent::File(FileContent {
            path,
            name,
            bytes,
            ..FileContent::default()
        }))
    }

    /// The id of the parent node, or 0 for the root.
    pub fn parent_id(&self) -> u64 {
        self.parent
            .upgrade()
            .map(|parent| parent.borrow().id)
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    #[test]
    fn new_node_is_unattached() {
        let node = Node::data("URL", b"https://example.com".to_vec());
        let node = node.borrow();
        assert_eq!(node.id, 0);
        assert!(node.uuid.is_empty());
        assert!(node.parent.upgrade().is_none());
        assert!(node.children.is_empty());
        assert_eq!(node.parent_id(), 0);
    }

    #[test]
    fn parent_link_does_not_own() {
        let parent = Node::root_file("a".into(), "a".into(), vec![]);
        let child = Node::data("TEXT", vec![]);
        child.borrow_mut().parent = Rc::downgrade(&parent);
        parent.borrow_mut().children.push(Rc::clone(&child));

        assert_eq!(Rc::strong_count(&parent), 1, "child must not own its parent");

        let parent_seen = child.borrow().parent.upgrade().unwrap();
        assert!(Rc::ptr_eq(&parent_seen, &parent));

        // Dropping the parent (the whole tree) invalidates the back-reference
        drop(parent_seen);
        drop(parent);
        assert!(child.borrow().parent.upgrade().is_none());
    }

    #[test]
    fn content_bytes_accessor() {
        let file = Node::file_entry("dir/a.txt".into(), b"abc".to_vec());
        assert_eq!(file.borrow().content.bytes(), b"abc");
        let file = file.borrow();
        match &file.content {
            NodeContent::File(f) => {
                assert_eq!(f.path, "dir/a.txt");
                assert_eq!(f.name, "dir/a.txt");
            }
            NodeContent::Data(_) => panic!("expected file content"),
        }
    }
}
