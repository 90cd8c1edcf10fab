//! Recursion driver
//!
//! `Tree::digest` turns a freshly constructed node into a fully populated
//! subtree: assign identity, classify, run the extractors for the flavor,
//! attach the children they produce, and recurse. Depth-first and
//! single-threaded; a node's fields are written only during its own digest
//! call and the node is immutable afterwards.
//!
//! Failure isolation: an extractor failing (or panicking) on a node is
//! recorded in that node's metadata and never aborts the tree. Probe and
//! identity failures propagate.

use crate::error::Result;
use crate::extract;
use crate::ident;
use crate::probe;
use crate::tree::flavor::Flavor;
use crate::tree::node::{Meta, NodeContent, NodeRef};
use std::path::Path;
use std::rc::Rc;
use std::time::Instant;
use tracing::{debug, warn};

/// A digested artifact tree. Owns the root node and, transitively, every
/// node below it.
#[derive(Debug, Default)]
pub struct Tree {
    pub root: Option<NodeRef>,
}

impl Tree {
    pub fn new() -> Self {
        Tree { root: None }
    }

    /// Digest `node` and every child produced below it.
    ///
    /// The first node digested becomes the tree's root. A node with `id == 0`
    /// receives a generated id; a nonzero id (the externally supplied root
    /// id) is kept.
    pub fn digest(&mut self, node: &NodeRef) -> Result<()> {
        if self.root.is_none() {
            self.root = Some(Rc::clone(node));
        }

        self.classify(node)?;

        let flavor = node.borrow().flavor;
        let mut collected: Vec<NodeRef> = Vec::new();

        for extractor in extract::extractors_for(flavor) {
            let started = Instant::now();
            let outcome = extract::run_isolated(extractor, node);
            let elapsed_us = started.elapsed().as_micros() as i64;

            let mut n = node.borrow_mut();
            n.meta
                .map_number
                .insert(format!("microsecond_{}", extractor.name), elapsed_us);

            match outcome {
                Ok(children) => {
                    debug!(
                        id = n.id,
                        extractor = extractor.name,
                        children = children.len(),
                        "extractor finished"
                    );
                    collected.extend(children);
                }
                Err(err) => {
                    warn!(id = n.id, extractor = extractor.name, %err, "extractor failed");
                    let message = n
                        .meta
                        .map_string
                        .entry("error_message".to_string())
                        .or_default();
                    message.push_str(&format!("{}: {};", extractor.name, err));
                }
            }
        }

        let passwords = node.borrow().passwords.clone();
        for child in &collected {
            let mut c = child.borrow_mut();
            c.parent = Rc::downgrade(node);
            if c.passwords.is_empty() {
                c.passwords = passwords.clone();
            }
        }
        node.borrow_mut().children = collected.clone();

        for child in &collected {
            self.digest(child)?;
        }
        Ok(())
    }

    /// Identity, digests, MIME, flavor, and encoding hints for one node.
    fn classify(&mut self, node: &NodeRef) -> Result<()> {
        let mut n = node.borrow_mut();
        n.uuid = ident::new_uuid();
        if n.id == 0 {
            n.id = ident::generator().next_id()?;
        }
        n.meta = Meta::default();

        let n = &mut *n;
        match &mut n.content {
            NodeContent::File(file) => {
                file.size = file.bytes.len() as u64;
                file.md5 = probe::md5_hex(&file.bytes);
                file.sha1 = probe::sha1_hex(&file.bytes);
                file.sha256 = probe::sha256_hex(&file.bytes);
                file.mime_type = probe::mime_of(&file.bytes)?;
                file.extension = extension_of(&file.name);
                n.flavor = Flavor::from_mime(&file.mime_type);
                write_encoding_meta(&mut n.meta, &file.bytes);
                debug!(
                    id = n.id,
                    mime = %file.mime_type,
                    size = file.size,
                    flavor = n.flavor.label(),
                    "digesting file node"
                );
            }
            NodeContent::Data(data) => {
                n.flavor = Flavor::from_data_tag(&data.tag);
                write_encoding_meta(&mut n.meta, &data.bytes);
                debug!(
                    id = n.id,
                    tag = %data.tag,
                    flavor = n.flavor.label(),
                    "digesting data node"
                );
            }
        }
        Ok(())
    }
}

/// The final `.`-suffix of a file name, without the dot.
fn extension_of(name: &str) -> String {
    Path::new(name)
        .extension()
        .map(|ext| ext.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Record the top encoding guesses as `encoding`, `encoding2`, `encoding3`
/// plus matching `encoding_confidence` keys.
fn write_encoding_meta(meta: &mut Meta, bytes: &[u8]) {
    for (index, guess) in probe::detect_encodings(bytes, 3).iter().enumerate() {
        let (name_key, confidence_key) = if index == 0 {
            ("encoding".to_string(), "encoding_confidence".to_string())
        } else {
            (
                format!("encoding{}", index + 1),
                format!("encoding_confidence{}", index + 1),
            )
        };
        meta.map_string.insert(name_key, guess.name.clone());
        meta.map_number
            .insert(confidence_key, i64::from(guess.confidence));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::node::Node;

    fn digest_bytes(bytes: &[u8]) -> (Tree, NodeRef) {
        let node = Node::root_file("test".into(), "test".into(), bytes.to_vec());
        let mut tree = Tree::new();
        tree.digest(&node).unwrap();
        (tree, node)
    }

    #[test]
    fn plain_text_with_urls() {
        let (_tree, root) = digest_bytes(b"see https://example.com and http://x.y/z?q=1");
        let root = root.borrow();

        match &root.content {
            NodeContent::File(file) => {
                assert_eq!(file.mime_type, "text/plain");
                assert_eq!(file.size, 44);
                assert_eq!(file.md5.len(), 32);
                assert_eq!(file.sha1.len(), 40);
                assert_eq!(file.sha256.len(), 64);
            }
            NodeContent::Data(_) => panic!("root must be a file node"),
        }
        assert_eq!(root.flavor, Flavor::TextPlain);

        assert_eq!(root.children.len(), 2);
        let first = root.children[0].borrow();
        let second = root.children[1].borrow();
        match (&first.content, &second.content) {
            (NodeContent::Data(a), NodeContent::Data(b)) => {
                assert_eq!(a.tag, "URL");
                assert_eq!(a.bytes, b"https://example.com");
                assert_eq!(b.tag, "URL");
                assert_eq!(b.bytes, b"http://x.y/z?q=1");
            }
            _ => panic!("children must be data nodes"),
        }
    }

    #[test]
    fn json_has_no_children() {
        let (_tree, root) = digest_bytes(br#"{"key": "value"}"#);
        let root = root.borrow();
        assert_eq!(root.flavor, Flavor::Other);
        assert!(root.children.is_empty());
    }

    #[test]
    fn first_node_becomes_root() {
        let (tree, root) = digest_bytes(b"hello");
        assert!(Rc::ptr_eq(tree.root.as_ref().unwrap(), &root));
    }

    #[test]
    fn supplied_root_id_is_kept() {
        let node = Node::root_file("t".into(), "t".into(), b"hello".to_vec());
        node.borrow_mut().id = 4242;
        let mut tree = Tree::new();
        tree.digest(&node).unwrap();
        assert_eq!(node.borrow().id, 4242);
    }

    #[test]
    fn generated_ids_are_unique_across_tree() {
        let (_tree, root) = digest_bytes(b"https://a.example https://b.example");
        let root = root.borrow();
        let mut ids = vec![root.id];
        for child in &root.children {
            ids.push(child.borrow().id);
        }
        let len = ids.len();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), len);
        assert!(ids.iter().all(|&id| id != 0));
    }

    #[test]
    fn children_point_back_to_parent() {
        let (_tree, root) = digest_bytes(b"link: https://example.org");
        for child in &root.borrow().children {
            let parent = child.borrow().parent.upgrade().unwrap();
            assert!(Rc::ptr_eq(&parent, &root));
        }
    }

    #[test]
    fn extractor_timing_is_recorded() {
        let (_tree, root) = digest_bytes(b"no urls in here");
        let root = root.borrow();
        let micros = root
            .meta
            .map_number
            .get("microsecond_url_extractor")
            .expect("timing key must exist even with no matches");
        assert!(*micros >= 0);
    }

    #[test]
    fn extractor_failure_is_recorded_and_recovered() {
        // Valid zip magic, truncated body: classification says archive,
        // extraction fails
        let (_tree, root) = digest_bytes(b"PK\x03\x04truncated-nonsense");
        let root = root.borrow();
        assert_eq!(root.flavor, Flavor::CompressedFile);
        assert!(root.children.is_empty());

        let message = root.meta.map_string.get("error_message").unwrap();
        assert!(message.starts_with("compressed_file_extractor:"));
        assert!(message.ends_with(';'));
        assert!(root
            .meta
            .map_number
            .contains_key("microsecond_compressed_file_extractor"));
    }

    #[test]
    fn encoding_hints_are_written() {
        let (_tree, root) = digest_bytes(b"plain ascii");
        let root = root.borrow();
        assert!(root.meta.map_string.contains_key("encoding"));
        assert!(root.meta.map_number.contains_key("encoding_confidence"));
    }

    #[test]
    fn uuid_assigned_to_every_node() {
        let (_tree, root) = digest_bytes(b"https://example.com");
        let root = root.borrow();
        assert_eq!(root.uuid.len(), 36);
        for child in &root.children {
            assert_eq!(child.borrow().uuid.len(), 36);
        }
    }
}
