//! Wire form of a digested tree
//!
//! The serializer flattens the tree into a breadth-first node list. Each
//! reply node carries its id, its parent's id (0 for the root), the ids of
//! its children, exactly one of a file or data payload, and the three
//! metadata maps.
//!
//! A file payload's `path` is the node's UUID: a path-safe name that also
//! keys the optional debug dump of the node's bytes into an output
//! directory.

use crate::error::Result;
use crate::tree::digest::Tree;
use crate::tree::node::{Node, NodeContent};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, VecDeque};
use std::fs;
use std::path::Path;
use std::rc::Rc;

/// Serialized inspection result: all nodes in BFS order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WhisperReply {
    pub tree: Vec<ReplyNode>,
}

/// One node of the wire form
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplyNode {
    pub id: u64,
    /// 0 for the root
    pub parent_id: u64,
    pub children: Vec<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<ReplyFile>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<ReplyData>,
    pub meta: ReplyMeta,
}

/// File payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplyFile {
    /// The node's UUID, usable as a path-safe name
    pub path: String,
    pub name: String,
    pub extension: String,
    pub size: u64,
    pub mime_type: String,
    pub md5: String,
    pub sha1: String,
    pub sha256: String,
    pub content: Vec<u8>,
}

/// Extractor payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplyData {
    #[serde(rename = "type")]
    pub tag: String,
    pub content: Vec<u8>,
}

/// The three metadata maps of a node
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReplyMeta {
    pub map_string: BTreeMap<String, String>,
    pub map_number: BTreeMap<String, i64>,
    pub map_bool: BTreeMap<String, bool>,
}

impl WhisperReply {
    /// Flatten `tree` breadth-first into the wire form.
    ///
    /// When `dump_dir` is set, every file node's bytes are also written to
    /// `<dump_dir>/<uuid>`.
    pub fn from_tree(tree: &Tree, dump_dir: Option<&Path>) -> Result<WhisperReply> {
        let mut reply = WhisperReply::default();
        let Some(root) = &tree.root else {
            return Ok(reply);
        };

        if let Some(dir) = dump_dir {
            fs::create_dir_all(dir)?;
        }

        let mut queue = VecDeque::from([Rc::clone(root)]);
        while let Some(node_ref) = queue.pop_front() {
            let node = node_ref.borrow();
            reply.tree.push(reply_node(&node, dump_dir)?);
            for child in &node.children {
                queue.push_back(Rc::clone(child));
            }
        }
        Ok(reply)
    }
}

fn reply_node(node: &Node, dump_dir: Option<&Path>) -> Result<ReplyNode> {
    let (file, data) = match &node.content {
        NodeContent::File(f) => {
            if let Some(dir) = dump_dir {
                fs::write(dir.join(&node.uuid), &f.bytes)?;
            }
            let file = ReplyFile {
                path: node.uuid.clone(),
                name: f.name.clone(),
                extension: f.extension.clone(),
                size: f.size,
                mime_type: f.mime_type.clone(),
                md5: f.md5.clone(),
                sha1: f.sha1.clone(),
                sha256: f.sha256.clone(),
                content: f.bytes.clone(),
            };
            (Some(file), None)
        }
        NodeContent::Data(d) => {
            let data = ReplyData {
                tag: d.tag.clone(),
                content: d.bytes.clone(),
            };
            (None, Some(data))
        }
    };

    Ok(ReplyNode {
        id: node.id,
        parent_id: node.parent_id(),
        children: node.children.iter().map(|c| c.borrow().id).collect(),
        file,
        data,
        meta: ReplyMeta {
            map_string: node.meta.map_string.clone(),
            map_number: node.meta.map_number.clone(),
            map_bool: node.meta.map_bool.clone(),
        },
    })
}
