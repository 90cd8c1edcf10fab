//! URL extraction from text content
//!
//! Decodes the node's bytes to text and scans for `http://` / `https://`
//! URLs. Every non-overlapping match becomes a `URL` data child, preserving
//! discovery order.

use crate::error::ExtractorError;
use crate::probe;
use crate::tree::node::{Node, NodeContent, NodeRef};
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

static URL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"https?://[^\s"<>{}]+"#).expect("Invalid URL regex")
});

/// Extract URLs from a text node.
pub fn extract(node: &NodeRef) -> Result<Vec<NodeRef>, ExtractorError> {
    let text = {
        let n = node.borrow();
        match &n.content {
            NodeContent::File(file) => {
                debug!(id = n.id, mime = %file.mime_type, "url extraction from file node");
                probe::decode_auto(&file.bytes)
            }
            NodeContent::Data(data) => {
                debug!(id = n.id, tag = %data.tag, "url extraction from data node");
                probe::decode_auto(&data.bytes)
            }
        }
    };

    let children: Vec<NodeRef> = URL_PATTERN
        .find_iter(&text)
        .map(|m| Node::data("URL", m.as_str().as_bytes().to_vec()))
        .collect();

    debug!(urls = children.len(), "url extraction finished");
    Ok(children)
}

/// Find all URLs in `text`, in discovery order.
pub fn extract_urls_from_text(text: &str) -> Vec<String> {
    URL_PATTERN
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}
