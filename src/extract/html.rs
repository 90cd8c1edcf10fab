//! HTML text extraction
//!
//! Parses the node's bytes as an HTML document and emits exactly one `TEXT`
//! data child holding the concatenation of all text-node contents, joined
//! with single spaces. Runs of whitespace-only text are dropped.

use crate::error::ExtractorError;
use crate::probe;
use crate::tree::node::{Node, NodeContent, NodeRef};
use scraper::Html;
use tracing::debug;

/// Extract the visible text of an HTML node.
pub fn extract(node: &NodeRef) -> Result<Vec<NodeRef>, ExtractorError> {
    let markup = {
        let n = node.borrow();
        match &n.content {
            NodeContent::File(file) => {
                debug!(id = n.id, mime = %file.mime_type, "html extraction from file node");
                probe::decode_auto(&file.bytes)
            }
            NodeContent::Data(data) => {
                debug!(id = n.id, tag = %data.tag, "html extraction from data node");
                probe::decode_auto(&data.bytes)
            }
        }
    };

    let text = text_from_html(&markup);
    Ok(vec![Node::data("TEXT", text.into_bytes())])
}

/// The document's text nodes, trimmed and joined with single spaces.
pub fn text_from_html(markup: &str) -> String {
    let document = Html::parse_document(markup);
    document
        .root_element()
        .text()
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
