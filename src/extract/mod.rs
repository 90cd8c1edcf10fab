//! Extractor plugins and the flavor dispatch table
//!
//! An extractor is a plain function: it consumes one node and produces zero
//! or more child nodes, never mutating the input node's content. The
//! registry is data, not a type hierarchy: each flavor maps to an ordered
//! list of named extractor records, and new extractors are added by editing
//! the table.
//!
//! The driver runs extractors through [`run_isolated`], which converts
//! panics from plugin code into structured errors so a misbehaving plugin
//! can never abort the tree.

pub mod archive;
pub mod html;
pub mod ocr;
pub mod qrcode;
pub mod url;

use crate::error::ExtractorError;
use crate::tree::flavor::Flavor;
use crate::tree::node::NodeRef;
use std::panic::{self, AssertUnwindSafe};

/// One registered extractor
pub struct Extractor {
    /// Stable name, used in metadata keys and error messages
    pub name: &'static str,
    pub run: fn(&NodeRef) -> Result<Vec<NodeRef>, ExtractorError>,
}

const TEXT_PLAIN_EXTRACTORS: &[Extractor] = &[Extractor {
    name: "url_extractor",
    run: url::extract,
}];

const TEXT_HTML_EXTRACTORS: &[Extractor] = &[Extractor {
    name: "html_extractor",
    run: html::extract,
}];

const IMAGE_EXTRACTORS: &[Extractor] = &[
    Extractor {
        name: "qrcode_extractor",
        run: qrcode::extract,
    },
    Extractor {
        name: "ocr_extractor",
        run: ocr::extract,
    },
];

const COMPRESSED_FILE_EXTRACTORS: &[Extractor] = &[Extractor {
    name: "compressed_file_extractor",
    run: archive::extract,
}];

/// The ordered extractor list for a flavor.
pub fn extractors_for(flavor: Flavor) -> &'static [Extractor] {
    match flavor {
        Flavor::TextPlain => TEXT_PLAIN_EXTRACTORS,
        Flavor::TextHtml => TEXT_HTML_EXTRACTORS,
        Flavor::Image => IMAGE_EXTRACTORS,
        Flavor::CompressedFile => COMPRESSED_FILE_EXTRACTORS,
        Flavor::Other => &[],
    }
}

/// Run one extractor with panic isolation.
///
/// A panic inside the plugin is caught and reported as
/// [`ExtractorError::Panicked`]; the caller records it like any other
/// extractor failure.
pub fn run_isolated(
    extractor: &Extractor,
    node: &NodeRef,
) -> Result<Vec<NodeRef>, ExtractorError> {
    match panic::catch_unwind(AssertUnwindSafe(|| (extractor.run)(node))) {
        Ok(outcome) => outcome,
        Err(payload) => Err(ExtractorError::Panicked(panic_message(&payload))),
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
