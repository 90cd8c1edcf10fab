//! OCR text extraction from images
//!
//! Runs Tesseract over the node's bytes and emits one `OCR` data child with
//! the recognized UTF-8 text. Recognition is configured for Traditional
//! Chinese plus English; model data is discovered by Tesseract itself
//! through `TESSDATA_PREFIX`.
//!
//! Engine availability is probed once per process. A host without a working
//! Tesseract reports the cached setup failure as this extractor's error on
//! every image node; it never aborts a digest.

use crate::error::ExtractorError;
use crate::tree::node::{Node, NodeContent, NodeRef};
use rusty_tesseract::{Args, Image};
use std::sync::OnceLock;
use tracing::{debug, info};

/// Recognition languages, in Tesseract's `+`-joined form.
const LANGUAGES: &str = "chi_tra+eng";

static ENGINE_CHECK: OnceLock<Result<(), String>> = OnceLock::new();

/// One-time engine availability probe.
fn engine_check() -> &'static Result<(), String> {
    ENGINE_CHECK.get_or_init(|| match rusty_tesseract::get_tesseract_version() {
        Ok(version) => {
            info!(version = version.trim(), "OCR engine available");
            Ok(())
        }
        Err(err) => Err(err.to_string()),
    })
}

/// Recognize text in an image node.
pub fn extract(node: &NodeRef) -> Result<Vec<NodeRef>, ExtractorError> {
    let bytes = {
        let n = node.borrow();
        match &n.content {
            NodeContent::File(file) => file.bytes.clone(),
            NodeContent::Data(_) => {
                debug!(id = n.id, "ocr extraction skipping data node");
                return Ok(Vec::new());
            }
        }
    };

    if let Err(setup_error) = engine_check() {
        return Err(ExtractorError::Failed(format!(
            "OCR engine unavailable: {setup_error}"
        )));
    }

    let decoded = image::load_from_memory(&bytes)
        .map_err(|err| ExtractorError::Failed(format!("image not readable: {err}")))?;
    let input = Image::from_dynamic_image(&decoded)
        .map_err(|err| ExtractorError::Failed(format!("image not convertible: {err}")))?;

    let args = Args {
        lang: LANGUAGES.to_string(),
        ..Args::default()
    };
    let text = rusty_tesseract::image_to_string(&input, &args)
        .map_err(|err| ExtractorError::Failed(format!("recognition failed: {err}")))?;

    debug!(chars = text.len(), "ocr extraction finished");
    Ok(vec![Node::data("OCR", text.into_bytes())])
}
