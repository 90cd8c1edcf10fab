//! MIME type detection using magic bytes
//!
//! Uses the `infer` crate to detect binary file types from magic bytes
//! (file headers), then falls back to content heuristics for the text
//! families `infer` does not cover: HTML, JSON, and plain text.
//!
//! The returned strings match libmagic's vocabulary so the flavor
//! classification table can key on them directly.

use crate::error::ProbeError;

/// How much of the buffer the text heuristics examine.
const SNIFF_WINDOW: usize = 1024;

/// Detect the MIME type of a byte buffer.
///
/// Binary formats are recognized by magic bytes; text content falls through
/// to HTML, JSON, and plain-text heuristics. Content that matches nothing
/// is reported as `application/octet-stream`, and an empty buffer as
/// `application/x-empty`.
///
/// # Example
///
/// ```
/// use deepsift::probe::mime_of;
///
/// // PNG file magic bytes
/// let png_header = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
/// assert_eq!(mime_of(png_header).unwrap(), "image/png");
///
/// assert_eq!(mime_of(b"just some words").unwrap(), "text/plain");
/// ```
pub fn mime_of(data: &[u8]) -> Result<String, ProbeError> {
    if data.is_empty() {
        return Ok("application/x-empty".to_string());
    }

    if let Some(kind) = infer::get(data) {
        return Ok(kind.mime_type().to_string());
    }

    if looks_like_html(data) {
        return Ok("text/html".to_string());
    }

    if looks_like_json(data) {
        return Ok("application/json".to_string());
    }

    if looks_like_text(data) {
        return Ok("text/plain".to_string());
    }

    Ok("application/octet-stream".to_string())
}

/// HTML detection: a document marker near the start of the buffer.
fn looks_like_html(data: &[u8]) -> bool {
    let window = &data[..data.len().min(SNIFF_WINDOW)];
    let text = String::from_utf8_lossy(window).to_ascii_lowercase();
    let trimmed = text.trim_start_matches(['\u{feff}', ' ', '\t', '\r', '\n']);

    trimmed.starts_with("<!doctype html")
        || trimmed.starts_with("<html")
        || trimmed.starts_with("<head")
        || trimmed.starts_with("<body")
}

/// JSON detection: an object or array that actually parses.
fn looks_like_json(data: &[u8]) -> bool {
    let first = data.iter().find(|b| !b.is_ascii_whitespace());
    if !matches!(first, Some(b'{') | Some(b'[')) {
        return false;
    }
    serde_json::from_slice::<serde_json::Value>(data).is_ok()
}

/// Plain-text detection: valid UTF-8 without control characters beyond
/// whitespace.
fn looks_like_text(data: &[u8]) -> bool {
    let Ok(text) = std::str::from_utf8(data) else {
        return false;
    };
    !text
        .chars()
        .any(|c| c.is_control() && !matches!(c, '\t' | '\n' | '\r'))
}
