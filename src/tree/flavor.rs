//! Flavor classification
//!
//! A flavor is the coarse category that selects which extractors run on a
//! node. File nodes classify by their sniffed MIME string, data nodes by
//! their extractor tag. Both mappings are pure functions over fixed tables.

/// Coarse content category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Flavor {
    TextPlain,
    TextHtml,
    Image,
    CompressedFile,
    Other,
}

/// MIME strings recognized as archive containers.
const COMPRESSED_MIMES: &[&str] = &[
    "application/zip",
    "application/x-rar-compressed",
    "application/vnd.rar",
    "application/x-7z-compressed",
    "application/x-tar",
    "application/gzip",
    "application/x-gzip",
    "application/x-bzip2",
    "application/x-xz",
];

/// MIME strings recognized as images (exact matches, no wildcard).
const IMAGE_MIMES: &[&str] = &[
    "image/jpeg",
    "image/png",
    "image/gif",
    "image/bmp",
    "image/webp",
    "image/tiff",
];

impl Flavor {
    /// Classify a file node by its MIME string.
    pub fn from_mime(mime: &str) -> Flavor {
        match mime {
            "text/plain" => Flavor::TextPlain,
            "text/html" => Flavor::TextHtml,
            _ if IMAGE_MIMES.contains(&mime) => Flavor::Image,
            _ if COMPRESSED_MIMES.contains(&mime) => Flavor::CompressedFile,
            _ => Flavor::Other,
        }
    }

    /// Classify a data node by its extractor tag.
    ///
    /// Extractor payloads (`TEXT`, `URL`, `QRCODE`, `OCR`) terminate
    /// recursion: none re-enters MIME-based classification.
    pub fn from_data_tag(_tag: &str) -> Flavor {
        Flavor::Other
    }

    /// Stable lowercase label, used in logs.
    pub fn label(&self) -> &'static str {
        match self {
            Flavor::TextPlain => "text_plain",
            Flavor::TextHtml => "text_html",
            Flavor::Image => "image",
            Flavor::CompressedFile => "compressed_file",
            Flavor::Other => "other",
        }
    }
}
