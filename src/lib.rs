//! deepsift - Recursive File-Content Inspection
//!
//! Digests a root artifact (a file on disk or an in-memory buffer) into a
//! tree of derived artifacts by repeatedly classifying content and applying
//! type-specific extractors until nothing more can be extracted. Every node
//! carries cryptographic digests, a sniffed MIME type, character-encoding
//! hints, and extractor-produced metadata (timings, failures, archive
//! statistics, discovered passwords).
//!
//! # Pipeline
//!
//! ```text
//! ┌──────────────┐     ┌───────────────────────────────────────────────┐
//! │   Request    │     │              Tree::digest(node)               │
//! │  path/bytes  ├────►│                                               │
//! │  passwords   │     │  identity ─► probes ─► classify ─► extractors │
//! └──────────────┘     │     │                                  │      │
//!                      │     └── md5/sha1/sha256, MIME,         │      │
//!                      │         encoding hints                 ▼      │
//!                      │                                children, one  │
//!                      │                                digest() each  │
//!                      └───────────────────────┬───────────────────────┘
//!                                              │
//!                                              ▼
//!                                  ┌──────────────────────┐
//!                                  │     WhisperReply     │
//!                                  │  BFS node list, JSON │
//!                                  └──────────────────────┘
//! ```
//!
//! Extractors are registered per flavor: URLs from plain text, text from
//! HTML, QR codes and OCR text from images, entries from archives (with an
//! ordered password trial for encrypted containers). An extractor failing
//! on a node is recorded in that node's metadata and never aborts the tree.
//!
//! # Example
//!
//! ```
//! use deepsift::service::{inspect, InspectRequest};
//!
//! let reply = inspect(InspectRequest {
//!     file_content: Some(b"see https://example.com".to_vec()),
//!     ..InspectRequest::default()
//! })?;
//!
//! assert_eq!(reply.tree.len(), 2);
//! assert_eq!(reply.tree[1].data.as_ref().unwrap().tag, "URL");
//! # Ok::<(), deepsift::WhisperError>(())
//! ```

pub mod config;
pub mod error;
pub mod extract;
pub mod ident;
pub mod probe;
pub mod service;
pub mod tree;

pub use error::{
    ExtractorError, IdentityError, ProbeError, RequestError, Result, WhisperError,
};
pub use service::{digest_request, inspect, InspectRequest};
pub use tree::{Flavor, Meta, Node, NodeContent, NodeRef, Tree, WhisperReply};
