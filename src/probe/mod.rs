//! Content probes: pure functions over byte buffers
//!
//! This module provides the stateless building blocks the digest driver
//! relies on:
//! - Cryptographic digests (MD5, SHA-1, SHA-256) as lowercase hex strings
//! - MIME type classification from magic bytes and text heuristics
//! - Character-encoding detection and decoding
//!
//! All probes are thread-safe and report failure as a single error kind
//! without partial output.

pub mod encoding;
pub mod hash;
pub mod mime;

pub use encoding::{decode, decode_auto, detect_encodings, EncodingGuess};
pub use hash::{md5_hex, sha1_hex, sha256_hex};
pub use mime::mime_of;
