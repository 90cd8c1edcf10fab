//! Error types for deepsift
//!
//! This module defines the error hierarchy for the inspection pipeline:
//! - Probe errors (hashing, MIME sniffing, encoding detection)
//! - Identity errors (id generator misconfiguration, clock regression)
//! - Extractor errors (one plugin failing on one node)
//! - Request errors (malformed inspection requests)
//!
//! Design philosophy:
//! - Use thiserror for structured error types in library code
//! - Extractor errors are recovered per-node and recorded in node metadata;
//!   everything else propagates to the request boundary
//! - Preserve error chains for debugging

use std::path::PathBuf;
use thiserror::Error;

/// Convenience alias used throughout the crate
pub type Result<T> = std::result::Result<T, WhisperError>;

/// Top-level error type for the deepsift pipeline
#[derive(Error, Debug)]
pub enum WhisperError {
    /// Probe failures (hashing, MIME, encoding)
    #[error("Probe error: {0}")]
    Probe(#[from] ProbeError),

    /// Identity generator failures
    #[error("Identity error: {0}")]
    Identity(#[from] IdentityError),

    /// Extractor failures that escaped the per-node recovery scope
    #[error("Extractor error: {0}")]
    Extractor(#[from] ExtractorError),

    /// Malformed inspection requests
    #[error("Request error: {0}")]
    Request(#[from] RequestError),

    /// I/O errors (serializer debug dumps, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Probe failures
///
/// Probes are pure functions over byte buffers. A probe failure is fatal to
/// the digest step of the node it occurred on and propagates out of the
/// driver.
#[derive(Error, Debug, Clone)]
pub enum ProbeError {
    /// MIME classification failed
    #[error("MIME detection failed: {0}")]
    Mime(String),

    /// Encoding detection failed
    #[error("Encoding detection failed: {0}")]
    Encoding(String),
}

/// Identity generator errors
#[derive(Error, Debug, Clone)]
pub enum IdentityError {
    /// Wall clock moved backwards since the last generated id
    #[error("Clock moved backwards: refusing to generate id (last {last_ms} ms, now {now_ms} ms)")]
    ClockBackwards { last_ms: u64, now_ms: u64 },

    /// Datacenter id outside the 5-bit range
    #[error("Datacenter id {0} out of range [0, 31]")]
    DatacenterOutOfRange(u16),

    /// Machine id outside the 5-bit range
    #[error("Machine id {0} out of range [0, 31]")]
    MachineOutOfRange(u16),

    /// The process-wide generator was initialized twice
    #[error("Identity generator already initialized")]
    AlreadyInitialized,
}

/// One extractor failing on one node
///
/// The driver converts these into `error_message` metadata on the node and
/// continues with the remaining extractors; the tree is never aborted by an
/// extractor failure.
#[derive(Error, Debug)]
pub enum ExtractorError {
    /// Generic extraction failure
    #[error("{0}")]
    Failed(String),

    /// The container rejected the supplied password
    #[error("Wrong password")]
    WrongPassword,

    /// Every candidate password was rejected
    #[error("All passwords failed ({tried} tried)")]
    PasswordExhausted { tried: usize },

    /// The node classified as an archive but no reader supports the container
    #[error("Unsupported container format '{0}'")]
    UnsupportedContainer(String),

    /// The extractor panicked and was caught by the driver
    #[error("Extractor panicked: {0}")]
    Panicked(String),
}

impl ExtractorError {
    /// Whether this failure means "the password was wrong, try the next one".
    ///
    /// Container libraries wrap the condition in generic error messages, so
    /// this is a substring match over the rendered error. Kept as a named
    /// predicate so it can be upgraded when the libraries expose error codes.
    pub fn is_wrong_password(&self) -> bool {
        self.to_string().contains("Wrong password")
    }
}

/// Malformed inspection requests
#[derive(Error, Debug)]
pub enum RequestError {
    /// Neither a file path nor an in-memory buffer was supplied
    #[error("No file data provided: either file_path or file_content is required")]
    MissingInput,

    /// Both a file path and an in-memory buffer were supplied
    #[error("Ambiguous input: file_path and file_content are mutually exclusive")]
    AmbiguousInput,

    /// The supplied file path could not be read
    #[error("Failed to read '{}': {reason}", path.display())]
    FileRead { path: PathBuf, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrong_password_predicate() {
        assert!(ExtractorError::WrongPassword.is_wrong_password());
        assert!(ExtractorError::Failed("zip: Wrong password for entry".into()).is_wrong_password());
        assert!(!ExtractorError::Failed("corrupt header".into()).is_wrong_password());
        assert!(!ExtractorError::PasswordExhausted { tried: 3 }.is_wrong_password());
    }

    #[test]
    fn errors_convert_to_top_level() {
        let err: WhisperError = ProbeError::Mime("boom".into()).into();
        assert!(matches!(err, WhisperError::Probe(_)));

        let err: WhisperError = RequestError::MissingInput.into();
        assert!(err.to_string().contains("file_path or file_content"));
    }
}
