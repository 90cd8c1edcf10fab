//! Request boundary
//!
//! One inspection request digests one root artifact - either a file on disk
//! (memory-mapped) or an in-memory buffer - and yields the serialized tree.
//! Request validation failures surface as [`RequestError`]; everything else
//! propagates from the driver untouched.

use crate::config;
use crate::error::{RequestError, Result};
use crate::tree::{Node, NodeRef, Tree, WhisperReply};
use memmap2::Mmap;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// One inspection request
#[derive(Debug, Clone, Default)]
pub struct InspectRequest {
    /// Path of the artifact to inspect; mutually exclusive with `file_content`
    pub file_path: Option<PathBuf>,
    /// In-memory artifact bytes; mutually exclusive with `file_path`
    pub file_content: Option<Vec<u8>>,
    /// Externally supplied root id; 0 or absent means "generate one"
    pub root_id: Option<u64>,
    /// Candidate archive passwords, tried in order
    pub passwords: Vec<String>,
}

/// Digest the requested artifact into a tree.
pub fn digest_request(request: InspectRequest) -> Result<Tree> {
    let root = build_root(request)?;
    let mut tree = Tree::new();
    tree.digest(&root)?;
    Ok(tree)
}

/// Digest the requested artifact and serialize the result.
///
/// When the debug output directory is configured, every file node's bytes
/// are dumped there keyed by node UUID.
pub fn inspect(request: InspectRequest) -> Result<WhisperReply> {
    let tree = digest_request(request)?;
    let dump_dir = config::output_dir();
    let reply = WhisperReply::from_tree(&tree, dump_dir.as_deref())?;
    info!(nodes = reply.tree.len(), "inspection finished");
    Ok(reply)
}

fn build_root(request: InspectRequest) -> Result<NodeRef> {
    let (path, name, bytes) = match (request.file_path, request.file_content) {
        (Some(_), Some(_)) => return Err(RequestError::AmbiguousInput.into()),
        (None, None) => return Err(RequestError::MissingInput.into()),
        (Some(path), None) => {
            let bytes = read_mapped(&path)?;
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            (path.display().to_string(), name, bytes)
        }
        (None, Some(bytes)) => ("memory_file".to_string(), "memory_file".to_string(), bytes),
    };

    debug!(path = %path, size = bytes.len(), "building root node");
    let root = Node::root_file(path, name, bytes);
    {
        let mut n = root.borrow_mut();
        if let Some(id) = request.root_id {
            n.id = id;
        }
        n.passwords = request.passwords;
    }
    Ok(root)
}

/// Read a file through a memory map.
fn read_mapped(path: &Path) -> Result<Vec<u8>> {
    let file = File::open(path).map_err(|err| RequestError::FileRead {
        path: path.to_path_buf(),
        reason: err.to_string(),
    })?;
    // Safety: the mapping is read-only and copied out before this function
    // returns; concurrent truncation of the underlying file is the same
    // hazard every mmap reader accepts.
    let mapped = unsafe { Mmap::map(&file) }.map_err(|err| RequestError::FileRead {
        path: path.to_path_buf(),
        reason: err.to_string(),
    })?;
    Ok(mapped.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_input_is_rejected() {
        let err = inspect(InspectRequest::default()).unwrap_err();
        assert!(err.to_string().contains("file_path or file_content"));
    }

    #[test]
    fn ambiguous_input_is_rejected() {
        let request = InspectRequest {
            file_path: Some("x".into()),
            file_content: Some(vec![]),
            ..InspectRequest::default()
        };
        assert!(inspect(request).is_err());
    }

    #[test]
    fn unreadable_path_is_a_request_error() {
        let request = InspectRequest {
            file_path: Some("/no/such/file/anywhere".into()),
            ..InspectRequest::default()
        };
        let err = inspect(request).unwrap_err();
        assert!(err.to_string().contains("Failed to read"));
    }

    #[test]
    fn buffer_request_digests() {
        let request = InspectRequest {
            file_content: Some(b"see https://example.com".to_vec()),
            ..InspectRequest::default()
        };
        let reply = inspect(request).unwrap();
        assert_eq!(reply.tree.len(), 2);
        let root = &reply.tree[0];
        assert_eq!(root.file.as_ref().unwrap().name, "memory_file");
    }

    #[test]
    fn path_request_digests() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        tmp.write_all(b"plain contents").unwrap();

        let request = InspectRequest {
            file_path: Some(tmp.path().to_path_buf()),
            ..InspectRequest::default()
        };
        let reply = inspect(request).unwrap();
        assert_eq!(reply.tree.len(), 1);
        let file = reply.tree[0].file.as_ref().unwrap();
        assert_eq!(file.size, 14);
        assert_eq!(file.mime_type, "text/plain");
    }

    #[test]
    fn nonzero_root_id_is_used() {
        let request = InspectRequest {
            file_content: Some(b"hello".to_vec()),
            root_id: Some(777),
            ..InspectRequest::default()
        };
        let reply = inspect(request).unwrap();
        assert_eq!(reply.tree[0].id, 777);
    }

    #[test]
    fn zero_root_id_gets_generated() {
        let request = InspectRequest {
            file_content: Some(b"hello".to_vec()),
            root_id: Some(0),
            ..InspectRequest::default()
        };
        let reply = inspect(request).unwrap();
        assert_ne!(reply.tree[0].id, 0);
    }
}
