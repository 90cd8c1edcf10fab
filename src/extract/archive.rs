//! Archive extraction
//!
//! Opens the node's bytes as an archive container and turns every leaf
//! entry into a `File` child node (directories are skipped). The container
//! is chosen from the node's sniffed MIME type; zip, tar, gzip, and 7z are
//! supported, the remaining archive MIME types fail as unsupported and the
//! failure is recorded on the node.
//!
//! Encrypted containers go through the password trial protocol: with no
//! candidates the empty password is attempted once, otherwise candidates
//! are tried in order, advancing only past wrong-password failures. The
//! password that opened the archive is recorded in the node's metadata, as
//! are archive statistics computed from the listed entries.

use crate::error::ExtractorError;
use crate::tree::node::{Meta, Node, NodeContent, NodeRef};
use flate2::read::GzDecoder;
use std::io::{Cursor, Read};
use tracing::{debug, warn};

/// One extracted leaf entry
struct Entry {
    name: String,
    bytes: Vec<u8>,
}

/// Statistics over the listed entries
#[derive(Debug, Default, Clone)]
struct Stats {
    items: i64,
    folders: i64,
    files: i64,
    size: i64,
    pack_size: i64,
    encrypted: bool,
}

impl Stats {
    fn write_to(&self, meta: &mut Meta) {
        meta.map_number.insert("items_count".into(), self.items);
        meta.map_number.insert("folders_count".into(), self.folders);
        meta.map_number.insert("files_count".into(), self.files);
        meta.map_number.insert("size".into(), self.size);
        meta.map_number.insert("pack_size".into(), self.pack_size);
        // Multi-volume archives are not assembled
        meta.map_number.insert("volumes_count".into(), 1);
        meta.map_bool.insert("is_encrypted".into(), self.encrypted);
        meta.map_bool.insert("is_multi_volume".into(), false);
    }
}

/// Supported container formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Container {
    Zip,
    Tar,
    Gzip,
    SevenZ,
}

impl Container {
    fn from_mime(mime: &str) -> Option<Container> {
        match mime {
            "application/zip" => Some(Container::Zip),
            "application/x-tar" => Some(Container::Tar),
            "application/gzip" | "application/x-gzip" => Some(Container::Gzip),
            "application/x-7z-compressed" => Some(Container::SevenZ),
            _ => None,
        }
    }
}

/// Extract an archive node into its leaf entries.
pub fn extract(node: &NodeRef) -> Result<Vec<NodeRef>, ExtractorError> {
    let (bytes, mime, passwords) = {
        let n = node.borrow();
        match &n.content {
            NodeContent::File(file) => {
                (file.bytes.clone(), file.mime_type.clone(), n.passwords.clone())
            }
            NodeContent::Data(_) => {
                debug!(id = n.id, "archive extraction skipping data node");
                return Ok(Vec::new());
            }
        }
    };

    let container = Container::from_mime(&mime)
        .ok_or_else(|| ExtractorError::UnsupportedContainer(mime.clone()))?;

    let (entries, stats, correct_password) = trial_passwords(container, &bytes, &passwords)?;
    debug!(
        container = ?container,
        entries = entries.len(),
        "archive extraction finished"
    );

    {
        let mut n = node.borrow_mut();
        stats.write_to(&mut n.meta);
        if let Some(password) = correct_password {
            n.meta
                .map_string
                .insert("correct_password".into(), password);
        }
    }

    Ok(entries
        .into_iter()
        .map(|entry| Node::file_entry(entry.name, entry.bytes))
        .collect())
}

/// The password trial protocol.
///
/// With no candidates, a single attempt with the empty password either
/// succeeds or propagates its failure. With candidates, each is tried in
/// order; a wrong-password failure advances to the next candidate, any
/// other failure short-circuits. Success with a non-empty candidate
/// reports that candidate as the correct password.
fn trial_passwords(
    container: Container,
    bytes: &[u8],
    passwords: &[String],
) -> Result<(Vec<Entry>, Stats, Option<String>), ExtractorError> {
    if passwords.is_empty() {
        let (entries, stats) = extract_with(container, bytes, "")?;
        return Ok((entries, stats, None));
    }

    for password in passwords {
        match extract_with(container, bytes, password) {
            Ok((entries, mut stats)) => {
                let correct = if password.is_empty() {
                    None
                } else {
                    stats.encrypted = true;
                    Some(password.clone())
                };
                return Ok((entries, stats, correct));
            }
            Err(err) if err.is_wrong_password() => {
                warn!(%err, "password rejected, trying next candidate");
                continue;
            }
            Err(err) => return Err(err),
        }
    }

    Err(ExtractorError::PasswordExhausted {
        tried: passwords.len(),
    })
}

fn extract_with(
    container: Container,
    bytes: &[u8],
    password: &str,
) -> Result<(Vec<Entry>, Stats), ExtractorError> {
    match container {
        Container::Zip => extract_zip(bytes, password),
        Container::Tar => extract_tar(bytes),
        Container::Gzip => extract_gzip(bytes),
        Container::SevenZ => extract_sevenz(bytes, password),
    }
}

fn extract_zip(bytes: &[u8], password: &str) -> Result<(Vec<Entry>, Stats), ExtractorError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).map_err(zip_error)?;

    let mut stats = Stats {
        items: archive.len() as i64,
        ..Stats::default()
    };
    let mut entries = Vec::new();

    for index in 0..archive.len() {
        let mut file = if password.is_empty() {
            archive.by_index(index).map_err(zip_error)?
        } else {
            archive
                .by_index_decrypt(index, password.as_bytes())
                .map_err(zip_error)?
        };

        if file.is_dir() {
            stats.folders += 1;
            continue;
        }
        stats.files += 1;
        stats.size += file.size() as i64;
        stats.pack_size += file.compressed_size() as i64;

        let mut body = Vec::with_capacity(file.size() as usize);
        file.read_to_end(&mut body)
            .map_err(|err| ExtractorError::Failed(format!("zip entry read: {err}")))?;
        entries.push(Entry {
            name: file.name().to_string(),
            bytes: body,
        });
    }

    Ok((entries, stats))
}

fn zip_error(err: zip::result::ZipError) -> ExtractorError {
    match err {
        zip::result::ZipError::InvalidPassword => ExtractorError::WrongPassword,
        other => ExtractorError::Failed(format!("zip: {other}")),
    }
}

fn extract_tar(bytes: &[u8]) -> Result<(Vec<Entry>, Stats), ExtractorError> {
    let mut archive = tar::Archive::new(Cursor::new(bytes));
    let mut stats = Stats::default();
    let mut entries = Vec::new();

    let members = archive
        .entries()
        .map_err(|err| ExtractorError::Failed(format!("tar: {err}")))?;
    for member in members {
        let mut member = member.map_err(|err| ExtractorError::Failed(format!("tar: {err}")))?;
        stats.items += 1;

        let kind = member.header().entry_type();
        if kind.is_dir() {
            stats.folders += 1;
            continue;
        }
        if !kind.is_file() {
            // Links, devices, and the like carry no extractable body
            continue;
        }

        let name = member
            .path()
            .map_err(|err| ExtractorError::Failed(format!("tar entry path: {err}")))?
            .to_string_lossy()
            .into_owned();
        let mut body = Vec::new();
        member
            .read_to_end(&mut body)
            .map_err(|err| ExtractorError::Failed(format!("tar entry read: {err}")))?;

        stats.files += 1;
        stats.size += body.len() as i64;
        entries.push(Entry { name, bytes: body });
    }

    stats.pack_size = bytes.len() as i64;
    Ok((entries, stats))
}

/// A gzip stream holds exactly one member; the decompressed stream becomes
/// a single child named by the header filename when one is present.
fn extract_gzip(bytes: &[u8]) -> Result<(Vec<Entry>, Stats), ExtractorError> {
    let mut decoder = GzDecoder::new(Cursor::new(bytes));
    let mut body = Vec::new();
    decoder
        .read_to_end(&mut body)
        .map_err(|err| ExtractorError::Failed(format!("gzip: {err}")))?;

    let name = decoder
        .header()
        .and_then(|header| header.filename())
        .map(|raw| String::from_utf8_lossy(raw).into_owned())
        .unwrap_or_else(|| "data".to_string());

    let stats = Stats {
        items: 1,
        files: 1,
        size: body.len() as i64,
        pack_size: bytes.len() as i64,
        ..Stats::default()
    };
    Ok((vec![Entry { name, bytes: body }], stats))
}

fn extract_sevenz(bytes: &[u8], password: &str) -> Result<(Vec<Entry>, Stats), ExtractorError> {
    let password = if password.is_empty() {
        sevenz_rust::Password::empty()
    } else {
        sevenz_rust::Password::from(password)
    };
    let mut reader =
        sevenz_rust::SevenZReader::new(Cursor::new(bytes), bytes.len() as u64, password)
            .map_err(sevenz_error)?;

    let mut stats = Stats::default();
    let mut entries = Vec::new();
    let mut read_failure: Option<std::io::Error> = None;

    reader
        .for_each_entries(|entry, body_reader| {
            stats.items += 1;
            if entry.is_directory() {
                stats.folders += 1;
                return Ok(true);
            }

            let mut body = Vec::new();
            if let Err(err) = body_reader.read_to_end(&mut body) {
                read_failure = Some(err);
                return Ok(false);
            }
            stats.files += 1;
            stats.size += body.len() as i64;
            entries.push(Entry {
                name: entry.name().to_string(),
                bytes: body,
            });
            Ok(true)
        })
        .map_err(sevenz_error)?;

    if let Some(err) = read_failure {
        return Err(ExtractorError::Failed(format!("7z entry read: {err}")));
    }

    stats.pack_size = bytes.len() as i64;
    Ok((entries, stats))
}

fn sevenz_error(err: sevenz_rust::Error) -> ExtractorError {
    let message = err.to_string();
    if message.to_ascii_lowercase().contains("password") {
        ExtractorError::WrongPassword
    } else {
        ExtractorError::Failed(format!("7z: {message}"))
    }
}
