//! Configuration types for deepsift
//!
//! This module defines:
//! - CLI argument parsing using clap derive macros
//! - Runtime configuration with validation
//! - Environment variable discovery (done here and nowhere else)

use crate::error::{RequestError, WhisperError};
use clap::Parser;
use std::env;
use std::path::PathBuf;

/// Directory for debug dumps of every file node's bytes, keyed by UUID.
pub const OUTPUT_DIR_ENV: &str = "DEEPSIFT_OUTPUT_DIR";

/// Tesseract model directory, consumed by the OCR engine.
pub const TESSDATA_ENV: &str = "TESSDATA_PREFIX";

/// Recursive file-content inspector
#[derive(Parser, Debug, Clone)]
#[command(
    name = "deepsift",
    version,
    about = "Recursive file-content inspection",
    long_about = "Digests a file into a tree of derived artifacts by repeatedly classifying\n\
                  content and applying type-specific extractors: URLs from text, text from\n\
                  HTML, QR codes and OCR text from images, entries from archives.\n\n\
                  The result is printed as a JSON node list in breadth-first order.",
    after_help = "EXAMPLES:\n    \
        deepsift report.html\n    \
        deepsift bundle.zip -P hunter2 -P swordfish\n    \
        deepsift scan.jpg --pretty -o result.json\n    \
        DEEPSIFT_OUTPUT_DIR=/tmp/dumps deepsift nested.tar.gz"
)]
pub struct CliArgs {
    /// File to inspect
    #[arg(value_name = "PATH")]
    pub path: PathBuf,

    /// Candidate archive password; repeat to try several in order
    #[arg(short = 'P', long = "password", value_name = "PASSWORD", action = clap::ArgAction::Append)]
    pub passwords: Vec<String>,

    /// Root node id (generated when omitted or zero)
    #[arg(long, value_name = "ID")]
    pub root_id: Option<u64>,

    /// Write the JSON reply to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Pretty-print the JSON reply
    #[arg(long)]
    pub pretty: bool,

    /// Snowflake datacenter id
    #[arg(long, default_value = "0", value_name = "NUM")]
    pub datacenter: u16,

    /// Snowflake machine id
    #[arg(long, default_value = "0", value_name = "NUM")]
    pub machine: u16,

    /// Verbose output (debug-level logging)
    #[arg(short, long)]
    pub verbose: bool,
}

/// Validated runtime configuration for one inspection
#[derive(Debug, Clone)]
pub struct InspectConfig {
    pub path: PathBuf,
    pub passwords: Vec<String>,
    pub root_id: Option<u64>,
    pub output: Option<PathBuf>,
    pub pretty: bool,
    pub datacenter: u16,
    pub machine: u16,
}

impl InspectConfig {
    /// Validate CLI arguments into a runtime configuration.
    pub fn from_args(args: CliArgs) -> Result<Self, WhisperError> {
        if !args.path.is_file() {
            return Err(RequestError::FileRead {
                path: args.path,
                reason: "not a readable file".to_string(),
            }
            .into());
        }

        Ok(InspectConfig {
            path: args.path,
            passwords: args.passwords,
            root_id: args.root_id,
            output: args.output,
            pretty: args.pretty,
            datacenter: args.datacenter,
            machine: args.machine,
        })
    }
}

/// The configured debug dump directory, if any.
pub fn output_dir() -> Option<PathBuf> {
    env::var_os(OUTPUT_DIR_ENV).map(PathBuf::from)
}
