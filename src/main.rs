//! deepsift - Recursive File-Content Inspector
//!
//! Entry point for the CLI application.

use anyhow::{Context, Result};
use clap::Parser;
use deepsift::config::{CliArgs, InspectConfig};
use deepsift::service::{inspect, InspectRequest};
use deepsift::{ident, WhisperReply};
use humansize::{format_size, BINARY};
use std::process::ExitCode;
use std::time::Instant;
use tracing::error;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    let args = CliArgs::parse();

    setup_logging(args.verbose)?;

    let config = InspectConfig::from_args(args).context("Invalid configuration")?;

    ident::init(config.datacenter, config.machine)
        .context("Failed to initialize the id generator")?;

    let input_size = std::fs::metadata(&config.path).map(|m| m.len()).unwrap_or(0);

    let request = InspectRequest {
        file_path: Some(config.path.clone()),
        file_content: None,
        root_id: config.root_id,
        passwords: config.passwords.clone(),
    };

    let started = Instant::now();
    let reply = inspect(request).context("Inspection failed")?;
    let elapsed = started.elapsed();

    write_reply(&reply, &config)?;
    print_summary(&reply, input_size, elapsed);

    Ok(())
}

fn setup_logging(verbose: bool) -> Result<()> {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

fn write_reply(reply: &WhisperReply, config: &InspectConfig) -> Result<()> {
    let json = if config.pretty {
        serde_json::to_string_pretty(reply)?
    } else {
        serde_json::to_string(reply)?
    };

    match &config.output {
        Some(path) => std::fs::write(path, json)
            .with_context(|| format!("Failed to write '{}'", path.display()))?,
        None => println!("{json}"),
    }
    Ok(())
}

fn print_summary(reply: &WhisperReply, input_size: u64, elapsed: std::time::Duration) {
    let files = reply.tree.iter().filter(|n| n.file.is_some()).count();
    let data = reply.tree.len() - files;
    eprintln!(
        "Digested {} ({} nodes: {} files, {} data) in {:.2?}",
        format_size(input_size, BINARY),
        reply.tree.len(),
        files,
        data,
        elapsed,
    );
}
