//! Klaviyo link and push inspector
//!
//! Tells whether a URI or a push payload would be treated as Klaviyo's and
//! what the dispatcher would do with it.
//!
//! Usage:
//!   klaviyo-inspect uri https://trk.klviyomail.com/abc
//!   klaviyo-inspect push '{"_k": "x", "title": "Hi"}'
//!   klaviyo-inspect --config klaviyo.toml uri https://click.brand.example/abc

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use klaviyo_inspect::{inspect_push, inspect_uri};
use klaviyo_sdk::SdkConfig;
use std::path::PathBuf;
use tracing::debug;

#[derive(Parser, Debug)]
#[command(name = "klaviyo-inspect")]
#[command(about = "Classify Klaviyo tracking links and push payloads")]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// SDK config file supplying tracking domains
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Classify a URI
    Uri { uri: String },
    /// Classify a push payload given as a JSON object of strings
    Push { json: String },
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Logging starts before the config is read, so `log_level` from the
    // file does not apply here.
    klaviyo_sdk::logging::init(if args.verbose { "debug" } else { "info" });

    let config = match &args.config {
        Some(path) => SdkConfig::load_from(path),
        None => SdkConfig::default(),
    };
    debug!(linking = ?config.linking, "using linking config");

    let report = match &args.command {
        Command::Uri { uri } => serde_json::to_string_pretty(&inspect_uri(&config.linking, uri))?,
        Command::Push { json } => {
            let report = inspect_push(&config.linking, json).context("invalid push payload")?;
            serde_json::to_string_pretty(&report)?
        }
    };
    println!("{report}");
    Ok(())
}
