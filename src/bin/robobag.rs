// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! # Robobag CLI
//!
//! Command-line tool for inspecting and dumping ROS1 bag recordings.
//!
//! ## Usage
//!
//! ```sh
//! # Show recording information
//! robobag info a.bag b.bag
//!
//! # List topics
//! robobag topics a.bag
//!
//! # Show parsed message definitions
//! robobag schema a.bag --topic /odom
//!
//! # Print messages as JSON lines
//! robobag dump a.bag b.bag --topic /text --limit 10
//! ```

mod cmd;
mod common;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use cmd::{DumpCmd, InspectCmd};
use common::{init_logging, CliConfig, Result};

/// Robobag - ROS1 bag reader
///
/// Multiple files are treated as one recording and read in name order.
#[derive(Parser, Clone)]
#[command(name = "robobag")]
#[command(about = "Inspect and decode ROS1 bag recordings", long_about = None)]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = "ArcheBase")]
struct Cli {
    /// TOML config file
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace) or filter directive
    #[arg(long, global = true, value_name = "LEVEL")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand, Clone)]
enum Commands {
    #[command(flatten)]
    Inspect(InspectCmd),

    /// Print decoded messages as JSON lines
    Dump(DumpCmd),
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => CliConfig::load(path)?,
        None => CliConfig::default(),
    };
    let level = cli
        .log_level
        .clone()
        .or_else(|| config.log_level.clone())
        .unwrap_or_else(|| "warn".to_string());
    init_logging(&level);

    let precompute_layouts = config.precompute_layouts.unwrap_or(true);
    match cli.command {
        Commands::Inspect(cmd) => cmd.run(precompute_layouts),
        Commands::Dump(cmd) => cmd.run(&config, precompute_layouts),
    }
}

fn main() {
    let result = run();

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
