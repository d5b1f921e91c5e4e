// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Common utilities for CLI commands.

use std::io::IsTerminal as _;
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Deserialize;
use tracing_subscriber::EnvFilter;

use robobag::{BagLoader, BagSet, RosTime};

pub use anyhow::Result as CliResult;
pub type Result<T = ()> = CliResult<T>;

/// Settings read from `--config <file.toml>`. Command line flags win.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct CliConfig {
    /// Log level or `tracing` filter directive
    pub log_level: Option<String>,
    /// Topics to dump when none are given on the command line
    pub topics: Vec<String>,
    /// Topic pattern to dump when none is given on the command line
    pub topic_regex: Option<String>,
    /// Whether to precompute static layouts after loading
    pub precompute_layouts: Option<bool>,
}

impl CliConfig {
    /// Load a config file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    /// Parse config text.
    pub fn parse(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }
}

/// Install the tracing subscriber on stderr.
///
/// `RUST_LOG` takes precedence over `level`.
pub fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    // A subscriber may already be installed when running under a test harness
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Load bags for a command.
pub fn open_bags(files: &[PathBuf], precompute_layouts: bool) -> Result<BagSet> {
    BagLoader::new()
        .paths(files)
        .precompute_layouts(precompute_layouts)
        .load()
        .context("loading bags")
}

/// Format the span between two bag times, coarsest two units.
pub fn format_span(start: RosTime, end: RosTime) -> String {
    let span = chrono::Duration::nanoseconds(
        i64::try_from(end.as_nanos().saturating_sub(start.as_nanos())).unwrap_or(i64::MAX),
    );
    let (hours, minutes, secs) = (span.num_hours(), span.num_minutes() % 60, span.num_seconds() % 60);
    let millis = span.num_milliseconds() % 1000;

    match (hours, minutes, secs) {
        (0, 0, 0) => format!("{millis}ms"),
        (0, 0, s) => format!("{s}.{millis:03}s"),
        (0, m, s) => format!("{m}m {s}s"),
        (h, m, _) => format!("{h}h {m}m"),
    }
}

/// Format a bag time as a UTC wall-clock string.
pub fn format_time(time: RosTime) -> String {
    match time.to_datetime() {
        Some(dt) => dt.format("%Y-%m-%d %H:%M:%S%.3f UTC").to_string(),
        None => time.to_string(),
    }
}

/// Progress bar for `total` messages on stderr, hidden unless stderr is a terminal.
pub fn message_progress(total: u64) -> ProgressBar {
    if !std::io::stderr().is_terminal() {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new(total);
    if let Ok(style) = ProgressStyle::with_template("{spinner} {pos}/{len} messages [{elapsed}] {wide_bar} {msg}") {
        bar.set_style(style);
    }
    bar
}
