// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Dump command - print decoded messages as JSON lines.

use std::io::{BufWriter, Write as _};
use std::path::PathBuf;

use clap::Args;
use tracing::info;

use robobag::TopicFilter;

use crate::common::{message_progress, open_bags, CliConfig, Result};

/// Print decoded messages, one JSON object per line.
#[derive(Args, Clone, Debug)]
pub struct DumpCmd {
    /// Bag files of one recording
    #[arg(value_name = "FILES", required = true)]
    inputs: Vec<PathBuf>,

    /// Topic to dump (repeatable)
    #[arg(long = "topic", short = 't', value_name = "TOPIC")]
    topics: Vec<String>,

    /// Dump topics matching a regular expression
    #[arg(long, value_name = "PATTERN")]
    regex: Option<String>,

    /// Stop after this many messages
    #[arg(long, short = 'n')]
    limit: Option<usize>,
}

impl DumpCmd {
    pub fn run(self, config: &CliConfig, precompute_layouts: bool) -> Result<()> {
        let bags = open_bags(&self.inputs, precompute_layouts)?;

        let topics = if self.topics.is_empty() {
            config.topics.clone()
        } else {
            self.topics
        };
        let pattern = self.regex.or_else(|| config.topic_regex.clone());
        let filter = TopicFilter::from_options(&topics, pattern.as_deref())?;
        let selected = bags.select_topics(&filter);
        info!(topics = ?selected, "dumping topics");

        let counts = bags.message_counts();
        let total: u64 = selected
            .iter()
            .filter_map(|t| counts.get(t))
            .sum();
        let total = match self.limit {
            Some(limit) => total.min(limit as u64),
            None => total,
        };
        let progress = message_progress(total);

        let stdout = std::io::stdout();
        let mut out = BufWriter::new(stdout.lock());
        let mut written = 0usize;
        for message in bags.read_topics(&selected) {
            if self.limit.is_some_and(|limit| written >= limit) {
                break;
            }
            let message = message?;
            serde_json::to_writer(&mut out, &message.to_json())?;
            out.write_all(b"\n")?;
            written += 1;
            progress.inc(1);
        }
        out.flush()?;

        progress.finish_with_message(format!("{written} messages"));
        Ok(())
    }
}
