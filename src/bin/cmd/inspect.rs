// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Inspect commands - show recording information, topics, schemas.

use std::path::PathBuf;

use clap::Subcommand;

use crate::common::{format_span, format_time, open_bags, Result};

/// Inspect recording contents.
#[derive(Subcommand, Clone, Debug)]
pub enum InspectCmd {
    /// Show files, connections, chunks and time range
    Info {
        /// Bag files of one recording
        #[arg(value_name = "FILES", required = true)]
        inputs: Vec<PathBuf>,
    },

    /// List topics with their type and message count
    Topics {
        /// Bag files of one recording
        #[arg(value_name = "FILES", required = true)]
        inputs: Vec<PathBuf>,
    },

    /// Show parsed message definitions
    Schema {
        /// Bag files of one recording
        #[arg(value_name = "FILES", required = true)]
        inputs: Vec<PathBuf>,

        /// Topic to show (shows all registered types if not specified)
        #[arg(long, short)]
        topic: Option<String>,
    },
}

impl InspectCmd {
    pub fn run(self, precompute_layouts: bool) -> Result<()> {
        match self {
            InspectCmd::Info { inputs } => cmd_info(inputs, precompute_layouts),
            InspectCmd::Topics { inputs } => cmd_topics(inputs, precompute_layouts),
            InspectCmd::Schema { inputs, topic } => cmd_schema(inputs, topic, precompute_layouts),
        }
    }
}

/// Cmd: Show recording info
fn cmd_info(inputs: Vec<PathBuf>, precompute_layouts: bool) -> Result<()> {
    let bags = open_bags(&inputs, precompute_layouts)?;

    for file in bags.files() {
        println!("=== {} ===", file.path().display());
        println!("Connections: {}", file.connections().len());
        println!("Chunks: {}", file.chunks().len());
    }
    println!();
    println!("Messages: {}", bags.message_count());
    println!("Types: {}", bags.registry().len());

    if let Some((start, end)) = bags.time_range() {
        println!("Start: {}", format_time(start));
        println!("End: {}", format_time(end));
        println!("Duration: {}", format_span(start, end));
    }

    println!();
    println!("Topics:");
    for topic in bags.topics() {
        println!(
            "  {} | {} | {} messages",
            topic.topic, topic.type_name, topic.message_count
        );
    }

    Ok(())
}

/// Cmd: List topics
fn cmd_topics(inputs: Vec<PathBuf>, precompute_layouts: bool) -> Result<()> {
    let bags = open_bags(&inputs, precompute_layouts)?;

    for topic in bags.topics() {
        println!("{}\t{}\t{}", topic.topic, topic.type_name, topic.message_count);
    }

    Ok(())
}

/// Cmd: Show schema
fn cmd_schema(inputs: Vec<PathBuf>, topic: Option<String>, precompute_layouts: bool) -> Result<()> {
    let bags = open_bags(&inputs, precompute_layouts)?;
    let registry = bags.registry();

    let definitions = match topic {
        Some(topic) => vec![bags.definition_for_topic(&topic)?],
        None => registry
            .names()
            .iter()
            .filter_map(|name| registry.get(name))
            .collect(),
    };

    for definition in definitions {
        match registry.layout(&definition.type_name) {
            Some(layout) => println!(
                "=== {} (static, {} bytes) ===",
                definition.type_name,
                layout.static_size()
            ),
            None => println!("=== {} ===", definition.type_name),
        }
        for field in &definition.fields {
            println!("{} {}", field.field_type, field.name);
        }
        println!();
    }

    Ok(())
}
