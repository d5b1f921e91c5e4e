// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Multi-file bag reader.
//!
//! A [`BagSet`] is the catalog of one logical recording split over one or
//! more bag files. All files share a single definition registry, which is
//! fully populated by the time loading returns.
//!
//! # Example
//!
//! ```rust,no_run
//! use robobag::io::BagSet;
//!
//! let bags = BagSet::open(["a.bag", "b.bag"])?;
//! for topic in bags.topics() {
//!     println!("{} ({})", topic.topic, topic.type_name);
//! }
//! for message in bags.read_topic("/text") {
//!     let message = message?;
//!     println!("{}", message.get_field("data")?);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod builder;

pub use builder::{BagLoader, LoadConfig};

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use rayon::prelude::*;
use serde::Serialize;

use crate::core::{BagError, Result, RosMessage, RosTime};
use crate::io::filter::TopicFilter;
use crate::io::formats::bag::{BagFile, ChunkIndexEntry, Connection, TopicIter};
use crate::schema::{DefinitionRegistry, MessageDefinition};

/// Summary of one topic across a bag set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopicInfo {
    /// Topic name
    pub topic: String,
    /// Declared message type
    pub type_name: String,
    /// Messages recorded on the topic
    pub message_count: u64,
    /// Connections carrying the topic, across files
    pub connection_count: usize,
}

/// Catalog of one recording.
#[derive(Debug)]
pub struct BagSet {
    files: Vec<BagFile>,
    registry: Arc<DefinitionRegistry>,
}

impl BagSet {
    /// Load bags with the default configuration.
    pub fn open<I, P>(paths: I) -> Result<Self>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<std::path::Path>,
    {
        BagLoader::new().paths(paths).load()
    }

    pub(crate) fn from_parts(files: Vec<BagFile>, registry: Arc<DefinitionRegistry>) -> Self {
        Self { files, registry }
    }

    /// Loaded files in read order.
    pub fn files(&self) -> &[BagFile] {
        &self.files
    }

    /// Shared definition registry.
    pub fn registry(&self) -> &Arc<DefinitionRegistry> {
        &self.registry
    }

    /// All connections, in file then id order.
    pub fn connections(&self) -> Vec<&Connection> {
        self.files
            .iter()
            .flat_map(|f| f.connections().values())
            .collect()
    }

    /// Topics sorted by name, one entry per topic.
    ///
    /// The type is the first one declared for the topic.
    pub fn topics(&self) -> Vec<TopicInfo> {
        let counts = self.message_counts();
        let mut topics: BTreeMap<&str, TopicInfo> = BTreeMap::new();
        for connection in self.connections() {
            topics
                .entry(connection.topic.as_str())
                .or_insert_with(|| TopicInfo {
                    topic: connection.topic.clone(),
                    type_name: connection.declared_type.clone(),
                    message_count: counts.get(&connection.topic).copied().unwrap_or(0),
                    connection_count: 0,
                })
                .connection_count += 1;
        }
        topics.into_values().collect()
    }

    /// Topic names, sorted.
    pub fn topic_names(&self) -> Vec<String> {
        self.topics().into_iter().map(|t| t.topic).collect()
    }

    /// Messages per topic, summed from the chunk infos.
    pub fn message_counts(&self) -> BTreeMap<String, u64> {
        let mut counts = BTreeMap::new();
        for file in &self.files {
            for chunk in file.chunks() {
                for (&conn, &count) in &chunk.message_count_by_connection {
                    if let Some(connection) = file.connection(conn) {
                        *counts.entry(connection.topic.clone()).or_insert(0) +=
                            u64::from(count.max(0) as u32);
                    }
                }
            }
        }
        counts
    }

    /// Total messages in all files.
    pub fn message_count(&self) -> u64 {
        self.files
            .iter()
            .flat_map(|f| f.chunks())
            .map(ChunkIndexEntry::total_messages)
            .sum()
    }

    /// Earliest chunk start and latest chunk end over all files.
    pub fn time_range(&self) -> Option<(RosTime, RosTime)> {
        let ranges: Vec<_> = self.files.iter().filter_map(BagFile::time_range).collect();
        let start = ranges.iter().map(|r| r.0).min()?;
        let end = ranges.iter().map(|r| r.1).max()?;
        Some((start, end))
    }

    /// Definition of the first connection on `topic`.
    pub fn definition_for_topic(&self, topic: &str) -> Result<Arc<MessageDefinition>> {
        self.connections()
            .into_iter()
            .find(|c| c.topic == topic)
            .map(|c| Arc::clone(&c.definition))
            .ok_or_else(|| BagError::unknown_topic(topic))
    }

    /// Topic names selected by `filter`, sorted.
    pub fn select_topics(&self, filter: &TopicFilter) -> Vec<String> {
        filter.apply(&self.topic_names())
    }

    /// Read the messages of one topic.
    pub fn read_topic(&self, topic: &str) -> TopicIter<'_> {
        self.read_topics(&[topic])
    }

    /// Read the messages of a topic set, in file, chunk and index order.
    ///
    /// Topics not present in the catalog select nothing. Each call reads
    /// from disk again.
    pub fn read_topics<S: AsRef<str>>(&self, topics: &[S]) -> TopicIter<'_> {
        let topics = topics.iter().map(|t| t.as_ref().to_string()).collect();
        TopicIter::new(&self.files, Arc::clone(&self.registry), topics)
    }

    /// Read each topic on its own rayon task.
    ///
    /// Returns one message list per topic, in the order the topics were given.
    pub fn read_topics_par<S: AsRef<str> + Sync>(&self, topics: &[S]) -> Result<Vec<Vec<RosMessage>>> {
        topics
            .par_iter()
            .map(|topic| self.read_topic(topic.as_ref()).collect::<Result<Vec<_>>>())
            .collect()
    }

    /// Whether a chunk holds messages of any wanted connection.
    pub fn is_chunk_relevant(entry: &ChunkIndexEntry, wanted: &BTreeSet<i32>) -> bool {
        entry.is_relevant(wanted)
    }
}
