// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! # Robobag
//!
//! Reader for ROS1 bag v2.0 recordings with a runtime message type system.
//!
//! A bag is a log of framed records: connections that declare a topic and
//! its message type (including the full `.msg` definition text), chunks of
//! message records, and per-chunk index records locating each message.
//! This library catalogs one or more bags, parses every declared message
//! definition into a shared registry, and decodes the messages of chosen
//! topics into [`DecodedValue`] trees.
//!
//! ## Architecture
//!
//! - `core/` - Errors, decoded values, ROS time types, the message view
//! - `schema/` - `.msg` definition parsing (pest), registry and static layouts
//! - `encoding/` - ROS1 payload cursor and definition-driven decoder
//! - `io/formats/bag/` - Record codec, catalog parser and topic reader
//! - `io/` - Topic filtering and the multi-file [`BagSet`]
//!
//! ## Example: Reading a topic
//!
//! ```rust,no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use robobag::BagSet;
//!
//! let bags = BagSet::open(["recording_0.bag", "recording_1.bag"])?;
//! for message in bags.read_topic("/odom") {
//!     let message = message?;
//!     let pose = message.get_field_as_submessage("pose")?;
//!     println!("{} {:?}", message.time(), pose.field_names());
//! }
//! # Ok(())
//! # }
//! ```

// Core types
pub mod core;

// Re-export core types for convenience
pub use core::{BagError, DecodedValue, FieldMap, Result, RosDuration, RosHeader, RosMessage, RosTime};

// Payload decoding
pub mod encoding;

// Schema parsing
pub mod schema;

// I/O types (bag format, filtering, multi-file catalog)
pub mod io;

// Re-export key I/O types
pub use io::formats::bag::{BagFile, ChunkIndexEntry, Connection, TopicIter};
pub use io::{BagLoader, BagSet, LoadConfig, TopicFilter, TopicInfo};
pub use schema::{DefinitionRegistry, MessageDefinition};
