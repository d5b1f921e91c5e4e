// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! BAG format implementation.
//!
//! This module provides a ROS1 bag v2.0 reader:
//! - Record header codec shared by record headers and connection data
//! - Framed record access over a mutex-guarded stream
//! - Catalog parsing of connections and chunk infos
//! - Index-driven topic reading

// Header codec
pub mod header;

// Catalog parser
pub mod parser;

// Topic reader
pub mod reader;

// Framed record access
pub mod record;

// Re-exports
pub use header::{encode_header, parse_header, RecordFields};
pub use parser::{BagFile, BagHeader, ChunkIndexEntry, Connection, BAG_MAGIC};
pub use reader::TopicIter;
pub use record::{GuardedStream, RecordFrame};
