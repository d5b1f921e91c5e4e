// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! ROS1 bag catalog parser.
//!
//! Opening a bag reads only its metadata:
//! 1. The 13-byte magic
//! 2. The bag header record at offset 13, which locates the index section
//! 3. Every record from `index_pos` to end of file: connections and chunk infos
//!
//! Chunk bodies are not touched until a topic is read.
//!
//! # BAG Format Structure (Version 2.0)
//!
//! ## Record Format
//! All records follow: `<header_len: u32><header><data_len: u32><data>`
//! where header contains `<field_len: u32><field_name>=<field_value>` pairs
//!
//! ## Op Codes
//! - 0x02: Message data
//! - 0x03: Bag header
//! - 0x04: Index data
//! - 0x05: Chunk
//! - 0x06: Chunk info
//! - 0x07: Connection

use std::collections::{BTreeMap, BTreeSet};
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use byteorder::{LittleEndian, ReadBytesExt};
use tracing::{debug, warn};

use crate::core::{BagError, Result, RosTime};
use crate::schema::{DefinitionRegistry, MessageDefinition};

use super::header::parse_header;
use super::record::{FileStream, GuardedStream, RecordFrame};

/// Magic bytes at the start of every v2.0 bag.
pub const BAG_MAGIC: &[u8; 13] = b"#ROSBAG V2.0\n";

/// BAG op codes
pub const OP_MSG_DATA: u8 = 0x02;
pub const OP_BAG_HEADER: u8 = 0x03;
pub const OP_INDEX_DATA: u8 = 0x04;
pub const OP_CHUNK: u8 = 0x05;
pub const OP_CHUNK_INFO: u8 = 0x06;
pub const OP_CONNECTION: u8 = 0x07;

/// BAG file header information.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BagHeader {
    /// Position of index section in file
    pub index_pos: u64,
    /// Number of connections in the file
    pub conn_count: u32,
    /// Number of chunks in the file
    pub chunk_count: u32,
}

/// One recorded (id, topic, type) pairing.
#[derive(Debug, Clone)]
pub struct Connection {
    /// Connection id, unique within its file
    pub id: i32,
    /// Topic name
    pub topic: String,
    /// Topic from the record header, which may differ from `topic`
    pub stored_topic: String,
    /// Declared message type (e.g. `std_msgs/String`)
    pub declared_type: String,
    /// MD5 sum of the message definition
    pub md5: String,
    /// Full `message_definition` text
    pub definition_text: String,
    /// Publishing node
    pub caller_id: Option<String>,
    /// Whether the publisher was latched
    pub latching: Option<bool>,
    /// Interned definition of `declared_type`
    pub definition: Arc<MessageDefinition>,
}

/// Location and contents summary of one chunk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkIndexEntry {
    /// File offset of the chunk record
    pub file_offset: i64,
    /// Earliest message time in the chunk
    pub start_time: RosTime,
    /// Latest message time in the chunk
    pub end_time: RosTime,
    /// Messages per connection id
    pub message_count_by_connection: BTreeMap<i32, i32>,
}

impl ChunkIndexEntry {
    /// Total messages in the chunk.
    pub fn total_messages(&self) -> u64 {
        self.message_count_by_connection
            .values()
            .map(|&c| u64::from(c.max(0) as u32))
            .sum()
    }

    /// Whether the chunk holds messages of any wanted connection.
    pub fn is_relevant(&self, wanted: &BTreeSet<i32>) -> bool {
        self.message_count_by_connection
            .keys()
            .any(|id| wanted.contains(id))
    }
}

/// Catalog of one opened bag file.
#[derive(Debug)]
pub struct BagFile {
    path: PathBuf,
    stream: Arc<GuardedStream<FileStream>>,
    header: BagHeader,
    connections: BTreeMap<i32, Connection>,
    chunks: Vec<ChunkIndexEntry>,
}

impl BagFile {
    /// Open a bag and read its catalog, interning connection types into `registry`.
    pub fn open(path: impl AsRef<Path>, registry: &DefinitionRegistry) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let stream = Arc::new(GuardedStream::open(&path)?);

        let magic_len = stream.len().min(BAG_MAGIC.len() as u64) as usize;
        let magic = stream.read_at(0, magic_len)?;
        if magic.as_slice() != BAG_MAGIC {
            return Err(BagError::unsupported_version(&magic));
        }

        let header = Self::read_bag_header(&stream)?;

        let mut file = Self {
            path,
            stream,
            header,
            connections: BTreeMap::new(),
            chunks: Vec::new(),
        };
        file.read_index_section(registry)?;

        if file.connections.len() != header.conn_count as usize {
            warn!(
                path = %file.path.display(),
                expected = header.conn_count,
                found = file.connections.len(),
                "connection count differs from bag header"
            );
        }
        if file.chunks.len() != header.chunk_count as usize {
            warn!(
                path = %file.path.display(),
                expected = header.chunk_count,
                found = file.chunks.len(),
                "chunk count differs from bag header"
            );
        }
        debug!(
            path = %file.path.display(),
            connections = file.connections.len(),
            chunks = file.chunks.len(),
            index_pos = header.index_pos,
            "loaded bag catalog"
        );

        Ok(file)
    }

    fn read_bag_header(stream: &GuardedStream<FileStream>) -> Result<BagHeader> {
        let offset = BAG_MAGIC.len() as u64;
        let frame = stream.read_record(offset)?;
        let op = frame.fields.op()?;
        if op != OP_BAG_HEADER {
            return Err(BagError::UnknownRecordType { op, offset });
        }

        let header = BagHeader {
            index_pos: frame.fields.u64_field("index_pos")?,
            conn_count: frame.fields.u32_field("conn_count")?,
            chunk_count: frame.fields.u32_field("chunk_count")?,
        };
        if header.index_pos < offset || header.index_pos > stream.len() {
            return Err(BagError::malformed_header(format!(
                "index_pos {} outside file of {} bytes",
                header.index_pos,
                stream.len()
            )));
        }
        Ok(header)
    }

    /// Scan records from `index_pos` to end of file.
    fn read_index_section(&mut self, registry: &DefinitionRegistry) -> Result<()> {
        let mut offset = self.header.index_pos;
        while offset < self.stream.len() {
            let frame = self.stream.read_record(offset)?;
            match frame.fields.op()? {
                OP_CONNECTION => {
                    let connection = self.parse_connection(&frame, registry)?;
                    self.connections.insert(connection.id, connection);
                }
                OP_CHUNK_INFO => {
                    let entry = self.parse_chunk_info(&frame)?;
                    self.chunks.push(entry);
                }
                OP_CHUNK => {}
                op => return Err(BagError::UnknownRecordType { op, offset }),
            }
            offset = frame.next_offset();
        }
        Ok(())
    }

    fn parse_connection(
        &self,
        frame: &RecordFrame,
        registry: &DefinitionRegistry,
    ) -> Result<Connection> {
        let id = frame.fields.i32_field("conn")?;
        let stored_topic = frame.fields.string_field("topic")?;

        let data = parse_header(&self.stream.read_data(frame)?)?;
        let declared_type = data.string_field("type")?;
        let definition_text = data.opt_string("message_definition").unwrap_or_default();
        let latching = data
            .get("latching")
            .and_then(|v| v.first())
            .map(|&b| b == b'1' || b == 1);

        let definition = registry.register_text(&declared_type, &definition_text);

        Ok(Connection {
            id,
            topic: data.opt_string("topic").unwrap_or_else(|| stored_topic.clone()),
            stored_topic,
            md5: data.opt_string("md5sum").unwrap_or_default(),
            caller_id: data.opt_string("callerid"),
            latching,
            declared_type,
            definition_text,
            definition,
        })
    }

    fn parse_chunk_info(&self, frame: &RecordFrame) -> Result<ChunkIndexEntry> {
        let chunk_pos = frame.fields.u64_field("chunk_pos")?;
        let file_offset = i64::try_from(chunk_pos).map_err(|_| {
            BagError::malformed_header(format!("chunk_pos {chunk_pos} out of range"))
        })?;
        let start_time = frame.fields.time_field("start_time")?;
        let end_time = frame.fields.time_field("end_time")?;
        let count = frame.fields.u32_field("count")? as usize;

        let data = self.stream.read_data(frame)?;
        if data.len() < count.saturating_mul(8) {
            return Err(BagError::truncated(count * 8, data.len(), frame.data_offset));
        }

        let mut cursor = Cursor::new(data.as_slice());
        let mut message_count_by_connection = BTreeMap::new();
        for _ in 0..count {
            let conn = cursor.read_i32::<LittleEndian>()?;
            let messages = cursor.read_i32::<LittleEndian>()?;
            message_count_by_connection.insert(conn, messages);
        }

        Ok(ChunkIndexEntry {
            file_offset,
            start_time,
            end_time,
            message_count_by_connection,
        })
    }

    /// Path the bag was opened from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Bag header record.
    pub fn header(&self) -> &BagHeader {
        &self.header
    }

    /// Connections by id.
    pub fn connections(&self) -> &BTreeMap<i32, Connection> {
        &self.connections
    }

    /// Look up a connection by id.
    pub fn connection(&self, id: i32) -> Option<&Connection> {
        self.connections.get(&id)
    }

    /// Chunk index entries in file order.
    pub fn chunks(&self) -> &[ChunkIndexEntry] {
        &self.chunks
    }

    /// Shared record stream.
    pub fn stream(&self) -> &Arc<GuardedStream<FileStream>> {
        &self.stream
    }

    /// Ids of the connections recorded on any of `topics`.
    pub fn connection_ids_for<S: AsRef<str>>(&self, topics: &[S]) -> BTreeSet<i32> {
        self.connections
            .values()
            .filter(|c| topics.iter().any(|t| t.as_ref() == c.topic))
            .map(|c| c.id)
            .collect()
    }

    /// Earliest chunk start and latest chunk end.
    pub fn time_range(&self) -> Option<(RosTime, RosTime)> {
        let start = self.chunks.iter().map(|c| c.start_time).min()?;
        let end = self.chunks.iter().map(|c| c.end_time).max()?;
        Some((start, end))
    }
}
