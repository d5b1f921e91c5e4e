// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Common utilities for integration tests.
//!
//! [`BagBuilder`] writes small uncompressed v2.0 bags laid out the way
//! `rosbag` writes them: 4096-byte padded file header, chunks followed by
//! their index records, then connection and chunk info records.

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use robobag::io::formats::bag::encode_header;
use robobag::RosTime;

const OP_MSG_DATA: u8 = 0x02;
const OP_BAG_HEADER: u8 = 0x03;
const OP_INDEX_DATA: u8 = 0x04;
const OP_CHUNK: u8 = 0x05;
const OP_CHUNK_INFO: u8 = 0x06;
const OP_CONNECTION: u8 = 0x07;

pub const STRING_DEFINITION: &str = "string data\n";

pub const SEPARATOR: &str =
    "================================================================================";

// ============================================================================
// Temporary directories
// ============================================================================

/// Per-test scratch directory, removed on drop.
pub struct TestDir {
    path: PathBuf,
}

impl TestDir {
    pub fn new(name: &str) -> Self {
        let path = std::env::temp_dir().join(format!("robobag_{}_{}", std::process::id(), name));
        let _ = std::fs::remove_dir_all(&path);
        std::fs::create_dir_all(&path).expect("create test dir");
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn join(&self, name: &str) -> PathBuf {
        self.path.join(name)
    }
}

impl Drop for TestDir {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.path);
    }
}

// ============================================================================
// Payload helpers
// ============================================================================

/// ROS1 encoding of a `string`.
pub fn string_payload(s: &str) -> Vec<u8> {
    let mut out = (s.len() as u32).to_le_bytes().to_vec();
    out.extend_from_slice(s.as_bytes());
    out
}

/// ROS1 encoding of a `std_msgs/Header`.
pub fn header_payload(seq: u32, stamp: RosTime, frame_id: &str) -> Vec<u8> {
    let mut out = seq.to_le_bytes().to_vec();
    out.extend_from_slice(&stamp.to_le_bytes());
    out.extend(string_payload(frame_id));
    out
}

// ============================================================================
// Bag builder
// ============================================================================

/// One connection record.
#[derive(Debug, Clone)]
pub struct ConnSpec {
    pub id: u32,
    pub topic: String,
    pub data_topic: Option<String>,
    pub type_name: String,
    pub definition: String,
    pub callerid: Option<String>,
    pub latching: Option<bool>,
}

impl ConnSpec {
    pub fn new(id: u32, topic: &str, type_name: &str, definition: &str) -> Self {
        Self {
            id,
            topic: topic.to_string(),
            data_topic: None,
            type_name: type_name.to_string(),
            definition: definition.to_string(),
            callerid: None,
            latching: None,
        }
    }

    pub fn callerid(mut self, callerid: &str) -> Self {
        self.callerid = Some(callerid.to_string());
        self
    }

    pub fn latching(mut self, latching: bool) -> Self {
        self.latching = Some(latching);
        self
    }

    pub fn data_topic(mut self, topic: &str) -> Self {
        self.data_topic = Some(topic.to_string());
        self
    }
}

/// A message to place in a chunk.
#[derive(Debug, Clone)]
pub struct MsgSpec {
    pub conn: u32,
    pub time: RosTime,
    pub payload: Vec<u8>,
}

/// Builder for uncompressed v2.0 bags.
#[derive(Debug, Clone)]
pub struct BagBuilder {
    connections: Vec<ConnSpec>,
    chunks: Vec<Vec<MsgSpec>>,
    compression: String,
    trailing_op: Option<u8>,
    chunk_pos_at_index: bool,
    index_at_chunk_start: bool,
}

impl Default for BagBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl BagBuilder {
    pub fn new() -> Self {
        Self {
            connections: Vec::new(),
            chunks: Vec::new(),
            compression: "none".to_string(),
            trailing_op: None,
            chunk_pos_at_index: false,
            index_at_chunk_start: false,
        }
    }

    pub fn connection(mut self, spec: ConnSpec) -> Self {
        self.connections.push(spec);
        self
    }

    /// Add a chunk of `(conn, time, payload)` messages in write order.
    pub fn chunk(mut self, messages: Vec<(u32, RosTime, Vec<u8>)>) -> Self {
        self.chunks.push(
            messages
                .into_iter()
                .map(|(conn, time, payload)| MsgSpec {
                    conn,
                    time,
                    payload,
                })
                .collect(),
        );
        self
    }

    /// Compression name written into every chunk header.
    pub fn compression(mut self, compression: &str) -> Self {
        self.compression = compression.to_string();
        self
    }

    /// Append a record with this op after the index section.
    pub fn trailing_record(mut self, op: u8) -> Self {
        self.trailing_op = Some(op);
        self
    }

    /// Write `index_pos` as every chunk info's `chunk_pos`, which lands on a
    /// connection record.
    pub fn chunk_pos_at_index(mut self) -> Self {
        self.chunk_pos_at_index = true;
        self
    }

    /// Point every index entry at offset 0 of the chunk data, where the
    /// chunk's first connection record sits.
    pub fn index_at_chunk_start(mut self) -> Self {
        self.index_at_chunk_start = true;
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut body = Vec::new();
        let mut chunk_infos = Vec::new();
        let body_start = 4096u64;

        for messages in &self.chunks {
            let chunk_pos = body_start + body.len() as u64;

            let mut chunk_data = Vec::new();
            let mut indexes: BTreeMap<u32, Vec<(RosTime, u32)>> = BTreeMap::new();
            let mut written_conns = Vec::new();
            for msg in messages {
                if !written_conns.contains(&msg.conn) {
                    if let Some(conn) = self.connections.iter().find(|c| c.id == msg.conn) {
                        write_connection(&mut chunk_data, conn);
                    }
                    written_conns.push(msg.conn);
                }
                let offset = if self.index_at_chunk_start {
                    0
                } else {
                    chunk_data.len() as u32
                };
                let mut fields = BTreeMap::new();
                fields.insert("op".to_string(), vec![OP_MSG_DATA]);
                fields.insert("conn".to_string(), msg.conn.to_le_bytes().to_vec());
                fields.insert("time".to_string(), msg.time.to_le_bytes().to_vec());
                write_record(&mut chunk_data, &fields, &msg.payload);
                indexes.entry(msg.conn).or_default().push((msg.time, offset));
            }

            let mut fields = BTreeMap::new();
            fields.insert("op".to_string(), vec![OP_CHUNK]);
            fields.insert("compression".to_string(), self.compression.as_bytes().to_vec());
            fields.insert("size".to_string(), (chunk_data.len() as u32).to_le_bytes().to_vec());
            write_record(&mut body, &fields, &chunk_data);

            for (conn, entries) in &indexes {
                let mut fields = BTreeMap::new();
                fields.insert("op".to_string(), vec![OP_INDEX_DATA]);
                fields.insert("conn".to_string(), conn.to_le_bytes().to_vec());
                fields.insert("ver".to_string(), 1u32.to_le_bytes().to_vec());
                fields.insert("count".to_string(), (entries.len() as u32).to_le_bytes().to_vec());
                let mut data = Vec::new();
                for (time, offset) in entries {
                    data.extend_from_slice(&time.to_le_bytes());
                    data.extend_from_slice(&offset.to_le_bytes());
                }
                write_record(&mut body, &fields, &data);
            }

            let start = messages.iter().map(|m| m.time).min().unwrap_or_default();
            let end = messages.iter().map(|m| m.time).max().unwrap_or_default();
            let counts: Vec<(u32, u32)> = indexes
                .iter()
                .map(|(conn, entries)| (*conn, entries.len() as u32))
                .collect();
            chunk_infos.push((chunk_pos, start, end, counts));
        }

        let index_pos = body_start + body.len() as u64;
        for conn in &self.connections {
            write_connection(&mut body, conn);
        }
        for (chunk_pos, start, end, counts) in &chunk_infos {
            let chunk_pos = if self.chunk_pos_at_index {
                &index_pos
            } else {
                chunk_pos
            };
            let mut fields = BTreeMap::new();
            fields.insert("op".to_string(), vec![OP_CHUNK_INFO]);
            fields.insert("ver".to_string(), 1u32.to_le_bytes().to_vec());
            fields.insert("chunk_pos".to_string(), chunk_pos.to_le_bytes().to_vec());
            fields.insert("start_time".to_string(), start.to_le_bytes().to_vec());
            fields.insert("end_time".to_string(), end.to_le_bytes().to_vec());
            fields.insert("count".to_string(), (counts.len() as u32).to_le_bytes().to_vec());
            let mut data = Vec::new();
            for (conn, count) in counts {
                data.extend_from_slice(&conn.to_le_bytes());
                data.extend_from_slice(&count.to_le_bytes());
            }
            write_record(&mut body, &fields, &data);
        }
        if let Some(op) = self.trailing_op {
            let mut fields = BTreeMap::new();
            fields.insert("op".to_string(), vec![op]);
            write_record(&mut body, &fields, &[]);
        }

        let mut out = file_header(
            index_pos,
            self.connections.len() as u32,
            self.chunks.len() as u32,
        );
        out.extend(body);
        out
    }

    /// Write the bag to `path`.
    pub fn write(&self, path: &Path) -> PathBuf {
        std::fs::write(path, self.build()).expect("write bag");
        path.to_path_buf()
    }
}

fn write_record(buffer: &mut Vec<u8>, fields: &BTreeMap<String, Vec<u8>>, data: &[u8]) {
    let header = encode_header(fields);
    buffer.extend_from_slice(&(header.len() as u32).to_le_bytes());
    buffer.extend(header);
    buffer.extend_from_slice(&(data.len() as u32).to_le_bytes());
    buffer.extend_from_slice(data);
}

fn write_connection(buffer: &mut Vec<u8>, conn: &ConnSpec) {
    let mut fields = BTreeMap::new();
    fields.insert("op".to_string(), vec![OP_CONNECTION]);
    fields.insert("conn".to_string(), conn.id.to_le_bytes().to_vec());
    fields.insert("topic".to_string(), conn.topic.as_bytes().to_vec());

    let mut data_fields = BTreeMap::new();
    data_fields.insert("type".to_string(), conn.type_name.as_bytes().to_vec());
    data_fields.insert("md5sum".to_string(), b"0123456789abcdef0123456789abcdef".to_vec());
    data_fields.insert(
        "message_definition".to_string(),
        conn.definition.as_bytes().to_vec(),
    );
    if let Some(topic) = &conn.data_topic {
        data_fields.insert("topic".to_string(), topic.as_bytes().to_vec());
    }
    if let Some(callerid) = &conn.callerid {
        data_fields.insert("callerid".to_string(), callerid.as_bytes().to_vec());
    }
    if let Some(latching) = conn.latching {
        data_fields.insert(
            "latching".to_string(),
            if latching { b"1".to_vec() } else { b"0".to_vec() },
        );
    }

    write_record(buffer, &fields, &encode_header(&data_fields));
}

/// Magic plus bag header record, padded with spaces to 4096 bytes.
fn file_header(index_pos: u64, conn_count: u32, chunk_count: u32) -> Vec<u8> {
    let mut buffer = b"#ROSBAG V2.0\n".to_vec();

    let mut fields = BTreeMap::new();
    fields.insert("op".to_string(), vec![OP_BAG_HEADER]);
    fields.insert("index_pos".to_string(), index_pos.to_le_bytes().to_vec());
    fields.insert("conn_count".to_string(), conn_count.to_le_bytes().to_vec());
    fields.insert("chunk_count".to_string(), chunk_count.to_le_bytes().to_vec());
    let header = encode_header(&fields);

    let used = buffer.len() + 4 + header.len() + 4;
    let padding = vec![b' '; 4096 - used];
    write_record(&mut buffer, &fields, &padding);
    buffer
}

// ============================================================================
// Scenario fixtures
// ============================================================================

/// `a.bag` with Text0..Text2 and `b.bag` with Text3..Text4 on `/text`.
pub fn write_text_recording(dir: &TestDir) -> (PathBuf, PathBuf) {
    let text = |i: u32| string_payload(&format!("Text{i}"));

    let a = BagBuilder::new()
        .connection(ConnSpec::new(0, "/text", "std_msgs/String", STRING_DEFINITION))
        .chunk(vec![
            (0, RosTime::new(100, 0), text(0)),
            (0, RosTime::new(101, 0), text(1)),
        ])
        .chunk(vec![(0, RosTime::new(102, 0), text(2))])
        .write(&dir.join("a.bag"));

    let b = BagBuilder::new()
        .connection(ConnSpec::new(0, "/text", "std_msgs/String", STRING_DEFINITION))
        .chunk(vec![
            (0, RosTime::new(103, 0), text(3)),
            (0, RosTime::new(104, 500), text(4)),
        ])
        .write(&dir.join("b.bag"));

    (a, b)
}
