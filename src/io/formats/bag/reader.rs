// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Lazy topic reader over cataloged bag files.
//!
//! Messages are located through the index records that follow each chunk,
//! never by scanning chunk bodies: for every relevant chunk the reader reads
//! the chunk framing, then the per-connection index records, then each
//! indexed message record by offset.

use std::collections::{BTreeSet, VecDeque};
use std::io::Cursor;
use std::sync::Arc;

use byteorder::{LittleEndian, ReadBytesExt};
use tracing::trace;

use crate::core::{BagError, Result, RosMessage, RosTime};
use crate::encoding::ros1::decode_message;
use crate::schema::DefinitionRegistry;

use super::parser::{BagFile, ChunkIndexEntry, OP_CHUNK, OP_INDEX_DATA, OP_MSG_DATA};

/// Bytes per index entry: time (8) + offset (4).
const INDEX_ENTRY_LEN: usize = 12;

/// One message located by an index record.
#[derive(Debug, Clone, Copy)]
struct IndexedMessage {
    time: RosTime,
    offset: u32,
}

/// Iterator over the messages of a topic set, in file, chunk and index order.
///
/// Reads from disk as it advances. The first error ends the iteration.
pub struct TopicIter<'a> {
    files: &'a [BagFile],
    registry: Arc<DefinitionRegistry>,
    topics: Vec<String>,
    file_idx: usize,
    chunk_idx: usize,
    wanted: BTreeSet<i32>,
    chunk_data_offset: u64,
    pending: VecDeque<IndexedMessage>,
    done: bool,
}

impl<'a> TopicIter<'a> {
    /// Create an iterator over `topics` in `files`.
    pub fn new(files: &'a [BagFile], registry: Arc<DefinitionRegistry>, topics: Vec<String>) -> Self {
        let wanted = files
            .first()
            .map(|f| f.connection_ids_for(&topics))
            .unwrap_or_default();
        Self {
            files,
            registry,
            topics,
            file_idx: 0,
            chunk_idx: 0,
            wanted,
            chunk_data_offset: 0,
            pending: VecDeque::new(),
            done: false,
        }
    }

    /// Topics this iterator reads.
    pub fn topics(&self) -> &[String] {
        &self.topics
    }

    /// Load the next relevant chunk's index entries. Returns `false` when no chunks remain.
    fn advance_chunk(&mut self) -> Result<bool> {
        while let Some(file) = self.files.get(self.file_idx) {
            if let Some(chunk) = file.chunks().get(self.chunk_idx) {
                self.chunk_idx += 1;
                if !chunk.is_relevant(&self.wanted) {
                    continue;
                }
                self.load_chunk(file, chunk)?;
                if !self.pending.is_empty() {
                    return Ok(true);
                }
            } else {
                self.file_idx += 1;
                self.chunk_idx = 0;
                self.wanted = self
                    .files
                    .get(self.file_idx)
                    .map(|f| f.connection_ids_for(&self.topics))
                    .unwrap_or_default();
            }
        }
        Ok(false)
    }

    fn load_chunk(&mut self, file: &BagFile, chunk: &ChunkIndexEntry) -> Result<()> {
        let stream = file.stream();
        let offset = u64::try_from(chunk.file_offset).map_err(|_| {
            BagError::malformed_header(format!("negative chunk offset {}", chunk.file_offset))
        })?;

        let frame = stream.read_record(offset)?;
        let op = frame.fields.op()?;
        if op != OP_CHUNK {
            return Err(BagError::ExpectedChunkRecord { op, offset });
        }
        let compression = frame
            .fields
            .opt_string("compression")
            .unwrap_or_else(|| "none".to_string());
        if compression != "none" {
            return Err(BagError::unsupported(format!("{compression} compressed chunk")));
        }
        self.chunk_data_offset = frame.data_offset;

        let mut index_offset = frame.next_offset();
        for _ in 0..chunk.message_count_by_connection.len() {
            let index = stream.read_record(index_offset)?;
            let op = index.fields.op()?;
            if op != OP_INDEX_DATA {
                return Err(BagError::UnknownRecordType {
                    op,
                    offset: index_offset,
                });
            }
            index_offset = index.next_offset();

            let conn = index.fields.i32_field("conn")?;
            if !self.wanted.contains(&conn) {
                continue;
            }
            let count = index.fields.u32_field("count")? as usize;
            let data = stream.read_data(&index)?;
            let needed = count.saturating_mul(INDEX_ENTRY_LEN);
            if data.len() < needed {
                return Err(BagError::truncated(needed, data.len(), index.data_offset));
            }

            let mut cursor = Cursor::new(data.as_slice());
            for _ in 0..count {
                let secs = cursor.read_u32::<LittleEndian>()?;
                let nsecs = cursor.read_u32::<LittleEndian>()?;
                let offset = cursor.read_u32::<LittleEndian>()?;
                self.pending.push_back(IndexedMessage {
                    time: RosTime::new(secs, nsecs),
                    offset,
                });
            }
        }

        trace!(
            path = %file.path().display(),
            chunk_offset = offset,
            messages = self.pending.len(),
            "loaded chunk index"
        );
        Ok(())
    }

    fn read_message(&self, indexed: IndexedMessage) -> Result<RosMessage> {
        let file = &self.files[self.file_idx];
        let offset = self.chunk_data_offset + u64::from(indexed.offset);
        let frame = file.stream().read_record(offset)?;
        let op = frame.fields.op()?;
        if op != OP_MSG_DATA {
            return Err(BagError::UnknownRecordType { op, offset });
        }

        let conn = frame.fields.i32_field("conn")?;
        let connection = file.connection(conn).ok_or_else(|| {
            BagError::malformed_header(format!("message at {offset} references unknown connection {conn}"))
        })?;
        let time = if frame.fields.contains("time") {
            frame.fields.time_field("time")?
        } else {
            indexed.time
        };

        let data = file.stream().read_data(&frame)?;
        let fields = decode_message(&self.registry, &connection.definition, &data)?;
        Ok(RosMessage::new(
            Arc::clone(&connection.definition),
            Arc::clone(&self.registry),
            time,
            conn,
            fields,
        ))
    }
}

impl Iterator for TopicIter<'_> {
    type Item = Result<RosMessage>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        if self.pending.is_empty() {
            match self.advance_chunk() {
                Ok(true) => {}
                Ok(false) => {
                    self.done = true;
                    return None;
                }
                Err(e) => {
                    self.done = true;
                    return Some(Err(e));
                }
            }
        }

        let indexed = self.pending.pop_front()?;
        let result = self.read_message(indexed);
        if result.is_err() {
            self.done = true;
        }
        Some(result)
    }
}

impl std::iter::FusedIterator for TopicIter<'_> {}
