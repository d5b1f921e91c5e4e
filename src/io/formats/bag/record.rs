// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Framed record access over a shared stream.
//!
//! Every record is `<header_len: u32><header><data_len: u32><data>`. Reads
//! position the stream and read under one lock acquisition, so concurrent
//! readers of the same file never interleave a seek with another reader's
//! read.

use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use byteorder::{LittleEndian, ReadBytesExt};

use crate::core::{BagError, Result};

use super::header::{parse_header, RecordFields};

/// Stream type used for bag files on disk.
pub type FileStream = BufReader<File>;

/// A record's decoded header and the location of its data.
#[derive(Debug, Clone)]
pub struct RecordFrame {
    /// File offset of the record's `header_len`
    pub offset: u64,
    /// Decoded header fields
    pub fields: RecordFields,
    /// File offset of the first data byte
    pub data_offset: u64,
    /// Data length in bytes
    pub data_len: u32,
}

impl RecordFrame {
    /// File offset just past this record.
    pub fn next_offset(&self) -> u64 {
        self.data_offset + u64::from(self.data_len)
    }
}

/// Seekable stream behind a mutex, with its length captured at open.
#[derive(Debug)]
pub struct GuardedStream<R> {
    inner: Mutex<R>,
    len: u64,
}

impl GuardedStream<FileStream> {
    /// Open a file for record access.
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .map_err(|e| BagError::io(format!("opening {}", path.display()), e))?;
        let len = file
            .metadata()
            .map_err(|e| BagError::io(format!("reading metadata of {}", path.display()), e))?
            .len();
        Ok(Self {
            inner: Mutex::new(BufReader::new(file)),
            len,
        })
    }
}

impl<R: Read + Seek> GuardedStream<R> {
    /// Wrap a seekable reader, measuring its length.
    pub fn new(mut reader: R) -> Result<Self> {
        let len = reader
            .seek(SeekFrom::End(0))
            .map_err(|e| BagError::io("measuring stream", e))?;
        Ok(Self {
            inner: Mutex::new(reader),
            len,
        })
    }

    /// Stream length in bytes.
    pub fn len(&self) -> u64 {
        self.len
    }

    /// Check if the stream is empty.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn lock(&self) -> Result<MutexGuard<'_, R>> {
        self.inner.lock().map_err(|_| BagError::Io {
            context: "stream lock".to_string(),
            message: "lock poisoned by a panicked reader".to_string(),
        })
    }

    fn check_bounds(&self, offset: u64, len: u64) -> Result<()> {
        let available = self.len.saturating_sub(offset);
        if len > available {
            return Err(BagError::truncated(len as usize, available as usize, offset));
        }
        Ok(())
    }

    /// Read `len` bytes at `offset`.
    pub fn read_at(&self, offset: u64, len: usize) -> Result<Vec<u8>> {
        self.check_bounds(offset, len as u64)?;
        let mut stream = self.lock()?;
        stream
            .seek(SeekFrom::Start(offset))
            .map_err(|e| BagError::io("seeking record", e))?;
        let mut buf = vec![0u8; len];
        stream
            .read_exact(&mut buf)
            .map_err(|e| BagError::io("reading record", e))?;
        Ok(buf)
    }

    /// Read the header of the record at `offset` and locate its data.
    pub fn read_record(&self, offset: u64) -> Result<RecordFrame> {
        self.check_bounds(offset, 4)?;
        let mut stream = self.lock()?;
        stream
            .seek(SeekFrom::Start(offset))
            .map_err(|e| BagError::io("seeking record", e))?;

        let header_len = stream
            .read_u32::<LittleEndian>()
            .map_err(|e| BagError::io("reading header length", e))?;
        let header_offset = offset + 4;
        self.check_bounds(header_offset, u64::from(header_len) + 4)?;

        let mut header = vec![0u8; header_len as usize];
        stream
            .read_exact(&mut header)
            .map_err(|e| BagError::io("reading record header", e))?;
        let data_len = stream
            .read_u32::<LittleEndian>()
            .map_err(|e| BagError::io("reading data length", e))?;
        drop(stream);

        let data_offset = header_offset + u64::from(header_len) + 4;
        self.check_bounds(data_offset, u64::from(data_len))?;

        Ok(RecordFrame {
            offset,
            fields: parse_header(&header)?,
            data_offset,
            data_len,
        })
    }

    /// Read the data of a frame.
    pub fn read_data(&self, frame: &RecordFrame) -> Result<Vec<u8>> {
        self.read_at(frame.data_offset, frame.data_len as usize)
    }
}
