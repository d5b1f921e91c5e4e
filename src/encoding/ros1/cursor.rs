// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Bounds-checked little-endian cursor over a ROS1 message payload.
//!
//! ROS1 serialization has no alignment or encapsulation header: values are
//! packed back to back, strings and `T[]` arrays carry a u32 length prefix.

use byteorder::{ByteOrder, LittleEndian};

use crate::core::{BagError, Result, RosDuration, RosHeader, RosTime};

/// Read position over a payload slice.
///
/// Every read checks the remaining length first and fails with
/// `TruncatedRecord` instead of reading past the end.
#[derive(Debug, Clone)]
pub struct Ros1Cursor<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> Ros1Cursor<'a> {
    /// Create a cursor at the start of `data`.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, offset: 0 }
    }

    /// Create a cursor at `offset` into `data`.
    pub fn with_offset(data: &'a [u8], offset: usize) -> Result<Self> {
        if offset > data.len() {
            return Err(BagError::truncated(offset, data.len(), 0));
        }
        Ok(Self { data, offset })
    }

    /// Current read position.
    #[inline]
    pub fn position(&self) -> usize {
        self.offset
    }

    /// Bytes left to read.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.data.len() - self.offset
    }

    /// Take the next `n` bytes.
    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8]> {
        if n > self.remaining() {
            return Err(BagError::truncated(n, self.remaining(), self.offset as u64));
        }
        let bytes = &self.data[self.offset..self.offset + n];
        self.offset += n;
        Ok(bytes)
    }

    /// Advance past `n` bytes.
    pub fn skip(&mut self, n: usize) -> Result<()> {
        self.read_bytes(n).map(|_| ())
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.read_bytes(1)?[0])
    }

    pub fn read_i8(&mut self) -> Result<i8> {
        Ok(self.read_u8()? as i8)
    }

    /// Any non-zero byte is `true`.
    pub fn read_bool(&mut self) -> Result<bool> {
        Ok(self.read_u8()? != 0)
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        Ok(LittleEndian::read_u16(self.read_bytes(2)?))
    }

    pub fn read_i16(&mut self) -> Result<i16> {
        Ok(LittleEndian::read_i16(self.read_bytes(2)?))
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        Ok(LittleEndian::read_u32(self.read_bytes(4)?))
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        Ok(LittleEndian::read_i32(self.read_bytes(4)?))
    }

    pub fn read_u64(&mut self) -> Result<u64> {
        Ok(LittleEndian::read_u64(self.read_bytes(8)?))
    }

    pub fn read_i64(&mut self) -> Result<i64> {
        Ok(LittleEndian::read_i64(self.read_bytes(8)?))
    }

    pub fn read_f32(&mut self) -> Result<f32> {
        Ok(LittleEndian::read_f32(self.read_bytes(4)?))
    }

    pub fn read_f64(&mut self) -> Result<f64> {
        Ok(LittleEndian::read_f64(self.read_bytes(8)?))
    }

    /// Read a u32 length prefix.
    pub fn read_len(&mut self) -> Result<usize> {
        Ok(self.read_u32()? as usize)
    }

    /// Read a u32 length followed by that many UTF-8 bytes.
    pub fn read_string(&mut self) -> Result<String> {
        let start = self.offset;
        let len = self.read_len()?;
        let bytes = self.read_bytes(len)?;
        String::from_utf8(bytes.to_vec()).map_err(|e| {
            BagError::malformed_payload(format!(
                "invalid UTF-8 in string at position {start}: {e}"
            ))
        })
    }

    /// Skip a length-prefixed string without validating it.
    pub fn skip_string(&mut self) -> Result<()> {
        let len = self.read_len()?;
        self.skip(len)
    }

    pub fn read_time(&mut self) -> Result<RosTime> {
        let secs = self.read_u32()?;
        let nsecs = self.read_u32()?;
        Ok(RosTime::new(secs, nsecs))
    }

    pub fn read_duration(&mut self) -> Result<RosDuration> {
        let secs = self.read_i32()?;
        let nsecs = self.read_i32()?;
        Ok(RosDuration::new(secs, nsecs))
    }

    /// Read a built-in `header`: seq, stamp, frame_id.
    pub fn read_header(&mut self) -> Result<RosHeader> {
        let seq = self.read_u32()?;
        let stamp = self.read_time()?;
        let frame_id = self.read_string()?;
        Ok(RosHeader {
            seq,
            stamp,
            frame_id,
        })
    }
}
