// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Record header codec.
//!
//! A header is a run of `<field_len: u32><name>=<value>` segments. The name
//! ends at the first `=`; the value is raw bytes and may itself contain `=`.
//! Connection record data uses the same encoding.

use std::collections::{BTreeMap, HashMap};

use byteorder::{ByteOrder, LittleEndian};

use crate::core::{BagError, Result, RosTime};

/// Decoded `name=value` fields of one header run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordFields {
    fields: HashMap<String, Vec<u8>>,
}

impl RecordFields {
    /// Raw value of a field.
    pub fn get(&self, name: &str) -> Option<&[u8]> {
        self.fields.get(name).map(Vec::as_slice)
    }

    /// Check if a field is present.
    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Number of distinct fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if the run held no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// The record op code.
    pub fn op(&self) -> Result<u8> {
        Ok(self.fixed::<1>("op")?[0])
    }

    pub fn u32_field(&self, name: &str) -> Result<u32> {
        Ok(LittleEndian::read_u32(self.fixed::<4>(name)?))
    }

    pub fn i32_field(&self, name: &str) -> Result<i32> {
        Ok(LittleEndian::read_i32(self.fixed::<4>(name)?))
    }

    pub fn i64_field(&self, name: &str) -> Result<i64> {
        Ok(LittleEndian::read_i64(self.fixed::<8>(name)?))
    }

    pub fn u64_field(&self, name: &str) -> Result<u64> {
        Ok(LittleEndian::read_u64(self.fixed::<8>(name)?))
    }

    pub fn time_field(&self, name: &str) -> Result<RosTime> {
        let bytes = self.fixed::<8>(name)?;
        Ok(RosTime::new(
            LittleEndian::read_u32(&bytes[..4]),
            LittleEndian::read_u32(&bytes[4..]),
        ))
    }

    /// Value decoded as UTF-8, replacing invalid sequences.
    pub fn string_field(&self, name: &str) -> Result<String> {
        self.bytes_field(name)
            .map(|v| String::from_utf8_lossy(v).into_owned())
    }

    /// Like [`string_field`](Self::string_field), `None` when absent.
    pub fn opt_string(&self, name: &str) -> Option<String> {
        self.get(name)
            .map(|v| String::from_utf8_lossy(v).into_owned())
    }

    pub fn bytes_field(&self, name: &str) -> Result<&[u8]> {
        self.get(name)
            .ok_or_else(|| BagError::malformed_header(format!("missing field '{name}'")))
    }

    /// First `N` bytes of a field; longer values are accepted.
    fn fixed<const N: usize>(&self, name: &str) -> Result<&[u8]> {
        let value = self.bytes_field(name)?;
        if value.len() < N {
            return Err(BagError::malformed_header(format!(
                "field '{name}' has {} bytes, expected {N}",
                value.len()
            )));
        }
        Ok(&value[..N])
    }
}

/// Decode a header run.
///
/// Every segment needs a `=`, so a zero-length segment is malformed.
/// A repeated name keeps the last value.
pub fn parse_header(bytes: &[u8]) -> Result<RecordFields> {
    let mut fields = HashMap::new();
    let mut pos = 0usize;

    while pos < bytes.len() {
        if bytes.len() - pos < 4 {
            return Err(BagError::malformed_header(format!(
                "partial field length at byte {pos} of {}",
                bytes.len()
            )));
        }
        let field_len = LittleEndian::read_u32(&bytes[pos..pos + 4]) as usize;
        pos += 4;

        if field_len > bytes.len() - pos {
            return Err(BagError::malformed_header(format!(
                "field of {field_len} bytes at byte {} overruns header of {}",
                pos - 4,
                bytes.len()
            )));
        }

        let segment = &bytes[pos..pos + field_len];
        pos += field_len;

        let eq = segment.iter().position(|&b| b == b'=').ok_or_else(|| {
            BagError::malformed_header(format!(
                "field without '=': {:?}",
                String::from_utf8_lossy(segment)
            ))
        })?;
        let name = String::from_utf8_lossy(&segment[..eq]).into_owned();
        fields.insert(name, segment[eq + 1..].to_vec());
    }

    Ok(RecordFields { fields })
}

/// Encode fields as a header run, in name order.
pub fn encode_header(fields: &BTreeMap<String, Vec<u8>>) -> Vec<u8> {
    let mut out = Vec::new();
    for (name, value) in fields {
        let len = (name.len() + 1 + value.len()) as u32;
        out.extend_from_slice(&len.to_le_bytes());
        out.extend_from_slice(name.as_bytes());
        out.push(b'=');
        out.extend_from_slice(value);
    }
    out
}
