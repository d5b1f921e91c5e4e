// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Decoded value type system.
//!
//! Every field of a decoded ROS1 message is one [`DecodedValue`]. The enum is
//! closed: consumers match exhaustively instead of casting.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use super::time::{RosDuration, RosHeader, RosTime};

/// Field name to decoded value mapping for one message.
pub type FieldMap = BTreeMap<String, DecodedValue>;

/// A decoded ROS1 field value.
///
/// Serializes untagged, so JSON output carries plain numbers, strings,
/// arrays and objects.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DecodedValue {
    // Boolean
    Bool(bool),

    // Signed integers
    Int8(i8),
    Int16(i16),
    Int32(i32),
    Int64(i64),

    // Unsigned integers
    UInt8(u8),
    UInt16(u16),
    UInt32(u32),
    UInt64(u64),

    // Floating point
    Float32(f32),
    Float64(f64),

    // Length-prefixed UTF-8
    String(String),

    // Temporal
    Time(RosTime),
    Duration(RosDuration),

    // Built-in `header`
    Header(RosHeader),

    // `T[]` and `T[N]`
    Array(Vec<DecodedValue>),

    // Nested message
    Message(FieldMap),
}

impl DecodedValue {
    // ========================================================================
    // Type Checking
    // ========================================================================

    /// Check if this value is a number.
    pub fn is_numeric(&self) -> bool {
        self.as_f64().is_some()
    }

    /// Check if this value is a nested message.
    pub fn is_message(&self) -> bool {
        matches!(self, DecodedValue::Message(_))
    }

    /// Check if this value is an array.
    pub fn is_array(&self) -> bool {
        matches!(self, DecodedValue::Array(_))
    }

    // ========================================================================
    // Type Conversion Methods
    // ========================================================================

    /// Try to convert this value to f64 (numeric values only).
    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            DecodedValue::Int8(v) => Some(f64::from(v)),
            DecodedValue::Int16(v) => Some(f64::from(v)),
            DecodedValue::Int32(v) => Some(f64::from(v)),
            DecodedValue::Int64(v) => Some(v as f64),
            DecodedValue::UInt8(v) => Some(f64::from(v)),
            DecodedValue::UInt16(v) => Some(f64::from(v)),
            DecodedValue::UInt32(v) => Some(f64::from(v)),
            DecodedValue::UInt64(v) => Some(v as f64),
            DecodedValue::Float32(v) => Some(f64::from(v)),
            DecodedValue::Float64(v) => Some(v),
            _ => None,
        }
    }

    /// Try to convert this value to i64 (integers that fit only).
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            DecodedValue::Int8(v) => Some(i64::from(v)),
            DecodedValue::Int16(v) => Some(i64::from(v)),
            DecodedValue::Int32(v) => Some(i64::from(v)),
            DecodedValue::Int64(v) => Some(v),
            DecodedValue::UInt8(v) => Some(i64::from(v)),
            DecodedValue::UInt16(v) => Some(i64::from(v)),
            DecodedValue::UInt32(v) => Some(i64::from(v)),
            DecodedValue::UInt64(v) => i64::try_from(v).ok(),
            _ => None,
        }
    }

    /// Try to convert this value to u64 (non-negative integers only).
    pub fn as_u64(&self) -> Option<u64> {
        match *self {
            DecodedValue::UInt8(v) => Some(u64::from(v)),
            DecodedValue::UInt16(v) => Some(u64::from(v)),
            DecodedValue::UInt32(v) => Some(u64::from(v)),
            DecodedValue::UInt64(v) => Some(v),
            DecodedValue::Int8(v) => u64::try_from(v).ok(),
            DecodedValue::Int16(v) => u64::try_from(v).ok(),
            DecodedValue::Int32(v) => u64::try_from(v).ok(),
            DecodedValue::Int64(v) => u64::try_from(v).ok(),
            _ => None,
        }
    }

    /// Try to get the boolean value.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            DecodedValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Try to get the inner string value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            DecodedValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get the inner time.
    pub fn as_time(&self) -> Option<RosTime> {
        match self {
            DecodedValue::Time(t) => Some(*t),
            _ => None,
        }
    }

    /// Try to get the inner duration.
    pub fn as_duration(&self) -> Option<RosDuration> {
        match self {
            DecodedValue::Duration(d) => Some(*d),
            _ => None,
        }
    }

    /// Try to get the inner header.
    pub fn as_header(&self) -> Option<&RosHeader> {
        match self {
            DecodedValue::Header(h) => Some(h),
            _ => None,
        }
    }

    /// Try to get the inner array.
    pub fn as_array(&self) -> Option<&[DecodedValue]> {
        match self {
            DecodedValue::Array(a) => Some(a),
            _ => None,
        }
    }

    /// Try to get the nested field map.
    pub fn as_message(&self) -> Option<&FieldMap> {
        match self {
            DecodedValue::Message(m) => Some(m),
            _ => None,
        }
    }

    /// Collect a `uint8[]`/`char[]` array into raw bytes.
    ///
    /// Returns `None` if this is not an array or any element is not `uint8`.
    pub fn to_bytes(&self) -> Option<Vec<u8>> {
        self.as_array()?
            .iter()
            .map(|v| match v {
                DecodedValue::UInt8(b) => Some(*b),
                _ => None,
            })
            .collect()
    }

    // ========================================================================
    // Introspection
    // ========================================================================

    /// Get the variant name of this value.
    pub fn type_name(&self) -> &'static str {
        match self {
            DecodedValue::Bool(_) => "bool",
            DecodedValue::Int8(_) => "int8",
            DecodedValue::Int16(_) => "int16",
            DecodedValue::Int32(_) => "int32",
            DecodedValue::Int64(_) => "int64",
            DecodedValue::UInt8(_) => "uint8",
            DecodedValue::UInt16(_) => "uint16",
            DecodedValue::UInt32(_) => "uint32",
            DecodedValue::UInt64(_) => "uint64",
            DecodedValue::Float32(_) => "float32",
            DecodedValue::Float64(_) => "float64",
            DecodedValue::String(_) => "string",
            DecodedValue::Time(_) => "time",
            DecodedValue::Duration(_) => "duration",
            DecodedValue::Header(_) => "header",
            DecodedValue::Array(_) => "array",
            DecodedValue::Message(_) => "message",
        }
    }
}

impl fmt::Display for DecodedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodedValue::Bool(v) => write!(f, "{v}"),
            DecodedValue::Int8(v) => write!(f, "{v}"),
            DecodedValue::Int16(v) => write!(f, "{v}"),
            DecodedValue::Int32(v) => write!(f, "{v}"),
            DecodedValue::Int64(v) => write!(f, "{v}"),
            DecodedValue::UInt8(v) => write!(f, "{v}"),
            DecodedValue::UInt16(v) => write!(f, "{v}"),
            DecodedValue::UInt32(v) => write!(f, "{v}"),
            DecodedValue::UInt64(v) => write!(f, "{v}"),
            DecodedValue::Float32(v) => write!(f, "{v}"),
            DecodedValue::Float64(v) => write!(f, "{v}"),
            DecodedValue::String(v) => write!(f, "\"{v}\""),
            DecodedValue::Time(t) => write!(f, "{t}"),
            DecodedValue::Duration(d) => write!(f, "{d}"),
            DecodedValue::Header(h) => write!(f, "Header(seq={}, stamp={}, frame_id=\"{}\")", h.seq, h.stamp, h.frame_id),
            DecodedValue::Array(v) => write!(f, "[{} elements]", v.len()),
            DecodedValue::Message(v) => write!(f, "{{{} fields}}", v.len()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_conversions() {
        assert_eq!(DecodedValue::Int8(-3).as_i64(), Some(-3));
        assert_eq!(DecodedValue::Int8(-3).as_u64(), None);
        assert_eq!(DecodedValue::UInt64(u64::MAX).as_i64(), None);
        assert_eq!(DecodedValue::Float32(1.5).as_f64(), Some(1.5));
        assert_eq!(DecodedValue::String("1".into()).as_f64(), None);
        assert!(DecodedValue::UInt16(7).is_numeric());
    }

    #[test]
    fn test_to_bytes() {
        let arr = DecodedValue::Array(vec![DecodedValue::UInt8(0xAA), DecodedValue::UInt8(0xBB)]);
        assert_eq!(arr.to_bytes(), Some(vec![0xAA, 0xBB]));

        let mixed = DecodedValue::Array(vec![DecodedValue::UInt8(1), DecodedValue::Int32(2)]);
        assert_eq!(mixed.to_bytes(), None);
    }

    #[test]
    fn test_type_name() {
        assert_eq!(DecodedValue::Time(RosTime::new(1, 2)).type_name(), "time");
        assert_eq!(DecodedValue::Message(FieldMap::new()).type_name(), "message");
    }

    #[test]
    fn test_serialize_untagged() {
        let mut fields = FieldMap::new();
        fields.insert("text".to_string(), DecodedValue::String("hi".into()));
        fields.insert(
            "values".to_string(),
            DecodedValue::Array(vec![DecodedValue::Int32(1), DecodedValue::Int32(2)]),
        );
        fields.insert("stamp".to_string(), DecodedValue::Time(RosTime::new(5, 6)));
        let json = serde_json::to_value(DecodedValue::Message(fields)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "stamp": {"secs": 5, "nsecs": 6},
                "text": "hi",
                "values": [1, 2],
            })
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(DecodedValue::String("a".into()).to_string(), "\"a\"");
        assert_eq!(
            DecodedValue::Array(vec![DecodedValue::Bool(true)]).to_string(),
            "[1 elements]"
        );
    }
}
