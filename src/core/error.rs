// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Core error types for robobag.
//!
//! Errors fall into three groups:
//! - Container structure (bad magic, unexpected record ops)
//! - Byte-level decoding (malformed headers, truncated records, bad payloads)
//! - Type system lookups (unknown field types, unknown fields)
//!
//! None of them are retried: the bytes of a bag do not change between attempts.

use thiserror::Error;

/// Errors that can occur while loading a bag or decoding its messages.
#[derive(Debug, Clone, Error)]
pub enum BagError {
    /// The file does not start with the `#ROSBAG V2.0` magic.
    #[error("Unsupported bag version: expected '#ROSBAG V2.0', found {found:?}")]
    UnsupportedVersion {
        /// The bytes found where the magic was expected (lossy UTF-8)
        found: String,
    },

    /// A top-level record carried an op code the loader does not handle.
    #[error("Unknown record type: op=0x{op:02x} at offset {offset}")]
    UnknownRecordType {
        /// Op code found
        op: u8,
        /// File offset of the record
        offset: u64,
    },

    /// A chunk info pointed at a record that is not a chunk.
    #[error("Expected chunk record (op=0x05) at offset {offset}, got op=0x{op:02x}")]
    ExpectedChunkRecord {
        /// Op code found
        op: u8,
        /// File offset of the record
        offset: u64,
    },

    /// A `key=value` header run could not be decoded.
    #[error("Malformed record header: {reason}")]
    MalformedHeader {
        /// What was wrong
        reason: String,
    },

    /// A read would run past the end of the available bytes.
    #[error("Truncated record: requested {requested} bytes at position {offset}, but only {available} bytes available")]
    TruncatedRecord {
        /// Requested bytes
        requested: usize,
        /// Available bytes
        available: usize,
        /// Position of the read
        offset: u64,
    },

    /// Payload bytes were present but not valid for the declared type.
    #[error("Malformed payload: {reason}")]
    MalformedPayload {
        /// What was wrong
        reason: String,
    },

    /// A field referenced a type that is neither built in nor registered.
    #[error("Unknown field type: '{type_name}'")]
    UnknownFieldType {
        /// Type name that could not be resolved
        type_name: String,
    },

    /// A message has no field with the requested name.
    #[error("Unknown field: '{field}'")]
    UnknownField {
        /// Requested field name
        field: String,
    },

    /// No connection in the catalog carries the requested topic.
    #[error("Unknown topic: '{topic}'")]
    UnknownTopic {
        /// Requested topic
        topic: String,
    },

    /// A decoded value is not of the variant the caller asked for.
    #[error("Field '{field}' holds {found}, expected {expected}")]
    WrongVariant {
        /// Field name
        field: String,
        /// Expected variant
        expected: &'static str,
        /// Variant found
        found: &'static str,
    },

    /// Feature not handled by this reader (e.g. compressed chunks).
    #[error("Unsupported feature: '{feature}'")]
    Unsupported {
        /// What is not supported
        feature: String,
    },

    /// A field failed to decode; wraps the underlying error with context.
    #[error("Failed to decode field '{field}' (type: '{field_type}', cursor_pos: {cursor_pos}): {cause}")]
    FieldDecode {
        /// Field name
        field: String,
        /// Declared field type
        field_type: String,
        /// Cursor position when decoding of the field started
        cursor_pos: usize,
        /// Underlying error
        cause: Box<BagError>,
    },

    /// Operating system I/O failure.
    #[error("I/O error in {context}: {message}")]
    Io {
        /// Operation being performed
        context: String,
        /// Error message
        message: String,
    },

    /// Invalid loader configuration.
    #[error("Invalid configuration: {reason}")]
    Config {
        /// What was wrong
        reason: String,
    },
}

impl BagError {
    /// Create an unsupported version error from the bytes found at the start of a file.
    pub fn unsupported_version(found: &[u8]) -> Self {
        BagError::UnsupportedVersion {
            found: String::from_utf8_lossy(found).into_owned(),
        }
    }

    /// Create a malformed header error.
    pub fn malformed_header(reason: impl Into<String>) -> Self {
        BagError::MalformedHeader {
            reason: reason.into(),
        }
    }

    /// Create a truncated record error.
    pub fn truncated(requested: usize, available: usize, offset: u64) -> Self {
        BagError::TruncatedRecord {
            requested,
            available,
            offset,
        }
    }

    /// Create a malformed payload error.
    pub fn malformed_payload(reason: impl Into<String>) -> Self {
        BagError::MalformedPayload {
            reason: reason.into(),
        }
    }

    /// Create an unknown field type error.
    pub fn unknown_field_type(type_name: impl Into<String>) -> Self {
        BagError::UnknownFieldType {
            type_name: type_name.into(),
        }
    }

    /// Create an unknown field error.
    pub fn unknown_field(field: impl Into<String>) -> Self {
        BagError::UnknownField {
            field: field.into(),
        }
    }

    /// Create an unknown topic error.
    pub fn unknown_topic(topic: impl Into<String>) -> Self {
        BagError::UnknownTopic {
            topic: topic.into(),
        }
    }

    /// Create a wrong variant error.
    pub fn wrong_variant(field: impl Into<String>, expected: &'static str, found: &'static str) -> Self {
        BagError::WrongVariant {
            field: field.into(),
            expected,
            found,
        }
    }

    /// Create an unsupported feature error.
    pub fn unsupported(feature: impl Into<String>) -> Self {
        BagError::Unsupported {
            feature: feature.into(),
        }
    }

    /// Wrap an error raised while decoding a field.
    pub fn field_decode(
        field: impl Into<String>,
        field_type: impl Into<String>,
        cursor_pos: usize,
        cause: BagError,
    ) -> Self {
        BagError::FieldDecode {
            field: field.into(),
            field_type: field_type.into(),
            cursor_pos,
            cause: Box::new(cause),
        }
    }

    /// Create an I/O error with the operation that failed.
    pub fn io(context: impl Into<String>, err: std::io::Error) -> Self {
        BagError::Io {
            context: context.into(),
            message: err.to_string(),
        }
    }

    /// Create a configuration error.
    pub fn config(reason: impl Into<String>) -> Self {
        BagError::Config {
            reason: reason.into(),
        }
    }

    /// The innermost error, looking through field decode wrappers.
    pub fn root_cause(&self) -> &BagError {
        let mut current = self;
        while let BagError::FieldDecode { cause, .. } = current {
            current = cause;
        }
        current
    }

    /// Dotted path of the fields being decoded when the error occurred, outermost first.
    pub fn field_path(&self) -> Option<String> {
        let mut parts = Vec::new();
        let mut current = self;
        while let BagError::FieldDecode { field, cause, .. } = current {
            parts.push(field.as_str());
            current = cause;
        }
        if parts.is_empty() {
            None
        } else {
            Some(parts.join("."))
        }
    }

    /// Get structured fields for logging.
    pub fn log_fields(&self) -> Vec<(&'static str, String)> {
        match self {
            BagError::UnsupportedVersion { found } => vec![("found", found.clone())],
            BagError::UnknownRecordType { op, offset }
            | BagError::ExpectedChunkRecord { op, offset } => {
                vec![("op", format!("0x{op:02x}")), ("offset", offset.to_string())]
            }
            BagError::MalformedHeader { reason } | BagError::MalformedPayload { reason } => {
                vec![("reason", reason.clone())]
            }
            BagError::TruncatedRecord {
                requested,
                available,
                offset,
            } => vec![
                ("requested", requested.to_string()),
                ("available", available.to_string()),
                ("offset", offset.to_string()),
            ],
            BagError::UnknownFieldType { type_name } => vec![("type", type_name.clone())],
            BagError::UnknownField { field } => vec![("field", field.clone())],
            BagError::UnknownTopic { topic } => vec![("topic", topic.clone())],
            BagError::WrongVariant {
                field,
                expected,
                found,
            } => vec![
                ("field", field.clone()),
                ("expected", expected.to_string()),
                ("found", found.to_string()),
            ],
            BagError::Unsupported { feature } => vec![("feature", feature.clone())],
            BagError::FieldDecode {
                field,
                field_type,
                cursor_pos,
                cause,
            } => vec![
                ("field", field.clone()),
                ("type", field_type.clone()),
                ("cursor", cursor_pos.to_string()),
                ("cause", cause.to_string()),
            ],
            BagError::Io { context, message } => {
                vec![("context", context.clone()), ("message", message.clone())]
            }
            BagError::Config { reason } => vec![("reason", reason.clone())],
        }
    }
}

impl From<std::io::Error> for BagError {
    fn from(err: std::io::Error) -> Self {
        BagError::io("io", err)
    }
}

/// Result type for robobag operations.
pub type Result<T> = std::result::Result<T, BagError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_version_error() {
        let err = BagError::unsupported_version(b"#ROSBAG V1.2\n");
        assert!(matches!(err, BagError::UnsupportedVersion { .. }));
        assert_eq!(
            err.to_string(),
            "Unsupported bag version: expected '#ROSBAG V2.0', found \"#ROSBAG V1.2\\n\""
        );
    }

    #[test]
    fn test_unknown_record_type_error() {
        let err = BagError::UnknownRecordType { op: 9, offset: 4117 };
        assert_eq!(err.to_string(), "Unknown record type: op=0x09 at offset 4117");
    }

    #[test]
    fn test_truncated_error() {
        let err = BagError::truncated(100, 50, 10);
        assert_eq!(
            err.to_string(),
            "Truncated record: requested 100 bytes at position 10, but only 50 bytes available"
        );
    }

    #[test]
    fn test_unknown_field_type_error() {
        let err = BagError::unknown_field_type("geometry_msgs/Point");
        assert_eq!(err.to_string(), "Unknown field type: 'geometry_msgs/Point'");
    }

    #[test]
    fn test_wrong_variant_error() {
        let err = BagError::wrong_variant("pose", "message", "string");
        assert_eq!(err.to_string(), "Field 'pose' holds string, expected message");
    }

    #[test]
    fn test_field_decode_nesting() {
        let inner = BagError::malformed_payload("invalid UTF-8");
        let mid = BagError::field_decode("frame_id", "string", 12, inner);
        let outer = BagError::field_decode("header", "std_msgs/Header", 0, mid);

        assert!(matches!(
            outer.root_cause(),
            BagError::MalformedPayload { .. }
        ));
        assert_eq!(outer.field_path().as_deref(), Some("header.frame_id"));
        assert_eq!(BagError::unknown_field("x").field_path(), None);
        assert!(outer
            .to_string()
            .starts_with("Failed to decode field 'header' (type: 'std_msgs/Header', cursor_pos: 0)"));
    }

    #[test]
    fn test_log_fields_truncated() {
        let err = BagError::truncated(100, 50, 10);
        let fields = err.log_fields();
        assert_eq!(fields.len(), 3);
        assert_eq!(fields[0], ("requested", "100".to_string()));
        assert_eq!(fields[1], ("available", "50".to_string()));
        assert_eq!(fields[2], ("offset", "10".to_string()));
    }

    #[test]
    fn test_log_fields_record_type() {
        let err = BagError::ExpectedChunkRecord { op: 2, offset: 77 };
        let fields = err.log_fields();
        assert_eq!(fields[0], ("op", "0x02".to_string()));
        assert_eq!(fields[1], ("offset", "77".to_string()));
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: BagError = io_err.into();
        assert!(matches!(err, BagError::Io { .. }));
        assert_eq!(err.to_string(), "I/O error in io: file not found");
    }

    #[test]
    fn test_error_clone() {
        let err1 = BagError::unknown_topic("/text");
        let err2 = err1.clone();
        assert_eq!(err1.to_string(), err2.to_string());
    }
}
