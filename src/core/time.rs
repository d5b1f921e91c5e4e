// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! ROS time, duration and header values.
//!
//! Both `time` and `duration` are stored on the wire as two 32-bit little-endian
//! words (seconds, nanoseconds). Wall-clock conversions keep sub-second
//! precision down to 100 ns ticks.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const NANOS_PER_SEC: u64 = 1_000_000_000;
const NANOS_PER_TICK: u32 = 100;

/// Absolute ROS time (`time` on the wire).
///
/// Ordering compares seconds first, then nanoseconds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RosTime {
    /// Seconds since the Unix epoch
    pub secs: u32,
    /// Nanoseconds within the second
    pub nsecs: u32,
}

impl RosTime {
    /// Create a time from seconds and nanoseconds.
    pub const fn new(secs: u32, nsecs: u32) -> Self {
        Self { secs, nsecs }
    }

    /// Decode from 8 little-endian bytes (secs, nsecs).
    pub fn from_le_bytes(bytes: [u8; 8]) -> Self {
        Self {
            secs: u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]),
            nsecs: u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]),
        }
    }

    /// Encode as 8 little-endian bytes.
    pub fn to_le_bytes(self) -> [u8; 8] {
        let mut out = [0u8; 8];
        out[..4].copy_from_slice(&self.secs.to_le_bytes());
        out[4..].copy_from_slice(&self.nsecs.to_le_bytes());
        out
    }

    /// Build from nanoseconds since the epoch.
    pub fn from_nanos(nanos: u64) -> Self {
        Self {
            secs: (nanos / NANOS_PER_SEC) as u32,
            nsecs: (nanos % NANOS_PER_SEC) as u32,
        }
    }

    /// Total nanoseconds since the epoch.
    pub fn as_nanos(self) -> u64 {
        u64::from(self.secs) * NANOS_PER_SEC + u64::from(self.nsecs)
    }

    /// Convert to a UTC wall-clock time, truncated to 100 ns ticks.
    ///
    /// Returns `None` when `nsecs` is not a valid sub-second value.
    pub fn to_datetime(self) -> Option<DateTime<Utc>> {
        let nsecs = self.nsecs - self.nsecs % NANOS_PER_TICK;
        DateTime::from_timestamp(i64::from(self.secs), nsecs)
    }
}

impl fmt::Display for RosTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:09}", self.secs, self.nsecs)
    }
}

/// Relative ROS time (`duration` on the wire).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RosDuration {
    /// Seconds
    pub secs: i32,
    /// Nanoseconds
    pub nsecs: i32,
}

impl RosDuration {
    /// Create a duration from seconds and nanoseconds.
    pub const fn new(secs: i32, nsecs: i32) -> Self {
        Self { secs, nsecs }
    }

    /// Decode from 8 little-endian bytes (secs, nsecs).
    pub fn from_le_bytes(bytes: [u8; 8]) -> Self {
        Self {
            secs: i32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]),
            nsecs: i32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]),
        }
    }

    /// Total signed nanoseconds.
    pub fn as_nanos(self) -> i64 {
        i64::from(self.secs) * NANOS_PER_SEC as i64 + i64::from(self.nsecs)
    }

    /// Convert to a chrono duration, truncated to 100 ns ticks.
    pub fn to_chrono(self) -> chrono::Duration {
        let tick = i64::from(NANOS_PER_TICK);
        let nanos = self.as_nanos();
        chrono::Duration::nanoseconds(nanos - nanos % tick)
    }
}

impl fmt::Display for RosDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let nanos = self.as_nanos();
        let sign = if nanos < 0 { "-" } else { "" };
        let abs = nanos.unsigned_abs();
        write!(
            f,
            "{sign}{}.{:09}s",
            abs / NANOS_PER_SEC,
            abs % NANOS_PER_SEC
        )
    }
}

/// ROS1 `Header`: sequence number, stamp and coordinate frame.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosHeader {
    /// Sequence number
    pub seq: u32,
    /// Timestamp
    pub stamp: RosTime,
    /// Coordinate frame id
    pub frame_id: String,
}

impl RosHeader {
    /// Encoded size: seq (4) + stamp (8) + frame_id length prefix (4) + frame_id bytes.
    pub fn encoded_len(&self) -> usize {
        4 + 8 + 4 + self.frame_id.len()
    }
}
