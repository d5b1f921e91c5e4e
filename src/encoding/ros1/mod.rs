// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! ROS1 serialization: little-endian, unaligned, length-prefixed strings and
//! variable arrays.

pub mod cursor;
pub mod decoder;

pub use cursor::Ros1Cursor;
pub use decoder::{decode, decode_message, field_offset, Ros1Decoder};
