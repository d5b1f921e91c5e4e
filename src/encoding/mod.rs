// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Message payload decoding.
//!
//! - [`ros1`] - ROS1 serialization cursor and definition-driven decoder

pub mod ros1;

pub use ros1::{Ros1Cursor, Ros1Decoder};
