// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Core types used throughout robobag.
//!
//! This module provides the foundational types for the library:
//! - [`BagError`] - Error handling for loading and decoding
//! - [`DecodedValue`] - Closed value representation of decoded fields
//! - [`RosTime`], [`RosDuration`], [`RosHeader`] - ROS1 built-in types
//! - [`RosMessage`] - Decoded message view
//! - [`registry::TypeRegistry`] - Name-keyed interning registry

pub mod error;
pub mod message;
pub mod registry;
pub mod time;
pub mod value;

pub use error::{BagError, Result};
pub use message::RosMessage;
pub use time::{RosDuration, RosHeader, RosTime};
pub use value::{DecodedValue, FieldMap};
