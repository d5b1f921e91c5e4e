// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! I/O layer for ROS1 bag recordings.
//!
//! This module provides the bag format reader, topic filtering and the
//! multi-file catalog built on top of them.

pub mod formats;

// Filter for topic filtering
pub mod filter;
pub use filter::TopicFilter;

// Multi-file catalog and loader
pub mod reader;
pub use reader::{BagLoader, BagSet, LoadConfig, TopicInfo};
