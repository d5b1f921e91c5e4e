// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Runtime type system for ROS1 messages.
//!
//! This module provides:
//! - [`ast`] - Definitions, fields and type tokens
//! - [`parser`] - `.msg` definition parsing
//! - [`registry`] - Shared interning registry of definitions
//! - [`layout`] - Static size and field offset precomputation

pub mod ast;
pub mod layout;
pub mod parser;
pub mod registry;

pub use ast::{ArrayLength, FieldDef, FieldType, MessageDefinition, ParsedBundle, PrimitiveType};
pub use layout::Layout;
pub use parser::msg_parser;
pub use registry::DefinitionRegistry;
