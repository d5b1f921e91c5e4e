// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Schema parsers.

pub mod msg_parser;

pub use msg_parser::{parse, parse_fields};
