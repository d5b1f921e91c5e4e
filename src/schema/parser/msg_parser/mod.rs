// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! MSG format parser using Pest.
//!
//! This module handles parsing of the ROS1 `message_definition` text stored
//! in bag connection records.
//!
//! The format supports:
//! - Simple field lists (root message)
//! - Dependency blocks separated by a line of `=` and headed by `MSG: TypeName`
//! - Array types: T[] (dynamic) or T[n] (fixed)
//! - Nested types: package/MessageName
//! - Comments (# style) and constants (`TYPE NAME=VALUE`), both skipped
//!
//! Lines that do not form a field are skipped instead of failing the parse.

use pest::iterators::Pair;
use pest::Parser;
use pest_derive::Parser;
use tracing::{trace, warn};

use crate::schema::ast::{FieldDef, FieldType, MessageDefinition, ParsedBundle};

/// Pest parser for one line of a ROS1 .msg definition.
#[derive(Parser)]
#[grammar = "schema/parser/msg_parser/msg.pest"] // Path relative to src/ directory
pub struct MsgParser;

/// What one definition line contributes.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Line {
    /// `=====...` between the root and each dependency
    Separator,
    /// `MSG: pkg/Type`
    Dependency(String),
    /// `type name`
    Field(FieldDef),
    /// Blank, comment or constant line
    Ignored,
    /// Anything else
    Invalid,
}

/// Parse a definition text into its root type and dependency blocks.
///
/// `type_name` names the root. Dependencies keep the names from their `MSG:`
/// headers. Nothing is registered; see
/// [`DefinitionRegistry::intern_bundle`](crate::schema::DefinitionRegistry::intern_bundle).
pub fn parse(type_name: &str, definition: &str) -> ParsedBundle {
    let mut root = MessageDefinition::new(type_name);
    let mut dependencies: Vec<MessageDefinition> = Vec::new();

    // None while between a separator and the next MSG: header
    let mut in_root = true;
    let mut current: Option<MessageDefinition> = None;

    for (line_no, raw) in definition.lines().enumerate() {
        let line = classify_line(raw.trim());
        match line {
            Line::Separator => {
                if let Some(done) = current.take() {
                    dependencies.push(done);
                }
                in_root = false;
            }
            Line::Dependency(name) => {
                if in_root {
                    trace!(line = line_no + 1, "MSG: header inside root definition ignored");
                    continue;
                }
                if let Some(done) = current.take() {
                    dependencies.push(done);
                }
                current = Some(MessageDefinition::new(name));
            }
            Line::Field(field) => {
                let target = if in_root {
                    Some(&mut root)
                } else {
                    current.as_mut()
                };
                match target {
                    Some(def) => {
                        let name = field.name.clone();
                        if !def.add_field(field) {
                            warn!(
                                type_name = %def.type_name,
                                field = %name,
                                "duplicate field in message definition, keeping the first"
                            );
                        }
                    }
                    None => {
                        warn!(
                            line = line_no + 1,
                            "field after separator without a MSG: header, skipped"
                        );
                    }
                }
            }
            Line::Ignored => {}
            Line::Invalid => {
                trace!(line = line_no + 1, text = raw.trim(), "skipping non-field line");
            }
        }
    }

    if let Some(done) = current.take() {
        dependencies.push(done);
    }

    ParsedBundle { root, dependencies }
}

/// Parse a single definition block with no dependency sections.
pub fn parse_fields(type_name: &str, text: &str) -> MessageDefinition {
    parse(type_name, text).root
}

fn classify_line(line: &str) -> Line {
    if line.is_empty() || line.starts_with('#') {
        return Line::Ignored;
    }

    let pairs = match MsgParser::parse(Rule::line, line) {
        Ok(pairs) => pairs,
        Err(_) => return Line::Invalid,
    };

    for pair in pairs.flat_map(|p| p.into_inner()) {
        match pair.as_rule() {
            Rule::separator => return Line::Separator,
            Rule::dependency_header => {
                return pair
                    .into_inner()
                    .find(|p| p.as_rule() == Rule::type_name)
                    .map(|p| Line::Dependency(p.as_str().to_string()))
                    .unwrap_or(Line::Invalid);
            }
            Rule::comment => return Line::Ignored,
            Rule::field => return field_line(pair),
            _ => {}
        }
    }

    Line::Invalid
}

/// Build a field from a `field` pair, or classify it as a constant.
fn field_line(pair: Pair<'_, Rule>) -> Line {
    let mut type_token = None;
    let mut name = None;

    for item in pair.into_inner() {
        match item.as_rule() {
            Rule::field_type => type_token = Some(item.as_str()),
            Rule::field_name => name = Some(item.as_str()),
            // `=` before any comment marks a constant declaration
            Rule::rest if item.as_str().contains('=') => return Line::Ignored,
            _ => {}
        }
    }

    match (type_token.and_then(FieldType::parse), name) {
        (Some(field_type), Some(name)) => Line::Field(FieldDef::new(name, field_type)),
        _ => Line::Invalid,
    }
}
