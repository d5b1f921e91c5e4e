// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Static byte layout of message definitions.
//!
//! A definition has a static layout when every field in its closure has a
//! size independent of message content: no `string`, `header` or `T[]`
//! anywhere, and every nested type resolvable. Such definitions get a total
//! size and a precomputed offset per field, so offset lookups need not scan
//! the payload.

use std::collections::HashMap;

use super::ast::{ArrayLength, FieldType, MessageDefinition};
use super::registry::DefinitionRegistry;

/// Precomputed layout of a content-independent definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    static_size: usize,
    field_offsets: HashMap<String, usize>,
}

impl Layout {
    /// Total encoded size in bytes.
    pub fn static_size(&self) -> usize {
        self.static_size
    }

    /// Byte offset of a field from the start of the message.
    pub fn field_offset(&self, field: &str) -> Option<usize> {
        self.field_offsets.get(field).copied()
    }

    /// All field offsets.
    pub fn field_offsets(&self) -> &HashMap<String, usize> {
        &self.field_offsets
    }
}

/// Compute the layout of `definition`, or `None` if its size depends on content.
///
/// `visiting` holds the type names whose layout is being computed further up
/// the stack; reaching one of them again means a recursive type, which can
/// never have a static size.
pub(crate) fn compute_layout(
    registry: &DefinitionRegistry,
    definition: &MessageDefinition,
    visiting: &mut Vec<String>,
) -> Option<Layout> {
    visiting.push(definition.type_name.clone());
    let result = walk_fields(registry, definition, visiting);
    visiting.pop();
    result
}

fn walk_fields(
    registry: &DefinitionRegistry,
    definition: &MessageDefinition,
    visiting: &mut Vec<String>,
) -> Option<Layout> {
    let mut offset = 0usize;
    let mut field_offsets = HashMap::with_capacity(definition.fields.len());

    for field in &definition.fields {
        let size = static_size_of(registry, &field.field_type, visiting)?;
        field_offsets.insert(field.name.clone(), offset);
        offset = offset.checked_add(size)?;
    }

    Some(Layout {
        static_size: offset,
        field_offsets,
    })
}

/// Encoded size of one field type, if content-independent.
fn static_size_of(
    registry: &DefinitionRegistry,
    field_type: &FieldType,
    visiting: &mut Vec<String>,
) -> Option<usize> {
    match field_type {
        FieldType::Primitive(prim) => prim.fixed_size(),
        FieldType::Array {
            length: ArrayLength::Variable,
            ..
        } => None,
        FieldType::Array {
            element,
            length: ArrayLength::Fixed(n),
        } => static_size_of(registry, element, visiting)?.checked_mul(*n),
        FieldType::Named(name) => {
            let definition = registry.resolve(name)?;
            if visiting.iter().any(|v| v == &definition.type_name) {
                return None;
            }
            registry
                .layout_with(&definition, visiting)
                .map(|layout| layout.static_size())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::parser::msg_parser;

    fn registry_with(defs: &[(&str, &str)]) -> DefinitionRegistry {
        let registry = DefinitionRegistry::new();
        for (name, text) in defs {
            registry.register(msg_parser::parse_fields(name, text));
        }
        registry
    }

    #[test]
    fn test_scalar_layout() {
        let registry = registry_with(&[("pkg/Sample", "uint32 seq\nfloat64 x\nfloat64 y")]);
        let layout = registry.layout("pkg/Sample").unwrap();
        assert_eq!(layout.static_size(), 20);
        assert_eq!(layout.field_offset("seq"), Some(0));
        assert_eq!(layout.field_offset("x"), Some(4));
        assert_eq!(layout.field_offset("y"), Some(12));
        assert_eq!(layout.field_offset("z"), None);
    }

    #[test]
    fn test_dynamic_fields() {
        let registry = registry_with(&[
            ("pkg/S", "int32 a\nstring s"),
            ("pkg/V", "int32 a\nfloat32[] v"),
            ("pkg/H", "header h\nint32 a"),
        ]);
        assert!(registry.layout("pkg/S").is_none());
        assert!(registry.layout("pkg/V").is_none());
        assert!(registry.layout("pkg/H").is_none());
        assert!(!registry.has_static_size("pkg/S"));
    }

    #[test]
    fn test_nested_and_fixed_arrays() {
        let registry = registry_with(&[
            ("geometry_msgs/Point", "float64 x\nfloat64 y\nfloat64 z"),
            ("pkg/Tri", "uint8 id\nPoint[3] corners\ntime stamp\nduration d"),
        ]);
        let layout = registry.layout("pkg/Tri").unwrap();
        assert_eq!(layout.field_offset("corners"), Some(1));
        assert_eq!(layout.field_offset("stamp"), Some(73));
        assert_eq!(layout.field_offset("d"), Some(81));
        assert_eq!(layout.static_size(), 89);
    }

    #[test]
    fn test_dynamic_nested_type() {
        let registry = registry_with(&[
            ("pkg/Inner", "string name"),
            ("pkg/Outer", "int32 a\nInner inner"),
        ]);
        assert!(registry.layout("pkg/Outer").is_none());
    }

    #[test]
    fn test_unresolved_type_is_dynamic() {
        let registry = registry_with(&[("pkg/Outer", "int32 a\nMissing m")]);
        assert!(registry.layout("pkg/Outer").is_none());
    }

    #[test]
    fn test_recursive_type_is_dynamic() {
        let registry = registry_with(&[
            ("pkg/A", "int32 a\nB b"),
            ("pkg/B", "int32 b\nA a"),
        ]);
        assert!(registry.layout("pkg/A").is_none());
        assert!(registry.layout("pkg/B").is_none());
    }

    #[test]
    fn test_empty_definition() {
        let registry = registry_with(&[("std_msgs/Empty", "")]);
        assert_eq!(registry.layout("std_msgs/Empty").unwrap().static_size(), 0);
    }
}
