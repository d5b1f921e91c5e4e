// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! ROS1 message decoder.
//!
//! Walks a [`MessageDefinition`] field by field over a payload slice and
//! produces a [`FieldMap`]. Nested types are looked up by name in the
//! [`DefinitionRegistry`] as they are reached, so a definition never has to
//! embed its dependencies.

use tracing::trace;

use crate::core::{BagError, DecodedValue, FieldMap, Result};
use crate::schema::{ArrayLength, DefinitionRegistry, FieldType, MessageDefinition, PrimitiveType};

use super::cursor::Ros1Cursor;

/// Maximum allowed element count for a `T[]` whose elements may encode to zero bytes.
const MAX_ARRAY_LENGTH: usize = 10_000_000;

/// Maximum nesting of message types inside one payload.
const MAX_DEPTH: usize = 64;

/// Decoder bound to a definition registry.
#[derive(Debug, Clone, Copy)]
pub struct Ros1Decoder<'r> {
    registry: &'r DefinitionRegistry,
}

impl<'r> Ros1Decoder<'r> {
    /// Create a decoder resolving nested types through `registry`.
    pub fn new(registry: &'r DefinitionRegistry) -> Self {
        Self { registry }
    }

    /// Decode one message of type `definition` starting at `start`.
    ///
    /// Returns the number of bytes consumed and the decoded fields.
    pub fn decode(
        &self,
        definition: &MessageDefinition,
        bytes: &[u8],
        start: usize,
    ) -> Result<(usize, FieldMap)> {
        let mut cursor = Ros1Cursor::with_offset(bytes, start)?;
        let fields = self.read_message(&mut cursor, definition, 0)?;
        Ok((cursor.position() - start, fields))
    }

    /// Byte offset of `field` from the start of the payload.
    ///
    /// Uses the precomputed layout when the type has a static size, otherwise
    /// skips over the preceding fields.
    pub fn field_offset(
        &self,
        definition: &MessageDefinition,
        bytes: &[u8],
        field: &str,
    ) -> Result<usize> {
        if definition.field(field).is_none() {
            return Err(BagError::unknown_field(field));
        }

        if let Some(layout) = self.registry.layout_with(definition, &mut Vec::new()) {
            if let Some(offset) = layout.field_offset(field) {
                return Ok(offset);
            }
        }

        let mut cursor = Ros1Cursor::new(bytes);
        for def in &definition.fields {
            if def.name == field {
                return Ok(cursor.position());
            }
            let pos = cursor.position();
            self.skip_type(&mut cursor, &def.field_type, 0)
                .map_err(|e| BagError::field_decode(&def.name, def.field_type.to_string(), pos, e))?;
        }
        Err(BagError::unknown_field(field))
    }

    /// Byte range `[start, end)` that `field` occupies in the payload.
    pub fn field_span(
        &self,
        definition: &MessageDefinition,
        bytes: &[u8],
        field: &str,
    ) -> Result<(usize, usize)> {
        let start = self.field_offset(definition, bytes, field)?;
        let field_type = definition
            .field(field)
            .map(|f| &f.field_type)
            .ok_or_else(|| BagError::unknown_field(field))?;
        let mut cursor = Ros1Cursor::with_offset(bytes, start)?;
        self.skip_type(&mut cursor, field_type, 0)?;
        Ok((start, cursor.position()))
    }

    fn read_message(
        &self,
        cursor: &mut Ros1Cursor<'_>,
        definition: &MessageDefinition,
        depth: usize,
    ) -> Result<FieldMap> {
        if depth > MAX_DEPTH {
            return Err(BagError::unsupported(format!(
                "message nesting deeper than {MAX_DEPTH} in '{}'",
                definition.type_name
            )));
        }

        let mut fields = FieldMap::new();
        for field in &definition.fields {
            let pos = cursor.position();
            let value = self
                .read_type(cursor, &field.field_type, depth)
                .map_err(|e| {
                    BagError::field_decode(&field.name, field.field_type.to_string(), pos, e)
                })?;
            fields.insert(field.name.clone(), value);
        }
        Ok(fields)
    }

    fn read_type(
        &self,
        cursor: &mut Ros1Cursor<'_>,
        field_type: &FieldType,
        depth: usize,
    ) -> Result<DecodedValue> {
        match field_type {
            FieldType::Primitive(prim) => read_primitive(cursor, *prim),
            FieldType::Named(name) => {
                let nested = self.registry.resolve_or_err(name)?;
                Ok(DecodedValue::Message(self.read_message(
                    cursor,
                    &nested,
                    depth + 1,
                )?))
            }
            FieldType::Array { element, length } => {
                let count = self.array_count(cursor, element, *length)?;
                let mut values = Vec::with_capacity(count.min(1024));
                for _ in 0..count {
                    values.push(self.read_type(cursor, element, depth)?);
                }
                Ok(DecodedValue::Array(values))
            }
        }
    }

    fn skip_type(
        &self,
        cursor: &mut Ros1Cursor<'_>,
        field_type: &FieldType,
        depth: usize,
    ) -> Result<()> {
        match field_type {
            FieldType::Primitive(PrimitiveType::String) => cursor.skip_string(),
            FieldType::Primitive(PrimitiveType::Header) => {
                cursor.skip(12)?;
                cursor.skip_string()
            }
            FieldType::Primitive(prim) => cursor.skip(prim.fixed_size().unwrap_or(0)),
            FieldType::Named(name) => {
                if depth > MAX_DEPTH {
                    return Err(BagError::unsupported(format!(
                        "message nesting deeper than {MAX_DEPTH} in '{name}'"
                    )));
                }
                let nested = self.registry.resolve_or_err(name)?;
                if let Some(layout) = self.registry.layout_with(&nested, &mut Vec::new()) {
                    return cursor.skip(layout.static_size());
                }
                for field in &nested.fields {
                    self.skip_type(cursor, &field.field_type, depth + 1)?;
                }
                Ok(())
            }
            FieldType::Array { element, length } => {
                let count = self.array_count(cursor, element, *length)?;
                match self.static_size(element) {
                    Some(size) => {
                        let total = size.checked_mul(count).ok_or_else(|| {
                            BagError::malformed_payload(format!("array of {count} elements overflows"))
                        })?;
                        cursor.skip(total)
                    }
                    None => {
                        for _ in 0..count {
                            self.skip_type(cursor, element, depth)?;
                        }
                        Ok(())
                    }
                }
            }
        }
    }

    /// Element count of an array, reading the prefix for `T[]`.
    fn array_count(
        &self,
        cursor: &mut Ros1Cursor<'_>,
        element: &FieldType,
        length: ArrayLength,
    ) -> Result<usize> {
        let offset = cursor.position();
        let count = match length {
            ArrayLength::Fixed(n) => n,
            ArrayLength::Variable => cursor.read_len()?,
        };
        let min_size = self.min_size(element);
        if min_size > 0 {
            let needed = count.saturating_mul(min_size);
            if needed > cursor.remaining() {
                return Err(BagError::truncated(needed, cursor.remaining(), offset as u64));
            }
        } else if count > MAX_ARRAY_LENGTH {
            return Err(BagError::malformed_payload(format!(
                "array length {count} exceeds maximum allowed {MAX_ARRAY_LENGTH}"
            )));
        }
        Ok(count)
    }

    fn static_size(&self, field_type: &FieldType) -> Option<usize> {
        match field_type {
            FieldType::Primitive(prim) => prim.fixed_size(),
            FieldType::Named(name) => self.registry.layout(name).map(|l| l.static_size()),
            FieldType::Array {
                element,
                length: ArrayLength::Fixed(n),
            } => self.static_size(element)?.checked_mul(*n),
            FieldType::Array { .. } => None,
        }
    }

    /// Lower bound on the encoded size of one value.
    fn min_size(&self, field_type: &FieldType) -> usize {
        match field_type {
            FieldType::Primitive(PrimitiveType::String) => 4,
            FieldType::Primitive(PrimitiveType::Header) => 16,
            FieldType::Array {
                length: ArrayLength::Variable,
                ..
            } => 4,
            other => self.static_size(other).unwrap_or(0),
        }
    }
}

fn read_primitive(cursor: &mut Ros1Cursor<'_>, prim: PrimitiveType) -> Result<DecodedValue> {
    Ok(match prim {
        PrimitiveType::Bool => DecodedValue::Bool(cursor.read_bool()?),
        PrimitiveType::Int8 | PrimitiveType::Byte => DecodedValue::Int8(cursor.read_i8()?),
        PrimitiveType::UInt8 | PrimitiveType::Char => DecodedValue::UInt8(cursor.read_u8()?),
        PrimitiveType::Int16 => DecodedValue::Int16(cursor.read_i16()?),
        PrimitiveType::UInt16 => DecodedValue::UInt16(cursor.read_u16()?),
        PrimitiveType::Int32 => DecodedValue::Int32(cursor.read_i32()?),
        PrimitiveType::UInt32 => DecodedValue::UInt32(cursor.read_u32()?),
        PrimitiveType::Int64 => DecodedValue::Int64(cursor.read_i64()?),
        PrimitiveType::UInt64 => DecodedValue::UInt64(cursor.read_u64()?),
        PrimitiveType::Float32 => DecodedValue::Float32(cursor.read_f32()?),
        PrimitiveType::Float64 => DecodedValue::Float64(cursor.read_f64()?),
        PrimitiveType::String => DecodedValue::String(cursor.read_string()?),
        PrimitiveType::Time => DecodedValue::Time(cursor.read_time()?),
        PrimitiveType::Duration => DecodedValue::Duration(cursor.read_duration()?),
        PrimitiveType::Header => DecodedValue::Header(cursor.read_header()?),
    })
}

/// Decode one message of type `definition` starting at `start`.
///
/// Returns the number of bytes consumed and the decoded fields.
pub fn decode(
    registry: &DefinitionRegistry,
    definition: &MessageDefinition,
    bytes: &[u8],
    start: usize,
) -> Result<(usize, FieldMap)> {
    Ros1Decoder::new(registry).decode(definition, bytes, start)
}

/// Decode a whole message payload. Trailing bytes are tolerated.
pub fn decode_message(
    registry: &DefinitionRegistry,
    definition: &MessageDefinition,
    bytes: &[u8],
) -> Result<FieldMap> {
    let (consumed, fields) = decode(registry, definition, bytes, 0)?;
    if consumed < bytes.len() {
        trace!(
            type_name = %definition.type_name,
            consumed,
            len = bytes.len(),
            "trailing bytes after message payload"
        );
    }
    Ok(fields)
}

/// Byte offset of `field` within a payload of type `definition`.
pub fn field_offset(
    registry: &DefinitionRegistry,
    definition: &MessageDefinition,
    bytes: &[u8],
    field: &str,
) -> Result<usize> {
    Ros1Decoder::new(registry).field_offset(definition, bytes, field)
}
