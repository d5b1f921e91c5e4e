// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! AST types for parsed ROS1 .msg definitions.
//!
//! Nested message types are referenced by name only. Resolution happens
//! against the [`DefinitionRegistry`](super::DefinitionRegistry) when a
//! layout is computed or a payload is decoded.

use std::fmt;

/// A message type: its name and ordered fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageDefinition {
    /// Type name including package if available (e.g. `std_msgs/Header`)
    pub type_name: String,
    /// Ordered list of fields
    pub fields: Vec<FieldDef>,
}

impl MessageDefinition {
    /// Create an empty definition.
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            fields: Vec::new(),
        }
    }

    /// Append a field. Returns `false` if a field of that name already exists.
    pub fn add_field(&mut self, field: FieldDef) -> bool {
        if self.field(&field.name).is_some() {
            return false;
        }
        self.fields.push(field);
        true
    }

    /// Look up a field by name.
    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Field names in declared order.
    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name.as_str()).collect()
    }

    /// Names of message types referenced by this definition's fields.
    pub fn referenced_types(&self) -> Vec<&str> {
        self.fields
            .iter()
            .filter_map(|f| f.field_type.named_element())
            .collect()
    }
}

/// A field in a message type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDef {
    /// Field name
    pub name: String,
    /// Field type
    pub field_type: FieldType,
}

impl FieldDef {
    /// Create a field.
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
        }
    }
}

/// Length of an array field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArrayLength {
    /// `T[]`: u32 element count precedes the elements
    Variable,
    /// `T[N]`: exactly N elements, no count prefix
    Fixed(usize),
}

/// Field type token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldType {
    /// Built-in type
    Primitive(PrimitiveType),
    /// Registered message type, possibly package-qualified
    Named(String),
    /// Array of another type
    Array {
        /// Element type
        element: Box<FieldType>,
        /// Variable or fixed length
        length: ArrayLength,
    },
}

impl FieldType {
    /// Parse a type token such as `float64`, `geometry_msgs/Point[]` or `int32[3]`.
    ///
    /// Returns `None` for an empty base name or a malformed array suffix.
    pub fn parse(token: &str) -> Option<Self> {
        let (base, length) = match token.find('[') {
            Some(open) => {
                let inner = token[open + 1..].strip_suffix(']')?;
                let length = if inner.is_empty() {
                    ArrayLength::Variable
                } else if inner.bytes().all(|b| b.is_ascii_digit()) {
                    ArrayLength::Fixed(inner.parse().ok()?)
                } else {
                    return None;
                };
                (&token[..open], Some(length))
            }
            None => (token, None),
        };

        if base.is_empty() {
            return None;
        }

        let base = match PrimitiveType::try_from_str(base) {
            Some(prim) => FieldType::Primitive(prim),
            None => FieldType::Named(base.to_string()),
        };

        Some(match length {
            Some(length) => FieldType::Array {
                element: Box::new(base),
                length,
            },
            None => base,
        })
    }

    /// The message type name this field refers to, looking through arrays.
    pub fn named_element(&self) -> Option<&str> {
        match self {
            FieldType::Named(name) => Some(name),
            FieldType::Array { element, .. } => element.named_element(),
            FieldType::Primitive(_) => None,
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::Primitive(p) => write!(f, "{p}"),
            FieldType::Named(name) => write!(f, "{name}"),
            FieldType::Array {
                element,
                length: ArrayLength::Variable,
            } => write!(f, "{element}[]"),
            FieldType::Array {
                element,
                length: ArrayLength::Fixed(n),
            } => write!(f, "{element}[{n}]"),
        }
    }
}

/// Built-in ROS1 types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveType {
    /// Boolean (1 byte)
    Bool,
    /// 8-bit signed integer
    Int8,
    /// 8-bit unsigned integer
    UInt8,
    /// Deprecated alias of uint8
    Char,
    /// Deprecated alias of int8
    Byte,
    /// 16-bit signed integer
    Int16,
    /// 16-bit unsigned integer
    UInt16,
    /// 32-bit signed integer
    Int32,
    /// 32-bit unsigned integer
    UInt32,
    /// 64-bit signed integer
    Int64,
    /// 64-bit unsigned integer
    UInt64,
    /// 32-bit float
    Float32,
    /// 64-bit float
    Float64,
    /// u32 length-prefixed UTF-8
    String,
    /// secs:u32, nsecs:u32
    Time,
    /// secs:i32, nsecs:i32
    Duration,
    /// seq:u32, stamp:time, frame_id:string
    Header,
}

impl PrimitiveType {
    /// Encoded size in bytes, if independent of content.
    pub fn fixed_size(self) -> Option<usize> {
        match self {
            PrimitiveType::Bool
            | PrimitiveType::Int8
            | PrimitiveType::UInt8
            | PrimitiveType::Char
            | PrimitiveType::Byte => Some(1),
            PrimitiveType::Int16 | PrimitiveType::UInt16 => Some(2),
            PrimitiveType::Int32 | PrimitiveType::UInt32 | PrimitiveType::Float32 => Some(4),
            PrimitiveType::Int64
            | PrimitiveType::UInt64
            | PrimitiveType::Float64
            | PrimitiveType::Time
            | PrimitiveType::Duration => Some(8),
            PrimitiveType::String | PrimitiveType::Header => None,
        }
    }

    /// Parse a built-in type name.
    pub fn try_from_str(s: &str) -> Option<Self> {
        match s {
            "bool" => Some(PrimitiveType::Bool),
            "int8" => Some(PrimitiveType::Int8),
            "uint8" => Some(PrimitiveType::UInt8),
            "char" => Some(PrimitiveType::Char),
            "byte" => Some(PrimitiveType::Byte),
            "int16" => Some(PrimitiveType::Int16),
            "uint16" => Some(PrimitiveType::UInt16),
            "int32" => Some(PrimitiveType::Int32),
            "uint32" => Some(PrimitiveType::UInt32),
            "int64" => Some(PrimitiveType::Int64),
            "uint64" => Some(PrimitiveType::UInt64),
            "float32" => Some(PrimitiveType::Float32),
            "float64" => Some(PrimitiveType::Float64),
            "string" => Some(PrimitiveType::String),
            "time" => Some(PrimitiveType::Time),
            "duration" => Some(PrimitiveType::Duration),
            "header" => Some(PrimitiveType::Header),
            _ => None,
        }
    }

    /// The .msg spelling of this type.
    pub fn as_str(self) -> &'static str {
        match self {
            PrimitiveType::Bool => "bool",
            PrimitiveType::Int8 => "int8",
            PrimitiveType::UInt8 => "uint8",
            PrimitiveType::Char => "char",
            PrimitiveType::Byte => "byte",
            PrimitiveType::Int16 => "int16",
            PrimitiveType::UInt16 => "uint16",
            PrimitiveType::Int32 => "int32",
            PrimitiveType::UInt32 => "uint32",
            PrimitiveType::Int64 => "int64",
            PrimitiveType::UInt64 => "uint64",
            PrimitiveType::Float32 => "float32",
            PrimitiveType::Float64 => "float64",
            PrimitiveType::String => "string",
            PrimitiveType::Time => "time",
            PrimitiveType::Duration => "duration",
            PrimitiveType::Header => "header",
        }
    }
}

impl fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Phase-one parse result of a definition text: the root type plus every
/// `MSG:` dependency block, in text order. Nothing here is resolved yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedBundle {
    /// The connection's own type
    pub root: MessageDefinition,
    /// Dependency types declared after `=` separators
    pub dependencies: Vec<MessageDefinition>,
}
