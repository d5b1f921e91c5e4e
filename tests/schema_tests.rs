// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Definition parsing, registry and decoding tests.

use robobag::encoding::ros1::{decode, field_offset};
use robobag::schema::{msg_parser, ArrayLength, FieldType, PrimitiveType};
use robobag::{BagError, DecodedValue, DefinitionRegistry};

const SEPARATOR: &str =
    "================================================================================";

fn with_len(bytes: &[u8]) -> Vec<u8> {
    let mut out = (bytes.len() as u32).to_le_bytes().to_vec();
    out.extend_from_slice(bytes);
    out
}

#[test]
fn test_string_consumes_prefix_and_bytes() {
    let registry = DefinitionRegistry::new();
    let def = registry.register_text("std_msgs/String", "string data");

    let (consumed, fields) = decode(&registry, &def, &with_len(b"Hello"), 0).unwrap();
    assert_eq!(consumed, 9);
    assert_eq!(fields["data"], DecodedValue::String("Hello".to_string()));
}

#[test]
fn test_fixed_and_dynamic_arrays() {
    let registry = DefinitionRegistry::new();
    let fixed = registry.register_text("test_msgs/Fixed", "int32[3] values");
    let dynamic = registry.register_text("test_msgs/Bytes", "uint8[] data");

    let mut bytes = Vec::new();
    for v in [1i32, -2, 3] {
        bytes.extend_from_slice(&v.to_le_bytes());
    }
    let (consumed, fields) = decode(&registry, &fixed, &bytes, 0).unwrap();
    assert_eq!(consumed, 12);
    assert_eq!(
        fields["values"],
        DecodedValue::Array(vec![
            DecodedValue::Int32(1),
            DecodedValue::Int32(-2),
            DecodedValue::Int32(3)
        ])
    );

    let (consumed, fields) = decode(&registry, &dynamic, &with_len(&[7, 8]), 0).unwrap();
    assert_eq!(consumed, 6);
    assert_eq!(fields["data"].to_bytes(), Some(vec![7, 8]));
}

#[test]
fn test_dependency_blocks_and_suffix_resolution() {
    let text = format!(
        "# A stamped pose\nHeader header\ngeometry_msgs/Point position\n\
         {SEPARATOR}\nMSG: std_msgs/Header\nuint32 seq\ntime stamp\nstring frame_id\n\
         {SEPARATOR}\nMSG: geometry_msgs/Point\nfloat64 x\nfloat64 y\nfloat64 z\n"
    );

    let bundle = msg_parser::parse("test_msgs/Stamped", &text);
    assert_eq!(bundle.root.field_names(), vec!["header", "position"]);
    assert_eq!(bundle.dependencies.len(), 2);
    assert_eq!(bundle.dependencies[0].type_name, "std_msgs/Header");

    let registry = DefinitionRegistry::new();
    let root = registry.intern_bundle(bundle);
    assert_eq!(registry.len(), 3);
    assert_eq!(
        registry.resolve("Header").unwrap().type_name,
        "std_msgs/Header"
    );
    assert!(registry.get("Header").is_none());

    let mut bytes = 9u32.to_le_bytes().to_vec();
    bytes.extend_from_slice(&[0u8; 8]);
    bytes.extend(with_len(b"odom"));
    for v in [1.0f64, 2.0, 3.0] {
        bytes.extend_from_slice(&v.to_le_bytes());
    }
    let (consumed, fields) = decode(&registry, &root, &bytes, 0).unwrap();
    assert_eq!(consumed, bytes.len());

    let header = fields["header"].as_message().unwrap();
    assert_eq!(header["seq"], DecodedValue::UInt32(9));
    assert_eq!(header["frame_id"].as_str(), Some("odom"));
    let position = fields["position"].as_message().unwrap();
    assert_eq!(position["z"], DecodedValue::Float64(3.0));

    // Static position follows the dynamic header
    assert_eq!(field_offset(&registry, &root, &bytes, "position").unwrap(), 4 + 8 + 8);
}

#[test]
fn test_static_layout_offsets() {
    let registry = DefinitionRegistry::new();
    registry.register_text("test_msgs/Sample", "uint32 seq\nfloat64 x\nfloat64 y\n");
    registry.register_text("test_msgs/Named", "uint32 seq\nstring name\n");

    let layout = registry.layout("test_msgs/Sample").unwrap();
    assert_eq!(layout.static_size(), 20);
    assert_eq!(layout.field_offset("seq"), Some(0));
    assert_eq!(layout.field_offset("x"), Some(4));
    assert_eq!(layout.field_offset("y"), Some(12));

    assert!(registry.layout("test_msgs/Named").is_none());
    assert!(!registry.has_static_size("test_msgs/Named"));
    assert_eq!(registry.precompute_layouts(), 1);
}

#[test]
fn test_first_registration_wins() {
    let registry = DefinitionRegistry::new();
    let first = format!("test_msgs/Inner inner\n{SEPARATOR}\nMSG: test_msgs/Inner\nint32 a\n");
    let second = format!("test_msgs/Inner inner\n{SEPARATOR}\nMSG: test_msgs/Inner\nfloat64 b\n");

    registry.register_text("test_msgs/First", &first);
    registry.register_text("test_msgs/Second", &second);

    let inner = registry.get("test_msgs/Inner").unwrap();
    assert_eq!(inner.field_names(), vec!["a"]);
}

#[test]
fn test_char_and_byte_aliases() {
    let registry = DefinitionRegistry::new();
    let def = registry.register_text("test_msgs/Legacy", "char c\nbyte b\n");
    assert_eq!(
        def.field("c").unwrap().field_type,
        FieldType::Primitive(PrimitiveType::Char)
    );

    let (_, fields) = decode(&registry, &def, &[200, 0xff], 0).unwrap();
    assert_eq!(fields["c"], DecodedValue::UInt8(200));
    assert_eq!(fields["b"], DecodedValue::Int8(-1));
}

#[test]
fn test_constants_and_comments_are_skipped() {
    let bundle = msg_parser::parse(
        "test_msgs/Status",
        "# status codes\nuint8 OK=0\nuint8 ERROR=1\nstring NAME=hello world\nuint8 level  # current\nfloat32[4] gains\n",
    );
    assert_eq!(bundle.root.field_names(), vec!["level", "gains"]);
    assert_eq!(
        bundle.root.field("gains").unwrap().field_type,
        FieldType::Array {
            element: Box::new(FieldType::Primitive(PrimitiveType::Float32)),
            length: ArrayLength::Fixed(4),
        }
    );
}

#[test]
fn test_unknown_nested_type_fails_decode() {
    let registry = DefinitionRegistry::new();
    let def = registry.register_text("test_msgs/Outer", "missing_msgs/Thing thing\n");

    let err = decode(&registry, &def, &[0u8; 16], 0).unwrap_err();
    assert_eq!(err.field_path().as_deref(), Some("thing"));
    assert!(matches!(err.root_cause(), BagError::UnknownFieldType { .. }));
}
