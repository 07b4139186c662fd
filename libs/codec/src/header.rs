//! # Header Value Encoder
//!
//! Maps a member's target shape to one of the eight event stream header
//! value kinds. Only integral, boolean, blob, string, enum and timestamp
//! targets have a header encoding:
//!
//! ```text
//! boolean   → Bool        blob      → ByteArray
//! byte      → Byte        string    → String
//! short     → Int16       enum      → String
//! integer   → Int32       timestamp → Timestamp
//! long      → Int64
//! ```
//!
//! Anything else is rejected while the plan is compiled, so the runtime
//! encoder only ever sees the kinds above.

use bytes::Bytes;
use types::{HeaderValue, MarshallingError, PrimitiveKind, Shape, Value};

/// Header value kind chosen for a header-placed member
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeaderKind {
    Bool,
    Byte,
    Int16,
    Int32,
    Int64,
    ByteArray,
    String,
    Timestamp,
}

impl HeaderKind {
    /// Header kind for a target shape, `None` if the shape cannot be a header
    pub fn for_shape(shape: &Shape) -> Option<Self> {
        match shape {
            Shape::Primitive { kind } => match kind {
                PrimitiveKind::Boolean => Some(HeaderKind::Bool),
                PrimitiveKind::Byte => Some(HeaderKind::Byte),
                PrimitiveKind::Short => Some(HeaderKind::Int16),
                PrimitiveKind::Integer => Some(HeaderKind::Int32),
                PrimitiveKind::Long => Some(HeaderKind::Int64),
                PrimitiveKind::Blob => Some(HeaderKind::ByteArray),
                PrimitiveKind::String => Some(HeaderKind::String),
                PrimitiveKind::Timestamp => Some(HeaderKind::Timestamp),
                PrimitiveKind::Float | PrimitiveKind::Double => None,
            },
            Shape::Enum(_) => Some(HeaderKind::String),
            _ => None,
        }
    }

    /// `HeaderValue` variant name
    pub fn variant(&self) -> &'static str {
        match self {
            HeaderKind::Bool => "Bool",
            HeaderKind::Byte => "Byte",
            HeaderKind::Int16 => "Int16",
            HeaderKind::Int32 => "Int32",
            HeaderKind::Int64 => "Int64",
            HeaderKind::ByteArray => "ByteArray",
            HeaderKind::String => "String",
            HeaderKind::Timestamp => "Timestamp",
        }
    }

    /// Runtime value kind this header accepts
    fn expected_value(&self) -> &'static str {
        match self {
            HeaderKind::Bool => "boolean",
            HeaderKind::Byte => "byte",
            HeaderKind::Int16 => "short",
            HeaderKind::Int32 => "integer",
            HeaderKind::Int64 => "long",
            HeaderKind::ByteArray => "blob",
            HeaderKind::String => "string",
            HeaderKind::Timestamp => "timestamp",
        }
    }

    /// Encode a runtime value as this kind of header value
    pub fn encode(&self, member: &str, value: &Value) -> Result<HeaderValue, MarshallingError> {
        let encoded = match (self, value) {
            (HeaderKind::Bool, Value::Bool(v)) => HeaderValue::Bool(*v),
            (HeaderKind::Byte, Value::Byte(v)) => HeaderValue::Byte(*v),
            (HeaderKind::Int16, Value::Short(v)) => HeaderValue::Int16(*v),
            (HeaderKind::Int32, Value::Integer(v)) => HeaderValue::Int32(*v),
            (HeaderKind::Int64, Value::Long(v)) => HeaderValue::Int64(*v),
            (HeaderKind::ByteArray, Value::Blob(v)) => {
                HeaderValue::ByteArray(Bytes::copy_from_slice(v))
            }
            (HeaderKind::String, Value::String(v)) => HeaderValue::String(v.clone()),
            (HeaderKind::Timestamp, Value::Timestamp(v)) => HeaderValue::Timestamp(*v),
            (kind, other) => {
                return Err(MarshallingError::ValueMismatch {
                    member: member.to_string(),
                    expected: kind.expected_value(),
                    found: other.kind_name(),
                })
            }
        };
        Ok(encoded)
    }

    /// Rust expression building the header value from an owned `expr`
    pub fn render(&self, expr: &str) -> String {
        match self {
            HeaderKind::ByteArray => format!("HeaderValue::ByteArray({expr}.into())"),
            kind => format!("HeaderValue::{}({expr})", kind.variant()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::{EnumShape, ListShape, ShapeId};

    #[test]
    fn test_primitive_mapping() {
        let cases = [
            (PrimitiveKind::Boolean, HeaderKind::Bool),
            (PrimitiveKind::Byte, HeaderKind::Byte),
            (PrimitiveKind::Short, HeaderKind::Int16),
            (PrimitiveKind::Integer, HeaderKind::Int32),
            (PrimitiveKind::Long, HeaderKind::Int64),
            (PrimitiveKind::Blob, HeaderKind::ByteArray),
            (PrimitiveKind::String, HeaderKind::String),
            (PrimitiveKind::Timestamp, HeaderKind::Timestamp),
        ];
        for (primitive, expected) in cases {
            assert_eq!(HeaderKind::for_shape(&Shape::primitive(primitive)), Some(expected));
        }
    }

    #[test]
    fn test_floats_and_aggregates_have_no_header_kind() {
        assert_eq!(HeaderKind::for_shape(&Shape::primitive(PrimitiveKind::Float)), None);
        assert_eq!(HeaderKind::for_shape(&Shape::primitive(PrimitiveKind::Double)), None);
        let list = Shape::List(ListShape {
            member: ShapeId::prelude("String"),
        });
        assert_eq!(HeaderKind::for_shape(&list), None);
    }

    #[test]
    fn test_enum_headers_are_strings() {
        let shape = Shape::Enum(EnumShape::new(["LOW", "HIGH"]));
        assert_eq!(HeaderKind::for_shape(&shape), Some(HeaderKind::String));
    }

    #[test]
    fn test_encode_values() {
        assert_eq!(
            HeaderKind::Int32.encode("code", &Value::Integer(42)).unwrap(),
            HeaderValue::Int32(42)
        );
        assert_eq!(
            HeaderKind::ByteArray.encode("id", &Value::Blob(vec![1, 2])).unwrap(),
            HeaderValue::ByteArray(Bytes::from_static(&[1, 2]))
        );
        assert_eq!(
            HeaderKind::Bool.encode("flag", &Value::Bool(false)).unwrap(),
            HeaderValue::Bool(false)
        );
    }

    #[test]
    fn test_encode_mismatch() {
        let err = HeaderKind::Int64.encode("seq", &Value::Integer(1)).unwrap_err();
        assert_eq!(
            err,
            MarshallingError::ValueMismatch {
                member: "seq".to_string(),
                expected: "long",
                found: "integer",
            }
        );
    }

    #[test]
    fn test_render_expressions() {
        assert_eq!(HeaderKind::Int32.render("input.code"), "HeaderValue::Int32(input.code)");
        assert_eq!(HeaderKind::ByteArray.render("value"), "HeaderValue::ByteArray(value.into())");
    }
}
