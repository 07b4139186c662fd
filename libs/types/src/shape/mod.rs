//! # Shape Model
//!
//! Immutable graph of named shapes consumed by the generator: primitives,
//! aggregates, structures with ordered members, unions whose variants each
//! target one structure, and services declaring their protocols.
//!
//! Member placement is a closed classification ([`Placement`]) rather than an
//! open trait bag, so every consumer sees exactly one of none, header or
//! payload per member.

mod id;
mod member;

pub use id::{ShapeId, ShapeIdError};
pub use member::{MemberShape, Placement};

use crate::protocol::ProtocolId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Primitive shape kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveKind {
    Boolean,
    Byte,
    Short,
    Integer,
    Long,
    Float,
    Double,
    Blob,
    String,
    Timestamp,
}

impl PrimitiveKind {
    pub fn name(&self) -> &'static str {
        match self {
            PrimitiveKind::Boolean => "boolean",
            PrimitiveKind::Byte => "byte",
            PrimitiveKind::Short => "short",
            PrimitiveKind::Integer => "integer",
            PrimitiveKind::Long => "long",
            PrimitiveKind::Float => "float",
            PrimitiveKind::Double => "double",
            PrimitiveKind::Blob => "blob",
            PrimitiveKind::String => "string",
            PrimitiveKind::Timestamp => "timestamp",
        }
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Any shape in the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Shape {
    Primitive { kind: PrimitiveKind },
    Enum(EnumShape),
    List(ListShape),
    Map(MapShape),
    Structure(StructureShape),
    Union(UnionShape),
    Service(ServiceShape),
}

impl Shape {
    pub fn primitive(kind: PrimitiveKind) -> Self {
        Shape::Primitive { kind }
    }

    /// Human readable kind, used in diagnostics
    pub fn kind_name(&self) -> &'static str {
        match self {
            Shape::Primitive { kind } => kind.name(),
            Shape::Enum(_) => "enum",
            Shape::List(_) => "list",
            Shape::Map(_) => "map",
            Shape::Structure(_) => "structure",
            Shape::Union(_) => "union",
            Shape::Service(_) => "service",
        }
    }

    pub fn as_primitive(&self) -> Option<PrimitiveKind> {
        match self {
            Shape::Primitive { kind } => Some(*kind),
            _ => None,
        }
    }

    pub fn is_blob(&self) -> bool {
        self.as_primitive() == Some(PrimitiveKind::Blob)
    }

    pub fn is_string(&self) -> bool {
        self.as_primitive() == Some(PrimitiveKind::String)
    }
}

/// String enumeration; carried as a string on the wire
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EnumShape {
    pub values: Vec<String>,
}

impl EnumShape {
    pub fn new<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    pub fn contains(&self, value: &str) -> bool {
        self.values.iter().any(|v| v == value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListShape {
    pub member: ShapeId,
}

/// Map with string keys
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapShape {
    pub value: ShapeId,
}

/// Ordered set of named members
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StructureShape {
    #[serde(default)]
    pub members: Vec<MemberShape>,
}

impl StructureShape {
    pub fn new(members: Vec<MemberShape>) -> Self {
        Self { members }
    }

    /// Members in declaration order
    pub fn members(&self) -> impl Iterator<Item = &MemberShape> {
        self.members.iter()
    }

    pub fn member(&self, name: &str) -> Option<&MemberShape> {
        self.members.iter().find(|m| m.name == name)
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Tagged union; each variant member targets a structure
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UnionShape {
    #[serde(default)]
    pub members: Vec<MemberShape>,
}

impl UnionShape {
    pub fn new(members: Vec<MemberShape>) -> Self {
        Self { members }
    }

    pub fn variants(&self) -> impl Iterator<Item = &MemberShape> {
        self.members.iter()
    }

    pub fn variant(&self, name: &str) -> Option<&MemberShape> {
        self.members.iter().find(|m| m.name == name)
    }
}

/// Service declaration
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ServiceShape {
    /// Protocols the service declares support for, in declaration order
    #[serde(default)]
    pub protocols: Vec<ProtocolId>,

    /// Event stream unions exposed by the service
    #[serde(default)]
    pub event_streams: Vec<ShapeId>,
}
