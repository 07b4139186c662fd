//! # Model
//!
//! Read-only shape graph handed to the generator. Prelude primitives
//! (`smithy.api#Blob`, `smithy.api#String`, ...) are always present so
//! members can target them without declaring them.

use crate::shape::{
    PrimitiveKind, ServiceShape, Shape, ShapeId, StructureShape, UnionShape,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Shape lookup failures
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ModelError {
    #[error("Shape {0} not found in model")]
    ShapeNotFound(ShapeId),

    #[error("Shape {id} is a {found}, expected a {expected}")]
    UnexpectedShape {
        id: ShapeId,
        expected: &'static str,
        found: &'static str,
    },

    #[error("Invalid model document: {0}")]
    InvalidDocument(String),
}

const PRELUDE: [(&str, PrimitiveKind); 10] = [
    ("Boolean", PrimitiveKind::Boolean),
    ("Byte", PrimitiveKind::Byte),
    ("Short", PrimitiveKind::Short),
    ("Integer", PrimitiveKind::Integer),
    ("Long", PrimitiveKind::Long),
    ("Float", PrimitiveKind::Float),
    ("Double", PrimitiveKind::Double),
    ("Blob", PrimitiveKind::Blob),
    ("String", PrimitiveKind::String),
    ("Timestamp", PrimitiveKind::Timestamp),
];

/// Immutable shape graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Model {
    shapes: BTreeMap<ShapeId, Shape>,
}

impl Model {
    pub fn builder() -> ModelBuilder {
        ModelBuilder::new()
    }

    /// Parse a JSON model document (`{"shapes": {"ns#Name": {...}}}`)
    pub fn from_json(document: &str) -> Result<Self, ModelError> {
        let parsed: Model = serde_json::from_str(document)
            .map_err(|e| ModelError::InvalidDocument(e.to_string()))?;
        let mut builder = ModelBuilder::new();
        for (id, shape) in parsed.shapes {
            builder = builder.shape(id, shape);
        }
        Ok(builder.build())
    }

    pub fn get(&self, id: &ShapeId) -> Option<&Shape> {
        self.shapes.get(id)
    }

    pub fn expect_shape(&self, id: &ShapeId) -> Result<&Shape, ModelError> {
        self.get(id)
            .ok_or_else(|| ModelError::ShapeNotFound(id.clone()))
    }

    pub fn expect_structure(&self, id: &ShapeId) -> Result<&StructureShape, ModelError> {
        match self.expect_shape(id)? {
            Shape::Structure(s) => Ok(s),
            other => Err(unexpected(id, "structure", other)),
        }
    }

    pub fn expect_union(&self, id: &ShapeId) -> Result<&UnionShape, ModelError> {
        match self.expect_shape(id)? {
            Shape::Union(u) => Ok(u),
            other => Err(unexpected(id, "union", other)),
        }
    }

    pub fn expect_service(&self, id: &ShapeId) -> Result<&ServiceShape, ModelError> {
        match self.expect_shape(id)? {
            Shape::Service(s) => Ok(s),
            other => Err(unexpected(id, "service", other)),
        }
    }

    /// All shapes, ordered by id
    pub fn shapes(&self) -> impl Iterator<Item = (&ShapeId, &Shape)> {
        self.shapes.iter()
    }
}

fn unexpected(id: &ShapeId, expected: &'static str, found: &Shape) -> ModelError {
    ModelError::UnexpectedShape {
        id: id.clone(),
        expected,
        found: found.kind_name(),
    }
}

/// Programmatic model construction
#[derive(Debug, Clone)]
pub struct ModelBuilder {
    shapes: BTreeMap<ShapeId, Shape>,
}

impl ModelBuilder {
    pub fn new() -> Self {
        let shapes = PRELUDE
            .iter()
            .map(|(name, kind)| (ShapeId::prelude(*name), Shape::primitive(*kind)))
            .collect();
        Self { shapes }
    }

    pub fn shape(mut self, id: ShapeId, shape: Shape) -> Self {
        self.shapes.insert(id, shape);
        self
    }

    pub fn structure(self, id: ShapeId, structure: StructureShape) -> Self {
        self.shape(id, Shape::Structure(structure))
    }

    pub fn union(self, id: ShapeId, union: UnionShape) -> Self {
        self.shape(id, Shape::Union(union))
    }

    pub fn service(self, id: ShapeId, service: ServiceShape) -> Self {
        self.shape(id, Shape::Service(service))
    }

    pub fn build(self) -> Model {
        Model {
            shapes: self.shapes,
        }
    }
}

impl Default for ModelBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::MemberShape;

    #[test]
    fn test_prelude_is_always_present() {
        let model = Model::builder().build();
        let blob = model.expect_shape(&ShapeId::prelude("Blob")).unwrap();
        assert!(blob.is_blob());
    }

    #[test]
    fn test_typed_lookup_reports_kind_mismatch() {
        let id = ShapeId::new("com.example", "Ping");
        let model = Model::builder()
            .structure(id.clone(), StructureShape::default())
            .build();

        assert!(model.expect_structure(&id).is_ok());
        assert_eq!(
            model.expect_union(&id),
            Err(ModelError::UnexpectedShape {
                id: id.clone(),
                expected: "union",
                found: "structure",
            })
        );
        assert_eq!(
            model.expect_shape(&ShapeId::new("com.example", "Missing")),
            Err(ModelError::ShapeNotFound(ShapeId::new("com.example", "Missing")))
        );
    }

    #[test]
    fn test_from_json_document() {
        let document = r#"{
            "shapes": {
                "com.example#Send": {
                    "type": "structure",
                    "members": [
                        {"name": "data", "target": "smithy.api#Blob", "placement": "payload"}
                    ]
                },
                "com.example#Events": {
                    "type": "union",
                    "members": [
                        {"name": "Send", "target": "com.example#Send"}
                    ]
                }
            }
        }"#;

        let model = Model::from_json(document).unwrap();
        let send = model
            .expect_structure(&ShapeId::new("com.example", "Send"))
            .unwrap();
        assert_eq!(
            send.members[0],
            MemberShape::new("data", ShapeId::prelude("Blob")).payload()
        );
        assert!(model.expect_shape(&ShapeId::prelude("String")).is_ok());
        assert!(model
            .expect_union(&ShapeId::new("com.example", "Events"))
            .is_ok());
    }

    #[test]
    fn test_from_json_rejects_bad_documents() {
        let err = Model::from_json("{\"shapes\": 3}").unwrap_err();
        assert!(matches!(err, ModelError::InvalidDocument(_)));
    }
}
