//! # Structured Payload Serializer
//!
//! Payloads that are neither raw bytes nor text are handed to a
//! protocol-specific serializer. The marshaller holds it as an
//! `Arc<dyn PayloadSerializer>`, so one serializer instance is shared by every
//! plan generated for a protocol.

mod json;

pub use json::JsonPayloadSerializer;

use bytes::Bytes;
use thiserror::Error;
use types::{Model, ModelError, Record, ShapeId, Value};

/// Structured serialization failures
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SerializationError {
    #[error("Value for {shape} must be a {expected}, found {found}")]
    TypeMismatch {
        shape: ShapeId,
        expected: &'static str,
        found: &'static str,
    },

    #[error("Required member '{member}' of {structure} is missing")]
    MissingMember { structure: ShapeId, member: String },

    #[error("Union {union} has no variant '{variant}'")]
    UnknownVariant { union: ShapeId, variant: String },

    #[error("'{value}' is not a value of enum {shape}")]
    InvalidEnumValue { shape: ShapeId, value: String },

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error("{0}")]
    Custom(String),
}

pub trait PayloadSerializer: Send + Sync {
    /// Media type of the produced bytes
    fn content_type(&self) -> &str;

    /// Serialize `value` as an instance of `shape`
    fn serialize(&self, model: &Model, shape: &ShapeId, value: &Value)
        -> Result<Bytes, SerializationError>;

    /// Serialize a whole structure
    fn serialize_record(
        &self,
        model: &Model,
        shape: &ShapeId,
        record: &Record,
    ) -> Result<Bytes, SerializationError> {
        self.serialize(model, shape, &Value::Record(record.clone()))
    }
}
