//! Generation-time errors
//!
//! Raised while compiling a shape model into marshalling plans or Rust
//! source. These abort generation for the affected type; they never surface
//! from a marshalling call, which reports [`types::MarshallingError`] instead.

use config::UnresolvedProtocol;
use thiserror::Error;
use types::{ModelError, ProtocolId, ShapeId};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SchemaError {
    /// Header-annotated member targets a shape with no header encoding
    #[error("Unsupported event stream header shape type: member '{member}' of {structure} targets {target} ({kind})")]
    UnsupportedHeaderShape {
        structure: ShapeId,
        member: String,
        target: ShapeId,
        kind: &'static str,
    },

    /// Union variant must target a structure
    #[error("Event stream variant '{variant}' of {union} targets {target}, which is a {found}, not a structure")]
    VariantNotStructure {
        union: ShapeId,
        variant: String,
        target: ShapeId,
        found: &'static str,
    },

    #[error("Event stream union {0} has no variants")]
    EmptyUnion(ShapeId),

    #[error("Event stream union {union} declares variant '{variant}' more than once")]
    DuplicateVariant { union: ShapeId, variant: String },

    /// Two variants render to the same Rust identifier
    #[error("Variants '{first}' and '{second}' of {union} both map to the Rust symbol '{symbol}'")]
    SymbolCollision {
        union: ShapeId,
        symbol: String,
        first: String,
        second: String,
    },

    #[error("No structured payload serializer available for protocol {0}")]
    NoPayloadSerializer(ProtocolId),

    #[error("Failed to write generated source {0}")]
    Output(String),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Protocol(#[from] UnresolvedProtocol),
}

/// Result type for generation-time operations
pub type SchemaResult<T> = std::result::Result<T, SchemaError>;
