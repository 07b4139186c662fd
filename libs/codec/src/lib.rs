//! # Framegen Codec - Event Stream Marshaller Generation
//!
//! ## Purpose
//!
//! Turns an event union from the shape model into marshalling logic for the
//! event stream wire format:
//! - Header value encoding per target shape
//! - Member classification into headers and payload, cached per structure
//! - Payload strategy and content-type selection
//! - Frame assembly, interpreted at runtime or rendered as Rust source
//! - JSON structured payload serialization
//!
//! ## Architecture Role
//!
//! ```text
//! libs/types ──► [codec] ──► Message / generated .rs
//!     ↑             ↑
//! Shape model   libs/config
//! Wire types    settings, protocol resolution
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use codec::{EventStreamMarshaller, JsonPayloadSerializer, LayoutCache, MarshallerPlan};
//! use config::MissingPayloadPolicy;
//! use std::sync::Arc;
//! use types::{MarshallMessage, MemberShape, Model, Record, ShapeId, StructureShape, UnionShape};
//!
//! let send = ShapeId::new("demo", "Send");
//! let stream = ShapeId::new("demo", "Stream");
//! let model = Arc::new(
//!     Model::builder()
//!         .structure(
//!             send.clone(),
//!             StructureShape::new(vec![MemberShape::new("data", ShapeId::prelude("Blob")).payload()]),
//!         )
//!         .union(stream.clone(), UnionShape::new(vec![MemberShape::new("Send", send)]))
//!         .build(),
//! );
//!
//! let plan = MarshallerPlan::compile(&model, &stream, &mut LayoutCache::new()).unwrap();
//! let marshaller = EventStreamMarshaller::new(
//!     model,
//!     Arc::new(plan),
//!     Arc::new(JsonPayloadSerializer::default()),
//!     MissingPayloadPolicy::Reject,
//! );
//!
//! let event = marshaller.event("Send", Record::new().with("data", b"hi".to_vec())).unwrap();
//! let message = marshaller.marshall(event).unwrap();
//! assert_eq!(&message.payload()[..], b"hi");
//! ```
//!
//! ## What This Crate Does NOT Contain
//! - Unmarshalling of received frames
//! - Prelude and CRC framing beneath the header block
//! - Stream or connection management

pub mod assembler;
pub mod builder;
pub mod emit;
pub mod error;
pub mod generator;
pub mod header;
pub mod layout;
pub mod payload;
pub mod serializer;

pub use assembler::{Event, EventStreamMarshaller, MarshallerPlan, VariantPlan};
pub use builder::EventMessageBuilder;
pub use emit::{DefaultSymbols, RustEmitter, SymbolProvider};
pub use error::{SchemaError, SchemaResult};
pub use generator::{EventStreamGenerator, GeneratedFile};
pub use header::HeaderKind;
pub use layout::{HeaderMember, LayoutCache, StructureLayout};
pub use payload::{PayloadStrategy, PayloadTarget, OCTET_STREAM, TEXT_PLAIN};
pub use serializer::{JsonPayloadSerializer, PayloadSerializer, SerializationError};
