//! # Framegen Types Library
//!
//! Shared type system for the event stream marshaller generator.
//!
//! ## Design Philosophy
//!
//! - **Immutable Model**: The shape graph is built once and only read afterwards
//! - **Closed Placement**: Every member is classified as none, header or payload
//! - **Typed Headers**: Header values carry their wire type, never a loose string
//! - **Separate Error Channels**: Runtime [`MarshallingError`] lives here, generation-time
//!   errors live with the generator
//!
//! ## Architecture Role
//!
//! ```text
//! libs/types → [codec generator] → generated marshallers
//!     ↑              ↓                    ↓
//! Shape Model    Frame Assembly       Message
//! Values         Payload Strategy     Header block
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use types::message::{Header, HeaderValue, Message};
//!
//! let message = Message::new(b"hi".to_vec())
//!     .add_header(Header::new(":message-type", HeaderValue::from("event")))
//!     .add_header(Header::new(":event-type", HeaderValue::from("Send")));
//!
//! assert_eq!(message.header(":event-type"), Some(&HeaderValue::from("Send")));
//! ```

pub mod message;
pub mod model;
pub mod protocol;
pub mod shape;
pub mod value;

pub use message::{
    Header, HeaderEncodeError, HeaderValue, HeaderValueType, MarshallMessage, MarshallingError,
    Message,
};
pub use model::{Model, ModelBuilder, ModelError};
pub use protocol::ProtocolId;
pub use shape::{
    EnumShape, ListShape, MapShape, MemberShape, Placement, PrimitiveKind, ServiceShape, Shape,
    ShapeId, ShapeIdError, StructureShape, UnionShape,
};
pub use value::{Record, Value};
