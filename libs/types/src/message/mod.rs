//! # Event Stream Message
//!
//! One discrete frame of the event stream protocol: an ordered header list
//! and an opaque payload.
//!
//! ```text
//! ┌───────────────────────────────────────────┬──────────────────────┐
//! │ Headers                                   │ Payload              │
//! │ :message-type, :event-type, members...,   │ raw / UTF-8 /        │
//! │ :content-type                             │ serialized record    │
//! └───────────────────────────────────────────┴──────────────────────┘
//! ```
//!
//! The protocol is order-independent, but marshallers emit headers in a fixed
//! order so frames are deterministic.

mod error;
mod header;

pub use error::MarshallingError;
pub use header::{Header, HeaderEncodeError, HeaderValue, HeaderValueType};

use bytes::Bytes;

/// Reserved header carrying the frame kind
pub const MESSAGE_TYPE_HEADER: &str = ":message-type";
/// Reserved header carrying the variant wire name
pub const EVENT_TYPE_HEADER: &str = ":event-type";
/// Reserved header carrying the payload media type
pub const CONTENT_TYPE_HEADER: &str = ":content-type";
/// `:message-type` value for event frames
pub const EVENT_MESSAGE_TYPE: &str = "event";

/// Event stream frame
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Message {
    headers: Vec<Header>,
    payload: Bytes,
}

impl Message {
    pub fn new(payload: impl Into<Bytes>) -> Self {
        Self {
            headers: Vec::new(),
            payload: payload.into(),
        }
    }

    /// Append a header, keeping emission order
    pub fn add_header(mut self, header: Header) -> Self {
        self.headers.push(header);
        self
    }

    pub fn headers(&self) -> &[Header] {
        &self.headers
    }

    /// First header with the given name
    pub fn header(&self, name: &str) -> Option<&HeaderValue> {
        self.headers
            .iter()
            .find(|h| h.name() == name)
            .map(Header::value)
    }

    pub fn payload(&self) -> &Bytes {
        &self.payload
    }

    /// Encode the header block in emission order
    pub fn encode_headers(&self) -> Result<Vec<u8>, HeaderEncodeError> {
        let mut out = Vec::new();
        for header in &self.headers {
            header.encode_into(&mut out)?;
        }
        Ok(out)
    }
}

/// Converts an in-memory event into a [`Message`]
///
/// Implemented by generated marshallers and by the plan interpreter. Each call
/// owns its header list and payload buffer, so implementations are safe to
/// call concurrently through `&self`.
pub trait MarshallMessage {
    type Input;

    fn marshall(&self, input: Self::Input) -> Result<Message, MarshallingError>;
}
