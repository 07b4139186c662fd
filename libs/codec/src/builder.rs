//! # Event Message Builder
//!
//! Accumulates frame headers in emission order and packages the payload:
//!
//! ```text
//! new() ──► :message-type = "event"
//!   .event_type(name) ──► :event-type = name
//!   .header(..)*      ──► member headers, declaration order
//!   .content_type(ct) ──► :content-type
//!   .build(payload)   ──► Message
//! ```
//!
//! The builder never reorders headers; callers add them in the order above.

use bytes::Bytes;
use types::message::{
    CONTENT_TYPE_HEADER, EVENT_MESSAGE_TYPE, EVENT_TYPE_HEADER, MESSAGE_TYPE_HEADER,
};
use types::{Header, HeaderValue, Message};

#[derive(Debug, Clone)]
pub struct EventMessageBuilder {
    headers: Vec<Header>,
}

impl EventMessageBuilder {
    /// Start an event frame
    pub fn new() -> Self {
        Self {
            headers: vec![Header::new(
                MESSAGE_TYPE_HEADER,
                HeaderValue::from(EVENT_MESSAGE_TYPE),
            )],
        }
    }

    /// Set the variant wire name
    pub fn event_type(self, name: &str) -> Self {
        self.header(Header::new(EVENT_TYPE_HEADER, HeaderValue::from(name)))
    }

    pub fn header(mut self, header: Header) -> Self {
        self.headers.push(header);
        self
    }

    pub fn content_type(self, content_type: &str) -> Self {
        self.header(Header::new(CONTENT_TYPE_HEADER, HeaderValue::from(content_type)))
    }

    pub fn header_count(&self) -> usize {
        self.headers.len()
    }

    /// Build the final message
    pub fn build(self, payload: impl Into<Bytes>) -> Message {
        self.headers
            .into_iter()
            .fold(Message::new(payload), Message::add_header)
    }
}

impl Default for EventMessageBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_emission_order() {
        let message = EventMessageBuilder::new()
            .event_type("Send")
            .header(Header::new("code", HeaderValue::Int32(7)))
            .content_type("application/octet-stream")
            .build(b"hi".to_vec());

        let names: Vec<_> = message.headers().iter().map(Header::name).collect();
        assert_eq!(names, vec![":message-type", ":event-type", "code", ":content-type"]);
        assert_eq!(message.header(MESSAGE_TYPE_HEADER).and_then(HeaderValue::as_str), Some("event"));
        assert_eq!(&message.payload()[..], b"hi");
    }

    #[test]
    fn test_new_frame_carries_message_type_only() {
        let builder = EventMessageBuilder::default();
        assert_eq!(builder.header_count(), 1);
        let message = builder.build(Bytes::new());
        assert!(message.payload().is_empty());
        assert_eq!(message.header(CONTENT_TYPE_HEADER), None);
    }
}
