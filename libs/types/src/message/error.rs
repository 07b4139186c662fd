//! Runtime marshalling errors
//!
//! Returned by every [`MarshallMessage`](super::MarshallMessage)
//! implementation. Callers decide whether to log, retry or report; nothing in
//! the marshalling path swallows these.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MarshallingError {
    /// Delegated payload serializer failed
    #[error("Failed to serialize event payload '{member}': {message}")]
    SerializationFailed { member: String, message: String },

    /// Structured payload member is optional and absent, and the generator
    /// was configured to reject that case
    #[error("Event payload member '{member}' is absent and has no byte representation")]
    MissingPayload { member: String },

    /// Non-optional member missing from a dynamically typed value
    #[error("Required member '{member}' of '{structure}' is missing")]
    MissingMember { structure: String, member: String },

    /// Dynamically typed value does not match the member's shape
    #[error("Member '{member}' expected a {expected} value, found {found}")]
    ValueMismatch {
        member: String,
        expected: &'static str,
        found: &'static str,
    },

    /// String value for an enum-backed header is not one of the enum's values
    #[error("'{value}' is not a valid value for enum member '{member}'")]
    InvalidEnumValue { member: String, value: String },

    #[error("Unsupported event stream combination: {0}")]
    Unsupported(String),
}

impl MarshallingError {
    pub fn serialization(member: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SerializationFailed {
            member: member.into(),
            message: message.into(),
        }
    }

    pub fn missing_payload(member: impl Into<String>) -> Self {
        Self::MissingPayload {
            member: member.into(),
        }
    }
}
