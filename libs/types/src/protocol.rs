//! Protocol identifiers declared by services and supported by generators

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a wire protocol, e.g. `aws.protocols#restJson1`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProtocolId(String);

impl ProtocolId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProtocolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProtocolId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ProtocolId {
    fn from(id: String) -> Self {
        Self(id)
    }
}
