//! Shape identifiers
//!
//! A shape is addressed as `namespace#Name`. The bare name is the undecorated
//! model name; it is the value that reaches the wire (`:event-type`), never an
//! identifier-safe rendering of it.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors raised while parsing a shape identifier
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ShapeIdError {
    #[error("Shape id '{0}' is missing the '#' separator")]
    MissingSeparator(String),

    #[error("Shape id '{0}' has an empty namespace or name")]
    EmptyComponent(String),
}

/// Absolute shape identifier (`namespace#Name`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ShapeId {
    namespace: String,
    name: String,
}

impl ShapeId {
    /// Create a shape id from its two components
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Undecorated model name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Shape id for a prelude shape such as `smithy.api#String`
    pub fn prelude(name: impl Into<String>) -> Self {
        Self::new("smithy.api", name)
    }
}

impl fmt::Display for ShapeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.namespace, self.name)
    }
}

impl FromStr for ShapeId {
    type Err = ShapeIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (namespace, name) = s
            .split_once('#')
            .ok_or_else(|| ShapeIdError::MissingSeparator(s.to_string()))?;
        if namespace.is_empty() || name.is_empty() {
            return Err(ShapeIdError::EmptyComponent(s.to_string()));
        }
        Ok(Self::new(namespace, name))
    }
}

impl TryFrom<String> for ShapeId {
    type Error = ShapeIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ShapeId> for String {
    fn from(id: ShapeId) -> Self {
        id.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display() {
        let id: ShapeId = "com.example#Ping".parse().unwrap();
        assert_eq!(id.namespace(), "com.example");
        assert_eq!(id.name(), "Ping");
        assert_eq!(id.to_string(), "com.example#Ping");
    }

    #[test]
    fn test_parse_rejects_malformed_ids() {
        assert_eq!(
            "Ping".parse::<ShapeId>(),
            Err(ShapeIdError::MissingSeparator("Ping".to_string()))
        );
        assert_eq!(
            "#Ping".parse::<ShapeId>(),
            Err(ShapeIdError::EmptyComponent("#Ping".to_string()))
        );
    }

    #[test]
    fn test_serde_uses_string_form() {
        let id = ShapeId::new("com.example", "Send");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"com.example#Send\"");
        let back: ShapeId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
