//! Structure and union members

use super::ShapeId;
use serde::{Deserialize, Serialize};

/// Where a member's value is carried in an event frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Placement {
    /// Unannotated; only reachable through whole-structure payloads
    #[default]
    None,
    /// Becomes a named frame header
    Header,
    /// Becomes the frame payload
    Payload,
}

/// Named member pointing at a target shape
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberShape {
    /// Original model name, used verbatim on the wire
    pub name: String,
    pub target: ShapeId,
    /// Absent values are omitted from the frame instead of failing
    #[serde(default)]
    pub optional: bool,
    #[serde(default)]
    pub placement: Placement,
}

impl MemberShape {
    /// Required, unannotated member
    pub fn new(name: impl Into<String>, target: ShapeId) -> Self {
        Self {
            name: name.into(),
            target,
            optional: false,
            placement: Placement::None,
        }
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    pub fn header(mut self) -> Self {
        self.placement = Placement::Header;
        self
    }

    pub fn payload(mut self) -> Self {
        self.placement = Placement::Payload;
        self
    }

    pub fn is_annotated(&self) -> bool {
        self.placement != Placement::None
    }
}
