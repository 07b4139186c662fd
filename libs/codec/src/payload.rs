//! # Payload Strategy Selector
//!
//! ## Purpose
//!
//! Decides, once per event structure, where the frame payload comes from and
//! which `:content-type` accompanies it. Rules apply in priority order:
//!
//! ```text
//! payload member present ──► that member (blob / text / serializer)
//!        │ no
//!        ▼
//! no annotated members ────► the whole structure (serializer, or unit)
//!        │ no
//!        ▼
//! header members only ─────► empty payload, no :content-type
//! ```

use tracing::{debug, warn};
use types::{Model, Placement, ShapeId, StructureShape};

use crate::error::SchemaResult;

/// Content type for raw byte payloads
pub const OCTET_STREAM: &str = "application/octet-stream";
/// Content type for UTF-8 text payloads
pub const TEXT_PLAIN: &str = "text/plain";

/// How a payload value becomes bytes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PayloadTarget {
    /// Raw bytes, `application/octet-stream`
    Blob,
    /// UTF-8 bytes, `text/plain`
    Text,
    /// Delegated to the structured serializer with the protocol content type
    Structured(ShapeId),
    /// Memberless structure sent as empty bytes, `application/octet-stream`
    Unit,
}

impl PayloadTarget {
    /// Classify a payload member's target shape
    pub fn for_member(model: &Model, target: &ShapeId) -> SchemaResult<Self> {
        let shape = model.expect_shape(target)?;
        let payload = match shape {
            s if s.is_blob() => PayloadTarget::Blob,
            s if s.is_string() => PayloadTarget::Text,
            _ => PayloadTarget::Structured(target.clone()),
        };
        Ok(payload)
    }

    /// Classify an unannotated structure carried as the whole payload
    pub fn for_structure(id: &ShapeId, structure: &StructureShape) -> Self {
        if structure.is_empty() {
            PayloadTarget::Unit
        } else {
            PayloadTarget::Structured(id.clone())
        }
    }

    pub fn content_type<'a>(&self, structured: &'a str) -> &'a str {
        match self {
            PayloadTarget::Blob | PayloadTarget::Unit => OCTET_STREAM,
            PayloadTarget::Text => TEXT_PLAIN,
            PayloadTarget::Structured(_) => structured,
        }
    }
}

/// Payload source for one event structure
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PayloadStrategy {
    /// The single `payload`-placed member
    Member {
        member: String,
        target: PayloadTarget,
        optional: bool,
    },
    /// The entire structure, which has no annotated members
    WholeStructure { target: PayloadTarget },
    /// Header members only
    Empty,
}

impl PayloadStrategy {
    pub fn select(model: &Model, id: &ShapeId, structure: &StructureShape) -> SchemaResult<Self> {
        let mut payload_members = structure
            .members()
            .filter(|m| m.placement == Placement::Payload);

        if let Some(member) = payload_members.next() {
            let ignored: Vec<&str> = payload_members.map(|m| m.name.as_str()).collect();
            if !ignored.is_empty() {
                warn!(
                    "Structure {} has more than one payload member, using '{}' and ignoring {:?}",
                    id, member.name, ignored
                );
            }
            let target = PayloadTarget::for_member(model, &member.target)?;
            debug!("{}: payload from member '{}' ({:?})", id, member.name, target);
            return Ok(PayloadStrategy::Member {
                member: member.name.clone(),
                target,
                optional: member.optional,
            });
        }

        if structure.members().all(|m| !m.is_annotated()) {
            let target = PayloadTarget::for_structure(id, structure);
            debug!("{}: whole structure is the payload ({:?})", id, target);
            return Ok(PayloadStrategy::WholeStructure { target });
        }

        debug!("{}: header members only, empty payload", id);
        Ok(PayloadStrategy::Empty)
    }

    /// `:content-type` value, `None` when no content-type header is sent
    pub fn content_type<'a>(&self, structured: &'a str) -> Option<&'a str> {
        match self {
            PayloadStrategy::Member { target, .. } | PayloadStrategy::WholeStructure { target } => {
                Some(target.content_type(structured))
            }
            PayloadStrategy::Empty => None,
        }
    }
}
