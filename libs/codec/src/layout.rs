//! Member classification
//!
//! Every structure reachable from an event union is classified once into
//! its header members and payload strategy. Frame assembly and source
//! emission both read the cached [`StructureLayout`] instead of querying
//! placement annotations themselves.

use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;
use types::{HeaderValue, MarshallingError, Model, Placement, Shape, ShapeId, Value};

use crate::error::{SchemaError, SchemaResult};
use crate::header::HeaderKind;
use crate::payload::PayloadStrategy;

/// A `header`-placed member with its resolved header kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderMember {
    /// Member name, also the wire header name
    pub name: String,
    pub kind: HeaderKind,
    pub optional: bool,
    /// Allowed values when the target is an enum, carried as a string
    pub enum_values: Option<Vec<String>>,
}

impl HeaderMember {
    pub fn is_enum_backed(&self) -> bool {
        self.enum_values.is_some()
    }

    /// Encode a runtime value, checking enum membership
    pub fn encode(&self, value: &Value) -> Result<HeaderValue, MarshallingError> {
        let encoded = self.kind.encode(&self.name, value)?;
        if let (Some(values), HeaderValue::String(s)) = (&self.enum_values, &encoded) {
            if !values.contains(s) {
                return Err(MarshallingError::InvalidEnumValue {
                    member: self.name.clone(),
                    value: s.clone(),
                });
            }
        }
        Ok(encoded)
    }
}

/// Classified structure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructureLayout {
    pub shape: ShapeId,
    /// Header members in declaration order
    pub headers: Vec<HeaderMember>,
    pub payload: PayloadStrategy,
}

impl StructureLayout {
    pub fn classify(model: &Model, id: &ShapeId) -> SchemaResult<Self> {
        let structure = model.expect_structure(id)?;

        let mut headers = Vec::new();
        for member in structure.members().filter(|m| m.placement == Placement::Header) {
            let target = model.expect_shape(&member.target)?;
            let kind = HeaderKind::for_shape(target).ok_or_else(|| {
                SchemaError::UnsupportedHeaderShape {
                    structure: id.clone(),
                    member: member.name.clone(),
                    target: member.target.clone(),
                    kind: target.kind_name(),
                }
            })?;
            debug!("{}: header member '{}' as {:?}", id, member.name, kind);
            headers.push(HeaderMember {
                name: member.name.clone(),
                kind,
                optional: member.optional,
                enum_values: match target {
                    Shape::Enum(e) => Some(e.values.clone()),
                    _ => None,
                },
            });
        }

        let payload = PayloadStrategy::select(model, id, structure)?;
        Ok(Self {
            shape: id.clone(),
            headers,
            payload,
        })
    }
}

/// Classification cache keyed by structure id
#[derive(Debug, Default)]
pub struct LayoutCache {
    layouts: HashMap<ShapeId, Arc<StructureLayout>>,
}

impl LayoutCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached layout for `id`, classifying it on first use
    pub fn layout(&mut self, model: &Model, id: &ShapeId) -> SchemaResult<Arc<StructureLayout>> {
        if let Some(layout) = self.layouts.get(id) {
            return Ok(Arc::clone(layout));
        }
        let layout = Arc::new(StructureLayout::classify(model, id)?);
        self.layouts.insert(id.clone(), Arc::clone(&layout));
        Ok(layout)
    }

    pub fn len(&self) -> usize {
        self.layouts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layouts.is_empty()
    }
}
