//! # Frame Assembler
//!
//! ## Purpose
//!
//! Compiles an event union into a [`MarshallerPlan`], with one classified
//! [`VariantPlan`] per variant, and interprets that plan at runtime through
//! [`EventStreamMarshaller`].
//!
//! ## Frame Layout
//!
//! ```text
//! :message-type = "event"
//! :event-type   = <variant name as declared>
//! <header members, declaration order, absent optionals omitted>
//! :content-type = <payload media type>      (only when a payload is selected)
//! payload       = raw | UTF-8 | serialized | empty
//! ```
//!
//! Any failure aborts the whole frame. Callers never see a partially
//! assembled [`Message`].

use bytes::Bytes;
use config::MissingPayloadPolicy;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, trace};
use types::{Header, MarshallMessage, MarshallingError, Message, Model, Record, Shape, ShapeId, Value};

use crate::builder::EventMessageBuilder;
use crate::error::{SchemaError, SchemaResult};
use crate::layout::{LayoutCache, StructureLayout};
use crate::payload::{PayloadStrategy, PayloadTarget};
use crate::serializer::PayloadSerializer;

/// Compiled variant of an event union
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantPlan {
    /// Member name as declared, used verbatim as `:event-type`
    pub wire_name: String,
    pub structure: ShapeId,
    pub layout: Arc<StructureLayout>,
}

/// Compiled event union, variants ordered by name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarshallerPlan {
    union: ShapeId,
    variants: Vec<VariantPlan>,
}

impl MarshallerPlan {
    pub fn compile(model: &Model, union_id: &ShapeId, cache: &mut LayoutCache) -> SchemaResult<Self> {
        let union = model.expect_union(union_id)?;

        let mut seen = HashSet::new();
        let mut variants = Vec::new();
        for member in union.variants() {
            if !seen.insert(member.name.as_str()) {
                return Err(SchemaError::DuplicateVariant {
                    union: union_id.clone(),
                    variant: member.name.clone(),
                });
            }

            let target = model.expect_shape(&member.target)?;
            if !matches!(target, Shape::Structure(_)) {
                return Err(SchemaError::VariantNotStructure {
                    union: union_id.clone(),
                    variant: member.name.clone(),
                    target: member.target.clone(),
                    found: target.kind_name(),
                });
            }

            let layout = cache.layout(model, &member.target)?;
            debug!(
                "{}: variant '{}' -> {} ({} headers, {:?})",
                union_id,
                member.name,
                member.target,
                layout.headers.len(),
                layout.payload
            );
            variants.push(VariantPlan {
                wire_name: member.name.clone(),
                structure: member.target.clone(),
                layout,
            });
        }
        if variants.is_empty() {
            return Err(SchemaError::EmptyUnion(union_id.clone()));
        }
        variants.sort_by(|a, b| a.wire_name.cmp(&b.wire_name));

        Ok(Self {
            union: union_id.clone(),
            variants,
        })
    }

    pub fn union(&self) -> &ShapeId {
        &self.union
    }

    pub fn variants(&self) -> &[VariantPlan] {
        &self.variants
    }

    pub fn variant(&self, name: &str) -> Option<&VariantPlan> {
        self.variants.iter().find(|v| v.wire_name == name)
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.variants.iter().position(|v| v.wire_name == name)
    }
}

/// Event value bound to one variant of a compiled union
///
/// Only [`EventStreamMarshaller::event`] creates these, so every event names a
/// variant the plan knows.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    union: ShapeId,
    index: usize,
    variant: String,
    record: Record,
}

impl Event {
    pub fn variant(&self) -> &str {
        &self.variant
    }

    pub fn record(&self) -> &Record {
        &self.record
    }
}

/// Runtime interpreter of a [`MarshallerPlan`]
#[derive(Clone)]
pub struct EventStreamMarshaller {
    model: Arc<Model>,
    plan: Arc<MarshallerPlan>,
    serializer: Arc<dyn PayloadSerializer>,
    policy: MissingPayloadPolicy,
}

impl EventStreamMarshaller {
    pub fn new(
        model: Arc<Model>,
        plan: Arc<MarshallerPlan>,
        serializer: Arc<dyn PayloadSerializer>,
        policy: MissingPayloadPolicy,
    ) -> Self {
        Self {
            model,
            plan,
            serializer,
            policy,
        }
    }

    pub fn plan(&self) -> &MarshallerPlan {
        &self.plan
    }

    /// Bind `record` to the variant named `variant`
    pub fn event(&self, variant: &str, record: Record) -> Option<Event> {
        let index = self.plan.position(variant)?;
        Some(Event {
            union: self.plan.union.clone(),
            index,
            variant: variant.to_string(),
            record,
        })
    }

    fn marshall_variant(&self, variant: &VariantPlan, record: &Record) -> Result<Message, MarshallingError> {
        let layout = &variant.layout;
        let mut builder = EventMessageBuilder::new().event_type(&variant.wire_name);

        for header in &layout.headers {
            match record.get(&header.name) {
                Some(value) => {
                    let encoded = header.encode(value)?;
                    builder = builder.header(Header::new(header.name.as_str(), encoded));
                }
                None if header.optional => {}
                None => return Err(missing_member(variant, &header.name)),
            }
        }

        let payload = self.payload(variant, record)?;
        if let Some(content_type) = layout.payload.content_type(self.serializer.content_type()) {
            builder = builder.content_type(content_type);
        }

        trace!(
            "Marshalled {} event with {} headers, {} payload bytes",
            variant.wire_name,
            builder.header_count(),
            payload.len()
        );
        Ok(builder.build(payload))
    }

    fn payload(&self, variant: &VariantPlan, record: &Record) -> Result<Bytes, MarshallingError> {
        match &variant.layout.payload {
            PayloadStrategy::Empty => Ok(Bytes::new()),
            PayloadStrategy::WholeStructure { target: PayloadTarget::Unit } => Ok(Bytes::new()),
            PayloadStrategy::WholeStructure { .. } => self
                .serializer
                .serialize_record(&self.model, &variant.structure, record)
                .map_err(|e| MarshallingError::serialization(variant.wire_name.as_str(), e.to_string())),
            PayloadStrategy::Member {
                member,
                target,
                optional,
            } => match record.get(member) {
                Some(value) => self.member_payload(member, target, value),
                None if !optional => Err(missing_member(variant, member)),
                None => match target {
                    PayloadTarget::Structured(_) if self.policy == MissingPayloadPolicy::Reject => {
                        Err(MarshallingError::missing_payload(member.as_str()))
                    }
                    _ => Ok(Bytes::new()),
                },
            },
        }
    }

    fn member_payload(&self, member: &str, target: &PayloadTarget, value: &Value) -> Result<Bytes, MarshallingError> {
        match (target, value) {
            (PayloadTarget::Blob, Value::Blob(bytes)) => Ok(Bytes::copy_from_slice(bytes)),
            (PayloadTarget::Text, Value::String(text)) => Ok(Bytes::copy_from_slice(text.as_bytes())),
            (PayloadTarget::Structured(shape), value) => self
                .serializer
                .serialize(&self.model, shape, value)
                .map_err(|e| MarshallingError::serialization(member, e.to_string())),
            (PayloadTarget::Unit, _) => Ok(Bytes::new()),
            (PayloadTarget::Blob, other) => Err(value_mismatch(member, "blob", other)),
            (PayloadTarget::Text, other) => Err(value_mismatch(member, "string", other)),
        }
    }
}

impl MarshallMessage for EventStreamMarshaller {
    type Input = Event;

    fn marshall(&self, input: Event) -> Result<Message, MarshallingError> {
        if input.union != self.plan.union {
            return Err(MarshallingError::Unsupported(format!(
                "event of {} passed to the {} marshaller",
                input.union, self.plan.union
            )));
        }
        let variant = self
            .plan
            .variants
            .get(input.index)
            .filter(|v| v.wire_name == input.variant)
            .ok_or_else(|| {
                MarshallingError::Unsupported(format!(
                    "{} marshaller has no variant '{}'",
                    self.plan.union, input.variant
                ))
            })?;
        self.marshall_variant(variant, &input.record)
    }
}

fn missing_member(variant: &VariantPlan, member: &str) -> MarshallingError {
    MarshallingError::MissingMember {
        structure: variant.structure.to_string(),
        member: member.to_string(),
    }
}

fn value_mismatch(member: &str, expected: &'static str, found: &Value) -> MarshallingError {
    MarshallingError::ValueMismatch {
        member: member.to_string(),
        expected,
        found: found.kind_name(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::serializer::JsonPayloadSerializer;
    use types::{HeaderValue, MemberShape, StructureShape, UnionShape};

    fn id(name: &str) -> ShapeId {
        ShapeId::new("test.events", name)
    }

    fn model() -> Model {
        Model::builder()
            .structure(id("Ping"), StructureShape::default())
            .structure(
                id("Detail"),
                StructureShape::new(vec![MemberShape::new("note", ShapeId::prelude("String"))]),
            )
            .structure(
                id("Wrap"),
                StructureShape::new(vec![
                    MemberShape::new("seq", ShapeId::prelude("Long")).header(),
                    MemberShape::new("body", id("Detail")).payload().optional(),
                ]),
            )
            .union(
                id("Stream"),
                UnionShape::new(vec![
                    MemberShape::new("Wrap", id("Wrap")),
                    MemberShape::new("Ping", id("Ping")),
                ]),
            )
            .build()
    }

    fn marshaller(policy: MissingPayloadPolicy) -> EventStreamMarshaller {
        let model = Arc::new(model());
        let plan = MarshallerPlan::compile(&model, &id("Stream"), &mut LayoutCache::new()).unwrap();
        EventStreamMarshaller::new(
            model,
            Arc::new(plan),
            Arc::new(JsonPayloadSerializer::default()),
            policy,
        )
    }

    #[test]
    fn test_variants_sorted_by_name() {
        let marshaller = marshaller(MissingPayloadPolicy::Reject);
        let names: Vec<_> = marshaller.plan().variants().iter().map(|v| v.wire_name.as_str()).collect();
        assert_eq!(names, vec!["Ping", "Wrap"]);
        assert!(marshaller.plan().variant("Pong").is_none());
        assert!(marshaller.event("Pong", Record::new()).is_none());
    }

    #[test]
    fn test_structured_member_payload() {
        let marshaller = marshaller(MissingPayloadPolicy::Reject);
        let body = Record::new().with("note", "hello");
        let event = marshaller
            .event("Wrap", Record::new().with("seq", 9i64).with("body", body))
            .unwrap();
        let message = marshaller.marshall(event).unwrap();

        assert_eq!(message.header("seq"), Some(&HeaderValue::Int64(9)));
        assert_eq!(
            message.header(":content-type").and_then(HeaderValue::as_str),
            Some("application/json")
        );
        assert_eq!(&message.payload()[..], br#"{"note":"hello"}"#);
    }

    #[test]
    fn test_absent_structured_payload_follows_policy() {
        let record = Record::new().with("seq", 1i64);

        let rejecting = marshaller(MissingPayloadPolicy::Reject);
        let err = rejecting
            .marshall(rejecting.event("Wrap", record.clone()).unwrap())
            .unwrap_err();
        assert_eq!(err, MarshallingError::missing_payload("body"));

        let lenient = marshaller(MissingPayloadPolicy::Empty);
        let message = lenient.marshall(lenient.event("Wrap", record).unwrap()).unwrap();
        assert!(message.payload().is_empty());
        assert_eq!(
            message.header(":content-type").and_then(HeaderValue::as_str),
            Some("application/json")
        );
    }

    #[test]
    fn test_missing_required_header_and_mismatch() {
        let marshaller = marshaller(MissingPayloadPolicy::Empty);
        let err = marshaller
            .marshall(marshaller.event("Wrap", Record::new()).unwrap())
            .unwrap_err();
        assert_eq!(
            err,
            MarshallingError::MissingMember {
                structure: "test.events#Wrap".to_string(),
                member: "seq".to_string(),
            }
        );

        let err = marshaller
            .marshall(marshaller.event("Wrap", Record::new().with("seq", "x")).unwrap())
            .unwrap_err();
        assert!(matches!(err, MarshallingError::ValueMismatch { expected: "long", .. }));
    }

    #[test]
    fn test_duplicate_variant_rejected() {
        let model = Model::builder()
            .structure(id("Ping"), StructureShape::default())
            .union(
                id("Stream"),
                UnionShape::new(vec![
                    MemberShape::new("Ping", id("Ping")),
                    MemberShape::new("Ping", id("Ping")),
                ]),
            )
            .build();
        let err = MarshallerPlan::compile(&model, &id("Stream"), &mut LayoutCache::new()).unwrap_err();
        assert_eq!(
            err,
            SchemaError::DuplicateVariant {
                union: id("Stream"),
                variant: "Ping".to_string(),
            }
        );
    }

    #[test]
    fn test_variant_must_target_structure() {
        let model = Model::builder()
            .union(
                id("Stream"),
                UnionShape::new(vec![MemberShape::new("Raw", ShapeId::prelude("Blob"))]),
            )
            .build();
        let err = MarshallerPlan::compile(&model, &id("Stream"), &mut LayoutCache::new()).unwrap_err();
        assert!(matches!(err, SchemaError::VariantNotStructure { found: "blob", .. }));
    }

    #[test]
    fn test_event_from_other_union_is_unsupported() {
        let model = Arc::new(
            Model::builder()
                .structure(id("Ping"), StructureShape::default())
                .union(id("Other"), UnionShape::new(vec![MemberShape::new("Ping", id("Ping"))]))
                .build(),
        );
        let plan = MarshallerPlan::compile(&model, &id("Other"), &mut LayoutCache::new()).unwrap();
        let other = EventStreamMarshaller::new(
            model,
            Arc::new(plan),
            Arc::new(JsonPayloadSerializer::default()),
            MissingPayloadPolicy::Reject,
        );
        let event = other.event("Ping", Record::new()).unwrap();

        let err = marshaller(MissingPayloadPolicy::Reject).marshall(event).unwrap_err();
        assert!(matches!(err, MarshallingError::Unsupported(_)));
    }

    fn single_variant(variant: &str) -> EventStreamMarshaller {
        let model = Arc::new(
            Model::builder()
                .structure(id(variant), StructureShape::default())
                .union(id("Stream"), UnionShape::new(vec![MemberShape::new(variant, id(variant))]))
                .build(),
        );
        let plan = MarshallerPlan::compile(&model, &id("Stream"), &mut LayoutCache::new()).unwrap();
        EventStreamMarshaller::new(
            model,
            Arc::new(plan),
            Arc::new(JsonPayloadSerializer::default()),
            MissingPayloadPolicy::Reject,
        )
    }

    #[test]
    fn test_event_from_same_union_with_other_variants_is_unsupported() {
        let alpha = single_variant("Alpha");
        let beta = single_variant("Beta");
        let event = alpha.event("Alpha", Record::new()).unwrap();

        let err = beta.marshall(event.clone()).unwrap_err();
        assert!(matches!(err, MarshallingError::Unsupported(_)));

        let message = alpha.marshall(event).unwrap();
        assert_eq!(
            message.header(":event-type").and_then(HeaderValue::as_str),
            Some("Alpha")
        );
    }
}
