//! # Rust Source Emitter
//!
//! ## Purpose
//!
//! Renders a [`MarshallerPlan`] as Rust source: a public marshaller type
//! implementing `MarshallMessage` with one exhaustive `match` over the union,
//! plus a private `marshall_<variant>` function per variant. The generated
//! code follows the same frame layout as
//! [`EventStreamMarshaller`](crate::EventStreamMarshaller).
//!
//! ## Generated Surface
//!
//! ```text
//! pub struct <Union>Marshaller;
//! impl MarshallMessage for <Union>Marshaller {
//!     type Input = <model>::<Union>;
//!     fn marshall(&self, input) -> Result<Message, MarshallingError>
//! }
//! fn marshall_<variant>(headers: &mut Vec<Header>, input: <Structure>)
//!     -> Result<Vec<u8>, MarshallingError>
//! ```
//!
//! Structured payloads call `<serializer module>::ser_<shape>_payload(&value)`,
//! which must return `Result<Vec<u8>, E>` with `E: Display`.

mod symbols;

pub use symbols::{to_pascal_case, to_snake_case, DefaultSymbols, SymbolProvider};

use config::{EmitSettings, MissingPayloadPolicy};
use std::collections::HashMap;
use types::message::{
    CONTENT_TYPE_HEADER, EVENT_MESSAGE_TYPE, EVENT_TYPE_HEADER, MESSAGE_TYPE_HEADER,
};

use crate::assembler::{MarshallerPlan, VariantPlan};
use crate::error::{SchemaError, SchemaResult};
use crate::layout::HeaderMember;
use crate::payload::{PayloadStrategy, PayloadTarget};

const GENERATED_BANNER: &str = "// Code generated by framegen. DO NOT EDIT.";

/// Indenting line writer
#[derive(Default)]
struct SourceWriter {
    out: String,
    depth: usize,
}

impl SourceWriter {
    fn line(&mut self, text: impl AsRef<str>) {
        let text = text.as_ref();
        if !text.is_empty() {
            for _ in 0..self.depth {
                self.out.push_str("    ");
            }
            self.out.push_str(text);
        }
        self.out.push('\n');
    }

    fn open(&mut self, text: impl AsRef<str>) {
        self.line(text);
        self.depth += 1;
    }

    fn close(&mut self, text: impl AsRef<str>) {
        self.depth = self.depth.saturating_sub(1);
        self.line(text);
    }
}

fn literal(text: &str) -> String {
    format!("{text:?}")
}

fn push_header(w: &mut SourceWriter, name: &str, value: &str) {
    w.line(format!("headers.push(Header::new({}, {value}));", literal(name)));
}

pub struct RustEmitter<S = DefaultSymbols> {
    symbols: S,
    runtime_crate: String,
    policy: MissingPayloadPolicy,
}

impl RustEmitter<DefaultSymbols> {
    pub fn from_settings(emit: &EmitSettings, policy: MissingPayloadPolicy) -> Self {
        Self::new(
            DefaultSymbols::new(emit.model_module.as_str(), emit.serializer_module.as_str()),
            emit.runtime_crate.as_str(),
            policy,
        )
    }
}

impl<S: SymbolProvider> RustEmitter<S> {
    pub fn new(symbols: S, runtime_crate: impl Into<String>, policy: MissingPayloadPolicy) -> Self {
        Self {
            symbols,
            runtime_crate: runtime_crate.into(),
            policy,
        }
    }

    pub fn symbols(&self) -> &S {
        &self.symbols
    }

    /// Output file name for a plan, e.g. `test_stream_marshaller.rs`
    pub fn file_name(&self, plan: &MarshallerPlan) -> String {
        format!("{}.rs", to_snake_case(&self.symbols.marshaller_name(plan.union())))
    }

    /// Render the marshaller source for `plan`
    ///
    /// `structured_content_type` is the negotiated payload media type sent
    /// with serializer-produced payloads.
    pub fn render(&self, plan: &MarshallerPlan, structured_content_type: &str) -> SchemaResult<String> {
        self.check_symbols(plan)?;

        let mut w = SourceWriter::default();
        w.line(GENERATED_BANNER);
        w.line(format!("// Event stream marshaller for {}", plan.union()));
        w.line("");
        w.line(format!(
            "use {}::message::{{Header, HeaderValue, MarshallMessage, MarshallingError, Message}};",
            self.runtime_crate
        ));
        w.line("");

        self.render_marshaller(&mut w, plan);
        for variant in plan.variants() {
            w.line("");
            self.render_variant(&mut w, variant, structured_content_type);
        }
        Ok(w.out)
    }

    /// Distinct variants must not share an enum variant or function name
    fn check_symbols(&self, plan: &MarshallerPlan) -> SchemaResult<()> {
        let mut seen: HashMap<String, &str> = HashMap::new();
        for variant in plan.variants() {
            let symbols = [
                self.symbols.variant_name(&variant.wire_name),
                self.symbols.variant_fn(&variant.wire_name),
            ];
            for symbol in symbols {
                if let Some(first) = seen.get(&symbol) {
                    return Err(SchemaError::SymbolCollision {
                        union: plan.union().clone(),
                        symbol,
                        first: first.to_string(),
                        second: variant.wire_name.clone(),
                    });
                }
                seen.insert(symbol, variant.wire_name.as_str());
            }
        }
        Ok(())
    }

    fn render_marshaller(&self, w: &mut SourceWriter, plan: &MarshallerPlan) {
        let name = self.symbols.marshaller_name(plan.union());
        let union_path = self.symbols.type_path(plan.union());

        w.line(format!("/// Marshals `{}` events into event stream messages", plan.union().name()));
        w.line("#[derive(Debug, Clone, Copy, Default)]");
        w.line(format!("pub struct {name};"));
        w.line("");
        w.open(format!("impl {name} {{"));
        w.open("pub fn new() -> Self {");
        w.line("Self");
        w.close("}");
        w.close("}");
        w.line("");
        w.open(format!("impl MarshallMessage for {name} {{"));
        w.line(format!("type Input = {union_path};"));
        w.line("");
        w.open("fn marshall(&self, input: Self::Input) -> Result<Message, MarshallingError> {");
        w.line("let mut headers = Vec::new();");
        push_header(
            w,
            MESSAGE_TYPE_HEADER,
            &format!("HeaderValue::from({})", literal(EVENT_MESSAGE_TYPE)),
        );
        w.open("let payload = match input {");
        for variant in plan.variants() {
            w.open(format!(
                "{union_path}::{}(inner) => {{",
                self.symbols.variant_name(&variant.wire_name)
            ));
            push_header(
                w,
                EVENT_TYPE_HEADER,
                &format!("HeaderValue::from({})", literal(&variant.wire_name)),
            );
            w.line(format!(
                "{}(&mut headers, inner)?",
                self.symbols.variant_fn(&variant.wire_name)
            ));
            w.close("}");
        }
        w.close("};");
        w.line("Ok(headers.into_iter().fold(Message::new(payload), Message::add_header))");
        w.close("}");
        w.close("}");
    }

    fn render_variant(&self, w: &mut SourceWriter, variant: &VariantPlan, structured_content_type: &str) {
        let layout = &variant.layout;
        let uses_input = !layout.headers.is_empty()
            || !matches!(
                layout.payload,
                PayloadStrategy::Empty | PayloadStrategy::WholeStructure { target: PayloadTarget::Unit }
            );
        let param = if uses_input { "input" } else { "_input" };

        w.open(format!(
            "fn {}(headers: &mut Vec<Header>, {param}: {}) -> Result<Vec<u8>, MarshallingError> {{",
            self.symbols.variant_fn(&variant.wire_name),
            self.symbols.type_path(&variant.structure)
        ));

        for header in &layout.headers {
            self.render_header(w, header);
        }
        if let Some(content_type) = layout.payload.content_type(structured_content_type) {
            push_header(
                w,
                CONTENT_TYPE_HEADER,
                &format!("HeaderValue::from({})", literal(content_type)),
            );
        }
        self.render_payload(w, variant);
        w.close("}");
    }

    fn render_header(&self, w: &mut SourceWriter, header: &HeaderMember) {
        let field = format!("input.{}", self.symbols.field_name(&header.name));
        let value_expr = |expr: &str| {
            if header.is_enum_backed() {
                header.kind.render(&format!("{expr}.as_str().to_string()"))
            } else {
                header.kind.render(expr)
            }
        };

        if header.optional {
            w.open(format!("if let Some(value) = {field} {{"));
            push_header(w, &header.name, &value_expr("value"));
            w.close("}");
        } else {
            push_header(w, &header.name, &value_expr(&field));
        }
    }

    fn render_payload(&self, w: &mut SourceWriter, variant: &VariantPlan) {
        match &variant.layout.payload {
            PayloadStrategy::Empty | PayloadStrategy::WholeStructure { target: PayloadTarget::Unit } => {
                w.line("Ok(Vec::new())");
            }
            PayloadStrategy::WholeStructure { .. } => {
                w.line(self.serialize_call("&input", &variant.structure, &variant.wire_name));
            }
            PayloadStrategy::Member {
                member,
                target,
                optional,
            } => {
                let field = format!("input.{}", self.symbols.field_name(member));
                match (target, *optional) {
                    (PayloadTarget::Blob, false) => w.line(format!("Ok({field})")),
                    (PayloadTarget::Blob, true) => w.line(format!("Ok({field}.unwrap_or_default())")),
                    (PayloadTarget::Text, false) => w.line(format!("Ok({field}.into_bytes())")),
                    (PayloadTarget::Text, true) => {
                        w.line(format!("Ok({field}.map(String::into_bytes).unwrap_or_default())"))
                    }
                    (PayloadTarget::Structured(shape), false) => {
                        w.line(self.serialize_call(&format!("&{field}"), shape, member))
                    }
                    (PayloadTarget::Structured(shape), true) => {
                        w.open(format!("match {field} {{"));
                        w.line(format!("Some(value) => {},", self.serialize_call("&value", shape, member)));
                        match self.policy {
                            MissingPayloadPolicy::Reject => w.line(format!(
                                "None => Err(MarshallingError::missing_payload({})),",
                                literal(member)
                            )),
                            MissingPayloadPolicy::Empty => w.line("None => Ok(Vec::new()),"),
                        }
                        w.close("}");
                    }
                    (PayloadTarget::Unit, _) => w.line("Ok(Vec::new())"),
                }
            }
        }
    }

    fn serialize_call(&self, arg: &str, shape: &types::ShapeId, label: &str) -> String {
        format!(
            "{}({arg}).map_err(|err| MarshallingError::serialization({}, err.to_string()))",
            self.symbols.serializer_fn(shape),
            literal(label)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::LayoutCache;
    use types::{EnumShape, MemberShape, Model, Shape, ShapeId, StructureShape, UnionShape};

    fn id(name: &str) -> ShapeId {
        ShapeId::new("test.events", name)
    }

    fn plan() -> MarshallerPlan {
        let model = Model::builder()
            .shape(id("Level"), Shape::Enum(EnumShape::new(["LOW", "HIGH"])))
            .structure(id("Ping"), StructureShape::default())
            .structure(
                id("SendEvent"),
                StructureShape::new(vec![
                    MemberShape::new("traceId", ShapeId::prelude("String")).header().optional(),
                    MemberShape::new("code", ShapeId::prelude("Integer")).header(),
                    MemberShape::new("level", id("Level")).header(),
                    MemberShape::new("data", ShapeId::prelude("Blob")).payload(),
                ]),
            )
            .structure(
                id("Detail"),
                StructureShape::new(vec![MemberShape::new("note", ShapeId::prelude("String"))]),
            )
            .structure(
                id("Wrap"),
                StructureShape::new(vec![MemberShape::new("body", id("Detail")).payload().optional()]),
            )
            .union(
                id("TestStream"),
                UnionShape::new(vec![
                    MemberShape::new("Send", id("SendEvent")),
                    MemberShape::new("Ping", id("Ping")),
                    MemberShape::new("Detail", id("Detail")),
                    MemberShape::new("wrap_it", id("Wrap")),
                ]),
            )
            .build();
        MarshallerPlan::compile(&model, &id("TestStream"), &mut LayoutCache::new()).unwrap()
    }

    fn emitter(policy: MissingPayloadPolicy) -> RustEmitter {
        RustEmitter::new(DefaultSymbols::default(), "framegen_types", policy)
    }

    #[test]
    fn test_dispatch_is_exhaustive_without_wildcard() {
        let source = emitter(MissingPayloadPolicy::Reject).render(&plan(), "application/json").unwrap();
        assert!(source.starts_with(GENERATED_BANNER));
        assert!(source.contains("impl MarshallMessage for TestStreamMarshaller {"));
        assert!(source.contains("type Input = crate::model::TestStream;"));
        assert!(source.contains("crate::model::TestStream::Ping(inner) => {"));
        assert!(source.contains("crate::model::TestStream::WrapIt(inner) => {"));
        assert!(!source.contains("_ =>"));
    }

    #[test]
    fn test_event_type_uses_declared_name() {
        let source = emitter(MissingPayloadPolicy::Reject).render(&plan(), "application/json").unwrap();
        assert!(source.contains(r#"headers.push(Header::new(":event-type", HeaderValue::from("wrap_it")));"#));
        assert!(source.contains("marshall_wrap_it(&mut headers, inner)?"));
    }

    #[test]
    fn test_variant_function_headers_and_blob_payload() {
        let source = emitter(MissingPayloadPolicy::Reject).render(&plan(), "application/json").unwrap();
        let expected = r#"fn marshall_send(headers: &mut Vec<Header>, input: crate::model::SendEvent) -> Result<Vec<u8>, MarshallingError> {
    if let Some(value) = input.trace_id {
        headers.push(Header::new("traceId", HeaderValue::String(value)));
    }
    headers.push(Header::new("code", HeaderValue::Int32(input.code)));
    headers.push(Header::new("level", HeaderValue::String(input.level.as_str().to_string())));
    headers.push(Header::new(":content-type", HeaderValue::from("application/octet-stream")));
    Ok(input.data)
}"#;
        assert!(source.contains(expected), "{source}");
    }

    #[test]
    fn test_unit_and_whole_structure_payloads() {
        let source = emitter(MissingPayloadPolicy::Reject).render(&plan(), "application/json").unwrap();
        assert!(source.contains("fn marshall_ping(headers: &mut Vec<Header>, _input: crate::model::Ping)"));
        assert!(source.contains(
            r#"crate::protocol_serde::ser_detail_payload(&input).map_err(|err| MarshallingError::serialization("Detail", err.to_string()))"#
        ));
        assert!(source.contains(r#"HeaderValue::from("application/json")"#));
    }

    #[test]
    fn test_colliding_variant_symbols_are_rejected() {
        let model = Model::builder()
            .structure(id("Ping"), StructureShape::default())
            .union(
                id("Clash"),
                UnionShape::new(vec![
                    MemberShape::new("wrap_it", id("Ping")),
                    MemberShape::new("WrapIt", id("Ping")),
                ]),
            )
            .build();
        let plan = MarshallerPlan::compile(&model, &id("Clash"), &mut LayoutCache::new()).unwrap();

        let err = emitter(MissingPayloadPolicy::Reject)
            .render(&plan, "application/json")
            .unwrap_err();
        assert_eq!(
            err,
            SchemaError::SymbolCollision {
                union: id("Clash"),
                symbol: "WrapIt".to_string(),
                first: "WrapIt".to_string(),
                second: "wrap_it".to_string(),
            }
        );
    }

    #[test]
    fn test_absent_structured_payload_policy() {
        let reject = emitter(MissingPayloadPolicy::Reject).render(&plan(), "application/json").unwrap();
        assert!(reject.contains(r#"None => Err(MarshallingError::missing_payload("body")),"#));

        let empty = emitter(MissingPayloadPolicy::Empty).render(&plan(), "application/json").unwrap();
        assert!(empty.contains("None => Ok(Vec::new()),"));
    }
}
