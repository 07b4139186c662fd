//! Identifier-safe names for emitted source
//!
//! Wire names never pass through here; only Rust identifiers and paths do.

use types::ShapeId;

/// Naming collaborator used by the emitter
pub trait SymbolProvider {
    /// Rust type name for a shape
    fn type_name(&self, id: &ShapeId) -> String;

    /// Fully qualified path of the generated model type
    fn type_path(&self, id: &ShapeId) -> String;

    fn field_name(&self, member: &str) -> String;

    fn variant_name(&self, member: &str) -> String;

    /// Path of the structured serializer function for a payload shape
    fn serializer_fn(&self, target: &ShapeId) -> String;

    fn marshaller_name(&self, union: &ShapeId) -> String {
        format!("{}Marshaller", self.type_name(union))
    }

    /// Private per-variant marshalling function
    fn variant_fn(&self, member: &str) -> String {
        format!("marshall_{}", to_snake_case(member))
    }
}

/// Case conversion plus configurable module paths
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefaultSymbols {
    model_module: String,
    serializer_module: String,
}

impl DefaultSymbols {
    pub fn new(model_module: impl Into<String>, serializer_module: impl Into<String>) -> Self {
        Self {
            model_module: model_module.into(),
            serializer_module: serializer_module.into(),
        }
    }
}

impl Default for DefaultSymbols {
    fn default() -> Self {
        Self::new("crate::model", "crate::protocol_serde")
    }
}

impl SymbolProvider for DefaultSymbols {
    fn type_name(&self, id: &ShapeId) -> String {
        escape_type(to_pascal_case(id.name()))
    }

    fn type_path(&self, id: &ShapeId) -> String {
        format!("{}::{}", self.model_module, self.type_name(id))
    }

    fn field_name(&self, member: &str) -> String {
        escape_ident(to_snake_case(member))
    }

    fn variant_name(&self, member: &str) -> String {
        escape_type(to_pascal_case(member))
    }

    fn serializer_fn(&self, target: &ShapeId) -> String {
        format!("{}::ser_{}_payload", self.serializer_module, to_snake_case(target.name()))
    }
}

const KEYWORDS: &[&str] = &[
    "as", "async", "await", "break", "const", "continue", "dyn", "else", "enum", "extern",
    "false", "fn", "for", "if", "impl", "in", "let", "loop", "match", "mod", "move", "mut",
    "pub", "ref", "return", "static", "struct", "trait", "true", "type", "unsafe", "use",
    "where", "while", "abstract", "become", "box", "do", "final", "gen", "macro", "override",
    "priv", "try", "typeof", "unsized", "virtual", "yield",
];

/// Keywords that cannot be raw identifiers
const UNRAWABLE: &[&str] = &["crate", "self", "super", "Self"];

fn escape_ident(name: String) -> String {
    if UNRAWABLE.contains(&name.as_str()) {
        format!("{name}_")
    } else if KEYWORDS.contains(&name.as_str()) {
        format!("r#{name}")
    } else {
        name
    }
}

fn escape_type(name: String) -> String {
    if name == "Self" {
        "SelfValue".to_string()
    } else {
        name
    }
}

/// `traceId` → `trace_id`, `HTTPStatus` → `http_status`
pub fn to_snake_case(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut out = String::with_capacity(name.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        if c == '-' || c == ' ' {
            out.push('_');
            continue;
        }
        if c.is_uppercase() {
            let prev = if i > 0 { chars.get(i - 1) } else { None };
            let next = chars.get(i + 1);
            let boundary = match prev {
                Some(p) if p.is_lowercase() || p.is_ascii_digit() => true,
                Some(p) if p.is_uppercase() => next.is_some_and(|n| n.is_lowercase()),
                _ => false,
            };
            if boundary && !out.ends_with('_') {
                out.push('_');
            }
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// `send_event` → `SendEvent`, `traceId` → `TraceId`
pub fn to_pascal_case(name: &str) -> String {
    name.split(['_', '-', ' '])
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}
