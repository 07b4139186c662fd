//! Protocol resolution
//!
//! Selects the wire protocol a service is generated for: the first protocol
//! the generator supports that the service also declares. The resolved
//! protocol decides the content type of structured event payloads.

use once_cell::sync::Lazy;
use std::collections::HashSet;
use thiserror::Error;
use tracing::info;
use types::ProtocolId;

/// Well-known protocol identifiers
pub mod known {
    pub const REST_JSON_1: &str = "aws.protocols#restJson1";
    pub const AWS_JSON_1_0: &str = "aws.protocols#awsJson1_0";
    pub const AWS_JSON_1_1: &str = "aws.protocols#awsJson1_1";
    pub const REST_XML: &str = "aws.protocols#restXml";
}

/// Document format of structured payloads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadFormat {
    Json,
    Xml,
}

struct KnownProtocol {
    id: ProtocolId,
    content_type: &'static str,
    format: PayloadFormat,
}

/// Known protocols in default preference order
static KNOWN_PROTOCOLS: Lazy<Vec<KnownProtocol>> = Lazy::new(|| {
    let entry = |id: &str, content_type, format| KnownProtocol {
        id: ProtocolId::new(id),
        content_type,
        format,
    };
    vec![
        entry(known::REST_JSON_1, "application/json", PayloadFormat::Json),
        entry(known::AWS_JSON_1_0, "application/x-amz-json-1.0", PayloadFormat::Json),
        entry(known::AWS_JSON_1_1, "application/x-amz-json-1.1", PayloadFormat::Json),
        entry(known::REST_XML, "application/xml", PayloadFormat::Xml),
    ]
});

fn lookup(protocol: &ProtocolId) -> Option<&'static KnownProtocol> {
    KNOWN_PROTOCOLS.iter().find(|p| &p.id == protocol)
}

/// Default supported set, in preference order
pub fn default_supported() -> Vec<ProtocolId> {
    KNOWN_PROTOCOLS.iter().map(|p| p.id.clone()).collect()
}

/// Media type for structured payloads of a known protocol
pub fn payload_content_type(protocol: &ProtocolId) -> Option<&'static str> {
    lookup(protocol).map(|p| p.content_type)
}

pub fn payload_format(protocol: &ProtocolId) -> Option<PayloadFormat> {
    lookup(protocol).map(|p| p.format)
}

/// No protocol is both supported and declared
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error(
    "Unable to resolve a protocol: supported [{}], service declares [{}]",
    join(.supported),
    join(.declared)
)]
pub struct UnresolvedProtocol {
    pub supported: Vec<ProtocolId>,
    pub declared: Vec<ProtocolId>,
}

fn join(ids: &[ProtocolId]) -> String {
    ids.iter()
        .map(ProtocolId::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Pick the first supported protocol the service declares
pub fn resolve(
    supported: &[ProtocolId],
    declared: &[ProtocolId],
) -> Result<ProtocolId, UnresolvedProtocol> {
    let declared_set: HashSet<&ProtocolId> = declared.iter().collect();
    supported
        .iter()
        .find(|id| declared_set.contains(id))
        .cloned()
        .ok_or_else(|| UnresolvedProtocol {
            supported: supported.to_vec(),
            declared: declared.to_vec(),
        })
}

/// Resolver seam used by the generator
pub trait ProtocolResolver {
    fn resolve(&self, declared: &[ProtocolId]) -> Result<ProtocolId, UnresolvedProtocol>;
}

/// Resolver over a fixed, ordered supported set
#[derive(Debug, Clone)]
pub struct SupportedProtocols {
    supported: Vec<ProtocolId>,
}

impl SupportedProtocols {
    pub fn new(supported: Vec<ProtocolId>) -> Self {
        Self { supported }
    }

    pub fn supported(&self) -> &[ProtocolId] {
        &self.supported
    }
}

impl Default for SupportedProtocols {
    fn default() -> Self {
        Self::new(default_supported())
    }
}

impl ProtocolResolver for SupportedProtocols {
    fn resolve(&self, declared: &[ProtocolId]) -> Result<ProtocolId, UnresolvedProtocol> {
        let protocol = resolve(&self.supported, declared)?;
        info!("Resolved protocol {}", protocol);
        Ok(protocol)
    }
}
