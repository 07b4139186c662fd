//! # Event Stream Generator
//!
//! Entry point tying the pieces together for one service:
//!
//! ```text
//! GeneratorSettings ─┐
//! ServiceShape ──────┼─► resolve protocol ─► pick serializer
//!                    │
//! event unions ──────┴─► MarshallerPlan ─► EventStreamMarshaller (runtime)
//!                                       └─► RustEmitter (source files)
//! ```
//!
//! Structure classification is cached across every union generated through
//! the same generator.

use config::protocol::{payload_content_type, payload_format};
use config::{GeneratorSettings, PayloadFormat, ProtocolResolver};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;
use types::{Model, ProtocolId, ShapeId};

use crate::assembler::{EventStreamMarshaller, MarshallerPlan};
use crate::emit::RustEmitter;
use crate::error::{SchemaError, SchemaResult};
use crate::layout::LayoutCache;
use crate::serializer::{JsonPayloadSerializer, PayloadSerializer};

/// Rendered source file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    pub name: String,
    pub source: String,
}

impl GeneratedFile {
    /// Write into `dir`, creating it if needed
    pub fn write_to(&self, dir: &Path) -> io::Result<PathBuf> {
        fs::create_dir_all(dir)?;
        let path = dir.join(&self.name);
        fs::write(&path, &self.source)?;
        Ok(path)
    }
}

pub struct EventStreamGenerator {
    model: Arc<Model>,
    protocol: ProtocolId,
    serializer: Option<Arc<dyn PayloadSerializer>>,
    settings: GeneratorSettings,
    cache: LayoutCache,
}

impl EventStreamGenerator {
    /// Resolve the protocol for `service` and pick its payload serializer
    ///
    /// Protocols without a built-in serializer resolve successfully; supply
    /// one with [`with_serializer`](Self::with_serializer) before building
    /// runtime marshallers.
    pub fn for_service(model: Arc<Model>, service: &ShapeId, settings: GeneratorSettings) -> SchemaResult<Self> {
        let declared = &model.expect_service(service)?.protocols;
        let protocol = settings.protocol_resolver().resolve(declared)?;
        let serializer = builtin_serializer(&protocol);
        info!(
            "Generating {} event streams for protocol {}",
            service, protocol
        );

        Ok(Self {
            model,
            protocol,
            serializer,
            settings,
            cache: LayoutCache::new(),
        })
    }

    /// Replace the structured payload serializer
    pub fn with_serializer(mut self, serializer: Arc<dyn PayloadSerializer>) -> Self {
        self.serializer = Some(serializer);
        self
    }

    pub fn protocol(&self) -> &ProtocolId {
        &self.protocol
    }

    pub fn settings(&self) -> &GeneratorSettings {
        &self.settings
    }

    pub fn compile(&mut self, union: &ShapeId) -> SchemaResult<MarshallerPlan> {
        MarshallerPlan::compile(&self.model, union, &mut self.cache)
    }

    /// Runtime marshaller for `union`
    pub fn marshaller(&mut self, union: &ShapeId) -> SchemaResult<EventStreamMarshaller> {
        let serializer = self
            .serializer
            .clone()
            .ok_or_else(|| SchemaError::NoPayloadSerializer(self.protocol.clone()))?;
        let plan = self.compile(union)?;
        Ok(EventStreamMarshaller::new(
            Arc::clone(&self.model),
            Arc::new(plan),
            serializer,
            self.settings.payload.missing_structured,
        ))
    }

    /// Rust source for `union`
    pub fn render(&mut self, union: &ShapeId) -> SchemaResult<GeneratedFile> {
        let content_type = self.structured_content_type()?;
        let plan = self.compile(union)?;
        let emitter = RustEmitter::from_settings(&self.settings.emit, self.settings.payload.missing_structured);
        Ok(GeneratedFile {
            name: emitter.file_name(&plan),
            source: emitter.render(&plan, &content_type)?,
        })
    }

    /// Rust sources for every event stream the service exposes
    pub fn render_service(&mut self, service: &ShapeId) -> SchemaResult<Vec<GeneratedFile>> {
        let unions = self.model.expect_service(service)?.event_streams.clone();
        unions.iter().map(|union| self.render(union)).collect()
    }

    /// Render every event stream of `service` into the configured output dir
    pub fn write_service(&mut self, service: &ShapeId) -> SchemaResult<Vec<PathBuf>> {
        let dir = self.settings.emit.output_dir.clone();
        let files = self.render_service(service)?;
        let mut written = Vec::with_capacity(files.len());
        for file in &files {
            let path = file
                .write_to(&dir)
                .map_err(|e| SchemaError::Output(format!("{}: {}", dir.join(&file.name).display(), e)))?;
            info!("Wrote {:?}", path);
            written.push(path);
        }
        Ok(written)
    }

    fn structured_content_type(&self) -> SchemaResult<String> {
        match &self.serializer {
            Some(serializer) => Ok(serializer.content_type().to_string()),
            None => payload_content_type(&self.protocol)
                .map(str::to_string)
                .ok_or_else(|| SchemaError::NoPayloadSerializer(self.protocol.clone())),
        }
    }
}

fn builtin_serializer(protocol: &ProtocolId) -> Option<Arc<dyn PayloadSerializer>> {
    match (payload_format(protocol), payload_content_type(protocol)) {
        (Some(PayloadFormat::Json), Some(content_type)) => {
            Some(Arc::new(JsonPayloadSerializer::new(content_type)))
        }
        _ => None,
    }
}
