//! # Framegen Configuration
//!
//! Settings and protocol resolution for the event stream marshaller
//! generator.
//!
//! ## Features
//!
//! - **Generator Settings**: TOML file plus `FRAMEGEN_*` environment overrides
//! - **Protocol Resolution**: First supported protocol a service declares
//! - **Logging**: `tracing-subscriber` setup shared by tools and tests
//!
//! ## Usage
//!
//! ```rust
//! use framegen_config::protocol::{known, resolve, payload_content_type};
//! use types::ProtocolId;
//!
//! let supported = vec![ProtocolId::new(known::REST_JSON_1)];
//! let declared = vec![ProtocolId::new(known::REST_JSON_1)];
//! let protocol = resolve(&supported, &declared).unwrap();
//! assert_eq!(payload_content_type(&protocol), Some("application/json"));
//! ```

pub mod logging;
pub mod protocol;
pub mod settings;

// Re-export commonly used types
pub use protocol::{PayloadFormat, ProtocolResolver, SupportedProtocols, UnresolvedProtocol};
pub use settings::{
    EmitSettings, GeneratorSettings, LoggingSettings, MissingPayloadPolicy, PayloadSettings,
    ProtocolSettings,
};
