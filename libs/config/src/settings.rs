//! Generator Settings Module
//!
//! Loads generator settings from a TOML file with `FRAMEGEN_*` environment
//! overrides. Every field has a default so an empty file is valid.

use anyhow::{Context, Result};
use config_crate::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use types::ProtocolId;

use crate::protocol::{default_supported, SupportedProtocols};

/// Main generator settings structure
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorSettings {
    pub protocol: ProtocolSettings,
    pub payload: PayloadSettings,
    pub emit: EmitSettings,
    pub logging: LoggingSettings,
}

/// Supported protocol identifiers, in preference order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProtocolSettings {
    pub supported: Vec<ProtocolId>,
}

impl Default for ProtocolSettings {
    fn default() -> Self {
        Self {
            supported: default_supported(),
        }
    }
}

/// What to do when an optional structured payload member is absent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingPayloadPolicy {
    /// Fail the marshalling call with `MarshallingError::MissingPayload`
    #[default]
    Reject,
    /// Send an empty payload, keeping the negotiated content type
    Empty,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PayloadSettings {
    pub missing_structured: MissingPayloadPolicy,
}

/// Paths used when rendering Rust source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmitSettings {
    /// Crate providing `Message`, `Header` and `MarshallMessage`
    pub runtime_crate: String,
    /// Module holding the generated model types
    pub model_module: String,
    /// Module holding the generated structured serializers
    pub serializer_module: String,
    pub output_dir: PathBuf,
}

impl Default for EmitSettings {
    fn default() -> Self {
        Self {
            runtime_crate: "framegen_types".to_string(),
            model_module: "crate::model".to_string(),
            serializer_module: "crate::protocol_serde".to_string(),
            output_dir: PathBuf::from("./generated"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// `EnvFilter` directive, e.g. `info` or `codec=debug`
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl GeneratorSettings {
    /// Load settings from a TOML file with environment overrides
    pub fn load(path: &Path) -> Result<Self> {
        info!("Loading generator settings: {:?}", path);

        let config = Config::builder()
            .add_source(File::from(path).required(true))
            // FRAMEGEN_LOGGING__LEVEL=debug overrides [logging] level
            .add_source(
                Environment::with_prefix("FRAMEGEN")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("Failed to build generator settings")?;

        let mut settings: GeneratorSettings = config
            .try_deserialize()
            .context("Failed to deserialize generator settings")?;
        settings.expand_env_vars()?;
        debug!("Generator settings: {:?}", settings);
        Ok(settings)
    }

    /// Parse settings from TOML text, without environment overrides
    pub fn from_toml(text: &str) -> Result<Self> {
        let mut settings: GeneratorSettings =
            toml::from_str(text).context("Failed to parse generator settings")?;
        settings.expand_env_vars()?;
        Ok(settings)
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string(self).context("Failed to render generator settings")
    }

    /// Expand environment variables in path values
    pub fn expand_env_vars(&mut self) -> Result<()> {
        let raw = self.emit.output_dir.to_string_lossy().into_owned();
        let expanded = shellexpand::env(&raw).context("Failed to expand output directory")?;
        self.emit.output_dir = PathBuf::from(expanded.into_owned());
        Ok(())
    }

    pub fn protocol_resolver(&self) -> SupportedProtocols {
        SupportedProtocols::new(self.protocol.supported.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::known;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_load_settings_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("framegen.toml");

        let content = r#"
[protocol]
supported = ["aws.protocols#awsJson1_1"]

[payload]
missing_structured = "empty"

[emit]
model_module = "crate::types"
"#;
        fs::write(&path, content).unwrap();

        let settings = GeneratorSettings::load(&path).unwrap();
        assert_eq!(
            settings.protocol.supported,
            vec![ProtocolId::new(known::AWS_JSON_1_1)]
        );
        assert_eq!(settings.payload.missing_structured, MissingPayloadPolicy::Empty);
        assert_eq!(settings.emit.model_module, "crate::types");
        assert_eq!(settings.emit.runtime_crate, "framegen_types");
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = tempdir().unwrap();
        let err = GeneratorSettings::load(&dir.path().join("absent.toml")).unwrap_err();
        assert!(err.to_string().contains("Failed to build generator settings"));
    }

    #[test]
    fn test_defaults_and_toml_round_trip() {
        let settings = GeneratorSettings::from_toml("").unwrap();
        assert_eq!(settings, GeneratorSettings::default());
        assert_eq!(settings.payload.missing_structured, MissingPayloadPolicy::Reject);

        let text = settings.to_toml().unwrap();
        assert_eq!(GeneratorSettings::from_toml(&text).unwrap(), settings);
    }

    #[test]
    fn test_output_dir_expands_env_vars() {
        std::env::set_var("FRAMEGEN_TEST_OUT", "/tmp/framegen-out");
        let settings =
            GeneratorSettings::from_toml("[emit]\noutput_dir = \"$FRAMEGEN_TEST_OUT/src\"").unwrap();
        assert_eq!(settings.emit.output_dir, PathBuf::from("/tmp/framegen-out/src"));
    }
}
