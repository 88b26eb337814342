//! Generator configuration.
//!
//! Values are fixed when a generator is constructed. They can come from an
//! optional YAML file and are then overridden by command line flags.

use crate::codegen::ts_gen::helpers::{is_ts_identifier, is_ts_reserved_word};
use proto_types::LongRepresentation;
use serde_derive::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

pub const DEFAULT_DISCRIMINATOR: &str = "kind";

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config format: {0}")]
    InvalidFormat(#[from] serde_yml::Error),

    #[error("discriminator field name '{0}' is not a usable TypeScript identifier")]
    InvalidDiscriminator(String),
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "kebab-case", default)]
pub struct GeneratorConfig {
    /// Name of the tag property inside every oneof variant record.
    pub discriminator_field_name: String,
    /// Representation used for 64-bit integers without a `jstype` override.
    pub default_long_representation: LongRepresentation,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            discriminator_field_name: DEFAULT_DISCRIMINATOR.to_string(),
            default_long_representation: LongRepresentation::default(),
        }
    }
}

impl GeneratorConfig {
    pub fn new(discriminator_field_name: impl Into<String>, long: LongRepresentation) -> Self {
        Self {
            discriminator_field_name: discriminator_field_name.into(),
            default_long_representation: long,
        }
    }

    pub fn from_yaml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml_str(&source)
    }

    /// Applies command line overrides on top of the loaded values.
    pub fn with_overrides(
        mut self,
        discriminator: Option<String>,
        long: Option<LongRepresentation>,
    ) -> Result<Self, ConfigError> {
        if let Some(name) = discriminator {
            self.discriminator_field_name = name;
        }
        if let Some(long) = long {
            self.default_long_representation = long;
        }
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let name = &self.discriminator_field_name;
        if !is_ts_identifier(name) || is_ts_reserved_word(name) {
            return Err(ConfigError::InvalidDiscriminator(name.clone()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = GeneratorConfig::default();
        assert_eq!(config.discriminator_field_name, "kind");
        assert_eq!(config.default_long_representation, LongRepresentation::String);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn parses_partial_yaml() {
        let config = GeneratorConfig::from_yaml_str("default-long-representation: bigint\n").unwrap();
        assert_eq!(config.discriminator_field_name, "kind");
        assert_eq!(config.default_long_representation, LongRepresentation::BigInt);
    }

    #[test]
    fn overrides_take_precedence() {
        let config = GeneratorConfig::from_yaml_str("discriminator-field-name: selected\n")
            .unwrap()
            .with_overrides(Some("tag".to_string()), Some(LongRepresentation::Number))
            .unwrap();
        assert_eq!(config.discriminator_field_name, "tag");
        assert_eq!(config.default_long_representation, LongRepresentation::Number);
    }

    #[test]
    fn rejects_bad_discriminators() {
        for bad in ["", "1kind", "has space", "class"] {
            let err = GeneratorConfig::default()
                .with_overrides(Some(bad.to_string()), None)
                .unwrap_err();
            assert!(matches!(err, ConfigError::InvalidDiscriminator(_)), "{bad}");
        }
    }
}
