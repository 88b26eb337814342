/* Common utilities shared between analyze and codegen commands */

use anyhow::Context;
use proto_gen::GeneratorConfig;
use proto_gen::schema::load_schema_files;
use proto_types::{LongRepresentation, SchemaSet};
use std::path::PathBuf;
use tracing::debug;

/* Configuration sources, in increasing priority: defaults, config file, flags */
pub struct ConfigOptions {
    pub config: Option<PathBuf>,
    pub discriminator: Option<String>,
    pub long_repr: Option<LongRepresentation>,
}

pub fn load_config(options: ConfigOptions) -> anyhow::Result<GeneratorConfig> {
    let base = match &options.config {
        Some(path) => GeneratorConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => GeneratorConfig::default(),
    };
    let config = base
        .with_overrides(options.discriminator, options.long_repr)
        .context("invalid generator configuration")?;
    debug!(
        discriminator = %config.discriminator_field_name,
        long = %config.default_long_representation,
        "generator configuration"
    );
    Ok(config)
}

pub fn load_schema(files: &[PathBuf]) -> anyhow::Result<SchemaSet> {
    let schema = load_schema_files(files).context("failed to load schema inputs")?;
    debug!(files = schema.files.len(), "loaded schema");
    Ok(schema)
}
