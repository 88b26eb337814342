/* Codegen command - write one TypeScript module per schema file */

use super::common::{ConfigOptions, load_config, load_schema};
use anyhow::Context;
use proto_gen::codegen::{TypeScriptCodeGenerator, TypeScriptCodeGeneratorOptions};
use std::path::PathBuf;
use tracing::info;

pub fn run(files: Vec<PathBuf>, output_dir: PathBuf, options: ConfigOptions) -> anyhow::Result<()> {
    let config = load_config(options)?;
    let schema = load_schema(&files)?;

    info!(
        inputs = files.len(),
        output = %output_dir.display(),
        "generating TypeScript"
    );

    let generator = TypeScriptCodeGenerator::new(
        &schema,
        TypeScriptCodeGeneratorOptions {
            output_dir: output_dir.clone(),
            config,
        },
    );
    let written = generator
        .emit_code()
        .with_context(|| format!("code generation into {} failed", output_dir.display()))?;

    println!("[✓] Generated {} TypeScript file(s) in {}", written.len(), output_dir.display());
    Ok(())
}
