/* Analyze command - print the constructor shapes without writing files */

use super::common::{ConfigOptions, load_config, load_schema};
use anyhow::Context;
use clap::ValueEnum;
use proto_gen::codegen::{TypeScriptCodeGenerator, TypeScriptCodeGeneratorOptions};
use std::path::PathBuf;

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug)]
pub enum OutputFormat {
    /* Rendered class declarations */
    Text,
    /* Class shapes as JSON */
    Json,
}

pub fn run(files: Vec<PathBuf>, options: ConfigOptions, format: OutputFormat) -> anyhow::Result<()> {
    let config = load_config(options)?;
    let schema = load_schema(&files)?;

    let generator = TypeScriptCodeGenerator::new(
        &schema,
        TypeScriptCodeGeneratorOptions {
            config,
            ..Default::default()
        },
    );
    let classes = generator.build_classes().context("failed to build class shapes")?;

    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&classes).context("failed to serialize class shapes")?;
            println!("{}", json);
        }
        OutputFormat::Text => {
            println!("Schema Analysis");
            println!("===============\n");
            println!("[~] {} file(s), {} message(s)\n", schema.files.len(), classes.len());
            for class in &classes {
                println!("// {}", class.identity);
                print!("{}", class.render());
                println!();
            }
        }
    }

    Ok(())
}
