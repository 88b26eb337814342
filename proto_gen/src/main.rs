use clap::{Parser, Subcommand, ValueEnum};
use cmds::analyze::OutputFormat;
use proto_types::LongRepresentation;
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod cmds;

#[derive(Parser)]
#[command(name = "proto-gen")]
#[command(about = "TypeScript constructor class generator for message schemas", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /* Generate TypeScript modules from schema files */
    Codegen {
        /* Schema inputs (.yaml, .yml, .json, or descriptor sets .binpb/.pb/.desc) */
        #[arg(short = 'f', long = "files", value_name = "FILE", required = true)]
        files: Vec<PathBuf>,

        /* Output directory for generated code */
        #[arg(
            short = 'o',
            long = "output",
            value_name = "DIR",
            default_value = "generated"
        )]
        output_dir: PathBuf,

        /* Generator configuration file (YAML) */
        #[arg(short = 'c', long = "config", value_name = "FILE")]
        config: Option<PathBuf>,

        /* Name of the oneof discriminator property */
        #[arg(long = "discriminator", value_name = "NAME")]
        discriminator: Option<String>,

        /* Representation of 64-bit integers */
        #[arg(long = "long-repr", value_enum)]
        long_repr: Option<LongRepr>,

        /* Enable verbose output */
        #[arg(short = 'v', long = "verbose")]
        verbose: bool,
    },

    /* Show the constructor shapes that would be generated */
    Analyze {
        /* Schema inputs (.yaml, .yml, .json, or descriptor sets .binpb/.pb/.desc) */
        #[arg(short = 'f', long = "files", value_name = "FILE", required = true)]
        files: Vec<PathBuf>,

        /* Generator configuration file (YAML) */
        #[arg(short = 'c', long = "config", value_name = "FILE")]
        config: Option<PathBuf>,

        /* Name of the oneof discriminator property */
        #[arg(long = "discriminator", value_name = "NAME")]
        discriminator: Option<String>,

        /* Representation of 64-bit integers */
        #[arg(long = "long-repr", value_enum)]
        long_repr: Option<LongRepr>,

        /* Output format */
        #[arg(long = "format", value_enum, default_value = "text")]
        format: OutputFormat,

        /* Enable verbose output */
        #[arg(short = 'v', long = "verbose")]
        verbose: bool,
    },
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug)]
enum LongRepr {
    /* Decimal text */
    String,
    /* IEEE-754 double, lossy beyond 2^53 */
    Number,
    /* Arbitrary precision integer */
    #[value(name = "bigint")]
    BigInt,
}

impl From<LongRepr> for LongRepresentation {
    fn from(repr: LongRepr) -> Self {
        match repr {
            LongRepr::String => LongRepresentation::String,
            LongRepr::Number => LongRepresentation::Number,
            LongRepr::BigInt => LongRepresentation::BigInt,
        }
    }
}

fn init_tracing(verbose: bool) {
    /* RUST_LOG wins when set */
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Codegen {
            files,
            output_dir,
            config,
            discriminator,
            long_repr,
            verbose,
        } => {
            init_tracing(verbose);
            let options = cmds::common::ConfigOptions {
                config,
                discriminator,
                long_repr: long_repr.map(Into::into),
            };
            cmds::codegen::run(files, output_dir, options)?;
        }

        Commands::Analyze {
            files,
            config,
            discriminator,
            long_repr,
            format,
            verbose,
        } => {
            init_tracing(verbose);
            let options = cmds::common::ConfigOptions {
                config,
                discriminator,
                long_repr: long_repr.map(Into::into),
            };
            cmds::analyze::run(files, options, format)?;
        }
    }

    Ok(())
}
