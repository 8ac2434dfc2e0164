//! crudkit Code Generator
//!
//! Generates a typed Rust SDK from a GraphQL schema and operation documents.

use std::path::PathBuf;

use clap::Parser;
use crudkit_gen::config::{DEFAULT_PACKAGE, GeneratorConfig};
use crudkit_gen::errors::GeneratorError;
use crudkit_gen::pipeline::run;
use crudkit_gen::sink::TracingSink;
use tracing_subscriber::{filter::EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// crudkit code generator - transforms a GraphQL schema and operations into a typed Rust SDK
#[derive(Parser, Debug)]
#[command(name = "crudkit-gen")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// GraphQL schema (SDL) file
    #[arg(short, long)]
    schema: PathBuf,

    /// Operation document; repeat for several files
    #[arg(long = "operations", required = true)]
    operations: Vec<PathBuf>,

    /// Output directory for generated code
    #[arg(short, long, default_value = "src/sdk")]
    output: PathBuf,

    /// Rust module path of the output directory (e.g. `crate::sdk`)
    #[arg(short, long, default_value = DEFAULT_PACKAGE)]
    package: String,

    /// Print generated code without writing files
    #[arg(long)]
    dry_run: bool,

    /// Print the generated class models as JSON
    #[arg(long)]
    emit_model: bool,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Initializes tracing on stderr.
///
/// `RUST_LOG` wins when set; otherwise `-v` counts map to
/// info/debug/trace, with warn as the default.
fn init_tracing(verbose: u8) {
    let filter = match std::env::var("RUST_LOG") {
        Ok(directives) => directives,
        Err(_) => match verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
        .to_string(),
    };
    let filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(true)
                .with_level(true)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .init();
}

fn main() -> Result<(), GeneratorError> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = GeneratorConfig::new(cli.schema, cli.output)
        .with_operations(cli.operations)
        .with_package(cli.package)
        .with_dry_run(cli.dry_run);

    let output = run(&config, &mut TracingSink)?;

    if cli.emit_model {
        let json = serde_json::to_string_pretty(&output.models)
            .map_err(|e| GeneratorError::CodeGenError(format!("Cannot serialize models: {e}")))?;
        println!("{json}");
    }

    if !cli.dry_run {
        eprintln!(
            "Generated {} operation modules in {}",
            output.models.len(),
            config.output_dir.display()
        );
    }

    Ok(())
}
