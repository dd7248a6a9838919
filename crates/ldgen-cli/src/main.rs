//! # ldgen CLI entry point
//!
//! Parses command-line arguments, loads the optional config file,
//! installs the schema registry when a subcommand needs it, and
//! dispatches to the subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use ldgen_cli::config::CliConfig;
use ldgen_cli::render::{render_page, run_render, RenderArgs, RenderFormat};
use ldgen_cli::sample::sample_page;
use ldgen_cli::schemas::{run_schemas, SchemasArgs};
use ldgen_cli::validate::{run_validate, ValidateArgs};
use ldgen_schema::SchemaRegistry;

/// ldgen: schema.org JSON-LD generator and validator.
///
/// Builds typed structured-data entities into embeddable
/// `<script type="application/ld+json">` blocks and validates JSON-LD
/// documents against versioned schemas.
#[derive(Parser, Debug)]
#[command(name = "ldgen", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    log_json: bool,

    /// Path to configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Render the JSON-LD blocks of a page config.
    Render(RenderArgs),

    /// Validate JSON-LD documents against a registered schema.
    Validate(ValidateArgs),

    /// List or inspect registered schemas.
    Schemas(SchemasArgs),

    /// Render the ten-block reference page.
    Sample {
        /// Print bare JSON-LD documents instead of script elements.
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);
    if cli.log_json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    match run(cli) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}

fn run(cli: Cli) -> Result<u8> {
    let config = CliConfig::load_or_default(cli.config.as_deref())?;

    match cli.command {
        Commands::Render(args) => run_render(&args, &config),
        Commands::Validate(args) => run_validate(&args, install_registry(&config)?),
        Commands::Schemas(args) => run_schemas(&args, install_registry(&config)?),
        Commands::Sample { json } => {
            let page = sample_page()?;
            let format = RenderFormat {
                json,
                pretty: config.pretty,
            };
            println!("{}", render_page(&page, format)?);
            Ok(0)
        }
    }
}

/// Build the configured registry and make it the process-wide one.
fn install_registry(config: &CliConfig) -> Result<&'static SchemaRegistry> {
    let registry = ldgen_schema::install(config.build_registry()?)?;
    tracing::debug!(shapes = registry.len(), "schema registry ready");
    Ok(registry)
}
