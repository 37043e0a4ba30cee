//! twinproto command-line tool
//!
//! Usage:
//!   twinproto resolve --input signal.json --schema-version 1
//!   twinproto select --input thing.json --fields 'thingId,features/*/properties'
//!   twinproto types
//!
//! Output goes to stdout, logs to stderr.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::{EnvFilter, FmtSubscriber};
use twinproto_cli::{
    CliConfig, ResolveOptions, list_types, parse_header, read_input, render, resolve_signal,
    select_thing,
};
use twinproto_types::{FieldSelector, SchemaVersion};

#[derive(Parser, Debug)]
#[command(name = "twinproto")]
#[command(about = "Resolve and render digital twin protocol signals")]
struct Args {
    /// Path to a JSON config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pretty: bool,

    /// Enable verbose debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse a signal through the type registry and render it again
    Resolve {
        /// Input file, `-` for stdin
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Additional header as key=value
        #[arg(long = "header", value_name = "KEY=VALUE")]
        headers: Vec<String>,

        /// Schema version to render in
        #[arg(long)]
        schema_version: Option<SchemaVersion>,

        /// Project the rendered signal onto these fields
        #[arg(long)]
        fields: Option<FieldSelector>,
    },
    /// Render selected fields of a thing
    Select {
        /// Input file, `-` for stdin
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Fields to keep, e.g. `thingId,features/*/properties`
        #[arg(long)]
        fields: FieldSelector,

        /// Schema version the thing is rendered in
        #[arg(long)]
        schema_version: Option<SchemaVersion>,
    },
    /// List registered signal types
    Types,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let default_level = if args.verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    let config = match &args.config {
        Some(path) => CliConfig::load(path)?,
        None => CliConfig::default(),
    };
    let pretty = args.pretty || config.pretty;
    debug!(?config, "Starting");

    match args.command {
        Command::Resolve {
            input,
            headers,
            schema_version,
            fields,
        } => {
            let input = read_input(input.as_deref())?;
            let options = ResolveOptions {
                headers: headers
                    .iter()
                    .map(|h| parse_header(h))
                    .collect::<Result<_>>()?,
                schema_version,
                fields,
            };
            let rendered = resolve_signal(&input, &options, &config)?;
            println!("{}", render(rendered, pretty)?);
        }
        Command::Select {
            input,
            fields,
            schema_version,
        } => {
            let version = schema_version
                .or(config.default_schema_version)
                .unwrap_or(SchemaVersion::LATEST);
            let input = read_input(input.as_deref())?;
            let selected = select_thing(&input, &fields, version)?;
            println!("{}", render(selected, pretty)?);
        }
        Command::Types => {
            for discriminator in list_types() {
                println!("{discriminator}");
            }
        }
    }
    Ok(())
}
