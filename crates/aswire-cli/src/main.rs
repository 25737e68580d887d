#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

mod commands;
mod config;
mod logging;

use aswire_core::RangePolicy;
use clap::Parser;
use config::Config;
use miette::Result;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "aswire")]
#[command(author, version, about = "Decode and normalize analysis server protocol messages", long_about = None)]
struct Cli {
    /// Increase logging verbosity (-v for DEBUG, -vv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Emit JSON formatted output (stable, machine-readable)
    #[arg(long, global = true)]
    json: bool,

    /// What to do with outline trees whose ranges are not nested: reject or flag
    #[arg(long, global = true, env = "ASWIRE_RANGE_POLICY", value_name = "POLICY")]
    range_policy: Option<RangePolicy>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Print version information
    Version,

    /// List the known protocol types
    Types,

    /// Decode message files and print their normalized form
    Decode {
        /// Decode every file as this type instead of detecting the envelope
        #[arg(long = "type", value_name = "NAME")]
        type_name: Option<String>,

        /// Files to decode; `-` reads stdin
        #[arg(required = true, value_name = "FILE")]
        files: Vec<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::new()
        .with_verbosity(cli.verbose)
        .with_json(cli.json)
        .with_range_policy(cli.range_policy);

    logging::init(config.verbosity, config.json);
    tracing::debug!(range_policy = %config.decode.tree_ranges, "starting");

    match &cli.command {
        Commands::Version => commands::version::run(config.json),
        Commands::Types => commands::types::run(config.json),
        Commands::Decode { type_name, files } => {
            let span = tracing::info_span!("decode", cmd = "decode", files = files.len());
            let _guard = span.enter();
            commands::decode::run(files, type_name.as_deref(), &config)
        }
    }
}
