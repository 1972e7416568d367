//! cqlbridge CLI: inspect what the translation layer does with a statement.
//!
//! # Commands
//!
//! - `translate`: classify, rewrite and resolve the configuration of a statement.
//! - `type`: show the column mapping for a native type name.
//! - `convert`: convert a text value to a host type through the global registry.
//!
//! Connection defaults come from `--config` (YAML/TOML/JSON) overlaid with
//! `CQLBRIDGE__*` environment variables.

use clap::{Parser, Subcommand};
use dotenv::dotenv;
use owo_colors::OwoColorize;

mod commands;
mod exit_codes;
mod output;

use cqlbridge_common::telemetry::init_tracing;
use cqlbridge_common::BridgeConfig;
use cqlbridge_error::{CqlBridgeError, ErrorCategory};

use output::OutputFormat;

#[derive(Parser)]
#[command(name = "cqlbridge")]
#[command(about = "Inspect SQL-to-CQL translation, column types and value conversion", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format (human, json, yaml)
    #[arg(long, global = true, value_enum, default_value = "human")]
    output: OutputFormat,

    /// Configuration file with connection defaults and cache settings
    #[arg(long, global = true, env = "CQLBRIDGE_CONFIG", default_value = "cqlbridge.yaml")]
    config: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Translate a statement and show its resolved configuration
    Translate {
        /// Statement text, including any `-- set` directives
        text: String,
    },
    /// Show the column mapping for a native type
    Type {
        /// Native type name, e.g. `map<text, int>`
        name: String,
    },
    /// Convert a text value to a host type
    Convert {
        /// Input value; `NULL` stands for null
        value: String,
        /// Target host type, e.g. `int`, `timestamp`, `uuid`
        target: String,
        /// Substitute the target's default for a null input
        #[arg(long, default_value_t = false)]
        replace_nulls: bool,
    },
}

impl Commands {
    fn name(&self) -> &'static str {
        match self {
            Commands::Translate { .. } => "translate",
            Commands::Type { .. } => "type",
            Commands::Convert { .. } => "convert",
        }
    }
}

fn main() {
    dotenv().ok();

    let cli = Cli::parse();

    if let Err(e) = init_tracing("warn") {
        eprintln!("{} {}", "Warning:".yellow().bold(), e);
    }

    if let Err(e) = run_cli(&cli) {
        let exit_code = map_error_to_exit_code(&e);
        if cli.output.is_machine_readable() {
            output::print_error(cli.output, &e, exit_code).ok();
        } else {
            eprintln!("{} {}", "Error:".red().bold(), e);
        }
        std::process::exit(exit_code);
    }
}

fn map_error_to_exit_code(e: &anyhow::Error) -> i32 {
    if let Some(bridge_err) = e.downcast_ref::<CqlBridgeError>() {
        return match bridge_err.category() {
            ErrorCategory::Translation => exit_codes::TRANSLATION_ERROR,
            ErrorCategory::Conversion => exit_codes::CONVERSION_ERROR,
            ErrorCategory::Config => exit_codes::CONFIG_ERROR,
            ErrorCategory::Internal => exit_codes::GENERAL_ERROR,
            _ => exit_codes::GENERAL_ERROR,
        };
    }

    let s = e.to_string().to_lowercase();
    if s.starts_with("usage") {
        return exit_codes::USAGE_ERROR;
    }
    if s.contains("config") {
        return exit_codes::CONFIG_ERROR;
    }
    exit_codes::GENERAL_ERROR
}

fn run_cli(cli: &Cli) -> anyhow::Result<()> {
    let _span = tracing::info_span!("command", name = cli.command.name()).entered();
    tracing::debug!(output = ?cli.output, config = %cli.config, "Running command");

    match &cli.command {
        Commands::Translate { text } => {
            let config = BridgeConfig::from_file(&cli.config)?;
            commands::translate(text, &config, cli.output)?;
        }
        Commands::Type { name } => {
            commands::type_info(name, cli.output)?;
        }
        Commands::Convert {
            value,
            target,
            replace_nulls,
        } => {
            commands::convert(value, target, *replace_nulls, cli.output)?;
        }
    }
    Ok(())
}
