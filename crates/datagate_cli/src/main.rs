//! CLI probe for `datagate_core`.
//!
//! # Responsibility
//! - Verify core crate linkage from a standalone binary.
//! - Show the table names the gateway derives for given type names.

use clap::{Parser, Subcommand};
use datagate_core::{core_version, default_log_level, init_logging, model_to_table, LoggingConfig};
use log::info;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "datagate", about = "Probe for the datagate data mapper")]
struct Cli {
    /// Log level: trace|debug|info|warn|error.
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Absolute directory for rolling log files. Logging stays off without it.
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the core crate version.
    Version,
    /// Print the table name derived from each type name.
    TableName {
        #[arg(required = true)]
        type_names: Vec<String>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Some(log_dir) = cli.log_dir {
        let config = LoggingConfig {
            level: cli
                .log_level
                .unwrap_or_else(|| default_log_level().to_string()),
            log_dir,
        };
        if let Err(err) = init_logging(&config) {
            eprintln!("datagate: {err}");
            return ExitCode::FAILURE;
        }
    }

    match cli.command {
        Command::Version => println!("datagate_core version={}", core_version()),
        Command::TableName { type_names } => {
            for type_name in type_names {
                let table = model_to_table(&type_name);
                info!("event=cli_table_name module=cli status=ok table={}", table);
                println!("{type_name} -> {table}");
            }
        }
    }

    ExitCode::SUCCESS
}
