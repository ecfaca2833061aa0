//! fwq - Inspect ECU firmware query plans
//!
//! Loads a firmware database file and shows the requests, address batches
//! and ECU addresses a firmware query would use.

mod commands;
mod config;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::{Config, MergedConfig};
use crate::output::{OutputContext, OutputFormat};

#[derive(Parser)]
#[command(name = "fwq")]
#[command(author, version, about = "ECU firmware query plan inspector")]
#[command(propagate_version = true)]
struct Cli {
    /// Firmware database file
    #[arg(short, long, env = "FWQ_DATABASE")]
    database: Option<PathBuf>,

    /// Configuration file path
    #[arg(short, long, env = "FWQ_CONFIG")]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    output: OutputFormat,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Minimal output (for scripting)
    #[arg(short, long)]
    quiet: bool,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the request plan for the attached pandas
    Requests {
        /// Number of attached pandas
        #[arg(long)]
        pandas: Option<usize>,
    },

    /// Show the address batches
    Batches {
        /// Only ECUs whitelisted by this materialized request
        #[arg(long)]
        request: Option<usize>,

        /// Number of attached pandas (used with --request)
        #[arg(long)]
        pandas: Option<usize>,
    },

    /// List every address the plan may query
    Addrs,

    /// Find the ECU kind behind an address
    Lookup {
        /// Transmit address in hex (e.g. 7e0)
        addr: String,

        /// Functional sub-address in hex
        #[arg(long)]
        sub_addr: Option<String>,
    },

    /// List the standard diagnostic queries
    Catalog,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(filter)
        .init();

    // Load config file
    let config = if let Some(config_path) = &cli.config {
        Config::load_from(config_path)?
    } else {
        Config::load().unwrap_or_default()
    };

    // Merge CLI args with config
    let merged = config.merge_with_args(cli.database.as_deref(), cli.no_color);

    // Create output context
    let ctx = OutputContext::new(cli.output, merged.no_color, cli.quiet);

    run(&cli.command, &merged, &ctx)
}

fn run(command: &Commands, merged: &MergedConfig, ctx: &OutputContext) -> Result<()> {
    match command {
        Commands::Requests { pandas } => {
            let config = commands::load_database(merged.database()?)?;
            commands::requests(&config, pandas.unwrap_or(merged.pandas), ctx)?;
        }

        Commands::Batches { request, pandas } => {
            let config = commands::load_database(merged.database()?)?;
            commands::batches(&config, pandas.unwrap_or(merged.pandas), *request, ctx)?;
        }

        Commands::Addrs => {
            let config = commands::load_database(merged.database()?)?;
            commands::addrs(&config, ctx)?;
        }

        Commands::Lookup { addr, sub_addr } => {
            let config = commands::load_database(merged.database()?)?;
            commands::lookup(&config, addr, sub_addr.as_deref(), ctx)?;
        }

        Commands::Catalog => {
            commands::catalog(ctx)?;
        }
    }

    Ok(())
}
