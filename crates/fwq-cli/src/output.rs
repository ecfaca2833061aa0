//! Output formatting for fwq (table, json)

use clap::ValueEnum;
use colored::Colorize;
use serde::Serialize;
use tabled::{Table, Tabled};

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// ASCII table format (default)
    #[default]
    Table,
    /// JSON format
    Json,
}

/// Context for output rendering
pub struct OutputContext {
    pub format: OutputFormat,
    pub quiet: bool,
}

impl OutputContext {
    pub fn new(format: OutputFormat, no_color: bool, quiet: bool) -> Self {
        if no_color {
            colored::control::set_override(false);
        }
        Self { format, quiet }
    }

    /// Print an info message (unless in quiet mode)
    pub fn info(&self, msg: &str) {
        if !self.quiet && self.format == OutputFormat::Table {
            println!("{}", msg.bold());
        }
    }

    /// Print data in the configured format
    pub fn print<T: Tabled + Serialize>(&self, data: &[T]) {
        match self.format {
            OutputFormat::Table => {
                if data.is_empty() {
                    if !self.quiet {
                        println!("No data");
                    }
                } else {
                    println!("{}", Table::new(data));
                }
            }
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::to_string_pretty(data).unwrap_or_else(|_| "[]".to_string())
                );
            }
        }
    }

    /// Print a single item in the configured format
    pub fn print_one<T: Tabled + Serialize>(&self, data: &T) {
        match self.format {
            OutputFormat::Table => println!("{}", Table::new([data])),
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::to_string_pretty(data).unwrap_or_else(|_| "{}".to_string())
                );
            }
        }
    }
}

// =============================================================================
// Display types for the commands
// =============================================================================

/// Materialized request display for requests command
#[derive(Debug, Tabled, Serialize)]
pub struct RequestRow {
    #[tabled(rename = "#")]
    pub index: usize,
    #[tabled(rename = "Request")]
    pub request: String,
    #[tabled(rename = "Response")]
    pub response: String,
    #[tabled(rename = "Whitelist")]
    pub whitelist: String,
    #[tabled(rename = "Bus")]
    pub bus: u8,
    #[tabled(rename = "RX Offset")]
    pub rx_offset: String,
    #[tabled(rename = "Flags")]
    pub flags: String,
}

/// Address batch display for batches command
#[derive(Debug, Tabled, Serialize)]
pub struct BatchRow {
    #[tabled(rename = "Batch")]
    pub batch: usize,
    #[tabled(rename = "Mode")]
    pub mode: String,
    #[tabled(rename = "Addresses")]
    pub addresses: String,
}

/// Address display for addrs and lookup commands
#[derive(Debug, Tabled, Serialize)]
pub struct AddressRow {
    #[tabled(rename = "Address")]
    pub address: String,
    #[tabled(rename = "Sub-address")]
    pub sub_addr: String,
    #[tabled(rename = "Kind")]
    pub kind: String,
}

/// Query catalog display for catalog command
#[derive(Debug, Tabled, Serialize)]
pub struct CatalogRow {
    #[tabled(rename = "Name")]
    pub name: String,
    #[tabled(rename = "Bytes")]
    pub bytes: String,
}
