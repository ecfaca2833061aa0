//! Command implementations for fwq

pub mod addrs;
pub mod batches;
pub mod catalog;
pub mod lookup;
pub mod requests;

pub use addrs::addrs;
pub use batches::batches;
pub use catalog::catalog;
pub use lookup::lookup;
pub use requests::requests;

use std::path::Path;

use anyhow::{Context, Result};
use fwq_core::{queries, EcuAddress, EcuKind, FwQueryConfig};
use tracing::debug;

use crate::output::AddressRow;

/// Load a firmware database file
pub fn load_database(path: &Path) -> Result<FwQueryConfig> {
    let config = FwQueryConfig::load(path)
        .with_context(|| format!("Failed to load firmware database: {}", path.display()))?;
    debug!(
        path = %path.display(),
        models = config.fw_versions().len(),
        requests = config.requests().len(),
        "Loaded firmware database"
    );
    Ok(config)
}

/// Catalog name of a request step, or its hex encoding
fn format_step(step: &[u8]) -> String {
    queries::name_of(step)
        .map(String::from)
        .unwrap_or_else(|| hex::encode(step))
}

fn format_steps<B: AsRef<[u8]>>(steps: &[B]) -> String {
    steps
        .iter()
        .map(|s| format_step(s.as_ref()))
        .collect::<Vec<_>>()
        .join(", ")
}

fn address_row(address: EcuAddress, kind: Option<EcuKind>) -> AddressRow {
    AddressRow {
        address: format!("0x{:x}", address.addr),
        sub_addr: address
            .sub_addr
            .map(|s| format!("0x{:02x}", s))
            .unwrap_or_else(|| "-".to_string()),
        kind: kind.map_or_else(|| "unknown".to_string(), |k| k.to_string()),
    }
}
