//! Catalog command - list the standard diagnostic queries

use anyhow::Result;
use fwq_core::queries::CATALOG;

use crate::output::{CatalogRow, OutputContext};

pub fn catalog(ctx: &OutputContext) -> Result<()> {
    let rows: Vec<CatalogRow> = CATALOG
        .iter()
        .map(|(name, bytes)| CatalogRow {
            name: name.to_string(),
            bytes: hex::encode(bytes),
        })
        .collect();

    ctx.print(&rows);
    Ok(())
}
