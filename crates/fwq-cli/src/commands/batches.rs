//! Batches command - show how addresses are grouped for querying

use anyhow::{bail, Result};
use fwq_core::FwQueryConfig;

use crate::output::{BatchRow, OutputContext};

/// List the address batches, optionally for one materialized request
pub fn batches(
    config: &FwQueryConfig,
    pandas: usize,
    request: Option<usize>,
    ctx: &OutputContext,
) -> Result<()> {
    let filter = match request {
        Some(index) => {
            let plan = config.materialized_requests(pandas);
            let Some(request) = plan.get(index).copied() else {
                bail!(
                    "Request {} out of range ({} requests runnable with {} panda(s))",
                    index,
                    plan.len(),
                    pandas
                );
            };
            Some(request)
        }
        None => None,
    };

    let rows: Vec<BatchRow> = config
        .address_batches(filter)
        .into_iter()
        .enumerate()
        .map(|(batch, addrs)| BatchRow {
            batch,
            mode: batch_mode(batch).to_string(),
            addresses: addrs
                .iter()
                .map(|addr| addr.to_string())
                .collect::<Vec<_>>()
                .join(" "),
        })
        .collect();

    ctx.print(&rows);
    Ok(())
}

/// The first batch is queried in parallel, every other one on its own
fn batch_mode(batch: usize) -> &'static str {
    if batch == 0 {
        "parallel"
    } else {
        "sequential"
    }
}
