//! Addrs command - list every address the plan may query

use anyhow::Result;
use fwq_core::FwQueryConfig;

use super::address_row;
use crate::output::{AddressRow, OutputContext};

/// List all known addresses with the ECU kind behind each
pub fn addrs(config: &FwQueryConfig, ctx: &OutputContext) -> Result<()> {
    let rows: Vec<AddressRow> = config
        .all_known_addresses()
        .into_iter()
        .map(|addr| address_row(addr, config.ecu_kind_for(addr.addr, addr.sub_addr)))
        .collect();

    ctx.print(&rows);
    Ok(())
}
