//! Requests command - show the materialized request plan

use anyhow::Result;
use fwq_core::{FwQueryConfig, Request};

use super::format_steps;
use crate::output::{OutputContext, RequestRow};

/// List the requests that run with `pandas` pandas attached
pub fn requests(config: &FwQueryConfig, pandas: usize, ctx: &OutputContext) -> Result<()> {
    let plan = config.materialized_requests(pandas);
    ctx.info(&format!(
        "{} of {} requests runnable with {} panda(s)",
        plan.len(),
        config.requests().len(),
        pandas
    ));

    let rows: Vec<RequestRow> = plan
        .into_iter()
        .enumerate()
        .map(|(index, request)| request_row(index, request))
        .collect();

    ctx.print(&rows);
    Ok(())
}

fn request_row(index: usize, request: &Request) -> RequestRow {
    let whitelist = if request.whitelist_ecus.is_empty() {
        "*".to_string()
    } else {
        request
            .whitelist_ecus
            .iter()
            .map(|kind| kind.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    };

    let mut flags = Vec::new();
    if request.auxiliary {
        flags.push("auxiliary");
    }
    if request.logging {
        flags.push("logging");
    }
    if request.obd_multiplexing {
        flags.push("obd-mux");
    }

    RequestRow {
        index,
        request: format_steps(&request.request),
        response: format_steps(&request.response),
        whitelist,
        bus: request.bus,
        rx_offset: format!("0x{:x}", request.rx_offset),
        flags: flags.join(" "),
    }
}
