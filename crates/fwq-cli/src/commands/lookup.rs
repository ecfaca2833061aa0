//! Lookup command - find the ECU kind behind an address

use anyhow::{Context, Result};
use fwq_core::error::parse_hex_u32;
use fwq_core::{EcuAddress, FwQueryConfig};

use super::address_row;
use crate::output::OutputContext;

/// Show the ECU kind at `addr` (and `sub_addr`), or "unknown"
pub fn lookup(
    config: &FwQueryConfig,
    addr: &str,
    sub_addr: Option<&str>,
    ctx: &OutputContext,
) -> Result<()> {
    let address = parse_address(addr, sub_addr)?;
    let kind = config.ecu_kind_for(address.addr, address.sub_addr);
    if kind.is_none() && config.is_extra_ecu(address) {
        ctx.info("Address is only queried for data collection");
    }

    ctx.print_one(&address_row(address, kind));
    Ok(())
}

/// Parse hex address arguments ("7e0", "0x7E0")
fn parse_address(addr: &str, sub_addr: Option<&str>) -> Result<EcuAddress> {
    let addr = parse_hex_u32("address", addr)?;
    let sub_addr = sub_addr
        .map(|s| -> Result<u8> {
            let value = parse_hex_u32("sub-address", s)?;
            u8::try_from(value).with_context(|| format!("Sub-address out of range: {}", s))
        })
        .transpose()?;
    Ok(EcuAddress::new(addr, sub_addr))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_address() {
        assert_eq!(parse_address("7e0", None).unwrap(), EcuAddress::physical(0x7e0));
        assert_eq!(
            parse_address("0x750", Some("0F")).unwrap(),
            EcuAddress::functional(0x750, 0x0f)
        );
        assert!(parse_address("0x750", Some("0x100")).is_err());
        assert!(parse_address("engine", None).is_err());
    }
}
