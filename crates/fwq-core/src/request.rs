//! Diagnostic query templates

use std::collections::BTreeSet;

use bytes::Bytes;
use serde::Serialize;

use crate::ecu::EcuKind;

/// Default offset from an ECU's transmit id to its response id
pub const DEFAULT_RX_OFFSET: u32 = 0x8;

/// Default bus a query runs on
pub const DEFAULT_BUS: u8 = 1;

/// Bus index offset of the auxiliary transport
pub const AUXILIARY_BUS_OFFSET: u8 = 4;

/// One diagnostic query template: a multi-step request/response exchange
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Request {
    /// Request payloads, sent in order
    #[serde(serialize_with = "serialize_hex_list")]
    pub request: Vec<Bytes>,
    /// Expected response prefixes, one per request step
    #[serde(serialize_with = "serialize_hex_list")]
    pub response: Vec<Bytes>,
    /// ECU kinds this query applies to (empty = all)
    pub whitelist_ecus: BTreeSet<EcuKind>,
    /// Added to an ECU's transmit id to get its response id
    pub rx_offset: u32,
    /// Bus index; values >= 4 go to the auxiliary transport
    pub bus: u8,
    /// Also run this query on `bus + 4`
    pub auxiliary: bool,
    /// Responses are collected for diagnostics only, never fingerprinted on
    pub logging: bool,
    /// Transport must enable OBD multiplexing for this query
    pub obd_multiplexing: bool,
}

impl Request {
    pub fn new<I, J, B, C>(request: I, response: J) -> Self
    where
        I: IntoIterator<Item = B>,
        J: IntoIterator<Item = C>,
        B: Into<Bytes>,
        C: Into<Bytes>,
    {
        Self {
            request: request.into_iter().map(Into::into).collect(),
            response: response.into_iter().map(Into::into).collect(),
            whitelist_ecus: BTreeSet::new(),
            rx_offset: DEFAULT_RX_OFFSET,
            bus: DEFAULT_BUS,
            auxiliary: false,
            logging: false,
            obd_multiplexing: true,
        }
    }

    pub fn with_whitelist(mut self, ecus: impl IntoIterator<Item = EcuKind>) -> Self {
        self.whitelist_ecus = ecus.into_iter().collect();
        self
    }

    pub fn with_rx_offset(mut self, rx_offset: u32) -> Self {
        self.rx_offset = rx_offset;
        self
    }

    pub fn with_bus(mut self, bus: u8) -> Self {
        self.bus = bus;
        self
    }

    pub fn with_auxiliary(mut self, auxiliary: bool) -> Self {
        self.auxiliary = auxiliary;
        self
    }

    pub fn with_logging(mut self, logging: bool) -> Self {
        self.logging = logging;
        self
    }

    pub fn with_obd_multiplexing(mut self, obd_multiplexing: bool) -> Self {
        self.obd_multiplexing = obd_multiplexing;
        self
    }

    /// Whether this query should be sent to an ECU of the given kind
    pub fn applies_to(&self, kind: EcuKind) -> bool {
        self.whitelist_ecus.is_empty() || self.whitelist_ecus.contains(&kind)
    }

    /// Copy of this template moved to the auxiliary bus
    ///
    /// Saturates at bus 255; database files with such buses are rejected
    /// when loaded.
    pub(crate) fn to_auxiliary(&self) -> Self {
        let mut dup = self.clone();
        dup.bus = self.bus.saturating_add(AUXILIARY_BUS_OFFSET);
        dup
    }
}

fn serialize_hex_list<S: serde::Serializer>(
    list: &[Bytes],
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(list.iter().map(hex::encode))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queries;

    #[test]
    fn test_defaults() {
        let req = Request::new([queries::UDS_VERSION_REQUEST], [queries::UDS_VERSION_RESPONSE]);
        assert_eq!(req.rx_offset, 0x8);
        assert_eq!(req.bus, 1);
        assert!(!req.auxiliary);
        assert!(!req.logging);
        assert!(req.obd_multiplexing);
        assert!(req.whitelist_ecus.is_empty());
        assert_eq!(req.request[0].as_ref(), &[0x22, 0xF1, 0x81]);
    }

    #[test]
    fn test_applies_to() {
        let open = Request::new([queries::OBD_VERSION_REQUEST], [queries::OBD_VERSION_RESPONSE]);
        assert!(open.applies_to(EcuKind::Engine));
        assert!(open.applies_to(EcuKind::Eps));

        let engine_only = open.clone().with_whitelist([EcuKind::Engine]);
        assert!(engine_only.applies_to(EcuKind::Engine));
        assert!(!engine_only.applies_to(EcuKind::Eps));
    }

    #[test]
    fn test_to_auxiliary() {
        let req = Request::new([queries::UDS_VERSION_REQUEST], [queries::UDS_VERSION_RESPONSE])
            .with_bus(0)
            .with_auxiliary(true)
            .with_logging(true);
        let aux = req.to_auxiliary();
        assert_eq!(aux.bus, 4);
        assert_eq!(Request { bus: 0, ..aux }, req);
    }
}
