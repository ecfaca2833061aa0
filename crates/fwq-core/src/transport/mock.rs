//! Mock transport for testing

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::RwLock;

use super::{QueryExchange, QueryTransport, Responses, TransportError};
use crate::ecu::EcuAddress;

/// A batch issued through the mock
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedQuery {
    pub bus: u8,
    pub request: Vec<Bytes>,
    pub batch: Vec<EcuAddress>,
}

/// Mock transport with scripted firmware responses and call recording
pub struct MockQueryTransport {
    num_pandas: usize,
    connected: AtomicBool,
    /// (bus, address) -> (request step prefix, response payload)
    responses: RwLock<HashMap<(u8, EcuAddress), Vec<(Bytes, Bytes)>>>,
    issued: RwLock<Vec<IssuedQuery>>,
    multiplexing: RwLock<Vec<(u8, bool)>>,
}

impl MockQueryTransport {
    pub fn new(num_pandas: usize) -> Self {
        Self {
            num_pandas,
            connected: AtomicBool::new(true),
            responses: RwLock::new(HashMap::new()),
            issued: RwLock::new(Vec::new()),
            multiplexing: RwLock::new(Vec::new()),
        }
    }

    /// Answer `payload` when `addr` on `bus` is queried with a final step
    /// starting with `request`
    pub fn add_response(
        &self,
        bus: u8,
        addr: EcuAddress,
        request: impl Into<Bytes>,
        payload: impl Into<Bytes>,
    ) {
        self.responses
            .write()
            .entry((bus, addr))
            .or_default()
            .push((request.into(), payload.into()));
    }

    /// Set connection state
    pub fn set_connected(&self, connected: bool) {
        self.connected.store(connected, Ordering::SeqCst);
    }

    /// All batches issued so far, in order
    pub fn issued(&self) -> Vec<IssuedQuery> {
        self.issued.read().clone()
    }

    /// All multiplexing changes so far, in order
    pub fn multiplexing_changes(&self) -> Vec<(u8, bool)> {
        self.multiplexing.read().clone()
    }

    fn find_response(&self, bus: u8, addr: &EcuAddress, last_step: &[u8]) -> Option<Bytes> {
        let responses = self.responses.read();
        responses
            .get(&(bus, *addr))?
            .iter()
            .find(|(req, _)| last_step.starts_with(req))
            .map(|(_, payload)| payload.clone())
    }
}

#[async_trait]
impl QueryTransport for MockQueryTransport {
    async fn query(
        &self,
        exchange: &QueryExchange,
        batch: &[EcuAddress],
        _timeout: Duration,
    ) -> Result<Responses, TransportError> {
        if !self.connected.load(Ordering::SeqCst) {
            return Err(TransportError::ConnectionClosed);
        }
        if usize::from(exchange.bus) >= self.num_pandas * 4 {
            return Err(TransportError::BusUnavailable {
                bus: exchange.bus,
                reason: format!("{} panda(s) attached", self.num_pandas),
            });
        }

        self.issued.write().push(IssuedQuery {
            bus: exchange.bus,
            request: exchange.request.clone(),
            batch: batch.to_vec(),
        });

        let last_step: &[u8] = exchange.request.last().map(|b| &b[..]).unwrap_or(&[]);
        let found: Responses = batch
            .iter()
            .filter_map(|addr| {
                self.find_response(exchange.bus, addr, last_step)
                    .map(|payload| (*addr, payload))
            })
            .collect();

        tracing::debug!(bus = exchange.bus, ?batch, "Mock transport: queried batch");
        Ok(found)
    }

    async fn set_obd_multiplexing(&self, bus: u8, enabled: bool) -> Result<(), TransportError> {
        if !self.connected.load(Ordering::SeqCst) {
            return Err(TransportError::ConnectionClosed);
        }
        self.multiplexing.write().push((bus, enabled));
        Ok(())
    }

    fn num_pandas(&self) -> usize {
        self.num_pandas
    }
}
