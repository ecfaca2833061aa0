//! Transport trait and types

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;

use super::TransportError;
use crate::ecu::EcuAddress;
use crate::request::Request;

/// Observed response payload per queried address; missing = no response
pub type Responses = HashMap<EcuAddress, Bytes>;

/// The wire-level part of a [`Request`] handed to the transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryExchange {
    /// Request steps, sent in order
    pub request: Vec<Bytes>,
    /// Expected response prefixes, one per step
    pub response: Vec<Bytes>,
    /// Bus index (>= 4 is the auxiliary transport)
    pub bus: u8,
    /// Response id = transmit id + rx_offset
    pub rx_offset: u32,
}

impl QueryExchange {
    pub fn from_request(request: &Request) -> Self {
        Self {
            request: request.request.clone(),
            response: request.response.clone(),
            bus: request.bus,
            rx_offset: request.rx_offset,
        }
    }
}

/// Bus access for firmware queries
///
/// Implementations issue every address of a batch together and return
/// whatever the ECUs answered to the final request step.
#[async_trait]
pub trait QueryTransport: Send + Sync {
    /// Run one request/response exchange against a batch of addresses
    ///
    /// # Arguments
    /// * `exchange` - Request steps, expected responses, bus and rx offset
    /// * `batch` - Addresses to query together
    /// * `timeout` - Maximum time to wait for responses
    async fn query(
        &self,
        exchange: &QueryExchange,
        batch: &[EcuAddress],
        timeout: Duration,
    ) -> Result<Responses, TransportError>;

    /// Enable or disable OBD multiplexing on a bus
    async fn set_obd_multiplexing(&self, bus: u8, enabled: bool) -> Result<(), TransportError>;

    /// Number of attached pandas (four buses each)
    fn num_pandas(&self) -> usize;
}
