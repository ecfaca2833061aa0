//! Firmware query runner
//!
//! Drives a [`FwQueryConfig`] against a [`QueryTransport`]: every request
//! that fits the attached pandas is sent to its address batches in plan
//! order, and every answer is recorded together with the ECU it came from.
//! Interpreting the payloads is left to the caller.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::ecu::{EcuAddress, EcuKind, FwVersion};
use crate::plan::FwQueryConfig;
use crate::transport::{QueryExchange, QueryTransport};

const DEFAULT_TIMEOUT: Duration = Duration::from_millis(100);

/// One firmware response observed on the bus
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FwVersionRecord {
    /// Configured kind of the answering ECU, database first, then extra ECUs
    pub kind: Option<EcuKind>,
    pub address: EcuAddress,
    /// Arbitration id the response came from
    pub rx_addr: u32,
    pub bus: u8,
    /// Position of the request in the materialized request list
    pub request_index: usize,
    /// Collected for diagnostics only, not for fingerprinting
    pub logging: bool,
    pub version: FwVersion,
}

/// Executes the query plan of a config against a transport
pub struct FwQueryRunner {
    config: Arc<FwQueryConfig>,
    transport: Arc<dyn QueryTransport>,
    timeout: Duration,
}

impl FwQueryRunner {
    pub fn new(config: Arc<FwQueryConfig>, transport: Arc<dyn QueryTransport>) -> Self {
        Self {
            config,
            transport,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Query every batch of every runnable request, in plan order
    ///
    /// Transport failures are logged and the affected batch is skipped.
    pub async fn run(&self) -> Vec<FwVersionRecord> {
        let num_pandas = self.transport.num_pandas();
        let requests = self.config.materialized_requests(num_pandas);
        info!(
            requests = requests.len(),
            num_pandas, "Querying ECU firmware versions"
        );

        let mut records = Vec::new();
        let mut multiplexing: HashMap<u8, bool> = HashMap::new();

        for (request_index, request) in requests.into_iter().enumerate() {
            if multiplexing.get(&request.bus) != Some(&request.obd_multiplexing) {
                match self
                    .transport
                    .set_obd_multiplexing(request.bus, request.obd_multiplexing)
                    .await
                {
                    Ok(()) => {
                        multiplexing.insert(request.bus, request.obd_multiplexing);
                    }
                    Err(e) => {
                        warn!(bus = request.bus, error = %e, "Failed to set OBD multiplexing");
                        continue;
                    }
                }
            }

            let exchange = QueryExchange::from_request(request);
            for batch in self.config.address_batches(Some(request)) {
                if batch.is_empty() {
                    continue;
                }

                debug!(bus = request.bus, addrs = batch.len(), "Querying batch");
                let responses = match self.transport.query(&exchange, &batch, self.timeout).await {
                    Ok(responses) => responses,
                    Err(e) => {
                        warn!(bus = request.bus, error = %e, "Firmware query failed");
                        continue;
                    }
                };

                // Keep batch order so records come out deterministically
                for address in &batch {
                    let Some(payload) = responses.get(address) else {
                        continue;
                    };
                    records.push(FwVersionRecord {
                        kind: self.config.queried_kind_for(*address),
                        address: *address,
                        rx_addr: address.rx_addr(request.rx_offset),
                        bus: request.bus,
                        request_index,
                        logging: request.logging,
                        version: FwVersion::new(payload.clone()),
                    });
                }
            }
        }

        info!(responses = records.len(), "Firmware query finished");
        records
    }
}
