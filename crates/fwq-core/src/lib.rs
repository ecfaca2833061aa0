//! fwq-core - ECU firmware query catalog and query planning
//!
//! This crate holds the diagnostic query templates used to read firmware
//! versions from vehicle ECUs, the per-brand firmware database, and the plan
//! builder that turns both into the batches of addresses to query. A
//! transport seam and a runner drive the plan against the bus.

pub mod config;
pub mod ecu;
pub mod error;
pub mod plan;
pub mod queries;
pub mod request;
pub mod runner;
pub mod transport;
pub mod uds;

pub use config::FwQueryConfigFile;
pub use ecu::{EcuAddress, EcuKind, EcuType, FwVersion};
pub use error::{FwQueryError, FwQueryResult};
pub use plan::{AddressBatches, EcuVersions, FwQueryConfig, FwVersionDb, BUSES_PER_PANDA};
pub use request::Request;
pub use runner::{FwQueryRunner, FwVersionRecord};
pub use transport::{MockQueryTransport, QueryExchange, QueryTransport, TransportError};
