//! Transport seam for firmware queries
//!
//! The plan only decides which addresses are queried together. Sending the
//! request steps, matching responses and ISO-TP handling belong to an
//! implementation of [`QueryTransport`]:
//! - a CAN/ISO-TP adapter on real hardware (outside this crate)
//! - [`MockQueryTransport`] with scripted responses for testing
//!
//! # Example
//!
//! ```ignore
//! use fwq_core::transport::{MockQueryTransport, QueryExchange, QueryTransport};
//!
//! let transport = MockQueryTransport::new(1);
//! let exchange = QueryExchange::from_request(&request);
//! let responses = transport.query(&exchange, &batch, Duration::from_millis(100)).await?;
//! ```

mod adapter;
pub mod error;
pub mod mock;

pub use adapter::{QueryExchange, QueryTransport, Responses};
pub use error::TransportError;
pub use mock::MockQueryTransport;
