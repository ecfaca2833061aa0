//! Transport layer errors

use thiserror::Error;

#[derive(Debug, Error, Clone)]
pub enum TransportError {
    #[error("Connection closed")]
    ConnectionClosed,

    #[error("Send failed: {0}")]
    SendFailed(String),

    #[error("Receive failed: {0}")]
    ReceiveFailed(String),

    #[error("Bus {bus} not available: {reason}")]
    BusUnavailable { bus: u8, reason: String },

    #[error("Transport not supported: {0}")]
    Unsupported(String),
}
