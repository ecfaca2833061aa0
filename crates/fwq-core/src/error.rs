//! Firmware query errors

use thiserror::Error;

/// Errors that can occur while loading a firmware query database
#[derive(Debug, Error)]
pub enum FwQueryError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Byte string is neither a catalog query nor valid hex
    #[error("invalid hex bytes: {0}")]
    InvalidHex(String),

    /// Number out of range or not parseable
    #[error("invalid {field}: {value}")]
    InvalidNumber { field: &'static str, value: String },

    /// ECU kind name not recognized
    #[error("unknown ECU kind: {0}")]
    UnknownEcuKind(String),

    /// Request or response step has no bytes
    #[error("request {index} has an empty {field} step")]
    EmptyStep { index: usize, field: &'static str },
}

/// Result type for firmware query operations
pub type FwQueryResult<T> = Result<T, FwQueryError>;

/// Parse a hex byte string
///
/// Accepts formats: "22F188", "0x22f188", "22 f1 88"
pub fn parse_hex_bytes(s: &str) -> FwQueryResult<Vec<u8>> {
    let trimmed = s.trim();
    let trimmed = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    let cleaned: String = trimmed.chars().filter(|c| !c.is_whitespace()).collect();
    hex::decode(&cleaned).map_err(|_| FwQueryError::InvalidHex(s.to_string()))
}

/// Parse a hex number, with or without `0x` prefix
pub fn parse_hex_u32(field: &'static str, s: &str) -> FwQueryResult<u32> {
    let trimmed = s.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    u32::from_str_radix(digits, 16).map_err(|_| FwQueryError::InvalidNumber {
        field,
        value: s.to_string(),
    })
}
