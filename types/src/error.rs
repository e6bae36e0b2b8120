//! Error type for parsing and arithmetic on the fundamental types.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypesError {
    #[error("invalid hex: {0}")]
    InvalidHex(String),

    #[error("invalid length: expected {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("unknown network: {0}")]
    UnknownNetwork(String),

    #[error("amount overflow")]
    AmountOverflow,
}
