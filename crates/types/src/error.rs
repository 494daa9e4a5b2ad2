//! Configuration error types

use thiserror::Error;

/// Errors raised while resolving static configuration
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Network name is not in the chain-setting registry
    #[error("unknown chain: {0}")]
    UnknownChain(String),

    /// Hex field could not be decoded
    #[error("invalid hex in {field}: {reason}")]
    InvalidHex {
        /// Field being decoded
        field: &'static str,
        /// Decoder message
        reason: String,
    },

    /// Decoded field has the wrong number of bytes
    #[error("invalid length for {field}: expected {expected}, got {actual}")]
    InvalidLength {
        /// Field being decoded
        field: &'static str,
        /// Expected byte length
        expected: usize,
        /// Actual byte length
        actual: usize,
    },
}
