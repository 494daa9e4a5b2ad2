//! Error types for mnemonic and key-tree operations

use thiserror::Error;

/// Result type for mnemonic operations
pub type MnemonicResult<T> = Result<T, MnemonicError>;

/// Errors that can occur during mnemonic operations
#[derive(Debug, Error)]
pub enum MnemonicError {
    /// Invalid mnemonic phrase (wrong word count or invalid words)
    #[error("invalid mnemonic phrase: {0}")]
    InvalidPhrase(String),

    /// Seed is shorter than the key tree accepts
    #[error("seed must be at least 32 bytes, got {0}")]
    SeedTooShort(usize),

    /// Key derivation failed
    #[error("key derivation failed: {0}")]
    DerivationFailed(String),

    /// Invalid derivation path
    #[error("invalid derivation path: {0}")]
    InvalidPath(String),
}

impl From<bip39::Error> for MnemonicError {
    fn from(err: bip39::Error) -> Self {
        MnemonicError::InvalidPhrase(err.to_string())
    }
}
