//! Error types for credential derivation, export and validation

use std::path::PathBuf;

use stakegen_crypto::keystore::KeystoreError;
use stakegen_crypto::MnemonicError;
use stakegen_types::ConfigError;
use thiserror::Error;

/// Result type for credential operations
pub type CredentialResult<T> = Result<T, CredentialError>;

/// Caller input rejected before any key material is touched
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Keystore password below the minimum length
    #[error("the password length should be at least {min} characters")]
    WeakPassword { min: usize },

    /// Deposit size other than the supported node roles
    #[error("num_eth only supports 1 or 12, got {0}")]
    UnsupportedDepositAmount(u64),

    /// Per-key amount outside the deposit contract bounds
    #[error("deposit amount {0} gwei is outside 1..=32 ETH")]
    InvalidAmount(u64),

    /// `total - amount` would not be a valid stake record
    #[error("deposit amount {amount} gwei leaves no valid stake out of {total} gwei")]
    StakeOutOfRange { amount: u64, total: u64 },
}

/// One keystore that could not be written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFailure {
    /// Validator index of the credential
    pub index: u32,
    /// Rendered error
    pub reason: String,
}

/// Errors raised while building or exporting credentials
#[derive(Debug, Error)]
pub enum CredentialError {
    /// Amount schedule does not cover every key
    #[error("the number of keys ({num_keys}) doesn't equal the number of amounts ({amounts})")]
    AmountCountMismatch { num_keys: u32, amounts: usize },

    /// Empty or whitespace-only mnemonic
    #[error("mnemonic must not be empty")]
    EmptyMnemonic,

    /// `start_index + num_keys` does not fit the index space
    #[error("validator indices overflow: start {start_index} + count {num_keys}")]
    IndexOverflow { start_index: u32, num_keys: u32 },

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Mnemonic(#[from] MnemonicError),

    #[error(transparent)]
    Keystore(#[from] KeystoreError),

    /// File system failure at `path`
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Deposit or stake file is not valid JSON
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Some keystores were written, others failed on I/O
    #[error("{} keystore(s) written, {} failed", written.len(), failures.len())]
    PartialExport {
        written: Vec<PathBuf>,
        failures: Vec<ExportFailure>,
    },

    /// Blocking worker panicked or the runtime shut down
    #[error("worker task failed: {0}")]
    Task(String),

    /// Skipped after another credential failed
    #[error("cancelled")]
    Cancelled,
}

impl CredentialError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether this is a file system failure confined to one output file
    pub fn is_io(&self) -> bool {
        matches!(self, Self::Io { .. })
    }
}
