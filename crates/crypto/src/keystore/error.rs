//! Keystore error types

use thiserror::Error;

/// Errors that can occur during keystore operations
#[derive(Error, Debug)]
pub enum KeystoreError {
    /// Checksum did not match: wrong password or altered ciphertext
    #[error("invalid password: checksum verification failed")]
    InvalidPassword,

    /// Decrypted key does not belong to the recorded public key
    #[error("decrypted key does not match keystore pubkey {0}")]
    PublicKeyMismatch(String),

    /// Unsupported KDF function
    #[error("unsupported KDF function: {0}")]
    UnsupportedKdf(String),

    /// Unsupported cipher function
    #[error("unsupported cipher function: {0}")]
    UnsupportedCipher(String),

    /// Unsupported checksum function
    #[error("unsupported checksum function: {0}")]
    UnsupportedChecksum(String),

    /// Invalid KDF parameters
    #[error("invalid KDF parameters: {0}")]
    InvalidKdfParams(String),

    /// Invalid cipher parameters
    #[error("invalid cipher parameters: {0}")]
    InvalidCipherParams(String),

    /// Keystore version other than 4
    #[error("unsupported keystore version: {0}")]
    InvalidVersion(u32),

    /// Key derivation failed
    #[error("key derivation failed: {0}")]
    KdfError(String),

    /// Encryption/decryption failed
    #[error("cipher operation failed: {0}")]
    CipherError(String),

    /// File I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Invalid secret length
    #[error("invalid secret length: expected {expected}, got {actual}")]
    InvalidSecretLength { expected: usize, actual: usize },

    /// Decrypted bytes are not a valid BLS secret key
    #[error("invalid secret key: {0}")]
    InvalidSecret(String),

    /// Invalid hex encoding
    #[error("invalid hex encoding: {0}")]
    HexError(String),

    /// Keystore file already exists
    #[error("keystore already exists at path: {0}")]
    AlreadyExists(String),
}

/// Result type for keystore operations
pub type KeystoreResult<T> = Result<T, KeystoreError>;
