//! BLS error type

use thiserror::Error;

/// BLS12-381 cryptographic errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BlsError {
    /// Invalid secret key bytes
    #[error("invalid secret key bytes")]
    InvalidSecretKey,

    /// Invalid public key bytes
    #[error("invalid public key bytes")]
    InvalidPublicKey,

    /// Invalid signature bytes
    #[error("invalid signature bytes")]
    InvalidSignature,

    /// Signature verification failed
    #[error("signature verification failed")]
    VerificationFailed,
}
