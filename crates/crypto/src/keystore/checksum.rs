//! Keystore checksum: `sha256(decryption_key[16..32] || ciphertext)`
//!
//! A mismatch means the password was wrong or the ciphertext was altered;
//! the two cases cannot be told apart, so both surface as
//! `KeystoreError::InvalidPassword`.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::error::{KeystoreError, KeystoreResult};
use super::kdf::DKLEN;

/// Only checksum function defined by EIP-2335
pub const CHECKSUM_FUNCTION: &str = "sha256";

/// Checksum module for EIP-2335 keystore
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChecksumModule {
    /// Checksum function identifier
    pub function: String,
    /// Always empty for sha256
    pub params: ChecksumParams,
    /// Checksum value as hex string
    pub message: String,
}

impl ChecksumModule {
    /// Create a new SHA-256 checksum module
    pub fn new(checksum: [u8; 32]) -> Self {
        Self {
            function: CHECKSUM_FUNCTION.to_string(),
            params: ChecksumParams {},
            message: hex::encode(checksum),
        }
    }

    /// Recorded checksum bytes
    pub fn checksum(&self) -> KeystoreResult<Vec<u8>> {
        hex::decode(&self.message)
            .map_err(|e| KeystoreError::HexError(format!("invalid checksum hex: {}", e)))
    }

    /// Check the recorded value against a freshly derived key
    pub fn verify(&self, derived_key: &[u8], ciphertext: &[u8]) -> KeystoreResult<()> {
        if self.function != CHECKSUM_FUNCTION {
            return Err(KeystoreError::UnsupportedChecksum(self.function.clone()));
        }
        let expected = self.checksum()?;
        let computed = compute_checksum(derived_key, ciphertext)?;
        if constant_time_eq(&expected, &computed) {
            Ok(())
        } else {
            Err(KeystoreError::InvalidPassword)
        }
    }
}

/// Empty params object required by the schema
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ChecksumParams {}

/// Compute the checksum over the second half of the derived key and the ciphertext
pub fn compute_checksum(derived_key: &[u8], ciphertext: &[u8]) -> KeystoreResult<[u8; 32]> {
    if derived_key.len() != DKLEN {
        return Err(KeystoreError::InvalidKdfParams(format!(
            "derived key must be {} bytes, got {}",
            DKLEN,
            derived_key.len()
        )));
    }

    let mut hasher = Sha256::new();
    hasher.update(&derived_key[16..32]);
    hasher.update(ciphertext);
    Ok(hasher.finalize().into())
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
