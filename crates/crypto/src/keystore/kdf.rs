//! Key Derivation Function (KDF) implementation
//!
//! New keystores always use scrypt. Decryption also accepts the
//! `pbkdf2` / `hmac-sha256` variant allowed by EIP-2335.

use serde::{Deserialize, Serialize};
use sha2::Sha256;

use super::error::{KeystoreError, KeystoreResult};
use crate::secure::SecretBytes;

/// Standard scrypt parameters following EIP-2335
pub const SCRYPT_N: u32 = 262144;
pub const SCRYPT_R: u32 = 8;
pub const SCRYPT_P: u32 = 1;

/// Derived key length, split into a cipher half and a checksum half
pub const DKLEN: usize = 32;

/// Salt length in bytes
pub const SALT_LENGTH: usize = 32;

/// Only PRF accepted for the pbkdf2 KDF
pub const PBKDF2_PRF: &str = "hmac-sha256";

/// scrypt cost used when encrypting
///
/// Production keystores use the EIP-2335 default; tests and throwaway
/// keystores may lower `n` to keep runs fast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScryptCost {
    /// CPU/memory cost (power of two)
    pub n: u32,
    /// Block size
    pub r: u32,
    /// Parallelization
    pub p: u32,
}

impl Default for ScryptCost {
    fn default() -> Self {
        Self {
            n: SCRYPT_N,
            r: SCRYPT_R,
            p: SCRYPT_P,
        }
    }
}

impl ScryptCost {
    /// Cost with a custom `n` and the standard `r` and `p`
    pub fn with_n(n: u32) -> Self {
        Self {
            n,
            ..Self::default()
        }
    }

    /// Check that scrypt would accept these values
    pub fn validate(&self) -> KeystoreResult<()> {
        if self.n < 2 || !self.n.is_power_of_two() {
            return Err(KeystoreError::InvalidKdfParams(format!(
                "n must be a power of 2 greater than 1, got {}",
                self.n
            )));
        }
        if self.r == 0 || self.p == 0 {
            return Err(KeystoreError::InvalidKdfParams(
                "r and p must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// KDF module for EIP-2335 keystore
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct KdfModule {
    /// KDF function identifier (`scrypt` or `pbkdf2`)
    pub function: String,
    /// KDF parameters
    pub params: KdfParams,
    /// Empty message field (required by EIP-2335 schema)
    pub message: String,
}

impl KdfModule {
    /// Create a new scrypt KDF module with standard EIP-2335 parameters
    pub fn new_scrypt(salt: Vec<u8>) -> Self {
        Self::new_scrypt_with(salt, ScryptCost::default())
    }

    /// Create a scrypt KDF module with an explicit cost
    pub fn new_scrypt_with(salt: Vec<u8>, cost: ScryptCost) -> Self {
        Self {
            function: "scrypt".to_string(),
            params: KdfParams::Scrypt {
                dklen: DKLEN as u32,
                n: cost.n,
                r: cost.r,
                p: cost.p,
                salt: hex::encode(&salt),
            },
            message: String::new(),
        }
    }

    /// Derive the decryption key from an already-processed password
    pub fn derive_key(&self, password: &[u8]) -> KeystoreResult<SecretBytes> {
        self.params.validate()?;
        match (self.function.as_str(), &self.params) {
            (
                "scrypt",
                KdfParams::Scrypt {
                    dklen,
                    n,
                    r,
                    p,
                    salt,
                },
            ) => {
                let salt_bytes =
                    hex::decode(salt).map_err(|e| KeystoreError::HexError(e.to_string()))?;
                scrypt_derive_key(password, &salt_bytes, *n, *r, *p, *dklen as usize)
            }
            ("pbkdf2", KdfParams::Pbkdf2 { dklen, c, salt, .. }) => {
                let salt_bytes =
                    hex::decode(salt).map_err(|e| KeystoreError::HexError(e.to_string()))?;
                Ok(pbkdf2_derive_key(password, &salt_bytes, *c, *dklen as usize))
            }
            ("scrypt", _) | ("pbkdf2", _) => Err(KeystoreError::InvalidKdfParams(format!(
                "parameters do not match function '{}'",
                self.function
            ))),
            (other, _) => Err(KeystoreError::UnsupportedKdf(other.to_string())),
        }
    }
}

/// KDF parameters supporting different algorithms
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum KdfParams {
    /// scrypt parameters (EIP-2335 standard)
    Scrypt {
        /// Derived key length in bytes
        dklen: u32,
        /// CPU/memory cost parameter (must be power of 2)
        n: u32,
        /// Block size parameter
        r: u32,
        /// Parallelization parameter
        p: u32,
        /// Salt as hex string
        salt: String,
    },
    /// PBKDF2 parameters
    Pbkdf2 {
        /// Derived key length in bytes
        dklen: u32,
        /// Iteration count
        c: u32,
        /// Pseudo-random function, always `hmac-sha256`
        prf: String,
        /// Salt as hex string
        salt: String,
    },
}

impl KdfParams {
    /// Validate the parameters
    pub fn validate(&self) -> KeystoreResult<()> {
        match self {
            KdfParams::Scrypt {
                dklen,
                n,
                r,
                p,
                salt,
            } => {
                check_dklen(*dklen)?;
                ScryptCost {
                    n: *n,
                    r: *r,
                    p: *p,
                }
                .validate()?;
                check_salt(salt)
            }
            KdfParams::Pbkdf2 {
                dklen,
                c,
                prf,
                salt,
            } => {
                check_dklen(*dklen)?;
                if *c == 0 {
                    return Err(KeystoreError::InvalidKdfParams(
                        "c must be positive".to_string(),
                    ));
                }
                if prf != PBKDF2_PRF {
                    return Err(KeystoreError::InvalidKdfParams(format!(
                        "unsupported prf: {}",
                        prf
                    )));
                }
                check_salt(salt)
            }
        }
    }
}

fn check_dklen(dklen: u32) -> KeystoreResult<()> {
    if dklen as usize != DKLEN {
        return Err(KeystoreError::InvalidKdfParams(format!(
            "dklen must be {}, got {}",
            DKLEN, dklen
        )));
    }
    Ok(())
}

fn check_salt(salt: &str) -> KeystoreResult<()> {
    hex::decode(salt)
        .map(|_| ())
        .map_err(|e| KeystoreError::InvalidKdfParams(format!("invalid salt hex: {}", e)))
}

/// Derive a key using scrypt KDF
pub fn scrypt_derive_key(
    password: &[u8],
    salt: &[u8],
    n: u32,
    r: u32,
    p: u32,
    dklen: usize,
) -> KeystoreResult<SecretBytes> {
    let log_n = n.trailing_zeros() as u8;

    let params = scrypt::Params::new(log_n, r, p, dklen)
        .map_err(|e| KeystoreError::InvalidKdfParams(e.to_string()))?;

    let mut output = vec![0u8; dklen];
    scrypt::scrypt(password, salt, &params, &mut output)
        .map_err(|e| KeystoreError::KdfError(e.to_string()))?;

    Ok(secrecy::SecretBox::new(Box::new(output)))
}

/// Derive a key using PBKDF2-HMAC-SHA256
pub fn pbkdf2_derive_key(password: &[u8], salt: &[u8], c: u32, dklen: usize) -> SecretBytes {
    let mut output = vec![0u8; dklen];
    pbkdf2::pbkdf2_hmac::<Sha256>(password, salt, c, &mut output);
    secrecy::SecretBox::new(Box::new(output))
}

/// Generate a random salt
pub fn generate_salt() -> Vec<u8> {
    use rand::RngCore;
    let mut salt = vec![0u8; SALT_LENGTH];
    rand::thread_rng().fill_bytes(&mut salt);
    salt
}
