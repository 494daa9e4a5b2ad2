//! AES-128-CTR, keyed with the first half of the derived key

use aes::Aes128;
use cipher::{KeyIvInit, StreamCipher};
use ctr::Ctr128BE;
use serde::{Deserialize, Serialize};

use super::error::{KeystoreError, KeystoreResult};
use crate::secure::SecretBytes;

/// Only cipher defined by EIP-2335
pub const CIPHER_FUNCTION: &str = "aes-128-ctr";

/// IV length for AES-128-CTR
pub const IV_LENGTH: usize = 16;

/// AES-128 key length
pub const AES_KEY_LENGTH: usize = 16;

type Aes128Ctr = Ctr128BE<Aes128>;

/// Cipher module for EIP-2335 keystore
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CipherModule {
    /// Cipher function identifier
    pub function: String,
    /// Cipher parameters
    pub params: CipherParams,
    /// Ciphertext as hex string
    pub message: String,
}

impl CipherModule {
    /// Create a new AES-128-CTR cipher module
    pub fn new(iv: [u8; IV_LENGTH], ciphertext: Vec<u8>) -> Self {
        Self {
            function: CIPHER_FUNCTION.to_string(),
            params: CipherParams {
                iv: hex::encode(iv),
            },
            message: hex::encode(&ciphertext),
        }
    }

    /// Ciphertext bytes
    pub fn ciphertext(&self) -> KeystoreResult<Vec<u8>> {
        hex::decode(&self.message)
            .map_err(|e| KeystoreError::HexError(format!("invalid ciphertext hex: {}", e)))
    }

    /// Decrypt the message with the derived key
    pub fn decrypt(&self, derived_key: &[u8]) -> KeystoreResult<SecretBytes> {
        if self.function != CIPHER_FUNCTION {
            return Err(KeystoreError::UnsupportedCipher(self.function.clone()));
        }
        let iv = self.params.iv()?;
        let mut plaintext = self.ciphertext()?;
        apply_keystream(derived_key, &iv, &mut plaintext)?;
        Ok(secrecy::SecretBox::new(Box::new(plaintext)))
    }
}

/// Cipher parameters for AES-128-CTR
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CipherParams {
    /// IV as hex string
    pub iv: String,
}

impl CipherParams {
    /// Decode and length-check the IV
    pub fn iv(&self) -> KeystoreResult<[u8; IV_LENGTH]> {
        let bytes = hex::decode(&self.iv)
            .map_err(|e| KeystoreError::InvalidCipherParams(format!("invalid IV hex: {}", e)))?;
        let len = bytes.len();
        bytes.try_into().map_err(|_| {
            KeystoreError::InvalidCipherParams(format!(
                "IV must be {} bytes, got {}",
                IV_LENGTH, len
            ))
        })
    }
}

/// Encrypt `secret` with the first 16 bytes of `derived_key`
pub fn encrypt_secret(
    secret: &[u8],
    derived_key: &[u8],
    iv: &[u8; IV_LENGTH],
) -> KeystoreResult<Vec<u8>> {
    let mut ciphertext = secret.to_vec();
    apply_keystream(derived_key, iv, &mut ciphertext)?;
    Ok(ciphertext)
}

fn apply_keystream(derived_key: &[u8], iv: &[u8; IV_LENGTH], data: &mut [u8]) -> KeystoreResult<()> {
    let key: [u8; AES_KEY_LENGTH] = derived_key
        .get(..AES_KEY_LENGTH)
        .and_then(|k| k.try_into().ok())
        .ok_or_else(|| {
            KeystoreError::CipherError(format!(
                "key must be at least {} bytes, got {}",
                AES_KEY_LENGTH,
                derived_key.len()
            ))
        })?;

    let mut cipher = Aes128Ctr::new(&key.into(), &(*iv).into());
    cipher.apply_keystream(data);
    Ok(())
}

/// Generate a random IV
pub fn generate_iv() -> [u8; IV_LENGTH] {
    use rand::RngCore;
    let mut iv = [0u8; IV_LENGTH];
    rand::thread_rng().fill_bytes(&mut iv);
    iv
}
