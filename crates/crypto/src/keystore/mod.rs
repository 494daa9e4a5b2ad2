//! EIP-2335 encrypted keystores for BLS secret keys
//!
//! The format supports:
//!
//! - Password-based key derivation with scrypt (written) or PBKDF2 (read)
//! - AES-128-CTR encryption of the 32-byte secret
//! - A SHA-256 checksum that detects a wrong password before decryption
//! - JSON serialization with the public key, derivation path and a UUID
//!
//! # Example
//!
//! ```rust,ignore
//! use stakegen_crypto::keystore::{Keystore, KeystoreBuilder, ScryptCost};
//!
//! let keystore = KeystoreBuilder::new(&keypair)
//!     .password("my-strong-password")
//!     .path("m/12381/3600/0/0/0")
//!     .build()?;
//!
//! keystore.save("./validator_keys/keystore.json")?;
//!
//! let loaded = Keystore::load("./validator_keys/keystore.json")?;
//! let keypair = loaded.decrypt_keypair("my-strong-password")?;
//! ```

mod checksum;
mod cipher;
mod encrypted;
mod error;
mod kdf;
mod password;

pub use checksum::{compute_checksum, ChecksumModule, ChecksumParams, CHECKSUM_FUNCTION};
pub use cipher::{encrypt_secret, generate_iv, CipherModule, CipherParams, CIPHER_FUNCTION};
pub use encrypted::{CryptoModule, Keystore, KeystoreBuilder, KEYSTORE_FILE_MODE, KEYSTORE_VERSION};
pub use error::{KeystoreError, KeystoreResult};
pub use kdf::{
    generate_salt, pbkdf2_derive_key, scrypt_derive_key, KdfModule, KdfParams, ScryptCost,
    SCRYPT_N, SCRYPT_P, SCRYPT_R,
};
pub use password::process_password;
