//! Cryptographic primitives for stakegen
//!
//! This crate provides:
//! - BLS12-381 keys and proof-of-possession signatures
//! - BIP-39 seed stretching and mnemonic generation
//! - EIP-2333 hierarchical key derivation along EIP-2334 paths
//! - EIP-2335 encrypted keystores
//! - Zeroizing containers for secret material

pub mod bls;
pub mod error;
pub mod keystore;
pub mod mnemonic;
pub mod secure;

pub use bls::{BlsKeyPair, BlsPublicKey, BlsSecretKey, BlsSignature, DST_POP};

pub use error::BlsError;

pub use secure::{SecretArray, SecretBytes};
pub use secrecy::ExposeSecret;

pub use keystore::{Keystore, KeystoreBuilder, KeystoreError, ScryptCost};

pub use mnemonic::{
    derive_key, derive_keypair, derive_seed, DerivationPath, Mnemonic, MnemonicError,
};
