//! Mnemonic handling and hierarchical BLS key derivation
//!
//! A validator's keys are derived in two steps:
//!
//! 1. The mnemonic and an optional passphrase are stretched into a 64-byte
//!    seed (BIP-39).
//! 2. The seed roots an EIP-2333 key tree, walked along EIP-2334 paths:
//!
//! ```text
//! m / 12381 / 3600 / validator_index / 0        withdrawal key
//! m / 12381 / 3600 / validator_index / 0 / 0    signing key
//! ```
//!
//! # Example
//!
//! ```rust
//! use stakegen_crypto::mnemonic::{derive_key, derive_seed, DerivationPath};
//!
//! let seed = derive_seed(
//!     "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about",
//!     "",
//! );
//!
//! let signing = derive_key(seed.expose_secret(), &DerivationPath::signing(0)).unwrap();
//! println!("Signing key: {}", signing.public_key().to_hex());
//! ```
//!
//! # Security
//!
//! - The same mnemonic, passphrase and index always produce the same keys
//! - Seeds and intermediate key material are zeroized on drop

mod derive;
mod error;
mod generate;
mod seed;

pub use derive::{
    derive_child_sk, derive_key, derive_keypair, derive_master_sk, hkdf_mod_r, DerivationPath,
    BLS_PURPOSE, ETH_COIN_TYPE, MAX_KEYGEN_ATTEMPTS,
};
pub use error::{MnemonicError, MnemonicResult};
pub use generate::Mnemonic;
pub use seed::{derive_seed, SEED_ITERATIONS, SEED_LEN};
