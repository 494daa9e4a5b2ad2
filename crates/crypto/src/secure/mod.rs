//! Secure memory handling for key material
//!
//! Containers here give:
//! - Automatic zeroing on drop via `zeroize`
//! - Debug output masking to prevent log exposure
//! - No `Clone`, so a secret has a single owner
//!
//! Seeds, derived secret keys and KDF output all pass through these
//! wrappers on their way between derivation and the keystore codec.

mod secret;

pub use secret::{SecretArray, SecretBytes};
