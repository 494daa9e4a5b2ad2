//! Mnemonic to seed stretching (BIP-39)
//!
//! The phrase is not checked against a wordlist here: any text yields a
//! deterministic seed, including the empty string. Wordlist validation lives
//! in [`Mnemonic`](super::Mnemonic).

use crate::secure::SecretArray;
use pbkdf2::pbkdf2_hmac;
use sha2::Sha512;
use unicode_normalization::UnicodeNormalization;
use zeroize::Zeroizing;

/// Length of a BIP-39 seed
pub const SEED_LEN: usize = 64;

/// PBKDF2 rounds fixed by BIP-39
pub const SEED_ITERATIONS: u32 = 2048;

const SALT_PREFIX: &str = "mnemonic";

/// Derive the 64-byte seed for `mnemonic` and `passphrase`
///
/// PBKDF2-HMAC-SHA512 over the NFKD-normalized phrase, salted with
/// `"mnemonic" || NFKD(passphrase)`. Any text is accepted, whatever its
/// length.
pub fn derive_seed(mnemonic: &str, passphrase: &str) -> SecretArray<SEED_LEN> {
    let password: Zeroizing<String> = Zeroizing::new(mnemonic.nfkd().collect());
    let mut salt: Zeroizing<String> = Zeroizing::new(String::from(SALT_PREFIX));
    salt.extend(passphrase.nfkd());

    let mut seed = SecretArray::new([0u8; SEED_LEN]);
    pbkdf2_hmac::<Sha512>(
        password.as_bytes(),
        salt.as_bytes(),
        SEED_ITERATIONS,
        seed.expose_secret_mut(),
    );
    seed
}
