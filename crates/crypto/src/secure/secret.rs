//! Zeroizing holders for seeds, scalars and KDF output

use secrecy::SecretBox;
use zeroize::Zeroize;

/// Variable-length key material: derived keys and decrypted scalars
pub type SecretBytes = SecretBox<Vec<u8>>;

/// Fixed-size key material, wiped on drop
///
/// Holds the 64-byte BIP-39 seed, 32-byte IKM and serialized secret keys.
#[derive(Zeroize)]
#[zeroize(drop)]
pub struct SecretArray<const N: usize> {
    inner: [u8; N],
}

impl<const N: usize> SecretArray<N> {
    pub fn new(bytes: [u8; N]) -> Self {
        Self { inner: bytes }
    }

    pub fn expose_secret(&self) -> &[u8; N] {
        &self.inner
    }

    /// For PBKDF2 and RNG output written straight into the holder
    pub fn expose_secret_mut(&mut self) -> &mut [u8; N] {
        &mut self.inner
    }
}

impl<const N: usize> From<[u8; N]> for SecretArray<N> {
    fn from(mut bytes: [u8; N]) -> Self {
        let secret = Self::new(bytes);
        bytes.zeroize();
        secret
    }
}

impl<const N: usize> std::fmt::Debug for SecretArray<N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SecretArray<{}>(..)", N)
    }
}
