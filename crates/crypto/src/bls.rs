//! BLS12-381 keys and signatures for validator deposits
//!
//! This module provides:
//! - min_pk variant (48-byte public keys, 96-byte signatures)
//! - The proof-of-possession ciphersuite used by the beacon chain
//! - Secret keys that cannot be cloned and are zeroized on drop

use crate::error::BlsError;
use crate::secure::SecretArray;
use blst::min_pk::{PublicKey as BlstPubKey, SecretKey as BlstSecKey, Signature as BlstSig};
use blst::BLST_ERROR;
use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};

/// Domain separation tag of the beacon-chain signature ciphersuite
pub const DST_POP: &[u8] = b"BLS_SIG_BLS12381G2_XMD:SHA-256_SSWU_RO_POP_";

/// Length of a serialized secret key
pub const SECRET_KEY_LEN: usize = 32;

/// Length of a compressed public key
pub const PUBLIC_KEY_LEN: usize = 48;

/// Length of a compressed signature
pub const SIGNATURE_LEN: usize = 96;

/// BLS12-381 secret key (a scalar modulo the group order)
///
/// Deliberately not `Clone`: a secret key is produced by derivation or by
/// decrypting a keystore, and lives exactly as long as its owner.
pub struct BlsSecretKey(BlstSecKey);

impl BlsSecretKey {
    /// Generate a new random secret key
    pub fn generate<R: CryptoRng + RngCore>(rng: &mut R) -> Self {
        loop {
            let mut ikm = SecretArray::new([0u8; 32]);
            rng.fill_bytes(ikm.expose_secret_mut());
            if let Ok(sk) = BlstSecKey::key_gen(ikm.expose_secret(), &[]) {
                return Self(sk);
            }
        }
    }

    /// Load from a 32-byte big-endian scalar
    ///
    /// Rejects zero and values not below the group order.
    pub fn from_bytes(bytes: &[u8; SECRET_KEY_LEN]) -> Result<Self, BlsError> {
        BlstSecKey::from_bytes(bytes)
            .map(Self)
            .map_err(|_| BlsError::InvalidSecretKey)
    }

    /// Load from a byte slice that must be exactly 32 bytes long
    pub fn from_slice(bytes: &[u8]) -> Result<Self, BlsError> {
        let array: &[u8; SECRET_KEY_LEN] =
            bytes.try_into().map_err(|_| BlsError::InvalidSecretKey)?;
        Self::from_bytes(array)
    }

    /// Serialize to big-endian bytes, wrapped so the copy is zeroized on drop
    pub fn to_bytes(&self) -> SecretArray<SECRET_KEY_LEN> {
        SecretArray::new(self.0.to_bytes())
    }

    /// Get the corresponding public key
    pub fn public_key(&self) -> BlsPublicKey {
        BlsPublicKey(self.0.sk_to_pk())
    }

    /// Sign a message under the proof-of-possession ciphersuite
    pub fn sign(&self, msg: &[u8]) -> BlsSignature {
        BlsSignature(self.0.sign(msg, DST_POP, &[]))
    }
}

impl std::fmt::Debug for BlsSecretKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlsSecretKey")
            .field("bytes", &"[REDACTED]")
            .finish()
    }
}

/// BLS12-381 public key (48 bytes compressed)
#[derive(Clone, PartialEq, Eq)]
pub struct BlsPublicKey(BlstPubKey);

impl BlsPublicKey {
    /// Load from bytes (48 bytes compressed)
    ///
    /// The point is checked to be on the curve, in the subgroup and not the
    /// identity.
    pub fn from_bytes(bytes: &[u8; PUBLIC_KEY_LEN]) -> Result<Self, BlsError> {
        BlstPubKey::key_validate(bytes)
            .map(Self)
            .map_err(|_| BlsError::InvalidPublicKey)
    }

    /// Serialize to bytes (48 bytes compressed)
    pub fn to_bytes(&self) -> [u8; PUBLIC_KEY_LEN] {
        self.0.to_bytes()
    }

    /// Lowercase hex without `0x`, the form used in keystores and deposit files
    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }

    /// Verify a signature over `msg`
    pub fn verify(&self, msg: &[u8], sig: &BlsSignature) -> bool {
        sig.verify(msg, self)
    }
}

impl std::fmt::Debug for BlsPublicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let bytes = self.to_bytes();
        write!(f, "BlsPublicKey({})", hex::encode(&bytes[..8]))
    }
}

impl Serialize for BlsPublicKey {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for BlsPublicKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        let bytes = hex::decode(s.trim_start_matches("0x")).map_err(serde::de::Error::custom)?;
        let arr: [u8; PUBLIC_KEY_LEN] = bytes
            .try_into()
            .map_err(|_| serde::de::Error::custom("invalid public key length"))?;
        Self::from_bytes(&arr).map_err(serde::de::Error::custom)
    }
}

/// BLS12-381 signature (96 bytes)
#[derive(Clone)]
pub struct BlsSignature(BlstSig);

impl BlsSignature {
    /// Load from bytes (96 bytes)
    pub fn from_bytes(bytes: &[u8; SIGNATURE_LEN]) -> Result<Self, BlsError> {
        BlstSig::from_bytes(bytes)
            .map(Self)
            .map_err(|_| BlsError::InvalidSignature)
    }

    /// Serialize to bytes
    pub fn to_bytes(&self) -> [u8; SIGNATURE_LEN] {
        self.0.to_bytes()
    }

    /// Verify signature against public key
    pub fn verify(&self, msg: &[u8], pubkey: &BlsPublicKey) -> bool {
        self.0.verify(true, msg, DST_POP, &[], &pubkey.0, true) == BLST_ERROR::BLST_SUCCESS
    }
}

impl std::fmt::Debug for BlsSignature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let bytes = self.to_bytes();
        write!(f, "BlsSignature({})", hex::encode(&bytes[..8]))
    }
}

impl PartialEq for BlsSignature {
    fn eq(&self, other: &Self) -> bool {
        self.to_bytes() == other.to_bytes()
    }
}

impl Eq for BlsSignature {}

/// BLS key pair
pub struct BlsKeyPair {
    pub secret_key: BlsSecretKey,
    pub public_key: BlsPublicKey,
}

impl BlsKeyPair {
    /// Generate a new random key pair
    pub fn generate<R: CryptoRng + RngCore>(rng: &mut R) -> Self {
        Self::from_secret_key(BlsSecretKey::generate(rng))
    }

    /// Create from secret key
    pub fn from_secret_key(secret_key: BlsSecretKey) -> Self {
        let public_key = secret_key.public_key();
        Self {
            secret_key,
            public_key,
        }
    }

    /// Sign a message
    pub fn sign(&self, msg: &[u8]) -> BlsSignature {
        self.secret_key.sign(msg)
    }
}

impl std::fmt::Debug for BlsKeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlsKeyPair")
            .field("public_key", &self.public_key)
            .finish()
    }
}
