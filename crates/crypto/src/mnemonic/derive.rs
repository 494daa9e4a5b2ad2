//! Hierarchical BLS key derivation (EIP-2333) and validator paths (EIP-2334)
//!
//! The tree is rooted at a master key computed from the seed. Every child is
//! derived from its parent through a compressed Lamport public key, so there
//! is no distinction between hardened and non-hardened indices.
//!
//! # Derivation Path
//!
//! ```text
//! m / 12381 / 3600 / validator_index / 0        withdrawal key
//! m / 12381 / 3600 / validator_index / 0 / 0    signing key
//! ```

use super::error::{MnemonicError, MnemonicResult};
use crate::bls::{BlsKeyPair, BlsSecretKey, SECRET_KEY_LEN};
use hkdf::Hkdf;
use num_bigint::BigUint;
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;
use tracing::debug;
use zeroize::Zeroizing;

/// BLS curve identifier, the `purpose` level of the path
pub const BLS_PURPOSE: u32 = 12381;

/// Coin type registered for the beacon chain
pub const ETH_COIN_TYPE: u32 = 3600;

/// Bound on the `hkdf_mod_r` retry loop
pub const MAX_KEYGEN_ATTEMPTS: usize = 255;

const KEYGEN_SALT: &[u8] = b"BLS-SIG-KEYGEN-SALT-";

/// Output length `L` of `hkdf_mod_r`, `ceil((3 * ceil(log2(r))) / 16)`
const HKDF_MOD_R_LEN: usize = 48;

const LAMPORT_CHUNKS: usize = 255;
const LAMPORT_CHUNK_LEN: usize = 32;

/// Order of the BLS12-381 scalar field, big-endian
const CURVE_ORDER: [u8; 32] = [
    0x73, 0xed, 0xa7, 0x53, 0x29, 0x9d, 0x7d, 0x48, 0x33, 0x39, 0xd8, 0x08, 0x09, 0xa1, 0xd8, 0x05,
    0x53, 0xbd, 0xa4, 0x02, 0xff, 0xfe, 0x5b, 0xfe, 0xff, 0xff, 0xff, 0xff, 0x00, 0x00, 0x00, 0x01,
];

/// A parsed derivation path such as `m/12381/3600/0/0/0`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DerivationPath(Vec<u32>);

impl DerivationPath {
    /// Build a path from raw indices
    pub fn new(indices: Vec<u32>) -> Self {
        Self(indices)
    }

    /// Withdrawal key path for a validator index
    pub fn withdrawal(validator_index: u32) -> Self {
        Self(vec![BLS_PURPOSE, ETH_COIN_TYPE, validator_index, 0])
    }

    /// Signing key path for a validator index
    pub fn signing(validator_index: u32) -> Self {
        Self(vec![BLS_PURPOSE, ETH_COIN_TYPE, validator_index, 0, 0])
    }

    /// Indices below the master node
    pub fn indices(&self) -> &[u32] {
        &self.0
    }

    /// The path with `/` replaced by `_`, as used in keystore file names
    pub fn file_component(&self) -> String {
        self.to_string().replace('/', "_")
    }
}

impl fmt::Display for DerivationPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "m")?;
        for index in &self.0 {
            write!(f, "/{}", index)?;
        }
        Ok(())
    }
}

impl FromStr for DerivationPath {
    type Err = MnemonicError;

    fn from_str(path: &str) -> Result<Self, Self::Err> {
        let path = path.trim();
        if path.is_empty() {
            return Err(MnemonicError::InvalidPath("path is empty".to_string()));
        }

        let mut parts = path.split('/');
        if parts.next() != Some("m") {
            return Err(MnemonicError::InvalidPath(
                "path must start with 'm'".to_string(),
            ));
        }

        let indices = parts
            .map(|part| {
                part.parse::<u32>().map_err(|_| {
                    MnemonicError::InvalidPath(format!("invalid path component: '{}'", part))
                })
            })
            .collect::<MnemonicResult<Vec<_>>>()?;

        Ok(Self(indices))
    }
}

/// Map input keying material to a non-zero scalar modulo the curve order
pub fn hkdf_mod_r(ikm: &[u8], key_info: &[u8]) -> MnemonicResult<BlsSecretKey> {
    let order = BigUint::from_bytes_be(&CURVE_ORDER);

    let mut input = Zeroizing::new(Vec::with_capacity(ikm.len() + 1));
    input.extend_from_slice(ikm);
    input.push(0);

    let mut info = Vec::with_capacity(key_info.len() + 2);
    info.extend_from_slice(key_info);
    info.extend_from_slice(&(HKDF_MOD_R_LEN as u16).to_be_bytes());

    let mut salt = KEYGEN_SALT.to_vec();
    for _ in 0..MAX_KEYGEN_ATTEMPTS {
        salt = Sha256::digest(&salt).to_vec();

        let mut okm = Zeroizing::new([0u8; HKDF_MOD_R_LEN]);
        Hkdf::<Sha256>::new(Some(&salt), &input)
            .expand(&info, &mut okm[..])
            .map_err(|e| MnemonicError::DerivationFailed(e.to_string()))?;

        let scalar = BigUint::from_bytes_be(&okm[..]) % &order;
        if scalar == BigUint::default() {
            continue;
        }

        let be = Zeroizing::new(scalar.to_bytes_be());
        let mut bytes = Zeroizing::new([0u8; SECRET_KEY_LEN]);
        bytes[SECRET_KEY_LEN - be.len()..].copy_from_slice(&be);
        return BlsSecretKey::from_bytes(&bytes)
            .map_err(|e| MnemonicError::DerivationFailed(e.to_string()));
    }

    Err(MnemonicError::DerivationFailed(format!(
        "no non-zero scalar after {} attempts",
        MAX_KEYGEN_ATTEMPTS
    )))
}

/// Master secret key for a seed
pub fn derive_master_sk(seed: &[u8]) -> MnemonicResult<BlsSecretKey> {
    if seed.len() < 32 {
        return Err(MnemonicError::SeedTooShort(seed.len()));
    }
    hkdf_mod_r(seed, b"")
}

/// Child secret key at `index` below `parent`
pub fn derive_child_sk(parent: &BlsSecretKey, index: u32) -> MnemonicResult<BlsSecretKey> {
    let compressed = parent_sk_to_lamport_pk(parent, index)?;
    hkdf_mod_r(&compressed, b"")
}

/// Secret key at the end of `path`, starting from the master key of `seed`
pub fn derive_key(seed: &[u8], path: &DerivationPath) -> MnemonicResult<BlsSecretKey> {
    let master = derive_master_sk(seed)?;
    let key = path
        .indices()
        .iter()
        .try_fold(master, |parent, &index| derive_child_sk(&parent, index))?;
    debug!(path = %path, "Derived BLS key");
    Ok(key)
}

/// Key pair at the end of `path`
pub fn derive_keypair(seed: &[u8], path: &DerivationPath) -> MnemonicResult<BlsKeyPair> {
    derive_key(seed, path).map(BlsKeyPair::from_secret_key)
}

fn parent_sk_to_lamport_pk(parent: &BlsSecretKey, index: u32) -> MnemonicResult<[u8; 32]> {
    let salt = index.to_be_bytes();
    let ikm = parent.to_bytes();
    let mut not_ikm = Zeroizing::new(*ikm.expose_secret());
    not_ikm.iter_mut().for_each(|b| *b = !*b);

    let lamport_0 = ikm_to_lamport_sk(ikm.expose_secret(), &salt)?;
    let lamport_1 = ikm_to_lamport_sk(&not_ikm[..], &salt)?;

    let mut hasher = Sha256::new();
    for chunk in lamport_0
        .chunks(LAMPORT_CHUNK_LEN)
        .chain(lamport_1.chunks(LAMPORT_CHUNK_LEN))
    {
        hasher.update(Sha256::digest(chunk));
    }
    Ok(hasher.finalize().into())
}

fn ikm_to_lamport_sk(ikm: &[u8], salt: &[u8]) -> MnemonicResult<Zeroizing<Vec<u8>>> {
    let mut okm = Zeroizing::new(vec![0u8; LAMPORT_CHUNKS * LAMPORT_CHUNK_LEN]);
    Hkdf::<Sha256>::new(Some(salt), ikm)
        .expand(&[], &mut okm)
        .map_err(|e| MnemonicError::DerivationFailed(e.to_string()))?;
    Ok(okm)
}
