//! SSZ deposit containers
//!
//! The roots computed here must match the beacon-chain specification bit for
//! bit: the deposit contract and every launchpad verifier recompute them.
//!
//! ```text
//! DepositMessage { pubkey: Bytes48, withdrawal_credentials: Bytes32, amount: uint64 }
//! DepositData    { pubkey: Bytes48, withdrawal_credentials: Bytes32, amount: uint64, signature: Bytes96 }
//! ForkData       { current_version: Bytes4, genesis_validators_root: Bytes32 }
//! SigningData    { object_root: Bytes32, domain: Bytes32 }
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use tree_hash::{Hash256, PackedEncoding, TreeHash, TreeHashType};
use tree_hash_derive::TreeHash;

use crate::constants::DOMAIN_DEPOSIT;
use crate::error::ConfigError;

/// Decode a hex string (with or without `0x`) into a fixed-size array.
pub fn decode_fixed_hex<const N: usize>(
    field: &'static str,
    value: &str,
) -> Result<[u8; N], ConfigError> {
    let trimmed = value.strip_prefix("0x").unwrap_or(value);
    let bytes = hex::decode(trimmed).map_err(|e| ConfigError::InvalidHex {
        field,
        reason: e.to_string(),
    })?;
    let actual = bytes.len();
    bytes.try_into().map_err(|_| ConfigError::InvalidLength {
        field,
        expected: N,
        actual,
    })
}

/// Fixed-length byte vectors hashed as SSZ `Vector[uint8, N]`.
macro_rules! fixed_bytes {
    ($(#[$doc:meta])* $name:ident, $len:expr, $field:literal) => {
        $(#[$doc])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash)]
        pub struct $name([u8; $len]);

        impl $name {
            /// Byte length
            pub const LEN: usize = $len;

            /// Wrap raw bytes
            pub const fn new(bytes: [u8; $len]) -> Self {
                Self(bytes)
            }

            /// Raw bytes
            pub fn as_bytes(&self) -> &[u8; $len] {
                &self.0
            }

            /// Parse from hex, accepting an optional `0x` prefix
            pub fn from_hex(value: &str) -> Result<Self, ConfigError> {
                decode_fixed_hex::<$len>($field, value).map(Self)
            }

            /// Lowercase hex without prefix
            pub fn to_hex(&self) -> String {
                hex::encode(self.0)
            }
        }

        impl From<[u8; $len]> for $name {
            fn from(bytes: [u8; $len]) -> Self {
                Self(bytes)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", hex::encode(self.0))
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                let shown = self.0.len().min(8);
                write!(f, "{}({})", stringify!($name), hex::encode(&self.0[..shown]))
            }
        }

        impl TreeHash for $name {
            fn tree_hash_type() -> TreeHashType {
                TreeHashType::Vector
            }

            fn tree_hash_packed_encoding(&self) -> PackedEncoding {
                unreachable!("Vector should never be packed.")
            }

            fn tree_hash_packing_factor() -> usize {
                unreachable!("Vector should never be packed.")
            }

            fn tree_hash_root(&self) -> Hash256 {
                tree_hash::merkle_root(&self.0, 0)
            }
        }
    };
}

fixed_bytes!(
    /// Compressed BLS12-381 public key bytes (`Bytes48`)
    PublicKeyBytes,
    48,
    "pubkey"
);

fixed_bytes!(
    /// Compressed BLS12-381 signature bytes (`Bytes96`)
    SignatureBytes,
    96,
    "signature"
);

fixed_bytes!(
    /// Fork version (`Bytes4`)
    ForkVersion,
    4,
    "fork_version"
);

/// Unsigned deposit: what the signing key commits to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, TreeHash)]
pub struct DepositMessage {
    pub pubkey: PublicKeyBytes,
    pub withdrawal_credentials: Hash256,
    pub amount: u64,
}

impl DepositMessage {
    /// Build a message. Pure: no signing, no I/O.
    pub fn new(pubkey: PublicKeyBytes, withdrawal_credentials: Hash256, amount: u64) -> Self {
        Self {
            pubkey,
            withdrawal_credentials,
            amount,
        }
    }

    /// Root that is signed (after mixing in the domain).
    pub fn root(&self) -> Hash256 {
        self.tree_hash_root()
    }
}

/// Signed deposit as submitted to the deposit contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, TreeHash)]
pub struct DepositData {
    pub pubkey: PublicKeyBytes,
    pub withdrawal_credentials: Hash256,
    pub amount: u64,
    pub signature: SignatureBytes,
}

impl DepositData {
    /// Attach a signature to a message.
    pub fn from_message(message: &DepositMessage, signature: SignatureBytes) -> Self {
        Self {
            pubkey: message.pubkey,
            withdrawal_credentials: message.withdrawal_credentials,
            amount: message.amount,
            signature,
        }
    }

    /// The unsigned part.
    pub fn message(&self) -> DepositMessage {
        DepositMessage::new(self.pubkey, self.withdrawal_credentials, self.amount)
    }

    /// `deposit_data_root`
    pub fn root(&self) -> Hash256 {
        self.tree_hash_root()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, TreeHash)]
pub struct ForkData {
    pub current_version: ForkVersion,
    pub genesis_validators_root: Hash256,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, TreeHash)]
pub struct SigningData {
    pub object_root: Hash256,
    pub domain: Hash256,
}

/// Tree-hash root of `ForkData`.
pub fn compute_fork_data_root(
    current_version: ForkVersion,
    genesis_validators_root: Hash256,
) -> Hash256 {
    ForkData {
        current_version,
        genesis_validators_root,
    }
    .tree_hash_root()
}

/// `compute_domain(domain_type, fork_version, genesis_validators_root)`
///
/// The first four bytes are the domain type, the remaining 28 are the prefix
/// of the fork data root.
pub fn compute_domain(
    domain_type: [u8; 4],
    fork_version: ForkVersion,
    genesis_validators_root: Hash256,
) -> Hash256 {
    let fork_data_root = compute_fork_data_root(fork_version, genesis_validators_root);

    let mut domain = [0u8; 32];
    domain[..4].copy_from_slice(&domain_type);
    domain[4..].copy_from_slice(&fork_data_root.as_slice()[..28]);
    Hash256::from(domain)
}

/// Deposit domain for a fork version.
///
/// Deposits are valid across forks of one network, so the genesis validators
/// root is always zero here.
pub fn compute_deposit_domain(fork_version: ForkVersion) -> Hash256 {
    compute_domain(DOMAIN_DEPOSIT, fork_version, Hash256::ZERO)
}

/// Root that actually gets signed for `object` under `domain`.
pub fn compute_signing_root<T: TreeHash>(object: &T, domain: Hash256) -> Hash256 {
    SigningData {
        object_root: object.tree_hash_root(),
        domain,
    }
    .tree_hash_root()
}

/// One record of a deposit or stake data file.
///
/// Byte fields are lowercase hex without a `0x` prefix; `amount` is a decimal
/// integer in gwei.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepositDataJson {
    pub pubkey: String,
    pub withdrawal_credentials: String,
    pub amount: u64,
    pub signature: String,
    pub deposit_message_root: String,
    pub deposit_data_root: String,
    pub fork_version: String,
    pub eth2_network_name: String,
    pub deposit_cli_version: String,
}

impl DepositDataJson {
    /// Decode the SSZ fields of this record.
    pub fn to_deposit_data(&self) -> Result<DepositData, ConfigError> {
        Ok(DepositData {
            pubkey: PublicKeyBytes::from_hex(&self.pubkey)?,
            withdrawal_credentials: Hash256::from(decode_fixed_hex::<32>(
                "withdrawal_credentials",
                &self.withdrawal_credentials,
            )?),
            amount: self.amount,
            signature: SignatureBytes::from_hex(&self.signature)?,
        })
    }

    /// Decode the declared fork version.
    pub fn fork_version(&self) -> Result<ForkVersion, ConfigError> {
        ForkVersion::from_hex(&self.fork_version)
    }

    /// Decode the declared deposit message root.
    pub fn declared_message_root(&self) -> Result<Hash256, ConfigError> {
        decode_fixed_hex::<32>("deposit_message_root", &self.deposit_message_root).map(Hash256::from)
    }

    /// Decode the declared deposit data root.
    pub fn declared_data_root(&self) -> Result<Hash256, ConfigError> {
        decode_fixed_hex::<32>("deposit_data_root", &self.deposit_data_root).map(Hash256::from)
    }
}
