//! Core types for stakegen
//!
//! This crate provides:
//! - The static chain-setting registry (network name to genesis fork version)
//! - Protocol constants for deposit amounts and signing domains
//! - SSZ containers for deposit messages and their tree-hash roots
//! - The JSON record written to deposit and stake data files

pub mod chain;
pub mod constants;
pub mod deposit;
pub mod error;

pub use chain::{
    chain_names, get_chain_setting, ChainSetting, ALL_CHAINS, HOLESKY_SETTING, MAINNET,
    MAINNET_SETTING, MEDALLA_SETTING, PRATER_SETTING,
};
pub use deposit::{
    compute_deposit_domain, compute_domain, compute_fork_data_root, compute_signing_root,
    decode_fixed_hex, DepositData, DepositDataJson, DepositMessage, ForkData, ForkVersion,
    PublicKeyBytes, SignatureBytes, SigningData,
};
pub use error::ConfigError;
pub use tree_hash::{Hash256, TreeHash};
