//! Chain-setting registry
//!
//! Each supported network is identified by name and carries the genesis fork
//! version mixed into the deposit signing domain. A deposit signed for one
//! network does not verify on another.

use crate::deposit::ForkVersion;
use crate::error::ConfigError;

/// Name of the mainnet setting.
pub const MAINNET: &str = "mainnet";

/// Immutable network configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChainSetting {
    /// Network identifier
    pub network_name: &'static str,
    /// Genesis fork version
    pub genesis_fork_version: ForkVersion,
}

impl ChainSetting {
    const fn new(network_name: &'static str, version: [u8; 4]) -> Self {
        Self {
            network_name,
            genesis_fork_version: ForkVersion::new(version),
        }
    }
}

/// Mainnet
pub const MAINNET_SETTING: ChainSetting = ChainSetting::new(MAINNET, [0x00, 0x00, 0x00, 0x00]);

/// Medalla testnet
pub const MEDALLA_SETTING: ChainSetting = ChainSetting::new("medalla", [0x00, 0x00, 0x00, 0x01]);

/// Prater testnet
pub const PRATER_SETTING: ChainSetting = ChainSetting::new("prater", [0x00, 0x00, 0x10, 0x20]);

/// Holesky testnet
pub const HOLESKY_SETTING: ChainSetting = ChainSetting::new("holesky", [0x01, 0x01, 0x70, 0x00]);

/// Every registered network.
pub const ALL_CHAINS: &[ChainSetting] = &[
    MAINNET_SETTING,
    MEDALLA_SETTING,
    PRATER_SETTING,
    HOLESKY_SETTING,
];

/// Look up a chain setting by name (case-insensitive).
pub fn get_chain_setting(name: &str) -> Result<ChainSetting, ConfigError> {
    let wanted = name.trim();
    ALL_CHAINS
        .iter()
        .find(|setting| setting.network_name.eq_ignore_ascii_case(wanted))
        .copied()
        .ok_or_else(|| ConfigError::UnknownChain(name.to_string()))
}

/// Names of every registered network, in registry order.
pub fn chain_names() -> Vec<&'static str> {
    ALL_CHAINS.iter().map(|s| s.network_name).collect()
}
