//! Protocol constants.

/// Gwei per ETH.
pub const ETH2GWEI: u64 = 1_000_000_000;

/// Smallest deposit the deposit contract accepts, in gwei.
pub const MIN_DEPOSIT_AMOUNT: u64 = ETH2GWEI;

/// Largest single deposit that counts towards the effective balance, in gwei.
pub const MAX_DEPOSIT_AMOUNT: u64 = 32 * ETH2GWEI;

/// Total stake per validator, split between the deposit and the stake file.
pub const FULL_DEPOSIT_AMOUNT: u64 = 32 * ETH2GWEI;

/// `DOMAIN_DEPOSIT` domain type.
pub const DOMAIN_DEPOSIT: [u8; 4] = [0x03, 0x00, 0x00, 0x00];

/// First byte of BLS withdrawal credentials.
pub const BLS_WITHDRAWAL_PREFIX: u8 = 0x00;

/// Folder created inside the user's chosen output directory.
pub const DEFAULT_VALIDATOR_KEYS_FOLDER_NAME: &str = "validator_keys";

/// Version string embedded in deposit and stake records.
///
/// Launchpad tooling reads this field, so it tracks the record format rather
/// than the crate version.
pub const DEPOSIT_CLI_VERSION: &str = "2.0.1";
