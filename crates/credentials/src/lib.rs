//! Validator credentials for stakegen
//!
//! A [`CredentialList`] derives the withdrawal and signing keys of a run of
//! validator indices from one mnemonic, then writes:
//! - one EIP-2335 keystore per signing key
//! - a `deposit_data-*.json` file with the signed deposits
//! - a `stake_data-*.json` file signed for the complementary amounts
//!
//! [`validation`] re-checks those files independently of the keys.

pub mod config;
pub mod credential;
pub mod error;
pub mod list;
pub mod validation;

pub use config::ExportConfig;
pub use credential::Credential;
pub use error::{CredentialError, CredentialResult, ExportFailure, ValidationError};
pub use list::{ensure_folder, CredentialList, DATA_FILE_MODE};
pub use validation::{
    amount_split, is_strong_password, is_valid_amount, validate_deposit_amount,
    validate_password_strength, verify_deposit_data_json, verify_stake_data_json,
    MIN_PASSWORD_LENGTH,
};
