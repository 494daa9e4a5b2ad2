//! Input checks and verification of exported deposit and stake files

use std::path::Path;

use stakegen_crypto::{BlsPublicKey, BlsSignature};
use stakegen_types::constants::{
    BLS_WITHDRAWAL_PREFIX, ETH2GWEI, FULL_DEPOSIT_AMOUNT, MAX_DEPOSIT_AMOUNT, MIN_DEPOSIT_AMOUNT,
};
use stakegen_types::{compute_deposit_domain, compute_signing_root, DepositDataJson};
use tracing::warn;

use crate::error::{CredentialError, CredentialResult, ValidationError};

/// Minimum keystore password length, in characters
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Deposit sizes accepted by `generate-keys`, in ETH
pub const SUPPORTED_DEPOSIT_ETH: [u64; 2] = [1, 12];

pub fn validate_password_strength(password: &str) -> Result<(), ValidationError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(ValidationError::WeakPassword {
            min: MIN_PASSWORD_LENGTH,
        });
    }
    Ok(())
}

pub fn is_strong_password(password: &str) -> bool {
    validate_password_strength(password).is_ok()
}

/// Whether `amount` (gwei) is within the deposit contract bounds
pub fn is_valid_amount(amount: u64) -> bool {
    (MIN_DEPOSIT_AMOUNT..=MAX_DEPOSIT_AMOUNT).contains(&amount)
}

pub fn validate_deposit_amount(num_eth: u64) -> Result<(), ValidationError> {
    if SUPPORTED_DEPOSIT_ETH.contains(&num_eth) {
        Ok(())
    } else {
        Err(ValidationError::UnsupportedDepositAmount(num_eth))
    }
}

/// Split one validator's stake into `(deposit, stake)` amounts in gwei
///
/// The two always add up to [`FULL_DEPOSIT_AMOUNT`].
pub fn amount_split(num_eth: u64) -> Result<(u64, u64), ValidationError> {
    validate_deposit_amount(num_eth)?;
    let deposit = num_eth * ETH2GWEI;
    Ok((deposit, FULL_DEPOSIT_AMOUNT - deposit))
}

/// Verify every record of a `deposit_data-*.json` file
///
/// Returns `Ok(false)` if any record is malformed or fails a check. I/O and
/// JSON syntax errors are returned as errors.
pub fn verify_deposit_data_json(path: &Path) -> CredentialResult<bool> {
    verify_data_file(path, "deposit")
}

/// Verify every record of a `stake_data-*.json` file
///
/// Stake records have the same layout as deposit records.
pub fn verify_stake_data_json(path: &Path) -> CredentialResult<bool> {
    verify_data_file(path, "stake")
}

fn verify_data_file(path: &Path, kind: &str) -> CredentialResult<bool> {
    let contents = std::fs::read_to_string(path).map_err(|e| CredentialError::io(path, e))?;
    let records: Vec<DepositDataJson> = serde_json::from_str(&contents)?;

    let mut valid = true;
    for (index, record) in records.iter().enumerate() {
        if let Err(reason) = check_record(record) {
            warn!(kind, index, reason = %reason, "Invalid data record");
            valid = false;
        }
    }
    Ok(valid)
}

fn check_record(record: &DepositDataJson) -> Result<(), String> {
    let data = record.to_deposit_data().map_err(|e| e.to_string())?;
    let fork_version = record.fork_version().map_err(|e| e.to_string())?;

    if data.withdrawal_credentials.as_slice()[0] != BLS_WITHDRAWAL_PREFIX {
        return Err("withdrawal credentials do not carry the BLS prefix".to_string());
    }
    if !is_valid_amount(data.amount) {
        return Err(format!("amount {} out of bounds", data.amount));
    }

    let pubkey = BlsPublicKey::from_bytes(data.pubkey.as_bytes()).map_err(|e| e.to_string())?;
    let signature =
        BlsSignature::from_bytes(data.signature.as_bytes()).map_err(|e| e.to_string())?;

    let message = data.message();
    let declared_message_root = record.declared_message_root().map_err(|e| e.to_string())?;
    if message.root() != declared_message_root {
        return Err("deposit_message_root mismatch".to_string());
    }

    let signing_root = compute_signing_root(&message, compute_deposit_domain(fork_version));
    if !pubkey.verify(signing_root.as_slice(), &signature) {
        return Err("signature does not verify".to_string());
    }

    let declared_data_root = record.declared_data_root().map_err(|e| e.to_string())?;
    if data.root() != declared_data_root {
        return Err("deposit_data_root mismatch".to_string());
    }
    Ok(())
}
