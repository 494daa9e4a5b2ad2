//! `verify`: re-check deposit or stake files written earlier

use anyhow::{bail, Result};
use stakegen_credentials::{verify_deposit_data_json, verify_stake_data_json};
use std::path::Path;

/// Execute the verify command
///
/// Fails if any given file contains a record that does not verify.
pub fn execute(deposit_file: Option<&Path>, stake_file: Option<&Path>) -> Result<()> {
    if let Some(path) = deposit_file {
        if !verify_deposit_data_json(path)? {
            bail!("Failed to verify the deposit data JSON file: {}", path.display());
        }
        println!("Deposit data OK: {}", path.display());
    }

    if let Some(path) = stake_file {
        if !verify_stake_data_json(path)? {
            bail!("Failed to verify the stake data JSON file: {}", path.display());
        }
        println!("Stake data OK: {}", path.display());
    }

    Ok(())
}
