//! `new-mnemonic`: print a fresh BIP-39 phrase

use super::common::display_mnemonic_warning;
use anyhow::{anyhow, Result};
use stakegen_crypto::Mnemonic;

/// Execute the new-mnemonic command
pub fn execute(words: usize) -> Result<()> {
    let mnemonic = Mnemonic::generate_with_word_count(words)
        .map_err(|e| anyhow!("Failed to generate mnemonic: {}", e))?;

    display_mnemonic_warning(mnemonic.phrase());
    println!("Pass it to `generate-keys` with --mnemonic-file or at the prompt.");
    Ok(())
}
