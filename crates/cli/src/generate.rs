//! `generate-keys`: derive a batch of validators and write their artifacts
//!
//! Output layout under `<folder>/validator_keys`:
//!
//! ```text
//! keystore-m_12381_3600_<i>_0_0-<ts>.json   one per validator
//! deposit_data-<ts>.json                     signed for the deposit amount
//! stake_data-<ts>.json                       signed for the remaining stake
//! ```
//!
//! Every artifact is verified after writing; a failed check is an error.

use super::common::{get_mnemonic, get_password, read_mnemonic_password};
use anyhow::{anyhow, bail, Context, Result};
use clap::Args;
use stakegen_credentials::{
    amount_split, ensure_folder, verify_deposit_data_json, verify_stake_data_json,
    CredentialError, CredentialList, ExportConfig,
};
use stakegen_crypto::{Mnemonic, ScryptCost};
use stakegen_types::constants::DEFAULT_VALIDATOR_KEYS_FOLDER_NAME;
use stakegen_types::{get_chain_setting, MAINNET};
use std::path::PathBuf;
use tracing::{info, warn};

/// Arguments of `generate-keys`
#[derive(Debug, Args)]
pub struct GenerateArgs {
    /// Number of validator keys to generate
    #[arg(long)]
    pub num_validators: u32,

    /// ETH per validator in the deposit file (1 for a trust node, otherwise 12)
    #[arg(long, default_value = "12")]
    pub num_eth: u64,

    /// Network the deposits are signed for
    #[arg(long, default_value = MAINNET)]
    pub chain: String,

    /// Existing folder to place the validator_keys directory in
    #[arg(long, default_value = ".")]
    pub folder: PathBuf,

    /// Index of the first validator key
    #[arg(long, default_value = "0")]
    pub start_index: u32,

    /// Read the mnemonic from file instead of prompting
    #[arg(long)]
    pub mnemonic_file: Option<PathBuf>,

    /// Read the optional BIP-39 passphrase from file
    #[arg(long)]
    pub mnemonic_password_file: Option<PathBuf>,

    /// Read the keystore password from file instead of prompting
    #[arg(long)]
    pub keystore_password_file: Option<PathBuf>,

    /// scrypt cost parameter for the keystores (power of two)
    #[arg(long)]
    pub kdf_n: Option<u32>,

    /// Maximum concurrent keystore encryptions (0 = one per CPU)
    #[arg(long, default_value = "0")]
    pub parallelism: usize,
}

/// Execute the generate-keys command
pub async fn execute(args: GenerateArgs) -> Result<()> {
    let (deposit_amount, stake_amount) = amount_split(args.num_eth)?;
    let chain_setting = get_chain_setting(&args.chain)?;

    if !args.folder.is_dir() {
        bail!("Folder does not exist: {}", args.folder.display());
    }

    let config = ExportConfig {
        kdf: args.kdf_n.map(ScryptCost::with_n).unwrap_or_default(),
        parallelism: args.parallelism,
        ..ExportConfig::default()
    };
    config.kdf.validate()?;

    let phrase = get_mnemonic(args.mnemonic_file.as_deref())?;
    let mnemonic = Mnemonic::from_phrase(&phrase).map_err(|e| anyhow!("Invalid mnemonic: {}", e))?;
    let mnemonic_password = read_mnemonic_password(args.mnemonic_password_file.as_deref())?;
    let password = get_password(
        args.keystore_password_file.as_deref(),
        "Type the password that secures your validator keystore(s): ",
        args.keystore_password_file.is_none(),
    )?;

    let folder = args.folder.join(DEFAULT_VALIDATOR_KEYS_FOLDER_NAME);
    ensure_folder(&folder)?;

    println!("Creating your keys.");
    let amounts = vec![deposit_amount; args.num_validators as usize];
    let credentials = CredentialList::from_mnemonic(
        mnemonic.phrase(),
        &mnemonic_password,
        args.num_validators,
        &amounts,
        chain_setting,
        args.start_index,
    )?;

    let keystores = match credentials
        .export_keystores(&password, &folder, &config)
        .await
    {
        Ok(paths) => paths,
        Err(CredentialError::PartialExport { written, failures }) => {
            for failure in &failures {
                warn!(index = failure.index, reason = %failure.reason, "Keystore not written");
            }
            bail!(
                "{} keystore(s) written, {} failed; see the log for details",
                written.len(),
                failures.len()
            );
        }
        Err(e) => return Err(e).context("Failed to export keystores"),
    };

    let deposit_file = credentials.export_deposit_data_json(&folder)?;
    let stake_file =
        credentials.export_stake_data_json(&folder, deposit_amount + stake_amount)?;

    info!(count = keystores.len(), "Verifying exported artifacts");
    if !credentials
        .verify_keystores(&keystores, &password, &config)
        .await?
    {
        bail!("Failed to verify the keystores.");
    }
    if !verify_deposit_data_json(&deposit_file)? {
        bail!("Failed to verify the deposit data JSON files.");
    }
    if !verify_stake_data_json(&stake_file)? {
        bail!("Failed to verify the stake data JSON files.");
    }

    println!();
    println!("Success!");
    println!("Your keys can be found at: {}", folder.display());
    println!("  Deposit data: {}", deposit_file.display());
    println!("  Stake data:   {}", stake_file.display());
    Ok(())
}
