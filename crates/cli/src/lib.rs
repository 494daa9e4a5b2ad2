//! Command-line front end for stakegen
//!
//! Subcommands:
//!
//! - `generate-keys`: derive validators from a mnemonic, write keystores plus
//!   deposit and stake data, then verify everything written
//! - `new-mnemonic`: print a fresh BIP-39 phrase
//! - `verify`: re-check existing deposit or stake data files
//!
//! Secrets are read from files or from the terminal without echo, and held
//! in zeroizing buffers.

pub mod common;
pub mod generate;
pub mod mnemonic;
pub mod verify;

use anyhow::Result;
use clap::Subcommand;
use std::path::PathBuf;

pub use generate::GenerateArgs;

/// Top-level subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate validator keystores, deposit data and stake data
    #[command(name = "generate-keys")]
    GenerateKeys(GenerateArgs),

    /// Generate a new mnemonic phrase
    ///
    /// The phrase is shown ONCE. Write it down; it is the only way to
    /// recover the validator keys.
    #[command(name = "new-mnemonic")]
    NewMnemonic {
        /// Number of words (12, 15, 18, 21 or 24)
        #[arg(long, default_value = "24")]
        words: usize,
    },

    /// Verify deposit and/or stake data files
    #[command(arg_required_else_help = true)]
    Verify {
        /// Deposit data file to check
        #[arg(long)]
        deposit_file: Option<PathBuf>,

        /// Stake data file to check
        #[arg(long)]
        stake_file: Option<PathBuf>,
    },
}

/// Execute a subcommand
pub async fn execute_command(command: Command) -> Result<()> {
    match command {
        Command::GenerateKeys(args) => generate::execute(args).await,
        Command::NewMnemonic { words } => mnemonic::execute(words),
        Command::Verify {
            deposit_file,
            stake_file,
        } => verify::execute(deposit_file.as_deref(), stake_file.as_deref()),
    }
}
