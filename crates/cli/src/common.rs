//! Shared helpers for reading secrets and printing mnemonics

use anyhow::{anyhow, Context, Result};
use stakegen_credentials::validate_password_strength;
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use zeroize::Zeroizing;

/// Word counts accepted for a BIP-39 mnemonic
pub const VALID_WORD_COUNTS: [usize; 5] = [12, 15, 18, 21, 24];

/// Read the keystore password from file or prompt interactively
///
/// The password must pass the strength check either way.
pub fn get_password(
    password_file: Option<&Path>,
    prompt: &str,
    confirm: bool,
) -> Result<Zeroizing<String>> {
    let password = match password_file {
        Some(file) => read_password_from_file(file)?,
        None => prompt_password(prompt, confirm)?,
    };
    validate_password_strength(&password)?;
    Ok(password)
}

/// Read a password from a file, dropping only the trailing line break
pub fn read_password_from_file(path: &Path) -> Result<Zeroizing<String>> {
    let content = Zeroizing::new(
        fs::read_to_string(path)
            .with_context(|| format!("Failed to read password file: {}", path.display()))?,
    );
    let password = Zeroizing::new(content.trim_end_matches(['\r', '\n']).to_string());

    if password.is_empty() {
        return Err(anyhow!("Password file is empty"));
    }
    Ok(password)
}

/// Prompt for a password with optional confirmation
pub fn prompt_password(prompt: &str, confirm: bool) -> Result<Zeroizing<String>> {
    let password =
        Zeroizing::new(rpassword::prompt_password(prompt).context("Failed to read password")?);

    if confirm {
        let confirmation = Zeroizing::new(
            rpassword::prompt_password("Repeat for confirmation: ")
                .context("Failed to read password confirmation")?,
        );
        if *password != *confirmation {
            return Err(anyhow!("the two entered values do not match"));
        }
    }
    Ok(password)
}

/// Read the BIP-39 passphrase, which may legitimately be empty
///
/// Only the trailing line break is stripped; other whitespace is part of the
/// passphrase.
pub fn read_mnemonic_password(path: Option<&Path>) -> Result<Zeroizing<String>> {
    let Some(path) = path else {
        return Ok(Zeroizing::new(String::new()));
    };
    let content = Zeroizing::new(fs::read_to_string(path).with_context(|| {
        format!("Failed to read mnemonic password file: {}", path.display())
    })?);
    Ok(Zeroizing::new(
        content.trim_end_matches(['\r', '\n']).to_string(),
    ))
}

/// Read mnemonic from file or prompt interactively
pub fn get_mnemonic(mnemonic_file: Option<&Path>) -> Result<Zeroizing<String>> {
    match mnemonic_file {
        Some(file) => read_mnemonic_from_file(file),
        None => prompt_mnemonic(),
    }
}

/// Read a mnemonic from a file
pub fn read_mnemonic_from_file(path: &Path) -> Result<Zeroizing<String>> {
    let content = Zeroizing::new(
        fs::read_to_string(path)
            .with_context(|| format!("Failed to read mnemonic file: {}", path.display()))?,
    );
    let mnemonic = Zeroizing::new(content.trim().to_string());

    if mnemonic.is_empty() {
        return Err(anyhow!("Mnemonic file is empty"));
    }
    check_word_count(&mnemonic)?;
    Ok(mnemonic)
}

/// Prompt for a mnemonic phrase on stdin
pub fn prompt_mnemonic() -> Result<Zeroizing<String>> {
    println!("Please enter your mnemonic separated by spaces (\" \"):");
    print!("> ");
    io::stdout().flush()?;

    let mut line = Zeroizing::new(String::new());
    io::stdin().read_line(&mut line)?;

    let mnemonic = Zeroizing::new(line.trim().to_string());
    check_word_count(&mnemonic)?;
    Ok(mnemonic)
}

fn check_word_count(mnemonic: &str) -> Result<()> {
    let word_count = mnemonic.split_whitespace().count();
    if !VALID_WORD_COUNTS.contains(&word_count) {
        return Err(anyhow!(
            "Invalid mnemonic: expected 12, 15, 18, 21, or 24 words, got {}",
            word_count
        ));
    }
    Ok(())
}

/// Print a freshly generated mnemonic with a backup warning
pub fn display_mnemonic_warning(mnemonic: &str) {
    println!();
    println!("============================================================");
    println!("                    IMPORTANT - SAVE THIS!");
    println!("============================================================");
    println!();
    println!("This is your mnemonic (seed phrase):");
    println!();

    // groups of four for readability
    let words: Vec<&str> = mnemonic.split_whitespace().collect();
    for (i, chunk) in words.chunks(4).enumerate() {
        let start_num = i * 4 + 1;
        let formatted: Vec<String> = chunk
            .iter()
            .enumerate()
            .map(|(j, word)| format!("{:2}. {:<12}", start_num + j, word))
            .collect();
        println!("  {}", formatted.join("  "));
    }

    println!();
    println!("============================================================");
    println!("  This phrase is the ONLY way to recover your validator keys.");
    println!("  Store it securely offline. Never share it with anyone.");
    println!("============================================================");
    println!();
}
