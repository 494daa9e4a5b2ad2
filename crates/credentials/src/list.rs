//! Ordered batch of credentials sharing one seed and one chain
//!
//! Keystore encryption dominates the cost of a run (one scrypt per key), so
//! exports and verifications fan out to blocking workers:
//!
//! ```text
//! export_keystores
//!   ├─ semaphore (ExportConfig::parallelism permits)
//!   ├─ spawn_blocking(save_keystore) per credential
//!   └─ join in index order
//! ```

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use futures::future::join_all;
use secrecy::{ExposeSecret, SecretString};
use stakegen_crypto::mnemonic::derive_seed;
use stakegen_types::{ChainSetting, DepositDataJson};
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::config::ExportConfig;
use crate::credential::Credential;
use crate::error::{CredentialError, CredentialResult, ExportFailure, ValidationError};
use crate::validation::is_valid_amount;

/// Unix mode of deposit and stake data files
pub const DATA_FILE_MODE: u32 = 0o440;

/// Credentials at consecutive indices, in index order
#[derive(Debug, Clone)]
pub struct CredentialList {
    credentials: Vec<Arc<Credential>>,
}

impl CredentialList {
    /// Derive `num_keys` credentials starting at `start_index`
    ///
    /// The seed is stretched once and dropped before returning.
    pub fn from_mnemonic(
        mnemonic: &str,
        passphrase: &str,
        num_keys: u32,
        amounts: &[u64],
        chain_setting: ChainSetting,
        start_index: u32,
    ) -> CredentialResult<Self> {
        if amounts.len() != num_keys as usize {
            return Err(CredentialError::AmountCountMismatch {
                num_keys,
                amounts: amounts.len(),
            });
        }
        if mnemonic.trim().is_empty() {
            return Err(CredentialError::EmptyMnemonic);
        }
        if start_index.checked_add(num_keys).is_none() {
            return Err(CredentialError::IndexOverflow {
                start_index,
                num_keys,
            });
        }
        if let Some(&amount) = amounts.iter().find(|&&a| !is_valid_amount(a)) {
            return Err(ValidationError::InvalidAmount(amount).into());
        }

        let seed = derive_seed(mnemonic, passphrase);
        let credentials = (start_index..)
            .zip(amounts)
            .map(|(index, &amount)| {
                Credential::new(seed.expose_secret(), index, amount, chain_setting).map(Arc::new)
            })
            .collect::<CredentialResult<Vec<_>>>()?;

        info!(
            count = credentials.len(),
            start_index,
            chain = chain_setting.network_name,
            "Derived credentials"
        );
        Ok(Self { credentials })
    }

    pub fn len(&self) -> usize {
        self.credentials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.credentials.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Credential> {
        self.credentials.iter().map(|c| c.as_ref())
    }

    /// Encrypt and write one keystore per credential into `folder`
    ///
    /// Returns the file paths in index order. When some files fail on I/O the
    /// others are kept and [`CredentialError::PartialExport`] lists both. Any
    /// other failure cancels credentials that have not started yet and is
    /// returned as is.
    pub async fn export_keystores(
        &self,
        password: &str,
        folder: &Path,
        config: &ExportConfig,
    ) -> CredentialResult<Vec<PathBuf>> {
        let semaphore = Arc::new(Semaphore::new(config.parallelism()));
        let cancel = CancellationToken::new();
        let password = Arc::new(SecretString::from(password.to_string()));
        let config = *config;

        let handles = self.credentials.iter().map(|credential| {
            let credential = Arc::clone(credential);
            let semaphore = Arc::clone(&semaphore);
            let cancel = cancel.clone();
            let password = Arc::clone(&password);
            let folder = folder.to_path_buf();

            tokio::spawn(async move {
                let _permit = tokio::select! {
                    _ = cancel.cancelled() => return Err(CredentialError::Cancelled),
                    permit = semaphore.acquire_owned() => {
                        permit.map_err(|e| CredentialError::Task(e.to_string()))?
                    }
                };
                if cancel.is_cancelled() {
                    return Err(CredentialError::Cancelled);
                }

                let result = tokio::task::spawn_blocking(move || {
                    credential.save_keystore(password.expose_secret(), &folder, &config)
                })
                .await
                .unwrap_or_else(|e| Err(CredentialError::Task(e.to_string())));

                if let Err(e) = &result {
                    if !e.is_io() {
                        cancel.cancel();
                    }
                }
                result
            })
        });

        let results: Vec<CredentialResult<PathBuf>> = join_all(handles)
            .await
            .into_iter()
            .map(|joined| joined.unwrap_or_else(|e| Err(CredentialError::Task(e.to_string()))))
            .collect();

        collect_export(
            self.credentials.iter().map(|c| c.index()).zip(results),
        )
    }

    /// Write every credential's deposit record to `deposit_data-<unix_ts>.json`
    pub fn export_deposit_data_json(&self, folder: &Path) -> CredentialResult<PathBuf> {
        let records: Vec<DepositDataJson> = self.iter().map(|c| c.deposit_datum()).collect();
        write_data_file(folder, "deposit_data", &records)
    }

    /// Write stake records signed for `total - amount` to `stake_data-<unix_ts>.json`
    ///
    /// Every remainder is checked before the file is created.
    pub fn export_stake_data_json(&self, folder: &Path, total: u64) -> CredentialResult<PathBuf> {
        let records = self
            .iter()
            .map(|c| {
                total
                    .checked_sub(c.amount())
                    .filter(|&stake| is_valid_amount(stake))
                    .map(|stake| c.stake_datum(stake))
                    .ok_or(ValidationError::StakeOutOfRange {
                        amount: c.amount(),
                        total,
                    })
            })
            .collect::<Result<Vec<DepositDataJson>, _>>()?;
        write_data_file(folder, "stake_data", &records)
    }

    /// Check that every keystore decrypts with `password` to its credential's key
    ///
    /// `locations` must be in the order returned by [`export_keystores`].
    ///
    /// [`export_keystores`]: Self::export_keystores
    pub async fn verify_keystores(
        &self,
        locations: &[PathBuf],
        password: &str,
        config: &ExportConfig,
    ) -> CredentialResult<bool> {
        if locations.len() != self.credentials.len() {
            warn!(
                expected = self.credentials.len(),
                actual = locations.len(),
                "Keystore count does not match credentials"
            );
            return Ok(false);
        }

        let semaphore = Arc::new(Semaphore::new(config.parallelism()));
        let password = Arc::new(SecretString::from(password.to_string()));

        let handles = self.credentials.iter().zip(locations).map(|(credential, path)| {
            let credential = Arc::clone(credential);
            let semaphore = Arc::clone(&semaphore);
            let password = Arc::clone(&password);
            let path = path.clone();

            tokio::spawn(async move {
                let _permit = semaphore
                    .acquire_owned()
                    .await
                    .map_err(|e| CredentialError::Task(e.to_string()))?;
                tokio::task::spawn_blocking(move || {
                    let valid = credential.verify_keystore(&path, password.expose_secret())?;
                    if !valid {
                        warn!(index = credential.index(), path = %path.display(), "Keystore verification failed");
                    }
                    Ok::<_, CredentialError>(valid)
                })
                .await
                .unwrap_or_else(|e| Err(CredentialError::Task(e.to_string())))
            })
        });

        let mut all_valid = true;
        for joined in join_all(handles).await {
            let valid = joined.unwrap_or_else(|e| Err(CredentialError::Task(e.to_string())))?;
            all_valid &= valid;
        }
        Ok(all_valid)
    }
}

fn collect_export(
    results: impl Iterator<Item = (u32, CredentialResult<PathBuf>)>,
) -> CredentialResult<Vec<PathBuf>> {
    let mut written = Vec::new();
    let mut failures = Vec::new();
    let mut fatal = None;

    for (index, result) in results {
        match result {
            Ok(path) => written.push(path),
            Err(CredentialError::Cancelled) => failures.push(ExportFailure {
                index,
                reason: CredentialError::Cancelled.to_string(),
            }),
            Err(e) if e.is_io() => {
                warn!(index, error = %e, "Keystore export failed");
                failures.push(ExportFailure {
                    index,
                    reason: e.to_string(),
                });
            }
            Err(e) => {
                if fatal.is_none() {
                    fatal = Some(e);
                }
            }
        }
    }

    if let Some(e) = fatal {
        return Err(e);
    }
    if failures.is_empty() {
        Ok(written)
    } else {
        Err(CredentialError::PartialExport { written, failures })
    }
}

fn write_data_file(
    folder: &Path,
    prefix: &str,
    records: &[DepositDataJson],
) -> CredentialResult<PathBuf> {
    let file = folder.join(format!("{}-{}.json", prefix, chrono::Utc::now().timestamp()));
    let json = serde_json::to_string(records)?;

    let mut options = std::fs::OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(DATA_FILE_MODE);
    }
    let mut out = options.open(&file).map_err(|e| CredentialError::io(&file, e))?;
    out.write_all(json.as_bytes())
        .map_err(|e| CredentialError::io(&file, e))?;

    info!(path = %file.display(), records = records.len(), "Wrote {}", prefix);
    Ok(file)
}

/// Create the export folder if needed (idempotent)
///
/// On unix a newly created folder is restricted to the owner.
pub fn ensure_folder(folder: &Path) -> CredentialResult<()> {
    if folder.is_dir() {
        return Ok(());
    }
    std::fs::create_dir_all(folder).map_err(|e| CredentialError::io(folder, e))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(folder, std::fs::Permissions::from_mode(0o700))
            .map_err(|e| CredentialError::io(folder, e))?;
    }
    Ok(())
}
