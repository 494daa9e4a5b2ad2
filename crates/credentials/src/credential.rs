//! A single validator's key material and the artifacts derived from it

use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use stakegen_crypto::keystore::{Keystore, KeystoreBuilder, KeystoreError};
use stakegen_crypto::mnemonic::{derive_keypair, DerivationPath};
use stakegen_crypto::{BlsKeyPair, BlsPublicKey};
use stakegen_types::constants::{BLS_WITHDRAWAL_PREFIX, DEPOSIT_CLI_VERSION};
use stakegen_types::{
    compute_deposit_domain, compute_signing_root, ChainSetting, DepositData, DepositDataJson,
    DepositMessage, Hash256, PublicKeyBytes, SignatureBytes,
};
use tracing::{debug, info};

use crate::config::ExportConfig;
use crate::error::{CredentialError, CredentialResult};

/// Withdrawal and signing keys of one validator index
///
/// Immutable once built. Key pairs are not `Clone`; a list shares credentials
/// behind `Arc`.
pub struct Credential {
    index: u32,
    amount: u64,
    chain_setting: ChainSetting,
    signing_path: DerivationPath,
    withdrawal_path: DerivationPath,
    signing: BlsKeyPair,
    withdrawal: BlsKeyPair,
}

impl Credential {
    /// Derive the keys of validator `index` from `seed`
    pub fn new(
        seed: &[u8],
        index: u32,
        amount: u64,
        chain_setting: ChainSetting,
    ) -> CredentialResult<Self> {
        let withdrawal_path = DerivationPath::withdrawal(index);
        let signing_path = DerivationPath::signing(index);
        let withdrawal = derive_keypair(seed, &withdrawal_path)?;
        let signing = derive_keypair(seed, &signing_path)?;

        debug!(index, pubkey = %signing.public_key.to_hex(), "Derived credential");

        Ok(Self {
            index,
            amount,
            chain_setting,
            signing_path,
            withdrawal_path,
            signing,
            withdrawal,
        })
    }

    /// Validator index
    pub fn index(&self) -> u32 {
        self.index
    }

    /// Deposit amount in gwei
    pub fn amount(&self) -> u64 {
        self.amount
    }

    pub fn chain_setting(&self) -> &ChainSetting {
        &self.chain_setting
    }

    /// `m/12381/3600/<index>/0/0`
    pub fn signing_path(&self) -> &DerivationPath {
        &self.signing_path
    }

    /// `m/12381/3600/<index>/0`
    pub fn withdrawal_path(&self) -> &DerivationPath {
        &self.withdrawal_path
    }

    pub fn signing_pubkey(&self) -> &BlsPublicKey {
        &self.signing.public_key
    }

    pub fn withdrawal_pubkey(&self) -> &BlsPublicKey {
        &self.withdrawal.public_key
    }

    /// BLS withdrawal credentials: `0x00 || sha256(withdrawal_pubkey)[1..]`
    pub fn withdrawal_credentials(&self) -> Hash256 {
        let mut credentials: [u8; 32] =
            Sha256::digest(self.withdrawal.public_key.to_bytes()).into();
        credentials[0] = BLS_WITHDRAWAL_PREFIX;
        Hash256::from(credentials)
    }

    /// Unsigned deposit for this credential's amount
    pub fn deposit_message(&self) -> DepositMessage {
        self.message_for(self.amount)
    }

    /// Deposit signed under this chain's deposit domain
    pub fn signed_deposit(&self) -> DepositData {
        self.sign(&self.deposit_message())
    }

    /// Deposit file record for this credential's amount
    pub fn deposit_datum(&self) -> DepositDataJson {
        self.datum_for(self.amount)
    }

    /// Stake file record: same keys, signed for `amount` instead
    pub fn stake_datum(&self, amount: u64) -> DepositDataJson {
        self.datum_for(amount)
    }

    /// Encrypt the signing key
    pub fn export_keystore(
        &self,
        password: &str,
        config: &ExportConfig,
    ) -> Result<Keystore, KeystoreError> {
        KeystoreBuilder::new(&self.signing)
            .password(password)
            .path(&self.signing_path.to_string())
            .kdf_cost(config.kdf)
            .build()
    }

    /// Encrypt the signing key and write it into `folder`
    ///
    /// The file is named `keystore-m_12381_3600_<index>_0_0-<unix_ts>.json`
    /// and never overwrites an existing file.
    pub fn save_keystore(
        &self,
        password: &str,
        folder: &Path,
        config: &ExportConfig,
    ) -> CredentialResult<PathBuf> {
        let keystore = self.export_keystore(password, config)?;
        let file = folder.join(format!(
            "keystore-{}-{}.json",
            self.signing_path.file_component(),
            chrono::Utc::now().timestamp()
        ));

        keystore
            .save_with_mode(&file, config.keystore_file_mode)
            .map_err(|e| match e {
                KeystoreError::IoError(source) => CredentialError::io(&file, source),
                KeystoreError::AlreadyExists(_) => CredentialError::io(
                    &file,
                    std::io::Error::from(std::io::ErrorKind::AlreadyExists),
                ),
                other => CredentialError::Keystore(other),
            })?;

        info!(index = self.index, path = %file.display(), "Wrote keystore");
        Ok(file)
    }

    /// Decrypt the keystore at `path` and check it holds this signing key
    ///
    /// A wrong password or a different key yields `Ok(false)`; unreadable or
    /// malformed files are errors.
    pub fn verify_keystore(&self, path: &Path, password: &str) -> CredentialResult<bool> {
        let keystore = Keystore::load(path).map_err(|e| match e {
            KeystoreError::IoError(source) => CredentialError::io(path, source),
            other => CredentialError::Keystore(other),
        })?;

        match keystore.decrypt_keypair(password) {
            Ok(keypair) => Ok(keypair.public_key == self.signing.public_key),
            Err(KeystoreError::InvalidPassword | KeystoreError::PublicKeyMismatch(_)) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    fn message_for(&self, amount: u64) -> DepositMessage {
        DepositMessage::new(
            PublicKeyBytes::new(self.signing.public_key.to_bytes()),
            self.withdrawal_credentials(),
            amount,
        )
    }

    fn sign(&self, message: &DepositMessage) -> DepositData {
        let domain = compute_deposit_domain(self.chain_setting.genesis_fork_version);
        let signing_root = compute_signing_root(message, domain);
        let signature = self.signing.sign(signing_root.as_slice());
        DepositData::from_message(message, SignatureBytes::new(signature.to_bytes()))
    }

    fn datum_for(&self, amount: u64) -> DepositDataJson {
        let message = self.message_for(amount);
        let data = self.sign(&message);
        DepositDataJson {
            pubkey: data.pubkey.to_hex(),
            withdrawal_credentials: hex::encode(data.withdrawal_credentials.as_slice()),
            amount: data.amount,
            signature: data.signature.to_hex(),
            deposit_message_root: hex::encode(message.root().as_slice()),
            deposit_data_root: hex::encode(data.root().as_slice()),
            fork_version: self.chain_setting.genesis_fork_version.to_hex(),
            eth2_network_name: self.chain_setting.network_name.to_string(),
            deposit_cli_version: DEPOSIT_CLI_VERSION.to_string(),
        }
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("index", &self.index)
            .field("amount", &self.amount)
            .field("chain", &self.chain_setting.network_name)
            .field("signing_pubkey", &self.signing.public_key)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stakegen_crypto::keystore::ScryptCost;
    use stakegen_crypto::mnemonic::derive_seed;
    use stakegen_crypto::BlsSignature;
    use stakegen_types::constants::ETH2GWEI;
    use stakegen_types::{MAINNET_SETTING, PRATER_SETTING};

    const MNEMONIC: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

    fn credential(index: u32) -> Credential {
        let seed = derive_seed(MNEMONIC, "");
        Credential::new(seed.expose_secret(), index, 32 * ETH2GWEI, MAINNET_SETTING).unwrap()
    }

    fn fast() -> ExportConfig {
        ExportConfig::with_kdf(ScryptCost::with_n(1024))
    }

    #[test]
    fn test_paths() {
        let credential = credential(4);
        assert_eq!(credential.signing_path().to_string(), "m/12381/3600/4/0/0");
        assert_eq!(credential.withdrawal_path().to_string(), "m/12381/3600/4/0");
        assert_ne!(credential.signing_pubkey(), credential.withdrawal_pubkey());
    }

    #[test]
    fn test_withdrawal_credentials_prefix() {
        let credential = credential(0);
        let wc = credential.withdrawal_credentials();
        let digest = Sha256::digest(credential.withdrawal_pubkey().to_bytes());
        assert_eq!(wc.as_slice()[0], 0x00);
        assert_eq!(&wc.as_slice()[1..], &digest[1..]);
    }

    #[test]
    fn test_deposit_signature_verifies() {
        let credential = credential(1);
        let data = credential.signed_deposit();
        let domain = compute_deposit_domain(MAINNET_SETTING.genesis_fork_version);
        let root = compute_signing_root(&data.message(), domain);

        let sig = BlsSignature::from_bytes(data.signature.as_bytes()).unwrap();
        assert!(credential.signing_pubkey().verify(root.as_slice(), &sig));
    }

    #[test]
    fn test_signature_bound_to_chain() {
        let seed = derive_seed(MNEMONIC, "");
        let mainnet = Credential::new(seed.expose_secret(), 0, ETH2GWEI, MAINNET_SETTING).unwrap();
        let prater = Credential::new(seed.expose_secret(), 0, ETH2GWEI, PRATER_SETTING).unwrap();

        assert_eq!(mainnet.signing_pubkey(), prater.signing_pubkey());
        assert_eq!(mainnet.deposit_message(), prater.deposit_message());
        assert_ne!(mainnet.signed_deposit().signature, prater.signed_deposit().signature);
    }

    #[test]
    fn test_deposit_datum_fields() {
        let credential = credential(0);
        let datum = credential.deposit_datum();

        assert_eq!(datum.pubkey, credential.signing_pubkey().to_hex());
        assert_eq!(datum.pubkey.len(), 96);
        assert_eq!(datum.signature.len(), 192);
        assert!(datum.withdrawal_credentials.starts_with("00"));
        assert_eq!(datum.amount, 32 * ETH2GWEI);
        assert_eq!(datum.fork_version, "00000000");
        assert_eq!(datum.eth2_network_name, "mainnet");
        assert_eq!(datum.deposit_cli_version, "2.0.1");
        assert_eq!(
            datum.deposit_message_root,
            hex::encode(credential.deposit_message().root().as_slice())
        );
        assert_eq!(
            datum.deposit_data_root,
            hex::encode(credential.signed_deposit().root().as_slice())
        );
    }

    #[test]
    fn test_stake_datum_uses_other_amount() {
        let credential = credential(0);
        let deposit = credential.deposit_datum();
        let stake = credential.stake_datum(20 * ETH2GWEI);

        assert_eq!(stake.pubkey, deposit.pubkey);
        assert_eq!(stake.withdrawal_credentials, deposit.withdrawal_credentials);
        assert_eq!(stake.amount, 20 * ETH2GWEI);
        assert_ne!(stake.deposit_message_root, deposit.deposit_message_root);
        assert_ne!(stake.signature, deposit.signature);
    }

    #[test]
    fn test_save_and_verify_keystore() {
        let credential = credential(2);
        let dir = tempfile::tempdir().unwrap();

        let path = credential
            .save_keystore("password123", dir.path(), &fast())
            .unwrap();
        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("keystore-m_12381_3600_2_0_0-"));
        assert!(name.ends_with(".json"));

        assert!(credential.verify_keystore(&path, "password123").unwrap());
        assert!(!credential.verify_keystore(&path, "wrong-password").unwrap());
        assert!(!self::credential(3).verify_keystore(&path, "password123").unwrap());
    }

    #[test]
    fn test_missing_keystore_is_io_error() {
        let credential = credential(0);
        let dir = tempfile::tempdir().unwrap();
        let err = credential
            .verify_keystore(&dir.path().join("missing.json"), "password123")
            .unwrap_err();
        assert!(err.is_io());
    }
}
