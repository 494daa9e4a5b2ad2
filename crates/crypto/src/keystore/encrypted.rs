//! EIP-2335 keystore record
//!
//! Combines the KDF, cipher and checksum modules with the public key, the
//! derivation path and a UUID into the JSON document consumed by validator
//! clients.

use std::fs;
use std::io::Write;
use std::path::Path;

use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use zeroize::Zeroizing;

use super::checksum::{compute_checksum, ChecksumModule};
use super::cipher::{encrypt_secret, generate_iv, CipherModule};
use super::error::{KeystoreError, KeystoreResult};
use super::kdf::{generate_salt, KdfModule, ScryptCost};
use super::password::process_password;
use crate::bls::{BlsKeyPair, BlsSecretKey, SECRET_KEY_LEN};
use crate::secure::SecretBytes;

/// Version number for EIP-2335 keystores
pub const KEYSTORE_VERSION: u32 = 4;

/// Unix mode of saved keystore files
pub const KEYSTORE_FILE_MODE: u32 = 0o600;

/// EIP-2335 keystore
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Keystore {
    /// Crypto parameters (KDF + cipher + checksum)
    pub crypto: CryptoModule,
    /// Free-form label; read back but never written
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Public key, lowercase hex without `0x`
    pub pubkey: String,
    /// Derivation path, empty when the key was not derived
    #[serde(default)]
    pub path: String,
    /// Unique identifier
    pub uuid: Uuid,
    /// Schema version
    pub version: u32,
}

/// Combined crypto parameters
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CryptoModule {
    /// Key derivation function parameters
    pub kdf: KdfModule,
    /// Checksum for integrity verification
    pub checksum: ChecksumModule,
    /// Cipher parameters and encrypted data
    pub cipher: CipherModule,
}

impl Keystore {
    /// Decrypt the keystore and return the raw secret
    ///
    /// The checksum is verified before the ciphertext is touched; a mismatch
    /// returns [`KeystoreError::InvalidPassword`].
    pub fn decrypt(&self, password: &str) -> KeystoreResult<SecretBytes> {
        if self.version != KEYSTORE_VERSION {
            return Err(KeystoreError::InvalidVersion(self.version));
        }

        let processed = process_password(password);
        let derived_key = self.crypto.kdf.derive_key(&processed)?;
        let dk_bytes = derived_key.expose_secret();

        let ciphertext = self.crypto.cipher.ciphertext()?;
        self.crypto.checksum.verify(dk_bytes, &ciphertext)?;

        self.crypto.cipher.decrypt(dk_bytes)
    }

    /// Decrypt into a BLS key pair whose public key matches `pubkey`
    pub fn decrypt_keypair(&self, password: &str) -> KeystoreResult<BlsKeyPair> {
        let secret = self.decrypt(password)?;
        let bytes = secret.expose_secret();
        if bytes.len() != SECRET_KEY_LEN {
            return Err(KeystoreError::InvalidSecretLength {
                expected: SECRET_KEY_LEN,
                actual: bytes.len(),
            });
        }

        let secret_key =
            BlsSecretKey::from_slice(bytes).map_err(|e| KeystoreError::InvalidSecret(e.to_string()))?;
        let keypair = BlsKeyPair::from_secret_key(secret_key);

        if keypair.public_key.to_hex() != self.pubkey.trim_start_matches("0x").to_lowercase() {
            return Err(KeystoreError::PublicKeyMismatch(self.pubkey.clone()));
        }
        Ok(keypair)
    }

    /// Save keystore to a new file
    ///
    /// Fails with [`KeystoreError::AlreadyExists`] rather than overwrite. On
    /// unix the file is created with mode `0600`.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> KeystoreResult<()> {
        self.save_with_mode(path, KEYSTORE_FILE_MODE)
    }

    /// Save with an explicit unix file mode (ignored elsewhere)
    pub fn save_with_mode<P: AsRef<Path>>(&self, path: P, mode: u32) -> KeystoreResult<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)?;

        let mut options = fs::OpenOptions::new();
        options.write(true).create_new(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(mode);
        }
        #[cfg(not(unix))]
        let _ = mode;

        let mut file = options.open(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::AlreadyExists {
                KeystoreError::AlreadyExists(path.display().to_string())
            } else {
                KeystoreError::IoError(e)
            }
        })?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;
        Ok(())
    }

    /// Load keystore from a file
    pub fn load<P: AsRef<Path>>(path: P) -> KeystoreResult<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Parse a keystore document, rejecting unknown versions
    pub fn from_json_str(json: &str) -> KeystoreResult<Self> {
        let keystore: Self = serde_json::from_str(json)?;
        if keystore.version != KEYSTORE_VERSION {
            return Err(KeystoreError::InvalidVersion(keystore.version));
        }
        Ok(keystore)
    }

    /// Get the public key
    pub fn pubkey(&self) -> &str {
        &self.pubkey
    }

    /// Get the derivation path
    pub fn path(&self) -> &str {
        &self.path
    }
}

/// Builder for creating [`Keystore`] instances
pub struct KeystoreBuilder {
    secret: Zeroizing<Vec<u8>>,
    pubkey: String,
    password: Zeroizing<Vec<u8>>,
    path: String,
    cost: ScryptCost,
}

impl KeystoreBuilder {
    /// Start a keystore for `keypair`
    pub fn new(keypair: &BlsKeyPair) -> Self {
        Self {
            secret: Zeroizing::new(keypair.secret_key.to_bytes().expose_secret().to_vec()),
            pubkey: keypair.public_key.to_hex(),
            password: Zeroizing::new(Vec::new()),
            path: String::new(),
            cost: ScryptCost::default(),
        }
    }

    /// Set the password; it is normalized immediately
    pub fn password(mut self, password: &str) -> Self {
        self.password = process_password(password);
        self
    }

    /// Set the derivation path
    pub fn path(mut self, path: &str) -> Self {
        self.path = path.to_string();
        self
    }

    /// Override the scrypt cost
    pub fn kdf_cost(mut self, cost: ScryptCost) -> Self {
        self.cost = cost;
        self
    }

    /// Encrypt and assemble the keystore
    pub fn build(self) -> KeystoreResult<Keystore> {
        self.cost.validate()?;

        let kdf = KdfModule::new_scrypt_with(generate_salt(), self.cost);
        let derived_key = kdf.derive_key(&self.password)?;
        let dk_bytes = derived_key.expose_secret();

        let iv = generate_iv();
        let ciphertext = encrypt_secret(&self.secret, dk_bytes, &iv)?;
        let checksum = ChecksumModule::new(compute_checksum(dk_bytes, &ciphertext)?);

        Ok(Keystore {
            crypto: CryptoModule {
                kdf,
                checksum,
                cipher: CipherModule::new(iv, ciphertext),
            },
            description: None,
            pubkey: self.pubkey,
            path: self.path,
            uuid: Uuid::new_v4(),
            version: KEYSTORE_VERSION,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast() -> ScryptCost {
        ScryptCost::with_n(1024)
    }

    fn keypair() -> BlsKeyPair {
        BlsKeyPair::generate(&mut rand::thread_rng())
    }

    #[test]
    fn test_encrypt_decrypt_roundtrip() {
        let keypair = keypair();
        let keystore = KeystoreBuilder::new(&keypair)
            .password("test-passphrase-123")
            .path("m/12381/3600/0/0/0")
            .kdf_cost(fast())
            .build()
            .unwrap();

        assert_eq!(keystore.version, KEYSTORE_VERSION);
        assert_eq!(keystore.pubkey(), keypair.public_key.to_hex());
        assert_eq!(keystore.path(), "m/12381/3600/0/0/0");

        let decrypted = keystore.decrypt_keypair("test-passphrase-123").unwrap();
        assert_eq!(decrypted.public_key, keypair.public_key);
    }

    #[test]
    fn test_wrong_password_fails() {
        let keystore = KeystoreBuilder::new(&keypair())
            .password("correct-passphrase")
            .kdf_cost(fast())
            .build()
            .unwrap();

        assert!(matches!(
            keystore.decrypt("wrong-passphrase"),
            Err(KeystoreError::InvalidPassword)
        ));
    }

    #[test]
    fn test_password_is_normalized() {
        let keystore = KeystoreBuilder::new(&keypair())
            .password("password")
            .kdf_cost(fast())
            .build()
            .unwrap();

        // Control characters are stripped before the KDF
        assert!(keystore.decrypt("pass\u{7F}word").is_ok());
    }

    #[test]
    fn test_pubkey_mismatch_detected() {
        let mut keystore = KeystoreBuilder::new(&keypair())
            .password("password")
            .kdf_cost(fast())
            .build()
            .unwrap();
        keystore.pubkey = keypair().public_key.to_hex();

        assert!(matches!(
            keystore.decrypt_keypair("password"),
            Err(KeystoreError::PublicKeyMismatch(_))
        ));
    }

    #[test]
    fn test_json_schema() {
        let keystore = KeystoreBuilder::new(&keypair())
            .password("schema-test")
            .kdf_cost(fast())
            .build()
            .unwrap();

        let json = serde_json::to_value(&keystore).unwrap();
        assert_eq!(json["version"], 4);
        assert_eq!(json["crypto"]["kdf"]["function"], "scrypt");
        assert_eq!(json["crypto"]["kdf"]["params"]["n"], 1024);
        assert_eq!(json["crypto"]["kdf"]["params"]["r"], 8);
        assert_eq!(json["crypto"]["kdf"]["params"]["p"], 1);
        assert_eq!(json["crypto"]["kdf"]["params"]["dklen"], 32);
        assert_eq!(
            json["crypto"]["kdf"]["params"]["salt"].as_str().unwrap().len(),
            64
        );
        assert_eq!(json["crypto"]["checksum"]["function"], "sha256");
        assert_eq!(json["crypto"]["cipher"]["function"], "aes-128-ctr");
        assert_eq!(
            json["crypto"]["cipher"]["params"]["iv"].as_str().unwrap().len(),
            32
        );
        assert!(!json["pubkey"].as_str().unwrap().starts_with("0x"));
        assert!(json.get("description").is_none());

        let parsed = Keystore::from_json_str(&json.to_string()).unwrap();
        assert_eq!(parsed, keystore);
    }

    #[test]
    fn test_fresh_salt_iv_and_uuid() {
        let keypair = keypair();
        let a = KeystoreBuilder::new(&keypair)
            .password("pw")
            .kdf_cost(fast())
            .build()
            .unwrap();
        let b = KeystoreBuilder::new(&keypair)
            .password("pw")
            .kdf_cost(fast())
            .build()
            .unwrap();

        assert_ne!(a.uuid, b.uuid);
        assert_ne!(a.crypto.kdf, b.crypto.kdf);
        assert_ne!(a.crypto.cipher.params, b.crypto.cipher.params);
    }

    #[test]
    fn test_save_and_load() {
        let keystore = KeystoreBuilder::new(&keypair())
            .password("file-test")
            .kdf_cost(fast())
            .build()
            .unwrap();

        let temp_dir = tempfile::tempdir().unwrap();
        let file_path = temp_dir.path().join("keystore.json");
        keystore.save(&file_path).unwrap();

        let loaded = Keystore::load(&file_path).unwrap();
        assert_eq!(loaded, keystore);
        assert!(loaded.decrypt_keypair("file-test").is_ok());
    }

    #[test]
    fn test_save_refuses_overwrite() {
        let keystore = KeystoreBuilder::new(&keypair())
            .password("pw")
            .kdf_cost(fast())
            .build()
            .unwrap();

        let temp_dir = tempfile::tempdir().unwrap();
        let file_path = temp_dir.path().join("keystore.json");
        keystore.save(&file_path).unwrap();
        assert!(matches!(
            keystore.save(&file_path),
            Err(KeystoreError::AlreadyExists(_))
        ));
    }

    #[test]
    #[cfg(unix)]
    fn test_file_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let keystore = KeystoreBuilder::new(&keypair())
            .password("permissions-test")
            .kdf_cost(fast())
            .build()
            .unwrap();

        let temp_dir = tempfile::tempdir().unwrap();
        let file_path = temp_dir.path().join("permissions_test.json");
        keystore.save(&file_path).unwrap();

        let mode = fs::metadata(&file_path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn test_invalid_version() {
        let mut keystore = KeystoreBuilder::new(&keypair())
            .password("pw")
            .kdf_cost(fast())
            .build()
            .unwrap();
        keystore.version = 3;

        let json = serde_json::to_string(&keystore).unwrap();
        assert!(matches!(
            Keystore::from_json_str(&json),
            Err(KeystoreError::InvalidVersion(3))
        ));
        assert!(matches!(
            keystore.decrypt("pw"),
            Err(KeystoreError::InvalidVersion(3))
        ));
    }

    #[test]
    fn test_eip2335_pbkdf2_vector() {
        let vector = r#"
            {
            "crypto": {
                "kdf": {
                    "function": "pbkdf2",
                    "params": {
                        "dklen": 32,
                        "c": 262144,
                        "prf": "hmac-sha256",
                        "salt": "d4e56740f876aef8c010b86a40d5f56745a118d0906a34e69aec8c0db1cb8fa3"
                    },
                    "message": ""
                },
                "checksum": {
                    "function": "sha256",
                    "params": {},
                    "message": "18b148af8e52920318084560fd766f9d09587b4915258dec0676cba5b0da09d8"
                },
                "cipher": {
                    "function": "aes-128-ctr",
                    "params": {
                        "iv": "264daa3f303d7259501c93d997d84fe6"
                    },
                    "message": "a9249e0ca7315836356e4c7440361ff22b9fe71e2e2ed34fc1eb03976924ed48"
                }
            },
            "pubkey": "9612d7a727c9d0a22e185a1c768478dfe919cada9266988cb32359c11f2b7b27f4ae4040902382ae2910c15e2b420d07",
            "path": "m/12381/60/0/0",
            "uuid": "64625def-3331-4eea-ab6f-782f3ed16a83",
            "version": 4
        }
        "#;

        let keystore = Keystore::from_json_str(vector).unwrap();
        let keypair = keystore.decrypt_keypair("testpassword").unwrap();
        assert_eq!(
            hex::encode(keypair.secret_key.to_bytes().expose_secret()),
            "000000000019d6689c085ae165831e934ff763ae46a2a6c172b3f1b60a8ce26f"
        );
        assert!(matches!(
            keystore.decrypt("wrongpassword"),
            Err(KeystoreError::InvalidPassword)
        ));
    }

    #[test]
    fn test_malformed_hex_is_format_error() {
        let mut keystore = KeystoreBuilder::new(&keypair())
            .password("pw")
            .kdf_cost(fast())
            .build()
            .unwrap();
        keystore.crypto.cipher.message = "zz".to_string();
        assert!(matches!(
            keystore.decrypt("pw"),
            Err(KeystoreError::HexError(_))
        ));
    }
}
