//! Export configuration

use serde::{Deserialize, Serialize};
use stakegen_crypto::keystore::{ScryptCost, KEYSTORE_FILE_MODE};

/// Knobs for writing keystores
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// scrypt cost for new keystores
    pub kdf: ScryptCost,
    /// Maximum concurrent encryptions; `0` means one per available CPU
    pub parallelism: usize,
    /// Unix mode of keystore files
    pub keystore_file_mode: u32,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            kdf: ScryptCost::default(),
            parallelism: 0,
            keystore_file_mode: KEYSTORE_FILE_MODE,
        }
    }
}

impl ExportConfig {
    /// Config with a custom scrypt cost
    pub fn with_kdf(kdf: ScryptCost) -> Self {
        Self {
            kdf,
            ..Self::default()
        }
    }

    /// Resolved worker count, at least one
    pub fn parallelism(&self) -> usize {
        if self.parallelism > 0 {
            return self.parallelism;
        }
        std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ExportConfig::default();
        assert_eq!(config.kdf, ScryptCost::default());
        assert_eq!(config.keystore_file_mode, 0o600);
        assert!(config.parallelism() >= 1);
    }

    #[test]
    fn test_explicit_parallelism() {
        let config = ExportConfig {
            parallelism: 3,
            ..ExportConfig::default()
        };
        assert_eq!(config.parallelism(), 3);
    }

    #[test]
    fn test_partial_json() {
        let config: ExportConfig =
            serde_json::from_str(r#"{"kdf":{"n":1024},"parallelism":2}"#).unwrap();
        assert_eq!(config.kdf.n, 1024);
        assert_eq!(config.kdf.r, 8);
        assert_eq!(config.parallelism, 2);
        assert_eq!(config.keystore_file_mode, 0o600);
    }
}
