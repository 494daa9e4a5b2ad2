//! BIP-39 phrases: fresh ones for `new-mnemonic`, typed ones for `generate-keys`

use super::error::{MnemonicError, MnemonicResult};
use super::seed::{derive_seed, SEED_LEN};
use crate::secure::SecretArray;
use bip39::Mnemonic as Bip39Mnemonic;
use rand::RngCore;
use secrecy::{ExposeSecret, SecretString};
use zeroize::Zeroizing;

/// A checksum-valid English phrase, kept out of `Debug` output
pub struct Mnemonic {
    phrase: SecretString,
}

impl Mnemonic {
    /// Draw fresh entropy for a phrase of 12, 15, 18, 21 or 24 words
    pub fn generate_with_word_count(word_count: usize) -> MnemonicResult<Self> {
        if !(12..=24).contains(&word_count) || word_count % 3 != 0 {
            return Err(MnemonicError::InvalidPhrase(format!(
                "unsupported word count {}",
                word_count
            )));
        }
        // 11 bits per word, one checksum bit per 32 entropy bits
        let mut entropy = Zeroizing::new(vec![0u8; word_count * 4 / 3]);
        rand::thread_rng().fill_bytes(&mut entropy);

        let phrase = Bip39Mnemonic::from_entropy(&entropy)?.to_string();
        Ok(Self {
            phrase: phrase.into(),
        })
    }

    /// Parse a typed phrase; case and outer whitespace are ignored
    pub fn from_phrase(phrase: &str) -> MnemonicResult<Self> {
        let normalized = Zeroizing::new(phrase.trim().to_lowercase());
        let parsed = Bip39Mnemonic::parse_normalized(&normalized)?;
        Ok(Self {
            phrase: parsed.to_string().into(),
        })
    }

    pub fn phrase(&self) -> &str {
        self.phrase.expose_secret()
    }

    /// Seed for this phrase; `None` is the empty passphrase
    pub fn to_seed(&self, passphrase: Option<&str>) -> SecretArray<SEED_LEN> {
        derive_seed(self.phrase(), passphrase.unwrap_or(""))
    }
}

impl std::fmt::Debug for Mnemonic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mnemonic")
            .field("words", &self.phrase().split(' ').count())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ABANDON: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

    #[test]
    fn test_generated_phrases_parse_back() {
        for words in [12, 15, 18, 21, 24] {
            let generated = Mnemonic::generate_with_word_count(words).unwrap();
            assert_eq!(generated.phrase().split(' ').count(), words);

            let parsed = Mnemonic::from_phrase(generated.phrase()).unwrap();
            assert_eq!(parsed.phrase(), generated.phrase());
        }
    }

    #[test]
    fn test_unsupported_word_counts() {
        for words in [0, 11, 13, 23, 27] {
            assert!(matches!(
                Mnemonic::generate_with_word_count(words),
                Err(MnemonicError::InvalidPhrase(_))
            ));
        }
    }

    #[test]
    fn test_from_phrase_normalizes_input() {
        let messy = "  ABANDON abandon Abandon abandon abandon abandon abandon abandon abandon abandon abandon about\n";
        assert_eq!(Mnemonic::from_phrase(messy).unwrap().phrase(), ABANDON);
    }

    #[test]
    fn test_from_phrase_rejects_bad_checksum() {
        let bad = ABANDON.replace("about", "abandon");
        assert!(Mnemonic::from_phrase(&bad).is_err());
        assert!(Mnemonic::from_phrase("not a mnemonic").is_err());
    }

    #[test]
    fn test_to_seed_matches_derive_seed() {
        let mnemonic = Mnemonic::from_phrase(ABANDON).unwrap();

        let seed = mnemonic.to_seed(Some("TREZOR"));
        assert_eq!(hex::encode(&seed.expose_secret()[..4]), "c55257c3");

        let unsalted = mnemonic.to_seed(None);
        assert_eq!(
            unsalted.expose_secret(),
            derive_seed(ABANDON, "").expose_secret()
        );
        assert_ne!(unsalted.expose_secret(), seed.expose_secret());
    }

    #[test]
    fn test_debug_hides_words() {
        let debug = format!("{:?}", Mnemonic::from_phrase(ABANDON).unwrap());
        assert!(debug.contains("words: 12"));
        assert!(!debug.contains("abandon"));
    }
}
