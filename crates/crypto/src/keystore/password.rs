//! Keystore password processing (EIP-2335)
//!
//! The password is NFKD-normalized, then C0 (`0x00-0x1F`), DEL (`0x7F`) and
//! C1 (`0x80-0x9F`) control codes are removed before UTF-8 encoding. A
//! password typed on two different systems therefore unlocks the same file.

use unicode_normalization::UnicodeNormalization;
use zeroize::Zeroizing;

fn is_control(c: char) -> bool {
    matches!(c, '\u{00}'..='\u{1F}' | '\u{7F}' | '\u{80}'..='\u{9F}')
}

/// Normalize a password into the bytes fed to the KDF
pub fn process_password(password: &str) -> Zeroizing<Vec<u8>> {
    let normalized: Zeroizing<String> =
        Zeroizing::new(password.nfkd().filter(|c| !is_control(*c)).collect());
    Zeroizing::new(normalized.as_bytes().to_vec())
}
