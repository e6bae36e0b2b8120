//! BIP39 mnemonics and account key derivation.
//!
//! A 24-word phrase yields a BIP39 seed (empty passphrase). Account `index`
//! is derived as HMAC-SHA512 keyed by the derivation path for that index,
//! over the seed; the first 32 bytes are the Ed25519 secret.

use atto_types::KeyPair;
use bip39::Mnemonic;
use hmac::{Hmac, Mac};
use sha2::Sha512;
use thiserror::Error;

type HmacSha512 = Hmac<Sha512>;

/// Errors arising from mnemonic operations.
#[derive(Debug, Error)]
pub enum MnemonicError {
    #[error("invalid mnemonic phrase: {0}")]
    InvalidMnemonic(String),

    #[error("key derivation failed: {0}")]
    DerivationFailed(String),
}

fn derivation_path(index: u32) -> String {
    format!("m/44'/1869902945'/{index}'")
}

/// Generate a new 24-word phrase from 256 bits of OS entropy.
pub fn generate_mnemonic() -> Result<String, MnemonicError> {
    let mut entropy = [0u8; 32];
    rand::RngCore::fill_bytes(&mut rand::rngs::OsRng, &mut entropy);
    Mnemonic::from_entropy(&entropy)
        .map(|m| m.to_string())
        .map_err(|e| MnemonicError::DerivationFailed(e.to_string()))
}

/// Derive the key pair of account `index` from a mnemonic phrase.
pub fn keypair_from_mnemonic(phrase: &str, index: u32) -> Result<KeyPair, MnemonicError> {
    let mnemonic = Mnemonic::parse_normalized(phrase)
        .map_err(|e| MnemonicError::InvalidMnemonic(e.to_string()))?;
    let seed = mnemonic.to_seed_normalized("");

    let mut mac = HmacSha512::new_from_slice(derivation_path(index).as_bytes())
        .map_err(|e| MnemonicError::DerivationFailed(e.to_string()))?;
    mac.update(&seed);
    let output = mac.finalize().into_bytes();

    let mut secret = [0u8; 32];
    secret.copy_from_slice(&output[..32]);
    Ok(crate::keys::keypair_from_seed(&secret))
}

pub fn validate_mnemonic(phrase: &str) -> bool {
    Mnemonic::parse_normalized(phrase).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    const KNOWN: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon art";

    #[test]
    fn generated_phrase_has_24_valid_words() {
        let phrase = generate_mnemonic().unwrap();
        assert_eq!(phrase.split_whitespace().count(), 24);
        assert!(validate_mnemonic(&phrase));
    }

    #[test]
    fn derivation_is_deterministic_per_index() {
        let a = keypair_from_mnemonic(KNOWN, 0).unwrap();
        let b = keypair_from_mnemonic(KNOWN, 0).unwrap();
        assert_eq!(a.public, b.public);
    }

    #[test]
    fn different_indexes_give_different_accounts() {
        let a = keypair_from_mnemonic(KNOWN, 0).unwrap();
        let b = keypair_from_mnemonic(KNOWN, 1).unwrap();
        assert_ne!(a.public, b.public);
    }

    #[test]
    fn invalid_phrase_rejected() {
        assert!(!validate_mnemonic("not a valid mnemonic phrase"));
        assert!(keypair_from_mnemonic("invalid words here", 0).is_err());
    }
}
