//! Ed25519 key generation and derivation.

use atto_types::{KeyPair, PrivateKey, PublicKey};
use ed25519_dalek::SigningKey;
use rand::rngs::OsRng;

fn keypair_from_signing_key(signing_key: SigningKey) -> KeyPair {
    KeyPair {
        public: PublicKey(signing_key.verifying_key().to_bytes()),
        private: PrivateKey(signing_key.to_bytes()),
    }
}

/// Generate a fresh key pair from the OS random source.
pub fn generate_keypair() -> KeyPair {
    keypair_from_signing_key(SigningKey::generate(&mut OsRng))
}

/// The account public key for a private key.
pub fn public_from_private(private: &PrivateKey) -> PublicKey {
    PublicKey(SigningKey::from_bytes(&private.0).verifying_key().to_bytes())
}

pub fn keypair_from_private(private: PrivateKey) -> KeyPair {
    let public = public_from_private(&private);
    KeyPair { public, private }
}

/// Deterministic key pair from 32 bytes of secret material.
pub fn keypair_from_seed(seed: &[u8; 32]) -> KeyPair {
    keypair_from_signing_key(SigningKey::from_bytes(seed))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_keys_differ() {
        let a = generate_keypair();
        let b = generate_keypair();
        assert_ne!(a.public, b.public);
    }

    #[test]
    fn seed_derivation_matches_private_derivation() {
        let from_seed = keypair_from_seed(&[42u8; 32]);
        let from_private = keypair_from_private(PrivateKey([42u8; 32]));
        assert_eq!(from_seed.public, from_private.public);
        assert_eq!(public_from_private(&from_seed.private), from_seed.public);
    }
}
