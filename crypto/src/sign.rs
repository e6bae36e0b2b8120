//! Block signing.
//!
//! Transactions carry an Ed25519 signature over the block hash. The engine
//! only needs the [`Signer`] capability; [`KeySigner`] backs it with an
//! in-memory key pair.

use atto_types::{BlockHash, KeyPair, PrivateKey, PublicKey, Signature};
use ed25519_dalek::{Signer as _, SigningKey, Verifier, VerifyingKey};

/// Signing capability for one account.
pub trait Signer: Send + Sync {
    /// The account this signer signs for.
    fn public_key(&self) -> PublicKey;

    fn sign(&self, hash: &BlockHash) -> Signature;
}

/// A [`Signer`] holding the account key pair in memory.
pub struct KeySigner {
    keys: KeyPair,
}

impl KeySigner {
    pub fn new(keys: KeyPair) -> Self {
        Self { keys }
    }
}

impl Signer for KeySigner {
    fn public_key(&self) -> PublicKey {
        self.keys.public
    }

    fn sign(&self, hash: &BlockHash) -> Signature {
        sign_hash(hash, &self.keys.private)
    }
}

pub fn sign_message(message: &[u8], private_key: &PrivateKey) -> Signature {
    Signature(SigningKey::from_bytes(&private_key.0).sign(message).to_bytes())
}

pub fn sign_hash(hash: &BlockHash, private_key: &PrivateKey) -> Signature {
    sign_message(hash.as_bytes(), private_key)
}

/// Verify a signature; malformed keys verify as `false`.
pub fn verify_signature(message: &[u8], signature: &Signature, public_key: &PublicKey) -> bool {
    let Ok(verifying_key) = VerifyingKey::from_bytes(&public_key.0) else {
        return false;
    };
    let dalek_sig = ed25519_dalek::Signature::from_bytes(&signature.0);
    verifying_key.verify(message, &dalek_sig).is_ok()
}
