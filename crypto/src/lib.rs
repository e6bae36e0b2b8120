//! Cryptographic primitives for Atto accounts.
//!
//! - **Ed25519** for signing block hashes and verifying signatures
//! - **Blake2b-256** for block hashing
//! - **BIP39** mnemonics for deterministic key derivation
//! - `atto://` addresses (base32 of algorithm, key and a Blake2b checksum)
//!
//! The synchronization engine treats everything here as opaque pure functions.

pub mod address;
pub mod hash;
pub mod keys;
pub mod mnemonic;
pub mod sign;

pub use address::{decode_address, derive_address, ADDRESS_SCHEME};
pub use hash::{blake2b_256, blake2b_256_multi, hash_block};
pub use keys::{generate_keypair, keypair_from_private, keypair_from_seed, public_from_private};
pub use mnemonic::{generate_mnemonic, keypair_from_mnemonic, validate_mnemonic, MnemonicError};
pub use sign::{sign_hash, sign_message, verify_signature, KeySigner, Signer};
