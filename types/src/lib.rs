//! Fundamental types for the Atto account synchronization engine.
//!
//! This crate defines the value types shared across every other crate in the
//! workspace: keys, signatures, hashes, amounts, timestamps, heights, work
//! values and the network/algorithm tags that every block carries.

pub mod amount;
pub mod error;
pub mod hash;
mod hex_format;
pub mod iso_format;
pub mod keys;
pub mod network;
pub mod time;
pub mod work;

pub use amount::Amount;
pub use error::TypesError;
pub use hash::BlockHash;
pub use keys::{KeyPair, PrivateKey, PublicKey, Signature};
pub use network::{Algorithm, Height, NetworkId, Version};
pub use time::Timestamp;
pub use work::Work;
