//! Pending incoming credits.

use atto_types::{Algorithm, Amount, BlockHash, PublicKey, Timestamp, Version};
use serde::{Deserialize, Serialize};

/// A credit sent to an account that the account has not yet received.
///
/// `hash` is the hash of the send transaction that created it and is what a
/// `receive` (or `open`) block references.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Receivable {
    pub hash: BlockHash,
    pub version: Version,
    pub algorithm: Algorithm,
    /// The sender.
    pub public_key: PublicKey,
    pub timestamp: Timestamp,
    pub receiver_algorithm: Algorithm,
    pub receiver_public_key: PublicKey,
    pub amount: Amount,
}
