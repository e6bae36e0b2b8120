//! Signed, work-stamped blocks.

use atto_types::{BlockHash, Signature, Work};
use serde::{Deserialize, Serialize};

use crate::Block;

/// A block together with its signature and proof of work.
///
/// Never mutated after construction. If publication fails after the account
/// moved on, a new block has to be built; the old transaction is not resent.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub block: Block,
    pub signature: Signature,
    pub work: Work,
}

impl Transaction {
    /// The transaction hash, which is the hash of its block.
    pub fn hash(&self) -> BlockHash {
        self.block.hash()
    }

    /// Whether the signature was produced by the block's account over its hash.
    pub fn is_signature_valid(&self) -> bool {
        atto_crypto::verify_signature(
            self.hash().as_bytes(),
            &self.signature,
            &self.block.public_key(),
        )
    }
}
