//! Blake2b-256 hashing.

use atto_types::BlockHash;
use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest};

type Blake2b256 = Blake2b<U32>;

pub fn blake2b_256(data: &[u8]) -> [u8; 32] {
    blake2b_256_multi(&[data])
}

/// Hash several byte slices as if they were concatenated.
pub fn blake2b_256_multi(parts: &[&[u8]]) -> [u8; 32] {
    let mut hasher = Blake2b256::new();
    for part in parts {
        hasher.update(part);
    }
    let mut output = [0u8; 32];
    output.copy_from_slice(&hasher.finalize());
    output
}

/// Hash the canonical serialization of a block.
///
/// A transaction is identified by this hash, so two transactions carrying the
/// same block are the same transaction.
pub fn hash_block(canonical_bytes: &[u8]) -> BlockHash {
    BlockHash::new(blake2b_256(canonical_bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multi_part_equals_concatenation() {
        assert_eq!(
            blake2b_256(b"openblock"),
            blake2b_256_multi(&[b"open", b"block"])
        );
    }

    #[test]
    fn block_hash_depends_on_every_byte() {
        let a = hash_block(&[0, 1, 2, 3]);
        let b = hash_block(&[0, 1, 2, 4]);
        assert_ne!(a, b);
        assert!(!a.is_zero());
    }
}
