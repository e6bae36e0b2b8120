//! Pending credits addressed to the account.

use std::collections::HashMap;

use atto_ledger::{Receivable, Transaction};
use atto_types::BlockHash;
use tokio::sync::{broadcast, watch};

const EVENT_CAPACITY: usize = 256;

/// Receivables keyed by their hash.
///
/// Filled by the receivable stream. An entry leaves the store only when a
/// confirmed transaction with the same hash arrives on the transaction
/// stream; building a receive block from it does not remove it.
pub struct ReceivableStore {
    entries: watch::Sender<HashMap<BlockHash, Receivable>>,
    observed: broadcast::Sender<Receivable>,
}

impl ReceivableStore {
    pub fn new() -> Self {
        let (entries, _) = watch::channel(HashMap::new());
        let (observed, _) = broadcast::channel(EVENT_CAPACITY);
        Self { entries, observed }
    }

    /// Insert or overwrite by hash and announce the receivable.
    pub fn observe(&self, receivable: Receivable) {
        self.entries.send_modify(|entries| {
            entries.insert(receivable.hash, receivable.clone());
        });
        let _ = self.observed.send(receivable);
    }

    /// Drop the entry whose hash equals the transaction hash, if any.
    pub fn confirm(&self, transaction: &Transaction) -> Option<Receivable> {
        let hash = transaction.hash();
        let mut removed = None;
        self.entries.send_if_modified(|entries| {
            removed = entries.remove(&hash);
            removed.is_some()
        });
        removed
    }

    pub fn get(&self, hash: &BlockHash) -> Option<Receivable> {
        self.entries.borrow().get(hash).cloned()
    }

    pub fn all(&self) -> HashMap<BlockHash, Receivable> {
        self.entries.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every observed receivable, including re-pushes of known ones.
    pub fn subscribe(&self) -> broadcast::Receiver<Receivable> {
        self.observed.subscribe()
    }

    /// The whole mapping, notified on every change.
    pub fn watch(&self) -> watch::Receiver<HashMap<BlockHash, Receivable>> {
        self.entries.subscribe()
    }
}

impl Default for ReceivableStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use atto_ledger::{Block, SendBlock};
    use atto_types::{
        Algorithm, Amount, Height, NetworkId, PublicKey, Signature, Timestamp, Version, Work,
    };

    fn transaction(amount: u64) -> Transaction {
        let block = Block::Send(SendBlock {
            network: NetworkId::Local,
            version: Version::CURRENT,
            algorithm: Algorithm::V1,
            public_key: PublicKey([3; 32]),
            height: Height::new(2),
            balance: Amount::new(1_000),
            timestamp: Timestamp::from_millis(10),
            previous: BlockHash::new([4; 32]),
            receiver_algorithm: Algorithm::V1,
            receiver_public_key: PublicKey([1; 32]),
            amount: Amount::new(amount),
        });
        Transaction {
            block,
            signature: Signature([0; 64]),
            work: Work([0; 8]),
        }
    }

    fn receivable(hash: BlockHash, amount: u64) -> Receivable {
        Receivable {
            hash,
            version: Version::CURRENT,
            algorithm: Algorithm::V1,
            public_key: PublicKey([3; 32]),
            timestamp: Timestamp::from_millis(10),
            receiver_algorithm: Algorithm::V1,
            receiver_public_key: PublicKey([1; 32]),
            amount: Amount::new(amount),
        }
    }

    #[test]
    fn observe_overwrites_by_hash() {
        let store = ReceivableStore::new();
        let hash = BlockHash::new([9; 32]);
        store.observe(receivable(hash, 1));
        store.observe(receivable(hash, 2));
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(&hash).unwrap().amount, Amount::new(2));
    }

    #[test]
    fn confirmation_with_matching_hash_removes() {
        let store = ReceivableStore::new();
        let tx = transaction(5);
        store.observe(receivable(tx.hash(), 5));
        assert!(store.confirm(&tx).is_some());
        assert!(store.is_empty());
    }

    #[test]
    fn confirmation_without_match_is_noop() {
        let store = ReceivableStore::new();
        store.observe(receivable(BlockHash::new([9; 32]), 5));
        assert!(store.confirm(&transaction(5)).is_none());
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn every_observation_is_announced() {
        let store = ReceivableStore::new();
        let mut rx = store.subscribe();
        let hash = BlockHash::new([9; 32]);
        store.observe(receivable(hash, 1));
        store.observe(receivable(hash, 1));
        assert_eq!(rx.recv().await.unwrap().hash, hash);
        assert_eq!(rx.recv().await.unwrap().hash, hash);
    }
}
