//! Confirmed transactions of the account.

use atto_ledger::Transaction;
use tokio::sync::broadcast;
use tokio::sync::watch;

const EVENT_CAPACITY: usize = 256;

/// Append-only log in confirmation order.
///
/// Duplicates pushed by the ledger are kept as they arrive.
pub struct TransactionHistory {
    entries: watch::Sender<Vec<Transaction>>,
    appended: broadcast::Sender<Transaction>,
}

impl TransactionHistory {
    pub fn new(initial: Vec<Transaction>) -> Self {
        let (entries, _) = watch::channel(initial);
        let (appended, _) = broadcast::channel(EVENT_CAPACITY);
        Self { entries, appended }
    }

    pub fn append(&self, transaction: Transaction) {
        self.entries
            .send_modify(|entries| entries.push(transaction.clone()));
        let _ = self.appended.send(transaction);
    }

    pub fn all(&self) -> Vec<Transaction> {
        self.entries.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn last(&self) -> Option<Transaction> {
        self.entries.borrow().last().cloned()
    }

    /// Transactions appended from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<Transaction> {
        self.appended.subscribe()
    }
}

impl Default for TransactionHistory {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use atto_ledger::{Block, OpenBlock};
    use atto_types::{
        Algorithm, Amount, BlockHash, NetworkId, PublicKey, Signature, Timestamp, Version, Work,
    };

    fn transaction(balance: u64) -> Transaction {
        Transaction {
            block: Block::Open(OpenBlock {
                network: NetworkId::Local,
                version: Version::CURRENT,
                algorithm: Algorithm::V1,
                public_key: PublicKey([1; 32]),
                balance: Amount::new(balance),
                timestamp: Timestamp::from_millis(1),
                send_hash_algorithm: Algorithm::V1,
                send_hash: BlockHash::new([2; 32]),
                representative_algorithm: Algorithm::V1,
                representative_public_key: PublicKey([1; 32]),
            }),
            signature: Signature([0; 64]),
            work: Work([0; 8]),
        }
    }

    #[test]
    fn appends_after_initial_entries() {
        let history = TransactionHistory::new(vec![transaction(1)]);
        history.append(transaction(2));
        let all = history.all();
        assert_eq!(all.len(), 2);
        assert_eq!(all[1].block.balance(), Amount::new(2));
        assert_eq!(history.last().unwrap().block.balance(), Amount::new(2));
    }

    #[test]
    fn duplicates_are_kept() {
        let history = TransactionHistory::default();
        history.append(transaction(1));
        history.append(transaction(1));
        assert_eq!(history.len(), 2);
    }

    #[tokio::test]
    async fn subscribers_receive_appended() {
        let history = TransactionHistory::default();
        let mut rx = history.subscribe();
        history.append(transaction(7));
        assert_eq!(rx.recv().await.unwrap().block.balance(), Amount::new(7));
    }
}
