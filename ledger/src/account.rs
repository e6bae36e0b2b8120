//! Account snapshot and block derivation.

use atto_types::{Algorithm, Amount, BlockHash, Height, NetworkId, PublicKey, Timestamp, Version};
use serde::{Deserialize, Serialize};

use crate::block::{OpenBlock, ReceiveBlock, SendBlock};
use crate::error::LedgerError;
use crate::receivable::Receivable;

/// The state of one account at a specific height, as pushed by the ledger.
///
/// Snapshots are never edited locally: new blocks are derived from them and
/// the resulting state only becomes a snapshot once the ledger confirms it
/// and pushes it back.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountSnapshot {
    pub public_key: PublicKey,
    pub network: NetworkId,
    pub version: Version,
    pub algorithm: Algorithm,
    pub height: Height,
    pub balance: Amount,
    pub last_transaction_hash: BlockHash,
    pub last_transaction_timestamp: Timestamp,
    pub representative_algorithm: Algorithm,
    pub representative_public_key: PublicKey,
}

fn check_receiver(receivable: &Receivable, public_key: PublicKey) -> Result<(), LedgerError> {
    if receivable.receiver_public_key != public_key {
        return Err(LedgerError::WrongReceiver {
            expected: public_key,
            actual: receivable.receiver_public_key,
        });
    }
    Ok(())
}

impl AccountSnapshot {
    /// Build the first block of an account from a receivable addressed to it.
    pub fn open(
        algorithm: Algorithm,
        public_key: PublicKey,
        representative: PublicKey,
        receivable: &Receivable,
        network: NetworkId,
        timestamp: Timestamp,
    ) -> Result<OpenBlock, LedgerError> {
        check_receiver(receivable, public_key)?;
        Ok(OpenBlock {
            network,
            version: Version::CURRENT,
            algorithm,
            public_key,
            balance: receivable.amount,
            timestamp,
            send_hash_algorithm: receivable.algorithm,
            send_hash: receivable.hash,
            representative_algorithm: algorithm,
            representative_public_key: representative,
        })
    }

    /// Build the block that debits `amount` towards `receiver`.
    pub fn send(
        &self,
        receiver_algorithm: Algorithm,
        receiver: PublicKey,
        amount: Amount,
        timestamp: Timestamp,
    ) -> Result<SendBlock, LedgerError> {
        let balance = self
            .balance
            .checked_sub(amount)
            .ok_or(LedgerError::InsufficientBalance {
                needed: amount,
                available: self.balance,
            })?;

        Ok(SendBlock {
            network: self.network,
            version: self.version,
            algorithm: self.algorithm,
            public_key: self.public_key,
            height: self.height.next(),
            balance,
            timestamp,
            previous: self.last_transaction_hash,
            receiver_algorithm,
            receiver_public_key: receiver,
            amount,
        })
    }

    /// Build the block that credits `receivable` to this account.
    pub fn receive(
        &self,
        receivable: &Receivable,
        timestamp: Timestamp,
    ) -> Result<ReceiveBlock, LedgerError> {
        check_receiver(receivable, self.public_key)?;
        let balance = self.balance.checked_add(receivable.amount).ok_or(
            LedgerError::BalanceOverflow {
                balance: self.balance,
                amount: receivable.amount,
            },
        )?;

        Ok(ReceiveBlock {
            network: self.network,
            version: self.version,
            algorithm: self.algorithm,
            public_key: self.public_key,
            height: self.height.next(),
            balance,
            timestamp,
            previous: self.last_transaction_hash,
            send_hash_algorithm: receivable.algorithm,
            send_hash: receivable.hash,
        })
    }
}
