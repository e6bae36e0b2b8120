//! Serialized construction and publication of account blocks.
//!
//! `send` and `receive` share one lock held for the whole
//! read-snapshot → build → work → sign → publish sequence, so no two blocks
//! are ever derived from the same snapshot. The engine never writes the
//! snapshot; the account only moves once the ledger pushes the confirmed
//! state back on the account stream.

use std::sync::Arc;

use atto_client::LedgerApi;
use atto_crypto::Signer;
use atto_ledger::{AccountSnapshot, Block, Receivable, Transaction};
use atto_types::{Algorithm, Amount, NetworkId, PublicKey, Timestamp};
use atto_utils::Clock;
use atto_work::WorkProvider;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::{AccountStateStore, WalletError, WalletMetrics};

/// A transaction the ledger service acknowledged.
///
/// Acknowledgement is not confirmation: the transaction only counts once it
/// shows up on the transaction stream.
#[derive(Clone, Debug)]
pub struct Published {
    pub transaction: Transaction,
    /// First line of the publish response, verbatim.
    pub ack: String,
}

/// Identity and chain parameters of the account the engine writes for.
#[derive(Clone, Debug)]
pub struct AccountParams {
    pub network: NetworkId,
    pub algorithm: Algorithm,
    pub representative: PublicKey,
}

pub struct MutationEngine {
    lock: Mutex<()>,
    params: AccountParams,
    account: Arc<AccountStateStore>,
    ledger: Arc<dyn LedgerApi>,
    worker: Arc<dyn WorkProvider>,
    signer: Arc<dyn Signer>,
    clock: Arc<dyn Clock>,
    metrics: Arc<WalletMetrics>,
}

impl MutationEngine {
    pub fn new(
        params: AccountParams,
        account: Arc<AccountStateStore>,
        ledger: Arc<dyn LedgerApi>,
        worker: Arc<dyn WorkProvider>,
        signer: Arc<dyn Signer>,
        clock: Arc<dyn Clock>,
        metrics: Arc<WalletMetrics>,
    ) -> Self {
        Self {
            lock: Mutex::new(()),
            params,
            account,
            ledger,
            worker,
            signer,
            clock,
            metrics,
        }
    }

    pub fn public_key(&self) -> PublicKey {
        self.signer.public_key()
    }

    /// Accept a pending credit. Opens the account if no snapshot is held.
    pub async fn receive(&self, receivable: &Receivable) -> Result<Published, WalletError> {
        let _guard = self.lock.lock().await;
        let result = self.build_and_publish_receive(receivable).await;
        self.record(result)
    }

    /// Debit `amount` towards `receiver`.
    pub async fn send(
        &self,
        receiver: PublicKey,
        amount: Amount,
    ) -> Result<Published, WalletError> {
        let _guard = self.lock.lock().await;
        let result = self.build_and_publish_send(receiver, amount).await;
        self.record(result)
    }

    async fn build_and_publish_receive(
        &self,
        receivable: &Receivable,
    ) -> Result<Published, WalletError> {
        let snapshot = self.account.current();
        let timestamp = self.synchronized_timestamp().await?;

        let block: Block = match snapshot {
            None => AccountSnapshot::open(
                self.params.algorithm,
                self.public_key(),
                self.params.representative,
                receivable,
                self.params.network,
                timestamp,
            )?
            .into(),
            Some(snapshot) => snapshot.receive(receivable, timestamp)?.into(),
        };

        debug!(
            kind = ?block.kind(),
            height = %block.height(),
            receivable = %receivable.hash,
            "receive block built"
        );
        self.stamp_and_publish(block).await
    }

    async fn build_and_publish_send(
        &self,
        receiver: PublicKey,
        amount: Amount,
    ) -> Result<Published, WalletError> {
        let snapshot = self.account.current().ok_or(WalletError::AccountNotFound)?;
        if amount > snapshot.balance {
            return Err(WalletError::InsufficientBalance {
                needed: amount,
                available: snapshot.balance,
            });
        }

        let timestamp = self.synchronized_timestamp().await?;
        let block: Block = snapshot
            .send(self.params.algorithm, receiver, amount, timestamp)?
            .into();

        debug!(height = %block.height(), %amount, %receiver, "send block built");
        self.stamp_and_publish(block).await
    }

    /// Local time corrected by the ledger's clock offset.
    async fn synchronized_timestamp(&self) -> Result<Timestamp, WalletError> {
        let now = self.clock.now();
        let instant = self
            .ledger
            .instant(now)
            .await
            .map_err(WalletError::Clock)?;
        Ok(now.offset_by(instant.difference_millis))
    }

    async fn stamp_and_publish(&self, block: Block) -> Result<Published, WalletError> {
        let work = self.worker.work(&block).await?;
        let signature = self.signer.sign(&block.hash());
        let transaction = Transaction {
            block,
            signature,
            work,
        };
        if !transaction.is_signature_valid() {
            return Err(WalletError::Signing(format!(
                "signer {} does not own account {}",
                self.signer.public_key(),
                transaction.block.public_key()
            )));
        }

        let ack = self
            .ledger
            .publish(&transaction)
            .await
            .map_err(WalletError::Publish)?;

        self.metrics.transactions_published.inc();
        info!(
            hash = %transaction.hash(),
            height = %transaction.block.height(),
            "transaction published"
        );
        Ok(Published { transaction, ack })
    }

    fn record(&self, result: Result<Published, WalletError>) -> Result<Published, WalletError> {
        if let Err(e) = &result {
            self.metrics.record_failure(e);
            warn!(error = %e, category = e.category().as_str(), "mutation failed");
        }
        result
    }
}
