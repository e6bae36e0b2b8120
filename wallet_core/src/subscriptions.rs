//! The three ledger feeds and where their records go.
//!
//! Each subscription opens its stream, decodes every line into its entity
//! and hands it to the owning store. A malformed line fails the whole
//! connection, which the supervisor then reopens.

use std::sync::Arc;

use async_trait::async_trait;
use atto_client::{LedgerApi, LineStream};
use atto_ledger::{AccountSnapshot, Receivable, Transaction};
use atto_types::{Height, PublicKey};
use futures_util::StreamExt;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::supervisor::Subscription;
use crate::{AccountStateStore, ReceivableStore, TransactionHistory, WalletError, WalletMetrics};

async fn consume<T, F>(
    name: &'static str,
    mut lines: LineStream,
    metrics: &WalletMetrics,
    mut apply: F,
) -> Result<(), WalletError>
where
    T: DeserializeOwned,
    F: FnMut(T),
{
    while let Some(line) = lines.next().await {
        let line = line.map_err(WalletError::Stream)?;
        let record: T = serde_json::from_str(&line)?;
        metrics.stream_records.with_label_values(&[name]).inc();
        debug!(stream = name, %line, "record received");
        apply(record);
    }
    Ok(())
}

pub struct AccountSubscription {
    pub ledger: Arc<dyn LedgerApi>,
    pub public_key: PublicKey,
    pub store: Arc<AccountStateStore>,
    pub metrics: Arc<WalletMetrics>,
}

#[async_trait]
impl Subscription for AccountSubscription {
    fn name(&self) -> &'static str {
        "accounts"
    }

    async fn run(&self) -> Result<(), WalletError> {
        let lines = self
            .ledger
            .account_stream(&self.public_key)
            .await
            .map_err(WalletError::Stream)?;

        consume(self.name(), lines, &self.metrics, |snapshot: AccountSnapshot| {
            let height = snapshot.height;
            if self.store.apply(snapshot) {
                self.metrics
                    .account_height
                    .set(i64::try_from(height.value()).unwrap_or(i64::MAX));
            } else {
                debug!(%height, "stale account snapshot discarded");
            }
        })
        .await
    }
}

pub struct ReceivableSubscription {
    pub ledger: Arc<dyn LedgerApi>,
    pub public_key: PublicKey,
    pub store: Arc<ReceivableStore>,
    pub metrics: Arc<WalletMetrics>,
}

#[async_trait]
impl Subscription for ReceivableSubscription {
    fn name(&self) -> &'static str {
        "receivables"
    }

    async fn run(&self) -> Result<(), WalletError> {
        let lines = self
            .ledger
            .receivable_stream(&self.public_key)
            .await
            .map_err(WalletError::Stream)?;

        consume(self.name(), lines, &self.metrics, |receivable: Receivable| {
            self.store.observe(receivable)
        })
        .await
    }
}

/// Confirmed transactions: reconcile receivables, then extend the history.
pub struct TransactionSubscription {
    pub ledger: Arc<dyn LedgerApi>,
    pub public_key: PublicKey,
    pub account: Arc<AccountStateStore>,
    pub receivables: Arc<ReceivableStore>,
    pub history: Arc<TransactionHistory>,
    pub metrics: Arc<WalletMetrics>,
}

impl TransactionSubscription {
    /// Resume from the held height so a reconnect skips applied history.
    fn from_height(&self) -> Height {
        self.account.height().unwrap_or(Height::INITIAL)
    }
}

#[async_trait]
impl Subscription for TransactionSubscription {
    fn name(&self) -> &'static str {
        "transactions"
    }

    async fn run(&self) -> Result<(), WalletError> {
        let lines = self
            .ledger
            .transaction_stream(&self.public_key, self.from_height(), Height::MAX)
            .await
            .map_err(WalletError::Stream)?;

        consume(self.name(), lines, &self.metrics, |transaction: Transaction| {
            if let Some(receivable) = self.receivables.confirm(&transaction) {
                debug!(hash = %receivable.hash, "receivable settled");
            }
            self.history.append(transaction);
        })
        .await
    }
}
