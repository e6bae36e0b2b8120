//! Account manager: one synchronized account and its write path.
//!
//! Owns the three stores, runs the supervised feeds and the auto-receive
//! loop on the tokio runtime, and exposes `send`/`receive` plus read-only
//! observation of the stores. Closing the manager stops every task it
//! spawned and cancels in-flight mutations; a closed manager cannot be
//! restarted.

use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use atto_client::LedgerApi;
use atto_crypto::Signer;
use atto_ledger::{AccountSnapshot, Receivable, Transaction};
use atto_types::{Algorithm, Amount, BlockHash, PublicKey};
use atto_utils::Clock;
use atto_work::WorkProvider;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tracing::info;

use crate::engine::{AccountParams, MutationEngine, Published};
use crate::subscriptions::{AccountSubscription, ReceivableSubscription, TransactionSubscription};
use crate::supervisor::{StreamSupervisor, Subscription};
use crate::{
    AccountStateStore, AutoReceiver, ReceivableStore, ShutdownController, TransactionHistory,
    WalletConfig, WalletError, WalletMetrics,
};

/// External capabilities the manager drives.
#[derive(Clone)]
pub struct Collaborators {
    pub ledger: Arc<dyn LedgerApi>,
    pub worker: Arc<dyn WorkProvider>,
    pub signer: Arc<dyn Signer>,
    pub clock: Arc<dyn Clock>,
}

pub struct AccountManager {
    public_key: PublicKey,
    cooldown: Duration,
    ledger: Arc<dyn LedgerApi>,
    clock: Arc<dyn Clock>,
    account: Arc<AccountStateStore>,
    receivables: Arc<ReceivableStore>,
    history: Arc<TransactionHistory>,
    engine: Arc<MutationEngine>,
    auto_receiver: Arc<AutoReceiver>,
    metrics: Arc<WalletMetrics>,
    shutdown: ShutdownController,
    started: AtomicBool,
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl AccountManager {
    /// `transactions` seeds the history, e.g. from an embedder's own cache.
    pub fn new(
        config: &WalletConfig,
        collaborators: Collaborators,
        transactions: Vec<Transaction>,
    ) -> Self {
        let Collaborators {
            ledger,
            worker,
            signer,
            clock,
        } = collaborators;

        let public_key = signer.public_key();
        let metrics = Arc::new(WalletMetrics::new());
        let account = Arc::new(AccountStateStore::new());

        let params = AccountParams {
            network: config.network,
            algorithm: Algorithm::V1,
            representative: config.representative_or(public_key),
        };
        let engine = Arc::new(MutationEngine::new(
            params,
            account.clone(),
            ledger.clone(),
            worker,
            signer,
            clock.clone(),
            metrics.clone(),
        ));
        let auto_receiver = Arc::new(AutoReceiver::new(
            config.auto_receive,
            engine.clone(),
            metrics.clone(),
        ));

        Self {
            public_key,
            cooldown: config.stream_cooldown(),
            ledger,
            clock,
            account,
            receivables: Arc::new(ReceivableStore::new()),
            history: Arc::new(TransactionHistory::new(transactions)),
            engine,
            auto_receiver,
            metrics,
            shutdown: ShutdownController::new(),
            started: AtomicBool::new(false),
            tasks: Mutex::new(Vec::new()),
        }
    }

    /// Spawn the feeds and the auto-receive loop. Must run inside a tokio
    /// runtime.
    pub fn start(&self) -> Result<(), WalletError> {
        if self.shutdown.is_shutdown() {
            return Err(WalletError::Closed);
        }
        if self.started.swap(true, Ordering::SeqCst) {
            return Err(WalletError::AlreadyStarted);
        }

        let mut tasks = Vec::with_capacity(4);

        // Subscribed before any feed runs so the first receivables are seen.
        let observed = self.receivables.subscribe();
        let auto_receiver = self.auto_receiver.clone();
        let shutdown = self.shutdown.subscribe();
        tasks.push(tokio::spawn(async move {
            auto_receiver.run(observed, shutdown).await
        }));

        let supervisor = Arc::new(StreamSupervisor::new(
            self.clock.clone(),
            self.cooldown,
            self.metrics.clone(),
        ));
        for subscription in self.subscriptions() {
            let supervisor = supervisor.clone();
            let shutdown = self.shutdown.subscribe();
            tasks.push(tokio::spawn(async move {
                supervisor.supervise(subscription, shutdown).await
            }));
        }

        self.tasks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend(tasks);
        info!(account = %self.public_key, "account manager started");
        Ok(())
    }

    fn subscriptions(&self) -> [Arc<dyn Subscription>; 3] {
        [
            Arc::new(AccountSubscription {
                ledger: self.ledger.clone(),
                public_key: self.public_key,
                store: self.account.clone(),
                metrics: self.metrics.clone(),
            }),
            Arc::new(ReceivableSubscription {
                ledger: self.ledger.clone(),
                public_key: self.public_key,
                store: self.receivables.clone(),
                metrics: self.metrics.clone(),
            }),
            Arc::new(TransactionSubscription {
                ledger: self.ledger.clone(),
                public_key: self.public_key,
                account: self.account.clone(),
                receivables: self.receivables.clone(),
                history: self.history.clone(),
                metrics: self.metrics.clone(),
            }),
        ]
    }

    pub async fn send(
        &self,
        receiver: PublicKey,
        amount: Amount,
    ) -> Result<Published, WalletError> {
        self.until_closed(self.engine.send(receiver, amount)).await
    }

    pub async fn receive(&self, receivable: &Receivable) -> Result<Published, WalletError> {
        self.until_closed(self.engine.receive(receivable)).await
    }

    async fn until_closed<F>(&self, mutation: F) -> Result<Published, WalletError>
    where
        F: Future<Output = Result<Published, WalletError>>,
    {
        if self.shutdown.is_shutdown() {
            return Err(WalletError::Closed);
        }
        tokio::select! {
            _ = self.shutdown.wait() => Err(WalletError::Closed),
            result = mutation => result,
        }
    }

    pub fn set_auto_receive(&self, enabled: bool) {
        self.auto_receiver.set_enabled(enabled);
        info!(enabled, "auto-receive toggled");
    }

    pub fn auto_receive(&self) -> bool {
        self.auto_receiver.is_enabled()
    }

    pub fn public_key(&self) -> PublicKey {
        self.public_key
    }

    pub fn account(&self) -> Option<AccountSnapshot> {
        self.account.current()
    }

    pub fn subscribe_account(&self) -> watch::Receiver<Option<AccountSnapshot>> {
        self.account.subscribe()
    }

    pub fn receivables(&self) -> HashMap<BlockHash, Receivable> {
        self.receivables.all()
    }

    pub fn subscribe_receivables(&self) -> broadcast::Receiver<Receivable> {
        self.receivables.subscribe()
    }

    pub fn transactions(&self) -> Vec<Transaction> {
        self.history.all()
    }

    pub fn subscribe_transactions(&self) -> broadcast::Receiver<Transaction> {
        self.history.subscribe()
    }

    pub fn metrics(&self) -> &WalletMetrics {
        &self.metrics
    }

    pub fn is_closed(&self) -> bool {
        self.shutdown.is_shutdown()
    }

    /// Signal every task to stop. Idempotent.
    pub fn close(&self) {
        if !self.shutdown.is_shutdown() {
            self.shutdown.shutdown();
            info!(account = %self.public_key, "account manager closed");
        }
    }

    /// Close and wait for the spawned tasks to finish.
    pub async fn shutdown(&self) {
        self.close();
        let tasks = std::mem::take(
            &mut *self.tasks.lock().unwrap_or_else(PoisonError::into_inner),
        );
        for task in tasks {
            let _ = task.await;
        }
    }
}

impl Drop for AccountManager {
    fn drop(&mut self) {
        self.close();
    }
}
