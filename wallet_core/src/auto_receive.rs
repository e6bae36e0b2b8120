//! Automatic acceptance of observed receivables.
//!
//! Each observed receivable gets exactly one attempt while the policy is
//! enabled. A failed attempt is counted in
//! `atto_wallet_auto_receive_failures_total` and left alone: the receivable
//! stays in the store and is only tried again if the ledger pushes it again.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use atto_ledger::Receivable;
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{info, warn};

use crate::{MutationEngine, WalletMetrics};

pub struct AutoReceiver {
    enabled: AtomicBool,
    engine: Arc<MutationEngine>,
    metrics: Arc<WalletMetrics>,
}

impl AutoReceiver {
    pub fn new(enabled: bool, engine: Arc<MutationEngine>, metrics: Arc<WalletMetrics>) -> Self {
        Self {
            enabled: AtomicBool::new(enabled),
            engine,
            metrics,
        }
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::SeqCst);
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }

    /// Consume observed receivables until shutdown.
    pub async fn run(
        &self,
        mut receivables: broadcast::Receiver<Receivable>,
        mut shutdown: broadcast::Receiver<()>,
    ) {
        loop {
            let receivable = tokio::select! {
                _ = shutdown.recv() => return,
                event = receivables.recv() => match event {
                    Ok(receivable) => receivable,
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(skipped, "auto-receive fell behind, receivables skipped");
                        continue;
                    }
                    Err(RecvError::Closed) => return,
                },
            };

            if !self.is_enabled() {
                continue;
            }

            tokio::select! {
                _ = shutdown.recv() => return,
                _ = self.accept(&receivable) => {}
            }
        }
    }

    async fn accept(&self, receivable: &Receivable) {
        self.metrics.auto_receive_attempts.inc();
        match self.engine.receive(receivable).await {
            Ok(published) => info!(
                receivable = %receivable.hash,
                hash = %published.transaction.hash(),
                "receivable accepted automatically"
            ),
            Err(e) => {
                self.metrics.auto_receive_failures.inc();
                warn!(
                    receivable = %receivable.hash,
                    error = %e,
                    "auto-receive failed, not retried"
                );
            }
        }
    }
}
