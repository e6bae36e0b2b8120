//! Latest known snapshot of the account.

use atto_ledger::AccountSnapshot;
use atto_types::Height;
use tokio::sync::watch;

/// Holds the newest account snapshot pushed by the ledger.
///
/// Writes come only from the account stream. A snapshot replaces the held
/// one only when its height is strictly greater, so duplicates and
/// out-of-order pushes are dropped and equal heights keep the first one.
pub struct AccountStateStore {
    tx: watch::Sender<Option<AccountSnapshot>>,
}

impl AccountStateStore {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(None);
        Self { tx }
    }

    /// Returns whether `incoming` replaced the held snapshot.
    pub fn apply(&self, incoming: AccountSnapshot) -> bool {
        self.tx.send_if_modified(|held| {
            if let Some(current) = held {
                if incoming.height <= current.height {
                    return false;
                }
            }
            *held = Some(incoming);
            true
        })
    }

    pub fn current(&self) -> Option<AccountSnapshot> {
        self.tx.borrow().clone()
    }

    pub fn height(&self) -> Option<Height> {
        self.tx.borrow().as_ref().map(|snapshot| snapshot.height)
    }

    /// Receiver notified on every accepted snapshot.
    pub fn subscribe(&self) -> watch::Receiver<Option<AccountSnapshot>> {
        self.tx.subscribe()
    }
}

impl Default for AccountStateStore {
    fn default() -> Self {
        Self::new()
    }
}
