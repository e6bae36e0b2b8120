//! Client-side synchronization engine for one Atto account.
//!
//! - Three supervised ledger feeds (account, receivables, transactions)
//!   keep local stores current and reconnect after a fixed cooldown
//! - Stores expose their state and change notifications read-only
//! - Sends and receives are serialized through a single lock, built from
//!   the latest snapshot, stamped with remote work, signed and published
//! - An optional policy accepts every observed receivable
//!
//! [`AccountManager`] wires it all together.

pub mod account_state;
pub mod auto_receive;
pub mod config;
pub mod engine;
pub mod error;
pub mod history;
pub mod manager;
pub mod metrics;
pub mod receivables;
pub mod shutdown;
pub mod subscriptions;
pub mod supervisor;

pub use account_state::AccountStateStore;
pub use auto_receive::AutoReceiver;
pub use config::WalletConfig;
pub use engine::{AccountParams, MutationEngine, Published};
pub use error::{ErrorCategory, WalletError};
pub use history::TransactionHistory;
pub use manager::{AccountManager, Collaborators};
pub use metrics::WalletMetrics;
pub use receivables::ReceivableStore;
pub use shutdown::ShutdownController;
pub use subscriptions::{AccountSubscription, ReceivableSubscription, TransactionSubscription};
pub use supervisor::{StreamSupervisor, Subscription};
