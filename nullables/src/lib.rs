//! Nullable infrastructure for deterministic testing.
//!
//! Every external collaborator of the wallet (clock, ledger service, work
//! service, authenticator) sits behind a trait. The implementations here:
//! - Return scripted values
//! - Record what was asked of them for later assertions
//! - Never touch the network
//!
//! Usage: hand them to the wallet in place of the real clients.

pub mod auth;
pub mod clock;
pub mod ledger;
pub mod worker;

pub use auth::NullAuthenticator;
pub use clock::NullClock;
pub use ledger::{NullLedger, StreamEnd, StreamKind, StreamScript};
pub use worker::NullWorker;
