//! Ledger entities as seen by a client.
//!
//! Every account has its own chain of blocks. A block is an unsigned state
//! transition (`open`, `send` or `receive`); wrapping it with a signature and
//! a work value yields a [`Transaction`] ready for publication. New blocks are
//! always derived from the latest known [`AccountSnapshot`].

pub mod account;
pub mod block;
pub mod error;
pub mod receivable;
pub mod transaction;

pub use account::AccountSnapshot;
pub use block::{Block, BlockKind, OpenBlock, ReceiveBlock, SendBlock};
pub use error::LedgerError;
pub use receivable::Receivable;
pub use transaction::Transaction;
