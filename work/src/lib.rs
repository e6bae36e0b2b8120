//! Anti-spam proof-of-work for outgoing transactions.
//!
//! Work is not computed locally. A remote worker is asked for a value bound
//! to a target (the account key for the first block, the previous block hash
//! afterwards) and to a deadline one lead time before the block timestamp.

pub mod error;
pub mod target;
pub mod worker;

pub use error::WorkError;
pub use target::{WorkTarget, DEFAULT_LEAD_TIME};
pub use worker::{WorkProvider, WorkRequest, WorkResponse, WorkerClient};
