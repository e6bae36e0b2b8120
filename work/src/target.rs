//! What a work value is bound to.

use std::time::Duration;

use atto_ledger::Block;
use atto_types::Timestamp;
use serde::{Deserialize, Serialize};

/// How far before the block timestamp the work deadline lies.
pub const DEFAULT_LEAD_TIME: Duration = Duration::from_secs(60);

/// Target and deadline sent to the worker for one block.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkTarget {
    pub timestamp: Timestamp,
    /// Uppercase hex of the account public key (open blocks) or of the
    /// previous block hash (all others).
    pub target: String,
}

impl WorkTarget {
    pub fn for_block(block: &Block, lead_time: Duration) -> Self {
        let target = match block.previous() {
            Some(previous) => previous.to_string(),
            None => block.public_key().to_string(),
        };
        Self {
            timestamp: block.timestamp().saturating_sub(lead_time),
            target,
        }
    }
}
