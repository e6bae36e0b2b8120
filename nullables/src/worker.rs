//! Nullable work service.

use std::sync::Mutex;

use async_trait::async_trait;
use atto_client::ClientError;
use atto_ledger::Block;
use atto_types::Work;
use atto_work::{WorkError, WorkProvider, WorkTarget, DEFAULT_LEAD_TIME};

/// Returns a fixed work value and records the target of every request.
pub struct NullWorker {
    work: Work,
    failure: Mutex<Option<String>>,
    targets: Mutex<Vec<WorkTarget>>,
}

impl NullWorker {
    pub fn new(work: Work) -> Self {
        Self {
            work,
            failure: Mutex::new(None),
            targets: Mutex::new(Vec::new()),
        }
    }

    /// Make every following request fail with `message`.
    pub fn fail_with(&self, message: impl Into<String>) {
        *self.failure.lock().unwrap() = Some(message.into());
    }

    pub fn targets(&self) -> Vec<WorkTarget> {
        self.targets.lock().unwrap().clone()
    }
}

impl Default for NullWorker {
    fn default() -> Self {
        Self::new(Work([0xAA; 8]))
    }
}

#[async_trait]
impl WorkProvider for NullWorker {
    async fn work(&self, block: &Block) -> Result<Work, WorkError> {
        self.targets
            .lock()
            .unwrap()
            .push(WorkTarget::for_block(block, DEFAULT_LEAD_TIME));
        if let Some(message) = self.failure.lock().unwrap().clone() {
            return Err(ClientError::Unreachable(message).into());
        }
        Ok(self.work)
    }
}
