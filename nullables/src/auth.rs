//! Nullable authenticator, a fixed token and a call counter.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use atto_client::{Authenticator, ClientError};

pub struct NullAuthenticator {
    token: String,
    calls: AtomicUsize,
}

impl NullAuthenticator {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            calls: AtomicUsize::new(0),
        }
    }

    /// How many times a token was requested.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Default for NullAuthenticator {
    fn default() -> Self {
        Self::new("null-token")
    }
}

#[async_trait]
impl Authenticator for NullAuthenticator {
    async fn authorization(&self) -> Result<String, ClientError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.token.clone())
    }
}
