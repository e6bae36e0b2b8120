//! Bearer-token collaborator.

use async_trait::async_trait;

use crate::ClientError;

/// Supplies the bearer token for authenticated requests.
///
/// Called fresh before every request; implementations may cache or refresh
/// tokens and may themselves go over the network.
#[async_trait]
pub trait Authenticator: Send + Sync {
    async fn authorization(&self) -> Result<String, ClientError>;
}

/// An [`Authenticator`] that always returns the same token.
#[derive(Clone)]
pub struct StaticAuthenticator {
    token: String,
}

impl StaticAuthenticator {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

#[async_trait]
impl Authenticator for StaticAuthenticator {
    async fn authorization(&self) -> Result<String, ClientError> {
        if self.token.is_empty() {
            return Err(ClientError::Auth("no token configured".into()));
        }
        Ok(self.token.clone())
    }
}
