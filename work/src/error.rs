use atto_client::ClientError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WorkError {
    #[error("worker request failed: {0}")]
    Client(#[from] ClientError),

    #[error("worker returned an unusable response: {0}")]
    InvalidResponse(String),
}
