use atto_client::ClientError;
use atto_ledger::LedgerError;
use atto_types::Amount;
use atto_work::WorkError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WalletError {
    #[error("account does not exist yet")]
    AccountNotFound,

    #[error("insufficient balance: need {needed}, have {available}")]
    InsufficientBalance { needed: Amount, available: Amount },

    #[error("work request failed: {0}")]
    Work(#[from] WorkError),

    #[error("clock synchronization failed: {0}")]
    Clock(#[source] ClientError),

    /// The transaction may still have been accepted by the ledger.
    #[error("publish failed: {0}")]
    Publish(#[source] ClientError),

    #[error("block construction failed: {0}")]
    Ledger(LedgerError),

    #[error("signing failed: {0}")]
    Signing(String),

    #[error("stream failed: {0}")]
    Stream(#[source] ClientError),

    #[error("malformed record: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("account manager was closed, recreate it")]
    Closed,

    #[error("account manager already started")]
    AlreadyStarted,
}

/// How a caller should react to a [`WalletError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The request cannot succeed in the current state. Do not retry as is.
    Precondition,
    /// A collaborator failed while executing a mutation. Retrying rebuilds
    /// the block from the latest snapshot.
    Execution,
    /// Stream-level failure, recovered by reconnecting.
    Transient,
}

impl ErrorCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Precondition => "precondition",
            Self::Execution => "execution",
            Self::Transient => "transient",
        }
    }
}

impl WalletError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::AccountNotFound
            | Self::InsufficientBalance { .. }
            | Self::Config(_)
            | Self::Closed
            | Self::AlreadyStarted => ErrorCategory::Precondition,
            Self::Work(_)
            | Self::Clock(_)
            | Self::Publish(_)
            | Self::Ledger(_)
            | Self::Signing(_) => ErrorCategory::Execution,
            Self::Stream(_) | Self::Decode(_) => ErrorCategory::Transient,
        }
    }
}

impl From<LedgerError> for WalletError {
    fn from(e: LedgerError) -> Self {
        match e {
            LedgerError::InsufficientBalance { needed, available } => {
                Self::InsufficientBalance { needed, available }
            }
            other => Self::Ledger(other),
        }
    }
}
