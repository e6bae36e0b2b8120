use atto_types::{Amount, PublicKey};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LedgerError {
    #[error("insufficient balance: need {needed}, have {available}")]
    InsufficientBalance { needed: Amount, available: Amount },

    #[error("balance overflow: {balance} + {amount}")]
    BalanceOverflow { balance: Amount, amount: Amount },

    #[error("receivable is addressed to {actual:?}, not {expected:?}")]
    WrongReceiver {
        expected: PublicKey,
        actual: PublicKey,
    },
}
