//! Ledger errors

use rust_decimal::Decimal;
use thiserror::Error;

/// Errors that can occur in bank operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BankError {
    #[error("account {0} already exists")]
    AccountExists(String),

    #[error("account {0} not found")]
    UnknownAccount(String),

    #[error("insufficient funds: {name} has {balance}, transfer requires {required}")]
    InsufficientFunds {
        name: String,
        balance: Decimal,
        required: Decimal,
    },

    #[error("balance overflow on account {0}")]
    BalanceOverflow(String),

    #[error("invalid verification key: {0}")]
    InvalidKey(String),
}
