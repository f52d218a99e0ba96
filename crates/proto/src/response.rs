//! Server responses

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use signbank_ledger::TransactionRecord;

/// A server response, tagged by `status` on the wire.
///
/// Authorization outcomes (a rejected transaction) are success-shaped
/// responses carrying the rejection message; `Error` is reserved for
/// validation, conflict, and protocol failures.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Response {
    Success(Payload),
    Error { message: String },
}

/// Action-specific success payload; absent fields are omitted on the wire.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Payload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(
        default,
        with = "rust_decimal::serde::str_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub balance: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub users: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transactions: Option<Vec<TransactionRecord>>,
}

impl Response {
    pub fn message(message: impl Into<String>) -> Self {
        Self::Success(Payload {
            message: Some(message.into()),
            ..Payload::default()
        })
    }

    pub fn balance(balance: Decimal) -> Self {
        Self::Success(Payload {
            balance: Some(balance),
            ..Payload::default()
        })
    }

    pub fn users(users: Vec<String>) -> Self {
        Self::Success(Payload {
            users: Some(users),
            ..Payload::default()
        })
    }

    pub fn transactions(transactions: Vec<TransactionRecord>) -> Self {
        Self::Success(Payload {
            transactions: Some(transactions),
            ..Payload::default()
        })
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}
