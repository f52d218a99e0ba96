//! Transaction records
//!
//! A record is finalized exactly once, when the transfer is processed, and
//! is never edited afterwards. Rejections are legitimate terminal outcomes,
//! not errors: they carry the reason they were turned down.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use signbank_core::Amount;
use strum_macros::{Display, EnumString};
use uuid::Uuid;

/// Terminal outcome of a processed transfer
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum TransactionStatus {
    Accepted,
    Rejected,
}

/// Why a transfer was rejected
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RejectReason {
    BadSignature,
    InsufficientFunds,
}

/// Immutable record of a processed transfer, accepted or rejected.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub id: Uuid,
    pub sender: String,
    pub receiver: String,
    pub amount: Amount,
    /// Client-supplied timestamp, opaque to the engine
    pub issued_at: String,
    /// Hex-encoded signature as submitted
    pub signature: String,
    pub status: TransactionStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<RejectReason>,
    /// Server-assigned, set when the status is set
    pub processed_at: DateTime<Utc>,
}

impl TransactionRecord {
    /// Finalize a transfer that verified and settled.
    pub fn accepted(
        sender: impl Into<String>,
        receiver: impl Into<String>,
        amount: Amount,
        issued_at: impl Into<String>,
        signature: impl Into<String>,
    ) -> Self {
        Self::finalize(sender, receiver, amount, issued_at, signature, TransactionStatus::Accepted, None)
    }

    /// Finalize a transfer that was turned down.
    pub fn rejected(
        sender: impl Into<String>,
        receiver: impl Into<String>,
        amount: Amount,
        issued_at: impl Into<String>,
        signature: impl Into<String>,
        reason: RejectReason,
    ) -> Self {
        Self::finalize(
            sender,
            receiver,
            amount,
            issued_at,
            signature,
            TransactionStatus::Rejected,
            Some(reason),
        )
    }

    fn finalize(
        sender: impl Into<String>,
        receiver: impl Into<String>,
        amount: Amount,
        issued_at: impl Into<String>,
        signature: impl Into<String>,
        status: TransactionStatus,
        reason: Option<RejectReason>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            sender: sender.into(),
            receiver: receiver.into(),
            amount,
            issued_at: issued_at.into(),
            signature: signature.into(),
            status,
            reason,
            processed_at: Utc::now(),
        }
    }

    pub fn is_accepted(&self) -> bool {
        self.status == TransactionStatus::Accepted
    }
}
