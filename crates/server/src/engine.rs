//! Transaction authorization engine
//!
//! Flow per transfer: resolve parties -> re-encode claims -> verify
//! signature -> settle -> record. Only the settle+record step holds the
//! write lock; the signature check is CPU-bound and runs lock-free.

use signbank_core::Amount;
use signbank_ledger::{
    transfer_claims_bytes, verify_transfer, BankError, RejectReason, TransactionRecord,
};
use signbank_proto::TransferRequest;
use thiserror::Error;

use crate::state::AppState;

/// Request-validation failures. These are answered as protocol errors and
/// never enter the transaction history.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RequestError {
    #[error("sender {0} not found")]
    UnknownSender(String),

    #[error("receiver {0} not found")]
    UnknownReceiver(String),

    #[error("amount must be positive")]
    NonPositiveAmount,

    #[error(transparent)]
    Bank(BankError),
}

/// Authorize and settle one transfer, returning the finalized record.
///
/// Every returned record has already been appended to the history; a
/// `RequestError` means nothing was recorded and no balance moved.
pub async fn authorize_transfer(
    state: &AppState,
    request: &TransferRequest,
) -> Result<TransactionRecord, RequestError> {
    let amount = Amount::new(request.amount).map_err(|_| RequestError::NonPositiveAmount)?;
    if amount.is_zero() {
        return Err(RequestError::NonPositiveAmount);
    }

    // Resolve both parties up front: an unknown name is a request-validation
    // error, not a recordable rejection.
    let sender_key = {
        let bank = state.read().await;
        bank.confirm(&request.receiver)
            .map_err(|_| RequestError::UnknownReceiver(request.receiver.clone()))?;
        bank.verification_key(&request.sender)
            .map_err(|_| RequestError::UnknownSender(request.sender.clone()))?
    };

    // The server never trusts a client-supplied encoding; the claims are
    // rebuilt from the raw fields here.
    let claims = transfer_claims_bytes(
        &request.sender,
        &request.receiver,
        amount,
        &request.issued_at,
    );
    let verified = verify_transfer(&sender_key, &claims, &request.signature);

    let mut bank = state.write().await;
    let record = if !verified {
        TransactionRecord::rejected(
            &request.sender,
            &request.receiver,
            amount,
            &request.issued_at,
            &request.signature,
            RejectReason::BadSignature,
        )
    } else {
        match bank.attempt_transfer(&request.sender, &request.receiver, amount) {
            Ok(()) => TransactionRecord::accepted(
                &request.sender,
                &request.receiver,
                amount,
                &request.issued_at,
                &request.signature,
            ),
            Err(BankError::InsufficientFunds { .. }) => TransactionRecord::rejected(
                &request.sender,
                &request.receiver,
                amount,
                &request.issued_at,
                &request.signature,
                RejectReason::InsufficientFunds,
            ),
            Err(e) => return Err(RequestError::Bank(e)),
        }
    };

    // Same critical section as the settlement: history order is processing
    // order, and no accepted-but-unrecorded state is observable.
    bank.record(record.clone());
    drop(bank);

    tracing::info!(
        sender = %record.sender,
        receiver = %record.receiver,
        amount = %record.amount,
        status = %record.status,
        "transaction processed"
    );

    Ok(record)
}
