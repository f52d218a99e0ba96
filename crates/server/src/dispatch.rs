//! Request dispatcher
//!
//! Routes each parsed request to the registry or the authorization engine
//! and shapes the typed outcome into a wire response. Registry reads take
//! the read lock; registration takes the write lock.

use signbank_proto::{Request, Response};

use crate::engine;
use crate::state::AppState;

/// Process one request to completion.
pub async fn process(state: &AppState, request: Request) -> Response {
    match request {
        Request::Register {
            name,
            verification_key,
        } => register(state, &name, &verification_key).await,
        Request::Login { name } => login(state, &name).await,
        Request::GetBalance { name } => get_balance(state, &name).await,
        Request::GetUsers => get_users(state).await,
        Request::MakeTransaction(transfer) => make_transaction(state, transfer).await,
        Request::GetTransactions => get_transactions(state).await,
    }
}

async fn register(state: &AppState, name: &str, verification_key: &str) -> Response {
    let mut bank = state.write().await;
    match bank.register(name, verification_key) {
        Ok(()) => {
            tracing::info!(%name, "account registered");
            Response::message(format!("account {name} registered"))
        }
        Err(e) => Response::error(e.to_string()),
    }
}

async fn login(state: &AppState, name: &str) -> Response {
    let bank = state.read().await;
    match bank.confirm(name) {
        Ok(()) => Response::message(format!("welcome back, {name}")),
        Err(e) => Response::error(e.to_string()),
    }
}

async fn get_balance(state: &AppState, name: &str) -> Response {
    let bank = state.read().await;
    match bank.balance(name) {
        Ok(balance) => Response::balance(balance.value()),
        Err(e) => Response::error(e.to_string()),
    }
}

async fn get_users(state: &AppState) -> Response {
    let bank = state.read().await;
    Response::users(bank.account_names())
}

async fn make_transaction(state: &AppState, transfer: signbank_proto::TransferRequest) -> Response {
    match engine::authorize_transfer(state, &transfer).await {
        Ok(record) if record.is_accepted() => Response::message(format!(
            "transaction accepted: {} -> {} ({})",
            record.sender, record.receiver, record.amount
        )),
        Ok(record) => {
            let reason = match record.reason {
                Some(signbank_ledger::RejectReason::InsufficientFunds) => "insufficient funds",
                _ => "invalid signature",
            };
            Response::message(format!("transaction rejected: {reason}"))
        }
        Err(e) => Response::error(e.to_string()),
    }
}

async fn get_transactions(state: &AppState) -> Response {
    let bank = state.read().await;
    Response::transactions(bank.history().to_vec())
}
