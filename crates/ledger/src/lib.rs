//! SignBank Ledger - the domain core
//!
//! All account and balance state changes go through this crate.
//!
//! # Key Types
//! - `Bank`: identity registry + balances + append-only transaction history
//! - `Account`: a registered name with its verification key and balance
//! - `TransactionRecord`: immutable accepted/rejected outcome of a transfer
//! - `transfer_claims_bytes`: the canonical encoding shared by signer and
//!   verifier
//! - `verify_transfer`: Ed25519 signature check over the canonical bytes

pub mod account;
pub mod bank;
pub mod encoding;
pub mod error;
pub mod signature;
pub mod transaction;

pub use account::Account;
pub use bank::Bank;
pub use encoding::transfer_claims_bytes;
pub use error::BankError;
pub use signature::{parse_verifying_key, verify_transfer};
pub use transaction::{RejectReason, TransactionRecord, TransactionStatus};
