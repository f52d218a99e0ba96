//! Canonical claims encoding
//!
//! The byte sequence a client signs and the server verifies against. There
//! is exactly one encoder: both sides call this function with the raw
//! fields, so field order, numeric formatting, and spacing can never drift
//! between signer and verifier.

use serde::Serialize;
use signbank_core::Amount;

/// The signable fields, in their fixed order.
#[derive(Serialize)]
struct TransferClaims<'a> {
    sender: &'a str,
    receiver: &'a str,
    /// Decimal rendered as a string, scale preserved ("200.00" != "200")
    amount: String,
    issued_at: &'a str,
}

/// Encode the signable fields of a transfer to canonical bytes.
///
/// Pure function of the four fields: the same inputs always yield the same
/// bytes, and any change to any field changes the bytes.
pub fn transfer_claims_bytes(
    sender: &str,
    receiver: &str,
    amount: Amount,
    issued_at: &str,
) -> Vec<u8> {
    let claims = TransferClaims {
        sender,
        receiver,
        amount: amount.value().to_string(),
        issued_at,
    };

    serde_json::to_vec(&claims).expect("claims serialization should never fail")
}
