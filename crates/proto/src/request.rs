//! Client requests

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A parsed client request, tagged by `action` on the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Request {
    Register {
        name: String,
        /// Hex-encoded Ed25519 public key
        verification_key: String,
    },
    Login {
        name: String,
    },
    GetBalance {
        name: String,
    },
    GetUsers,
    MakeTransaction(TransferRequest),
    GetTransactions,
}

/// The fields of a `make_transaction` request.
///
/// The server only trusts these raw fields plus the signature; it re-encodes
/// them itself before verifying.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferRequest {
    pub sender: String,
    pub receiver: String,
    /// Sent as a string so the decimal scale survives the wire intact
    #[serde(with = "rust_decimal::serde::str")]
    pub amount: Decimal,
    /// Client clock, opaque to the server
    pub issued_at: String,
    /// Hex-encoded signature over the canonical claims bytes
    pub signature: String,
}
