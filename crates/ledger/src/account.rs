//! Registered accounts
//!
//! An account is created once at registration and never deleted. The name
//! and verification key are immutable; only the balance changes, and only
//! through `Bank::attempt_transfer`.

use ed25519_dalek::VerifyingKey;
use serde::{Deserialize, Serialize};
use signbank_core::Amount;

use crate::error::BankError;
use crate::signature::parse_verifying_key;

/// A named account holding a balance and a registered verification key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    name: String,
    /// Hex-encoded 32-byte Ed25519 public key, validated at registration
    verification_key: String,
    balance: Amount,
}

impl Account {
    /// Create an account with an opening balance.
    ///
    /// The key material is parsed up front so a malformed key can never be
    /// registered.
    pub fn new(
        name: impl Into<String>,
        verification_key: impl Into<String>,
        opening_balance: Amount,
    ) -> Result<Self, BankError> {
        let verification_key = verification_key.into();
        parse_verifying_key(&verification_key)?;

        Ok(Self {
            name: name.into(),
            verification_key,
            balance: opening_balance,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn balance(&self) -> Amount {
        self.balance
    }

    pub fn verification_key_hex(&self) -> &str {
        &self.verification_key
    }

    /// Parse the stored key into a usable verifying key.
    ///
    /// Cannot fail for an account that went through `new`, but the parse is
    /// still propagated rather than unwrapped.
    pub fn verifying_key(&self) -> Result<VerifyingKey, BankError> {
        parse_verifying_key(&self.verification_key)
    }

    pub(crate) fn set_balance(&mut self, balance: Amount) {
        self.balance = balance;
    }
}
