//! Shared application state

use signbank_core::Amount;
use signbank_ledger::Bank;
use std::sync::Arc;
use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// The one `Bank` instance shared by every connection task.
///
/// All mutation goes through the write lock; balance and history reads take
/// the read lock and can never observe a half-applied transfer.
#[derive(Clone)]
pub struct AppState {
    bank: Arc<RwLock<Bank>>,
}

impl AppState {
    pub fn new(opening_balance: Amount) -> Self {
        Self {
            bank: Arc::new(RwLock::new(Bank::new(opening_balance))),
        }
    }

    pub async fn read(&self) -> RwLockReadGuard<'_, Bank> {
        self.bank.read().await
    }

    pub async fn write(&self) -> RwLockWriteGuard<'_, Bank> {
        self.bank.write().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ed25519_dalek::SigningKey;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn reads_see_writes() {
        let state = AppState::new(Amount::new(dec!(1000)).unwrap());
        let key = SigningKey::generate(&mut rand::thread_rng());
        let key_hex = hex::encode(key.verifying_key().to_bytes());

        state.write().await.register("alice", &key_hex).unwrap();

        let bank = state.read().await;
        assert_eq!(bank.balance("alice").unwrap().value(), dec!(1000));
    }
}
