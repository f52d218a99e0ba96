//! Bank - identity registry, balances, and transaction history
//!
//! One `Bank` value owns all mutable state. Callers are expected to hold it
//! behind a single synchronization primitive; every method here runs in
//! bounded time with no I/O, so the lock is never held long.

use ed25519_dalek::VerifyingKey;
use rust_decimal::Decimal;
use signbank_core::Amount;
use std::collections::HashMap;

use crate::account::Account;
use crate::error::BankError;
use crate::transaction::TransactionRecord;

/// All accounts plus the append-only transaction history.
#[derive(Debug)]
pub struct Bank {
    accounts: HashMap<String, Account>,
    /// Registration order, for listings
    order: Vec<String>,
    /// Processing order == append order
    history: Vec<TransactionRecord>,
    opening_balance: Amount,
}

impl Bank {
    /// Create an empty bank. Every account registered later starts with
    /// `opening_balance`.
    pub fn new(opening_balance: Amount) -> Self {
        Self {
            accounts: HashMap::new(),
            order: Vec::new(),
            history: Vec::new(),
            opening_balance,
        }
    }

    /// Register a new account with the opening balance.
    ///
    /// Fails if the name is taken (repeat registration is rejected; the
    /// original key stays authoritative) or the key material is malformed.
    pub fn register(&mut self, name: &str, verification_key: &str) -> Result<(), BankError> {
        if self.accounts.contains_key(name) {
            return Err(BankError::AccountExists(name.to_string()));
        }

        let account = Account::new(name, verification_key, self.opening_balance)?;
        self.accounts.insert(name.to_string(), account);
        self.order.push(name.to_string());
        Ok(())
    }

    /// Confirm an existing account. The `login` contract: identity
    /// confirmation only, no key re-issuance, fails for unknown names.
    pub fn confirm(&self, name: &str) -> Result<(), BankError> {
        if self.accounts.contains_key(name) {
            Ok(())
        } else {
            Err(BankError::UnknownAccount(name.to_string()))
        }
    }

    /// Current balance of an account.
    pub fn balance(&self, name: &str) -> Result<Amount, BankError> {
        self.account(name).map(Account::balance)
    }

    /// Account names in registration order.
    pub fn account_names(&self) -> Vec<String> {
        self.order.clone()
    }

    /// The registered verification key of an account, parsed.
    pub fn verification_key(&self, name: &str) -> Result<VerifyingKey, BankError> {
        self.account(name)?.verifying_key()
    }

    /// Atomically debit `sender` and credit `receiver` by exactly `amount`.
    ///
    /// Both balances are computed before either is written, so a failure
    /// leaves the bank untouched. A self-transfer that passes the solvency
    /// check settles as a no-op.
    pub fn attempt_transfer(
        &mut self,
        sender: &str,
        receiver: &str,
        amount: Amount,
    ) -> Result<(), BankError> {
        if !self.accounts.contains_key(receiver) {
            return Err(BankError::UnknownAccount(receiver.to_string()));
        }

        let sender_balance = self.balance(sender)?;
        let debited = sender_balance.checked_sub(&amount).ok_or_else(|| {
            BankError::InsufficientFunds {
                name: sender.to_string(),
                balance: sender_balance.value(),
                required: amount.value(),
            }
        })?;

        if sender == receiver {
            return Ok(());
        }

        let credited = self
            .balance(receiver)?
            .checked_add(&amount)
            .ok_or_else(|| BankError::BalanceOverflow(receiver.to_string()))?;

        if let Some(account) = self.accounts.get_mut(sender) {
            account.set_balance(debited);
        }
        if let Some(account) = self.accounts.get_mut(receiver) {
            account.set_balance(credited);
        }

        Ok(())
    }

    /// Append a finalized record to the history.
    pub fn record(&mut self, record: TransactionRecord) {
        self.history.push(record);
    }

    /// Transaction history in processing order.
    pub fn history(&self) -> &[TransactionRecord] {
        &self.history
    }

    /// Sum of all balances, for conservation audits.
    pub fn total_balance(&self) -> Decimal {
        self.accounts
            .values()
            .map(|account| account.balance().value())
            .sum()
    }

    fn account(&self, name: &str) -> Result<&Account, BankError> {
        self.accounts
            .get(name)
            .ok_or_else(|| BankError::UnknownAccount(name.to_string()))
    }
}
