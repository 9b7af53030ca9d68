//! Account directory
//!
//! Resolves account identifiers to accounts and enumerates an owner's
//! accounts for presentation. All lookups are pure reads.

use crate::core::traits::LedgerStore;
use crate::types::{Account, AccountId, LedgerError, OwnerId};
use std::sync::Arc;

/// Read-only view of the accounts held by a ledger store
#[derive(Debug)]
pub struct AccountDirectory<S: LedgerStore> {
    store: Arc<S>,
}

impl<S: LedgerStore> AccountDirectory<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Resolve an account by its id
    pub fn resolve_by_id(&self, id: AccountId) -> Result<Account, LedgerError> {
        self.store.get_account(id)
    }

    /// Resolve an account by its human-facing number
    pub fn resolve_by_number(&self, number: &str) -> Result<Account, LedgerError> {
        self.store.get_account_by_number(number.trim())
    }

    /// Accounts of one owner, in creation order
    ///
    /// An owner without accounts yields an empty list.
    pub fn list_accounts_for_owner(&self, owner: OwnerId) -> Result<Vec<Account>, LedgerError> {
        self.store.list_accounts_for_owner(owner)
    }

    /// Every account, sorted by account number
    pub fn list_all(&self) -> Result<Vec<Account>, LedgerError> {
        let mut accounts = self.store.list_accounts()?;
        accounts.sort_by(|a, b| a.account_number.cmp(&b.account_number));
        Ok(accounts)
    }
}
