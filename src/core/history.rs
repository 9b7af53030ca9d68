//! Transaction history retrieval
//!
//! Read-only, ordered access to an account's transaction log for display and
//! audit.

use crate::core::traits::LedgerStore;
use crate::types::{AccountId, LedgerError, Transaction};
use std::sync::Arc;

/// Read-only history query over a ledger store
#[derive(Debug)]
pub struct HistoryQuery<S: LedgerStore> {
    store: Arc<S>,
}

impl<S: LedgerStore> HistoryQuery<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Transactions of an account, newest first
    ///
    /// Entries are ordered by `created_at` descending; entries with the same
    /// timestamp appear in reverse insertion order. An account without
    /// transactions yields an empty list, an unknown account is an error.
    pub fn get_history(&self, account_id: AccountId) -> Result<Vec<Transaction>, LedgerError> {
        self.store.list_transactions(account_id)
    }

    /// Same as [`HistoryQuery::get_history`], naming the account by number
    pub fn get_history_by_number(&self, number: &str) -> Result<Vec<Transaction>, LedgerError> {
        let account = self.store.get_account_by_number(number.trim())?;
        self.store.list_transactions(account.id)
    }
}
