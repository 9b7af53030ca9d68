//! Core traits for ledger storage
//!
//! This module defines the persistence seam of the ledger. The engine, the
//! account directory and the history query only ever talk to a
//! [`LedgerStore`], so any store that provides atomic multi-row
//! read-modify-write can stand behind them.

use crate::types::{
    Account, AccountId, LedgerError, Money, NewAccount, OwnerId, PostedEntry, Transaction,
    TransactionType,
};

/// Durable record of accounts and their transaction history
///
/// The store owns the balance invariant: every balance change it performs is
/// paired with exactly one transaction insert in the same atomic unit, and a
/// failed call leaves no partial write behind. All mutations are complete
/// before the call returns.
///
/// Implementations must be safe to call from many threads at once.
pub trait LedgerStore: Send + Sync {
    /// Insert a new account
    ///
    /// A non-zero `opening_balance` is recorded as a DEPOSIT in the same
    /// atomic unit, so the account never becomes visible without it. Fails
    /// with `InvalidAmount` for a negative opening balance and with
    /// `DuplicateAccountNumber` when the number is already taken.
    fn open_account(&self, account: NewAccount, opening_balance: Money) -> Result<Account, LedgerError>;

    /// Look up an account by id
    fn get_account(&self, id: AccountId) -> Result<Account, LedgerError>;

    /// Look up an account by its account number
    fn get_account_by_number(&self, number: &str) -> Result<Account, LedgerError>;

    /// All accounts of one owner, in creation order
    fn list_accounts_for_owner(&self, owner: OwnerId) -> Result<Vec<Account>, LedgerError>;

    /// Snapshot of every account, in no particular order
    fn list_accounts(&self) -> Result<Vec<Account>, LedgerError>;

    /// Apply a signed balance change and record it as one transaction
    ///
    /// Reads the current balance, computes the new one, and writes both the
    /// balance and the transaction row as one unit. Fails with
    /// `InsufficientFunds` if the new balance would be negative.
    ///
    /// The stored transaction amount is the absolute value of `delta`.
    fn apply_entry(
        &self,
        account_id: AccountId,
        delta: Money,
        tx_type: TransactionType,
        reference: String,
    ) -> Result<PostedEntry, LedgerError>;

    /// Move `amount` from one account to another as one indivisible unit
    ///
    /// Writes a TRANSFER row on `from_id` and a DEPOSIT row on `to_id`.
    /// Fails with no write if either account is missing, if both ids are the
    /// same account, or if the debit would make the source balance negative.
    fn apply_transfer_pair(
        &self,
        from_id: AccountId,
        to_id: AccountId,
        amount: Money,
        debit_reference: String,
        credit_reference: String,
    ) -> Result<(PostedEntry, PostedEntry), LedgerError>;

    /// Transactions of one account, newest first
    ///
    /// Ordered by `created_at` descending with ties broken by insertion
    /// order (later insert first).
    fn list_transactions(&self, account_id: AccountId) -> Result<Vec<Transaction>, LedgerError>;
}
