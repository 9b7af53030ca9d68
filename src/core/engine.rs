//! Transaction processing engine
//!
//! This module provides the TransactionEngine that enforces the ledger's
//! business rules on top of the atomic primitives of a [`LedgerStore`].
//!
//! The engine enforces rules such as:
//! - Amount validation (strictly positive amounts only)
//! - Sufficient funds for withdrawals, fees and transfers (checked atomically by the store)
//! - Recipient resolution, self-transfer rejection and currency matching for transfers
//! - Opening balances recorded as transactions so the balance invariant holds from the start

use crate::core::directory::AccountDirectory;
use crate::core::history::HistoryQuery;
use crate::core::traits::LedgerStore;
use crate::types::{
    Account, AccountId, LedgerError, Money, OpenAccount, OperationKind, OperationOutcome,
    OperationRecord, PostedEntry, TransactionType, TransferReceipt,
};
use std::sync::Arc;
use tracing::{debug, info};

/// Transaction processing engine
///
/// Holds an explicit handle to the ledger store; there is no ambient session.
/// The engine itself keeps no mutable state, so it can be shared across
/// threads behind an `Arc` and called concurrently.
#[derive(Debug)]
pub struct TransactionEngine<S: LedgerStore> {
    store: Arc<S>,
}

impl<S: LedgerStore> Clone for TransactionEngine<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: LedgerStore> TransactionEngine<S> {
    /// Create a new TransactionEngine over the given store
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Read-only account lookups over the same store
    pub fn directory(&self) -> AccountDirectory<S> {
        AccountDirectory::new(Arc::clone(&self.store))
    }

    /// Read-only history retrieval over the same store
    pub fn history(&self) -> HistoryQuery<S> {
        HistoryQuery::new(Arc::clone(&self.store))
    }

    /// Open a new account
    ///
    /// A non-zero opening balance is posted as a DEPOSIT together with the
    /// account itself, so the balance always equals the sum of the
    /// account's transactions.
    ///
    /// # Errors
    ///
    /// - `InvalidAmount` if the opening balance is negative
    /// - `DuplicateAccountNumber` if the number is already taken
    pub fn open_account(&self, request: OpenAccount) -> Result<Account, LedgerError> {
        if request.opening_balance.is_negative() {
            return Err(LedgerError::invalid_amount(request.opening_balance));
        }

        let (new_account, opening_balance) = request.split();
        let account = self.store.open_account(new_account, opening_balance)?;

        if !account.balance.is_zero() {
            info!(
                account = %account.account_number,
                balance = %account.balance,
                "opened account with opening balance"
            );
        }

        Ok(account)
    }

    /// Current balance of an account
    pub fn balance(&self, account_id: AccountId) -> Result<Money, LedgerError> {
        Ok(self.store.get_account(account_id)?.balance)
    }

    /// Deposit funds into an account
    ///
    /// # Errors
    ///
    /// - `InvalidAmount` if `amount <= 0`
    /// - `AccountNotFound` if the account does not exist
    pub fn deposit(&self, account_id: AccountId, amount: Money) -> Result<PostedEntry, LedgerError> {
        Self::require_positive(amount)?;

        self.store
            .apply_entry(account_id, amount, TransactionType::Deposit, "deposit".to_string())
    }

    /// Withdraw funds from an account
    ///
    /// The sufficient-funds check happens inside the store's atomic unit, so
    /// two concurrent withdrawals can never both spend the same balance.
    ///
    /// # Errors
    ///
    /// - `InvalidAmount` if `amount <= 0`
    /// - `InsufficientFunds` if the balance is less than `amount`
    /// - `AccountNotFound` if the account does not exist
    pub fn withdraw(&self, account_id: AccountId, amount: Money) -> Result<PostedEntry, LedgerError> {
        Self::require_positive(amount)?;

        self.store
            .apply_entry(account_id, -amount, TransactionType::Withdrawal, "withdraw".to_string())
    }

    /// Charge a fee to an account
    ///
    /// Behaves like a withdrawal but records a FEE entry with `reason` as
    /// its reference. Fees never drive a balance negative.
    pub fn charge_fee(
        &self,
        account_id: AccountId,
        amount: Money,
        reason: &str,
    ) -> Result<PostedEntry, LedgerError> {
        Self::require_positive(amount)?;

        self.store
            .apply_entry(account_id, -amount, TransactionType::Fee, reason.to_string())
    }

    /// Transfer funds to the account with the given number
    ///
    /// Produces a TRANSFER entry on the source ("transfer to {number}") and a
    /// DEPOSIT entry on the destination ("transfer from {number}"), or
    /// nothing at all.
    ///
    /// # Errors
    ///
    /// - `InvalidAmount` if `amount <= 0`
    /// - `AccountNotFound` if either account does not resolve
    /// - `SameAccount` if the destination is the source account
    /// - `CurrencyMismatch` if the accounts hold different currencies
    /// - `InsufficientFunds` if the source balance is less than `amount`
    pub fn transfer(
        &self,
        from_account_id: AccountId,
        to_account_number: &str,
        amount: Money,
    ) -> Result<TransferReceipt, LedgerError> {
        Self::require_positive(amount)?;

        let source = self.store.get_account(from_account_id)?;
        let destination = self.directory().resolve_by_number(to_account_number)?;

        if source.id == destination.id {
            return Err(LedgerError::same_account(&source.account_number));
        }

        if source.currency != destination.currency {
            return Err(LedgerError::currency_mismatch(
                &source.currency,
                &destination.currency,
            ));
        }

        let (debit, credit) = self.store.apply_transfer_pair(
            source.id,
            destination.id,
            amount,
            format!("transfer to {}", destination.account_number),
            format!("transfer from {}", source.account_number),
        )?;

        debug!(
            from = %source.account_number,
            to = %destination.account_number,
            amount = %amount,
            "transfer completed"
        );

        Ok(TransferReceipt { debit, credit })
    }

    /// Process a single operation record
    ///
    /// Resolves the named account numbers through the directory and routes
    /// the record to the matching operation.
    pub fn process(&self, record: &OperationRecord) -> Result<OperationOutcome, LedgerError> {
        let account = self.directory().resolve_by_number(&record.account)?;

        match record.kind {
            OperationKind::Deposit => self.deposit(account.id, record.amount).map(OperationOutcome::Posted),
            OperationKind::Withdrawal => self.withdraw(account.id, record.amount).map(OperationOutcome::Posted),
            OperationKind::Fee => self
                .charge_fee(account.id, record.amount, "fee")
                .map(OperationOutcome::Posted),
            OperationKind::Transfer => {
                let counterparty = record
                    .counterparty
                    .as_deref()
                    .filter(|number| !number.is_empty())
                    .ok_or_else(|| LedgerError::account_not_found(""))?;
                self.transfer(account.id, counterparty, record.amount)
                    .map(OperationOutcome::Transferred)
            }
        }
    }

    fn require_positive(amount: Money) -> Result<(), LedgerError> {
        if amount.is_positive() {
            Ok(())
        } else {
            Err(LedgerError::invalid_amount(amount))
        }
    }
}
