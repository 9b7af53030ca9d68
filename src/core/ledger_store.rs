//! Thread-safe in-memory ledger store
//!
//! This module provides [`InMemoryLedgerStore`], the reference implementation
//! of [`LedgerStore`]. It keeps every account together with its transaction
//! log in a per-account slot guarded by a mutex, so a balance change and its
//! transaction row are always written under the same lock.
//!
//! # Design
//!
//! ```text
//! InMemoryLedgerStore
//!     ├── DashMap<AccountId, Arc<Mutex<AccountSlot>>>  (account + its entries)
//!     ├── DashMap<String, AccountId>                   (unique account numbers)
//!     ├── DashMap<OwnerId, Vec<AccountId>>             (owner index, creation order)
//!     └── AtomicU64                                    (insertion sequence)
//! ```
//!
//! # Thread Safety
//!
//! `DashMap` shards only protect the lookup of a slot; the slot `Arc` is
//! cloned out before its mutex is taken, so no shard lock is ever held while
//! waiting on an account. Every read-decide-write sequence runs while the
//! account mutex is held. Transfers take both account mutexes in ascending
//! account-id order, so two transfers over the same pair in opposite
//! directions cannot deadlock.

use crate::core::traits::LedgerStore;
use crate::types::{
    Account, AccountId, LedgerError, Money, NewAccount, OwnerId, PostedEntry, Transaction,
    TransactionType, OPENING_BALANCE_REFERENCE,
};
use chrono::Utc;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;
use uuid::Uuid;

/// One account and its append-only transaction log
#[derive(Debug)]
struct AccountSlot {
    account: Account,
    entries: Vec<Transaction>,
}

impl AccountSlot {
    /// Balance after applying `delta`, or the reason it cannot be applied
    fn checked_balance(&self, delta: Money, operation: &str) -> Result<Money, LedgerError> {
        let new_balance = self
            .account
            .balance
            .checked_add(delta)
            .ok_or_else(|| LedgerError::arithmetic_overflow(operation, &self.account.account_number))?;

        if new_balance.is_negative() {
            return Err(LedgerError::insufficient_funds(
                &self.account.account_number,
                self.account.balance,
                delta.abs(),
            ));
        }

        Ok(new_balance)
    }

    /// Write the new balance and its transaction row together
    fn commit(
        &mut self,
        new_balance: Money,
        amount: Money,
        tx_type: TransactionType,
        reference: String,
        sequence: u64,
    ) -> PostedEntry {
        // created_at never runs backwards within one account's log
        let now = Utc::now();
        let created_at = self
            .entries
            .last()
            .map_or(now, |last| last.created_at.max(now));

        let transaction = Transaction {
            id: Uuid::new_v4(),
            account_id: self.account.id,
            amount,
            tx_type,
            reference,
            created_at,
            sequence,
        };

        self.account.balance = new_balance;
        self.entries.push(transaction.clone());

        debug!(
            account = %self.account.account_number,
            tx_type = %tx_type,
            amount = %amount,
            balance = %new_balance,
            "posted entry"
        );

        PostedEntry {
            transaction,
            balance_after: new_balance,
        }
    }
}

/// Thread-safe in-memory ledger store
///
/// Safe to share behind an `Arc` across threads and tokio tasks. Operations
/// on different accounts proceed in parallel; operations on the same account
/// are serialized by that account's mutex.
#[derive(Debug, Default)]
pub struct InMemoryLedgerStore {
    /// Account slots by id
    accounts: DashMap<AccountId, Arc<Mutex<AccountSlot>>>,

    /// Unique index from account number to id
    numbers: DashMap<String, AccountId>,

    /// Account ids per owner, in creation order
    owners: DashMap<OwnerId, Vec<AccountId>>,

    /// Next transaction insertion sequence
    sequence: AtomicU64,
}

impl InMemoryLedgerStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    fn next_sequence(&self) -> u64 {
        self.sequence.fetch_add(1, Ordering::Relaxed)
    }

    fn slot(&self, id: AccountId) -> Result<Arc<Mutex<AccountSlot>>, LedgerError> {
        self.accounts
            .get(&id)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| LedgerError::account_not_found(id))
    }

    fn lock(slot: &Mutex<AccountSlot>) -> Result<MutexGuard<'_, AccountSlot>, LedgerError> {
        slot.lock()
            .map_err(|_| LedgerError::store_unavailable("account lock poisoned"))
    }

    fn snapshot(slot: &Mutex<AccountSlot>) -> Result<Account, LedgerError> {
        Ok(Self::lock(slot)?.account.clone())
    }
}

impl LedgerStore for InMemoryLedgerStore {
    fn open_account(&self, request: NewAccount, opening_balance: Money) -> Result<Account, LedgerError> {
        if opening_balance.is_negative() {
            return Err(LedgerError::invalid_amount(opening_balance));
        }

        let id = Uuid::new_v4();
        let number = request.account_number.clone();
        let owner = request.owner;

        // Claim the number before anything becomes visible. Until the slot is
        // published below, the number resolves to AccountNotFound.
        let mut claimed = false;
        self.numbers.entry(number.clone()).or_insert_with(|| {
            claimed = true;
            id
        });
        if !claimed {
            return Err(LedgerError::duplicate_account_number(&number));
        }

        let mut slot = AccountSlot {
            account: request.into_account(id, Utc::now()),
            entries: Vec::new(),
        };
        if !opening_balance.is_zero() {
            let sequence = self.next_sequence();
            slot.commit(
                opening_balance,
                opening_balance,
                TransactionType::Deposit,
                OPENING_BALANCE_REFERENCE.to_string(),
                sequence,
            );
        }
        let account = slot.account.clone();

        self.accounts.insert(id, Arc::new(Mutex::new(slot)));
        self.owners.entry(owner).or_default().push(id);

        debug!(account = %number, account_type = %account.account_type, "opened account");
        Ok(account)
    }

    fn get_account(&self, id: AccountId) -> Result<Account, LedgerError> {
        let slot = self.slot(id)?;
        Self::snapshot(&slot)
    }

    fn get_account_by_number(&self, number: &str) -> Result<Account, LedgerError> {
        let id = self
            .numbers
            .get(number)
            .map(|entry| *entry.value())
            .ok_or_else(|| LedgerError::account_not_found(number))?;
        self.get_account(id)
    }

    fn list_accounts_for_owner(&self, owner: OwnerId) -> Result<Vec<Account>, LedgerError> {
        let ids = self
            .owners
            .get(&owner)
            .map(|entry| entry.value().clone())
            .unwrap_or_default();

        ids.into_iter().map(|id| self.get_account(id)).collect()
    }

    fn list_accounts(&self) -> Result<Vec<Account>, LedgerError> {
        let slots: Vec<Arc<Mutex<AccountSlot>>> = self
            .accounts
            .iter()
            .map(|entry| Arc::clone(entry.value()))
            .collect();

        slots.iter().map(|slot| Self::snapshot(slot)).collect()
    }

    fn apply_entry(
        &self,
        account_id: AccountId,
        delta: Money,
        tx_type: TransactionType,
        reference: String,
    ) -> Result<PostedEntry, LedgerError> {
        if delta.is_zero() {
            return Err(LedgerError::invalid_amount(delta));
        }

        let slot = self.slot(account_id)?;
        let mut guard = Self::lock(&slot)?;

        let new_balance = guard.checked_balance(delta, tx_type.as_str())?;
        let sequence = self.next_sequence();
        Ok(guard.commit(new_balance, delta.abs(), tx_type, reference, sequence))
    }

    fn apply_transfer_pair(
        &self,
        from_id: AccountId,
        to_id: AccountId,
        amount: Money,
        debit_reference: String,
        credit_reference: String,
    ) -> Result<(PostedEntry, PostedEntry), LedgerError> {
        if !amount.is_positive() {
            return Err(LedgerError::invalid_amount(amount));
        }

        let from_slot = self.slot(from_id)?;
        if from_id == to_id {
            let account = Self::snapshot(&from_slot)?;
            return Err(LedgerError::same_account(&account.account_number));
        }
        let to_slot = self.slot(to_id)?;

        // Deterministic lock order: ascending account id.
        let (mut from, mut to) = if from_id < to_id {
            let from = Self::lock(&from_slot)?;
            let to = Self::lock(&to_slot)?;
            (from, to)
        } else {
            let to = Self::lock(&to_slot)?;
            let from = Self::lock(&from_slot)?;
            (from, to)
        };

        // Both legs are validated before either is written.
        let from_balance = from.checked_balance(-amount, "transfer")?;
        let to_balance = to.checked_balance(amount, "transfer")?;

        let debit = from.commit(
            from_balance,
            amount,
            TransactionType::Transfer,
            debit_reference,
            self.next_sequence(),
        );
        let credit = to.commit(
            to_balance,
            amount,
            TransactionType::Deposit,
            credit_reference,
            self.next_sequence(),
        );

        Ok((debit, credit))
    }

    fn list_transactions(&self, account_id: AccountId) -> Result<Vec<Transaction>, LedgerError> {
        let slot = self.slot(account_id)?;
        let mut entries = Self::lock(&slot)?.entries.clone();

        entries.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.sequence.cmp(&a.sequence))
        });

        Ok(entries)
    }
}
