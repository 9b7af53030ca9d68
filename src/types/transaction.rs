//! Transaction-related types for the ledger
//!
//! This module defines the append-only transaction record, its types, and the
//! operation records that drive the engine from batch input.

use super::account::AccountId;
use super::money::Money;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Transaction identifier
pub type TransactionId = Uuid;

/// Reference recorded on opening balance deposits
pub const OPENING_BALANCE_REFERENCE: &str = "opening balance";

/// Kind of ledger entry
///
/// The sign of an entry is implied by its type. The incoming leg of a
/// transfer is recorded as a `Deposit`, so `Transfer` always marks the
/// outgoing leg.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Credit funds to an account
    Deposit,

    /// Debit funds from an account (requires sufficient balance)
    Withdrawal,

    /// Outgoing leg of a transfer to another account
    Transfer,

    /// Fee charged to an account
    Fee,
}

impl TransactionType {
    /// Whether entries of this type increase the balance
    pub fn is_credit(&self) -> bool {
        matches!(self, TransactionType::Deposit)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Deposit => "deposit",
            TransactionType::Withdrawal => "withdrawal",
            TransactionType::Transfer => "transfer",
            TransactionType::Fee => "fee",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable ledger entry
///
/// Created once by the ledger store together with the balance change it
/// records; never updated or deleted afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub id: TransactionId,

    /// The single account this entry affects
    pub account_id: AccountId,

    /// Always positive; see [`Transaction::signed_amount`]
    pub amount: Money,

    pub tx_type: TransactionType,

    /// Free-text annotation, not interpreted by the engine
    pub reference: String,

    /// Assigned at insert time; primary history ordering key
    pub created_at: DateTime<Utc>,

    /// Store-wide insertion counter, breaks `created_at` ties
    pub sequence: u64,
}

impl Transaction {
    /// Balance effect of this entry
    pub fn signed_amount(&self) -> Money {
        if self.tx_type.is_credit() {
            self.amount
        } else {
            -self.amount
        }
    }
}

/// A transaction together with the balance it left behind
#[derive(Debug, Clone, PartialEq)]
pub struct PostedEntry {
    pub transaction: Transaction,
    pub balance_after: Money,
}

/// Result of a completed transfer
#[derive(Debug, Clone, PartialEq)]
pub struct TransferReceipt {
    /// TRANSFER entry on the source account
    pub debit: PostedEntry,

    /// DEPOSIT entry on the destination account
    pub credit: PostedEntry,
}

/// Operation kinds accepted from batch input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    Deposit,
    Withdrawal,
    Transfer,
    Fee,
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OperationKind::Deposit => "deposit",
            OperationKind::Withdrawal => "withdrawal",
            OperationKind::Transfer => "transfer",
            OperationKind::Fee => "fee",
        };
        f.write_str(name)
    }
}

/// Input operation record
///
/// Names accounts by account number; the engine resolves them through the
/// account directory.
#[derive(Debug, Clone, PartialEq)]
pub struct OperationRecord {
    pub kind: OperationKind,

    /// Account the operation applies to (source account for transfers)
    pub account: String,

    /// Recipient account number; only meaningful for transfers
    pub counterparty: Option<String>,

    pub amount: Money,
}

impl OperationRecord {
    /// Account numbers this operation touches
    pub fn touched_accounts(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.account.as_str()).chain(
            self.counterparty
                .as_deref()
                .filter(|_| self.kind == OperationKind::Transfer),
        )
    }
}

/// Outcome of a successfully processed operation
#[derive(Debug, Clone, PartialEq)]
pub enum OperationOutcome {
    Posted(PostedEntry),
    Transferred(TransferReceipt),
}
