//! Types module
//!
//! Contains core data structures used throughout the ledger.
//! This module organizes types into logical submodules:
//! - `money`: Exact decimal amount type
//! - `account`: Account-related types
//! - `transaction`: Transaction entries, operation records and outcomes
//! - `error`: Error types for the ledger

pub mod account;
pub mod error;
pub mod money;
pub mod transaction;

pub use account::{owner_id_for, Account, AccountId, AccountType, NewAccount, OpenAccount, OwnerId};
pub use error::LedgerError;
pub use money::Money;
pub use transaction::{
    OperationKind, OperationOutcome, OperationRecord, PostedEntry, Transaction, TransactionId,
    TransactionType, TransferReceipt, OPENING_BALANCE_REFERENCE,
};
