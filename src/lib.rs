//! Ledger Core Library
//! # Overview
//!
//! This library keeps money balances consistent with their transaction
//! history. Every balance change is recorded as an immutable transaction in
//! the same atomic unit, balances never go negative, and transfers move value
//! between two accounts all-or-nothing.
//!
//! # Architecture
//!
//! - [`types`] - Core data types (Money, Account, Transaction, LedgerError)
//! - [`core`] - Ledger logic:
//!   - [`core::ledger_store`] - Thread-safe store owning the balance invariant
//!   - [`core::engine`] - Deposits, withdrawals, fees and transfers
//!   - [`core::directory`] - Account lookups and owner listings
//!   - [`core::history`] - Ordered transaction history
//!   - [`core::batch_processor`] - Concurrent, account-partitioned batches
//! - [`io`] - CSV readers and writers
//! - [`strategy`] - Sync and async pipelines for operation files
//! - [`cli`] - CLI argument parsing
//! - [`telemetry`] - Tracing setup
//!
//! # Transaction Types
//!
//! - **Deposit**: credit funds to an account (also the incoming leg of a transfer)
//! - **Withdrawal**: debit funds, requires a sufficient balance
//! - **Transfer**: outgoing leg of a transfer to another account
//! - **Fee**: debit charged by the institution, requires a sufficient balance
//!
//! # Example
//!
//! ```
//! use ledger_core::{owner_id_for, AccountType, InMemoryLedgerStore, Money, OpenAccount, TransactionEngine};
//! use std::sync::Arc;
//!
//! let engine = TransactionEngine::new(Arc::new(InMemoryLedgerStore::new()));
//! let checking = engine
//!     .open_account(OpenAccount {
//!         owner: owner_id_for("mathew@example.com"),
//!         account_number: "ACC001".to_string(),
//!         account_type: AccountType::Checking,
//!         currency: "KES".to_string(),
//!         opening_balance: "50000.00".parse().unwrap(),
//!     })
//!     .unwrap();
//!
//! engine.deposit(checking.id, "5000.00".parse().unwrap()).unwrap();
//! assert_eq!(engine.balance(checking.id).unwrap(), Money::from_minor(5_500_000));
//! ```

// Module declarations
pub mod cli;
pub mod core;
pub mod io;
pub mod strategy;
pub mod telemetry;
pub mod types;

pub use self::core::{AccountDirectory, HistoryQuery, InMemoryLedgerStore, LedgerStore, TransactionEngine};
pub use io::{write_accounts_csv, write_history_csv};
pub use types::{
    owner_id_for, Account, AccountId, AccountType, LedgerError, Money, OpenAccount,
    OperationKind, OperationRecord, OwnerId, PostedEntry, Transaction, TransactionType,
    TransferReceipt,
};
