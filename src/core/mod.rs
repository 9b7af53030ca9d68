//! Core ledger logic
//!
//! This module contains the ledger consistency components:
//! - `traits` - The `LedgerStore` persistence boundary
//! - `ledger_store` - Thread-safe in-memory store with per-account locking
//! - `engine` - Deposits, withdrawals, fees and transfers
//! - `directory` - Account lookups and owner listings
//! - `history` - Ordered transaction history
//! - `batch_processor` - Concurrent batch execution partitioned by account

pub mod batch_processor;
pub mod directory;
pub mod engine;
pub mod history;
pub mod ledger_store;
pub mod traits;

pub use batch_processor::{BatchProcessor, ProcessingResult};
pub use directory::AccountDirectory;
pub use engine::TransactionEngine;
pub use history::HistoryQuery;
pub use ledger_store::InMemoryLedgerStore;
pub use traits::LedgerStore;
