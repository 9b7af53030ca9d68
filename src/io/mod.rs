//! I/O module
//!
//! Handles CSV parsing and output.
//!
//! # Components
//!
//! - `csv_format` - Row types, record conversion and output serialization
//! - `sync_reader` - Synchronous readers for operation and seed files
//! - `async_reader` - Asynchronous operation reader with batch interface

pub mod async_reader;
pub mod csv_format;
pub mod sync_reader;

pub use async_reader::AsyncReader;
pub use csv_format::{
    convert_account_seed, convert_operation_record, write_accounts_csv, write_history_csv,
    AccountSeedCsvRecord, OperationCsvRecord,
};
pub use sync_reader::{SeedReader, SyncReader};
