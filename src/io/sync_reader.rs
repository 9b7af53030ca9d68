//! Synchronous CSV readers with iterator interfaces
//!
//! Provides streaming iterators over operation records and account seed rows.
//! Delegates CSV format concerns to the csv_format module.
//!
//! # Design
//!
//! Both readers wrap a `csv::Reader` and deserialize one row at a time, so
//! memory usage stays constant regardless of file size. Each row is read into
//! a reusable `StringRecord` first, which gives every error an accurate line
//! number.
//!
//! ```no_run
//! use ledger_core::io::sync_reader::SyncReader;
//! use std::path::Path;
//!
//! let reader = SyncReader::new(Path::new("operations.csv")).unwrap();
//! for result in reader {
//!     match result {
//!         Ok(record) => println!("Processing operation: {:?}", record),
//!         Err(e) => eprintln!("Error: {}", e),
//!     }
//! }
//! ```
//!
//! # Error Handling
//!
//! - Fatal errors (file not found, I/O errors) are returned from `new()`
//! - Individual row errors are yielded as `Err` items carrying the line number

use crate::io::csv_format::{
    convert_account_seed, convert_operation_record, AccountSeedCsvRecord, OperationCsvRecord,
};
use crate::types::{LedgerError, OpenAccount, OperationRecord};
use csv::{ReaderBuilder, StringRecord, Trim};
use serde::de::DeserializeOwned;
use std::fs::File;
use std::path::Path;

/// Row-at-a-time CSV reader shared by the public readers
#[derive(Debug)]
struct CsvRows {
    reader: csv::Reader<File>,
    headers: StringRecord,
    record: StringRecord,
}

impl CsvRows {
    fn open(path: &Path) -> Result<Self, LedgerError> {
        let file = File::open(path).map_err(|e| LedgerError::open_failed(path, e))?;

        let mut reader = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .buffer_capacity(8 * 1024)
            .from_reader(file);
        let headers = reader.headers()?.clone();

        Ok(Self {
            reader,
            headers,
            record: StringRecord::new(),
        })
    }

    /// Next row deserialized as `T`, with its line number
    fn next_row<T: DeserializeOwned>(&mut self) -> Option<(Option<u64>, Result<T, LedgerError>)> {
        match self.reader.read_record(&mut self.record) {
            Ok(false) => None,
            Ok(true) => {
                let line = self.record.position().map(|pos| pos.line());
                let row = self
                    .record
                    .deserialize::<T>(Some(&self.headers))
                    .map_err(LedgerError::from);
                Some((line, row))
            }
            Err(e) => {
                let line = e.position().map(|pos| pos.line());
                Some((line, Err(e.into())))
            }
        }
    }
}

/// Synchronous operation file reader
///
/// Yields one `Result<OperationRecord, LedgerError>` per row.
#[derive(Debug)]
pub struct SyncReader {
    rows: CsvRows,
}

impl SyncReader {
    /// Open an operation CSV file for streaming iteration
    ///
    /// # Errors
    ///
    /// - `FileNotFound` if the path does not exist
    /// - `IoError` if the file cannot be opened or read
    /// - `ParseError` if the header row is unreadable
    pub fn new(path: &Path) -> Result<Self, LedgerError> {
        Ok(Self {
            rows: CsvRows::open(path)?,
        })
    }
}

impl Iterator for SyncReader {
    type Item = Result<OperationRecord, LedgerError>;

    fn next(&mut self) -> Option<Self::Item> {
        let (line, row) = self.rows.next_row::<OperationCsvRecord>()?;
        Some(
            row.and_then(convert_operation_record)
                .map_err(|e| e.at_line(line)),
        )
    }
}

/// Synchronous account seed file reader
///
/// Yields one `Result<OpenAccount, LedgerError>` per row. Blank currencies
/// resolve to the reader's default currency.
#[derive(Debug)]
pub struct SeedReader {
    rows: CsvRows,
    default_currency: String,
}

impl SeedReader {
    pub fn new(path: &Path, default_currency: &str) -> Result<Self, LedgerError> {
        Ok(Self {
            rows: CsvRows::open(path)?,
            default_currency: default_currency.trim().to_uppercase(),
        })
    }
}

impl Iterator for SeedReader {
    type Item = Result<OpenAccount, LedgerError>;

    fn next(&mut self) -> Option<Self::Item> {
        let (line, row) = self.rows.next_row::<AccountSeedCsvRecord>()?;
        Some(
            row.and_then(|record| convert_account_seed(record, &self.default_currency))
                .map_err(|e| e.at_line(line)),
        )
    }
}
