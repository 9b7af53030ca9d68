//! Processing strategy module
//!
//! This module defines the Strategy pattern for running an operation file
//! through the transaction engine. Implementations (synchronous, asynchronous
//! batch) are selected at runtime and must leave the ledger in the same state
//! for the same input.

use crate::cli::StrategyType;
use crate::core::{InMemoryLedgerStore, TransactionEngine};
use crate::io::sync_reader::SeedReader;
use crate::types::{LedgerError, OperationOutcome, OperationRecord};
use std::path::Path;
use tracing::{info, warn};

pub mod r#async;
pub mod sync;

pub use self::r#async::{AsyncProcessingStrategy, BatchConfig};
pub use sync::SyncProcessingStrategy;

/// Counts of what happened to the rows of one operation file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProcessingSummary {
    /// Operations committed to the ledger
    pub applied: usize,
    /// Well-formed operations the engine refused
    pub rejected: usize,
    /// Rows that could not be parsed
    pub skipped: usize,
}

impl ProcessingSummary {
    /// Count one engine result, logging rejections
    pub fn record(&mut self, record: &OperationRecord, result: &Result<OperationOutcome, LedgerError>) {
        match result {
            Ok(_) => self.applied += 1,
            Err(e) => {
                self.rejected += 1;
                warn!(
                    op = %record.kind,
                    account = %record.account,
                    amount = %record.amount,
                    error = %e,
                    "operation rejected"
                );
            }
        }
    }
}

/// Processing strategy trait for complete operation pipelines
///
/// Each strategy reads operation records from a CSV file and applies them to
/// the given engine. Per-record failures are logged and counted, then
/// processing continues with the next record.
pub trait ProcessingStrategy: Send + Sync {
    /// Apply every operation in `input_path` to `engine`
    ///
    /// # Errors
    ///
    /// Returns an error only for file-level failures: the input cannot be
    /// opened or read, or the async runtime cannot be started.
    fn process(
        &self,
        engine: &TransactionEngine<InMemoryLedgerStore>,
        input_path: &Path,
    ) -> Result<ProcessingSummary, LedgerError>;
}

/// Create a processing strategy based on the specified strategy type
///
/// `config` is only used by the async strategy; `None` means defaults.
pub fn create_strategy(
    strategy_type: StrategyType,
    config: Option<BatchConfig>,
) -> Box<dyn ProcessingStrategy> {
    match strategy_type {
        StrategyType::Sync => Box::new(SyncProcessingStrategy),
        StrategyType::Async => {
            let config = config.unwrap_or_default();
            Box::new(AsyncProcessingStrategy::new(config))
        }
    }
}

/// Open every account listed in a seed file
///
/// Rows that fail to parse or to open (for example a duplicate account
/// number) are logged and skipped. Returns the number of accounts opened.
///
/// # Errors
///
/// Returns an error if the seed file cannot be opened or read.
pub fn seed_ledger(
    engine: &TransactionEngine<InMemoryLedgerStore>,
    path: &Path,
    default_currency: &str,
) -> Result<usize, LedgerError> {
    let mut opened = 0;

    for row in SeedReader::new(path, default_currency)? {
        match row.and_then(|request| engine.open_account(request)) {
            Ok(_) => opened += 1,
            Err(e @ LedgerError::IoError { .. }) => return Err(e),
            Err(e) => warn!(error = %e, "skipping account seed row"),
        }
    }

    info!(accounts = opened, path = %path.display(), "seeded ledger");
    Ok(opened)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Money, OperationKind};
    use std::io::Write;
    use std::sync::Arc;
    use tempfile::NamedTempFile;

    fn create_temp_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        file.write_all(content.as_bytes())
            .expect("Failed to write to temp file");
        file.flush().expect("Failed to flush temp file");
        file
    }

    fn engine() -> TransactionEngine<InMemoryLedgerStore> {
        TransactionEngine::new(Arc::new(InMemoryLedgerStore::new()))
    }

    #[test]
    fn test_seed_ledger_skips_bad_rows() {
        let file = create_temp_csv(
            "owner,account_number,type,currency,balance\n\
             mathew@example.com,ACC001,checking,KES,50000.00\n\
             mathew@example.com,ACC001,savings,KES,1.00\n\
             jane@example.com,ACC002,loan,KES,0\n\
             jane@example.com,ACC003,,,-1.00\n\
             jane@example.com,SAV002,savings,,\n",
        );
        let engine = engine();

        let opened = seed_ledger(&engine, file.path(), "KES").unwrap();

        assert_eq!(opened, 2);
        let directory = engine.directory();
        assert_eq!(
            directory.resolve_by_number("ACC001").unwrap().balance,
            Money::from_minor(5000000)
        );
        assert!(directory.resolve_by_number("SAV002").is_ok());
        assert!(directory.resolve_by_number("ACC002").is_err());
        assert!(directory.resolve_by_number("ACC003").is_err());
    }

    #[test]
    fn test_seed_ledger_missing_file() {
        let err = seed_ledger(&engine(), Path::new("nonexistent.csv"), "KES").unwrap_err();
        assert!(matches!(err, LedgerError::FileNotFound { .. }));
    }

    #[test]
    fn test_summary_counts_results() {
        let record = OperationRecord {
            kind: OperationKind::Withdrawal,
            account: "ACC001".to_string(),
            counterparty: None,
            amount: Money::from_minor(100),
        };
        let mut summary = ProcessingSummary::default();

        summary.record(&record, &Err(LedgerError::account_not_found("ACC001")));

        assert_eq!(
            summary,
            ProcessingSummary {
                applied: 0,
                rejected: 1,
                skipped: 0
            }
        );
    }

    #[test]
    fn test_create_strategy_variants_process_files() {
        let file = create_temp_csv("op,account,counterparty,amount\n");

        for strategy_type in [StrategyType::Sync, StrategyType::Async] {
            let strategy = create_strategy(strategy_type, None);
            let summary = strategy.process(&engine(), file.path()).unwrap();
            assert_eq!(summary, ProcessingSummary::default());
        }
    }

    #[test]
    fn test_both_strategies_fail_on_unreadable_input() {
        let mut header = NamedTempFile::new().expect("Failed to create temp file");
        header
            .write_all(b"op,acc\xff\xfeount,counterparty,amount\ndeposit,ACC001,,1.00\n")
            .expect("Failed to write to temp file");
        header.flush().expect("Failed to flush temp file");
        let directory = tempfile::tempdir().expect("Failed to create temp dir");

        for strategy_type in [StrategyType::Sync, StrategyType::Async] {
            let strategy = create_strategy(strategy_type, None);

            let err = strategy.process(&engine(), header.path()).unwrap_err();
            assert!(
                matches!(err, LedgerError::ParseError { .. }),
                "{:?}: {:?}",
                strategy_type,
                err
            );

            let err = strategy.process(&engine(), directory.path()).unwrap_err();
            assert!(
                matches!(err, LedgerError::IoError { .. }),
                "{:?}: {:?}",
                strategy_type,
                err
            );
        }
    }

    #[test]
    fn test_seed_ledger_fails_on_unreadable_file() {
        let directory = tempfile::tempdir().expect("Failed to create temp dir");

        let err = seed_ledger(&engine(), directory.path(), "KES").unwrap_err();

        assert!(matches!(err, LedgerError::IoError { .. }));
    }
}
