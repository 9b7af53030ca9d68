//! Asynchronous batch processing strategy
//!
//! Multi-threaded implementation of `ProcessingStrategy`. Operations are read
//! in batches and each batch is partitioned into groups of records that share
//! accounts.
//!
//! # Architecture
//!
//! ```text
//! AsyncProcessingStrategy
//!     ├── BatchConfig (batch_size, max_concurrent_batches)
//!     ├── AsyncReader (batch CSV reading)
//!     └── BatchProcessor (account partitioning + tokio tasks)
//!         └── TransactionEngine<InMemoryLedgerStore>
//! ```
//!
//! # Ordering
//!
//! - Batches are processed one after another, so an account's operations
//!   keep file order across batch boundaries
//! - Within a batch, groups with disjoint accounts run in parallel
//! - Within a group, records run in file order
//!
//! The resulting ledger matches the synchronous strategy for the same file.

use crate::core::{BatchProcessor, InMemoryLedgerStore, TransactionEngine};
use crate::io::async_reader::AsyncReader;
use crate::strategy::{ProcessingStrategy, ProcessingSummary};
use crate::types::LedgerError;
use std::path::Path;
use tracing::{debug, info, warn};

/// Configuration for batch processing
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BatchConfig {
    /// Number of operations per batch
    pub batch_size: usize,
    /// Number of runtime worker threads processing groups in parallel
    pub max_concurrent_batches: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            batch_size: 1000,
            max_concurrent_batches: num_cpus::get(),
        }
    }
}

impl BatchConfig {
    /// Create a BatchConfig, replacing zero values with defaults
    pub fn new(batch_size: usize, max_concurrent_batches: usize) -> Self {
        let default = Self::default();

        let batch_size = if batch_size == 0 {
            warn!(
                batch_size,
                default = default.batch_size,
                "invalid batch_size, using default"
            );
            default.batch_size
        } else {
            batch_size
        };

        let max_concurrent_batches = if max_concurrent_batches == 0 {
            warn!(
                max_concurrent_batches,
                default = default.max_concurrent_batches,
                "invalid max_concurrent_batches, using default"
            );
            default.max_concurrent_batches
        } else {
            max_concurrent_batches
        };

        Self {
            batch_size,
            max_concurrent_batches,
        }
    }
}

/// Asynchronous batch processing strategy
///
/// Owns its tokio runtime for the duration of a `process` call, so it must
/// not be invoked from inside another runtime.
#[derive(Debug, Clone)]
pub struct AsyncProcessingStrategy {
    config: BatchConfig,
}

impl AsyncProcessingStrategy {
    pub fn new(config: BatchConfig) -> Self {
        Self { config }
    }
}

impl ProcessingStrategy for AsyncProcessingStrategy {
    fn process(
        &self,
        engine: &TransactionEngine<InMemoryLedgerStore>,
        input_path: &Path,
    ) -> Result<ProcessingSummary, LedgerError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(self.config.max_concurrent_batches)
            .build()
            .map_err(|e| LedgerError::IoError {
                message: format!("Failed to create tokio runtime: {}", e),
            })?;

        runtime.block_on(async {
            let processor = BatchProcessor::new(engine.clone());

            let file = tokio::fs::File::open(input_path)
                .await
                .map_err(|e| LedgerError::open_failed(input_path, e))?;
            let compat_file = tokio_util::compat::TokioAsyncReadCompatExt::compat(file);
            let mut reader = AsyncReader::new(compat_file);

            let mut summary = ProcessingSummary::default();
            let mut batches = 0usize;

            loop {
                let batch = reader.read_batch(self.config.batch_size).await?;
                if batch.is_empty() {
                    break;
                }

                batches += 1;
                debug!(batch = batches, size = batch.len(), "processing batch");

                // Wait for the whole batch before reading the next one so an
                // account's operations never overtake each other.
                for result in processor.process_batch(batch).await {
                    summary.record(&result.record, &result.result);
                }
            }

            summary.skipped = reader.skipped();

            info!(
                strategy = "async",
                batches,
                applied = summary.applied,
                rejected = summary.rejected,
                skipped = summary.skipped,
                "processing complete"
            );
            Ok(summary)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{owner_id_for, AccountType, Money, OpenAccount};
    use rstest::rstest;
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

    fn engine_with(accounts: &[(&str, i64)]) -> TransactionEngine<InMemoryLedgerStore> {
        let engine = TransactionEngine::new(Arc::new(InMemoryLedgerStore::new()));
        for (number, minor) in accounts {
            engine
                .open_account(OpenAccount {
                    owner: owner_id_for("mathew@example.com"),
                    account_number: number.to_string(),
                    account_type: AccountType::Checking,
                    currency: "KES".to_string(),
                    opening_balance: Money::from_minor(*minor),
                })
                .unwrap();
        }
        engine
    }

    fn balance(engine: &TransactionEngine<InMemoryLedgerStore>, number: &str) -> Money {
        engine.directory().resolve_by_number(number).unwrap().balance
    }

    #[rstest]
    #[case::zero_batch_size(0, 4, 1000, 4)]
    #[case::zero_concurrency(50, 0, 50, num_cpus::get())]
    #[case::valid(50, 4, 50, 4)]
    fn test_batch_config_new(
        #[case] batch_size: usize,
        #[case] max_concurrent: usize,
        #[case] expected_batch_size: usize,
        #[case] expected_concurrent: usize,
    ) {
        let config = BatchConfig::new(batch_size, max_concurrent);

        assert_eq!(config.batch_size, expected_batch_size);
        assert_eq!(config.max_concurrent_batches, expected_concurrent);
    }

    #[test]
    fn test_async_strategy_handles_missing_file() {
        let strategy = AsyncProcessingStrategy::new(BatchConfig::default());

        let err = strategy
            .process(&engine_with(&[]), Path::new("nonexistent.csv"))
            .unwrap_err();

        assert!(matches!(err, LedgerError::FileNotFound { .. }));
    }

    #[test]
    fn test_async_strategy_maintains_ordering_across_batches() {
        let file = create_temp_csv(
            "op,account,counterparty,amount\n\
             deposit,ACC001,,100.00\n\
             deposit,ACC002,,50.00\n\
             withdrawal,ACC001,,30.00\n\
             transfer,ACC002,ACC001,25.00\n\
             withdrawal,ACC001,,95.00\n",
        );
        let engine = engine_with(&[("ACC001", 0), ("ACC002", 0)]);

        // Small batches force the accounts' operations to span batches.
        let strategy = AsyncProcessingStrategy::new(BatchConfig::new(2, 2));
        let summary = strategy.process(&engine, file.path()).unwrap();

        assert_eq!(summary.applied, 5);
        assert_eq!(balance(&engine, "ACC001"), Money::ZERO);
        assert_eq!(balance(&engine, "ACC002"), Money::from_minor(2500));
    }

    #[test]
    fn test_async_strategy_counts_rejected_and_skipped_rows() {
        let file = create_temp_csv(
            "op,account,counterparty,amount\n\
             deposit,ACC001,,100.00\n\
             refund,ACC001,,1.00\n\
             withdrawal,ACC001,,500.00\n\
             transfer,ACC001,ACC001,1.00\n",
        );
        let engine = engine_with(&[("ACC001", 0)]);

        let summary = AsyncProcessingStrategy::new(BatchConfig::default())
            .process(&engine, file.path())
            .unwrap();

        assert_eq!(
            summary,
            ProcessingSummary {
                applied: 1,
                rejected: 2,
                skipped: 1
            }
        );
    }
}
