//! Synchronous processing strategy
//!
//! Single-threaded implementation of `ProcessingStrategy`. It streams records
//! from a `SyncReader` and applies them to the engine one at a time, in file
//! order.
//!
//! Memory usage is constant in the size of the operation file; only the
//! ledger itself grows.

use crate::core::{InMemoryLedgerStore, TransactionEngine};
use crate::io::sync_reader::SyncReader;
use crate::strategy::{ProcessingStrategy, ProcessingSummary};
use crate::types::LedgerError;
use std::path::Path;
use tracing::{info, warn};

/// Synchronous processing strategy
///
/// # Examples
///
/// ```no_run
/// use ledger_core::core::{InMemoryLedgerStore, TransactionEngine};
/// use ledger_core::strategy::{ProcessingStrategy, SyncProcessingStrategy};
/// use std::path::Path;
/// use std::sync::Arc;
///
/// let engine = TransactionEngine::new(Arc::new(InMemoryLedgerStore::new()));
/// let summary = SyncProcessingStrategy
///     .process(&engine, Path::new("operations.csv"))
///     .expect("Processing failed");
/// println!("applied {} operations", summary.applied);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct SyncProcessingStrategy;

impl ProcessingStrategy for SyncProcessingStrategy {
    fn process(
        &self,
        engine: &TransactionEngine<InMemoryLedgerStore>,
        input_path: &Path,
    ) -> Result<ProcessingSummary, LedgerError> {
        let reader = SyncReader::new(input_path)?;
        let mut summary = ProcessingSummary::default();

        for row in reader {
            match row {
                Ok(record) => {
                    let result = engine.process(&record);
                    summary.record(&record, &result);
                }
                Err(e @ LedgerError::IoError { .. }) => return Err(e),
                Err(e) => {
                    summary.skipped += 1;
                    warn!(error = %e, "skipping malformed operation row");
                }
            }
        }

        info!(
            strategy = "sync",
            applied = summary.applied,
            rejected = summary.rejected,
            skipped = summary.skipped,
            "processing complete"
        );
        Ok(summary)
    }
}
