//! Asynchronous CSV reader with batch interface
//!
//! Streams operation records from a CSV source in fixed-size batches for the
//! async processing strategy.
//!
//! # Architecture
//!
//! ```text
//! CSV Reader → AsyncReader → Batches of OperationRecords
//!                  ↓
//!           csv_format module
//!           (OperationCsvRecord, convert_operation_record)
//! ```

use crate::io::csv_format::{convert_operation_record, OperationCsvRecord};
use crate::types::{LedgerError, OperationRecord};
use csv_async::{AsyncReaderBuilder, StringRecord};
use futures::io::AsyncRead;
use tracing::warn;

/// Asynchronous operation file reader
///
/// Malformed rows are logged and skipped; `skipped()` reports how many.
pub struct AsyncReader<R: AsyncRead + Unpin> {
    csv_reader: csv_async::AsyncReader<R>,
    headers: Option<StringRecord>,
    record: StringRecord,
    skipped: usize,
}

impl<R: AsyncRead + Unpin + Send + 'static> AsyncReader<R> {
    pub fn new(reader: R) -> Self {
        let csv_reader = AsyncReaderBuilder::new()
            .flexible(true)
            .trim(csv_async::Trim::All)
            .create_reader(reader);

        Self {
            csv_reader,
            headers: None,
            record: StringRecord::new(),
            skipped: 0,
        }
    }

    /// Number of rows skipped so far because they could not be parsed
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// Read up to `batch_size` operation records
    ///
    /// Invalid rows are logged with their line number and skipped. Returns an
    /// empty vector once the end of the input is reached.
    ///
    /// # Errors
    ///
    /// An unreadable header or a failure of the underlying reader is a
    /// file-level error and is returned instead of a batch.
    pub async fn read_batch(&mut self, batch_size: usize) -> Result<Vec<OperationRecord>, LedgerError> {
        let mut batch = Vec::with_capacity(batch_size);

        let headers = match self.headers.take() {
            Some(headers) => headers,
            None => self.csv_reader.headers().await?.clone(),
        };

        while batch.len() < batch_size {
            match self.csv_reader.read_record(&mut self.record).await {
                Ok(false) => break,
                Ok(true) => {
                    let line = self.record.position().map(|pos| pos.line());
                    let converted = self
                        .record
                        .deserialize::<OperationCsvRecord>(Some(&headers))
                        .map_err(LedgerError::from)
                        .and_then(convert_operation_record);

                    match converted {
                        Ok(record) => batch.push(record),
                        Err(error) => {
                            self.skipped += 1;
                            warn!(line = ?line, %error, "skipping malformed operation row");
                        }
                    }
                }
                Err(e) => match LedgerError::from(e) {
                    error @ LedgerError::IoError { .. } => return Err(error),
                    error => {
                        self.skipped += 1;
                        warn!(%error, "CSV read error");
                    }
                },
            }
        }

        self.headers = Some(headers);
        Ok(batch)
    }
}
