//! Batch processing with account-based partitioning
//!
//! This module provides the `BatchProcessor` struct, which runs a batch of
//! operation records concurrently while keeping every account's operations in
//! input order.
//!
//! # Design
//!
//! A batch is split into groups such that two operations touching a common
//! account always land in the same group. A transfer touches two accounts, so
//! it joins the groups of both into one. Each group is processed sequentially
//! in input order, and different groups run concurrently as tokio tasks. The
//! final ledger state is therefore the same as processing the batch one record
//! at a time.
//!
//! # Architecture
//!
//! ```text
//! BatchProcessor
//!     └── TransactionEngine<S>  (shared, Arc-backed store)
//! ```

use std::collections::HashMap;

use crate::core::engine::TransactionEngine;
use crate::core::traits::LedgerStore;
use crate::types::{LedgerError, OperationOutcome, OperationRecord};
use tracing::error;

/// Result of processing a single operation
#[derive(Debug, Clone)]
pub struct ProcessingResult {
    /// Position of the record within its batch
    pub position: usize,

    /// The operation record that was processed
    pub record: OperationRecord,

    /// The result of processing (success or error)
    pub result: Result<OperationOutcome, LedgerError>,
}

/// Batch processor with account-based partitioning
#[derive(Debug)]
pub struct BatchProcessor<S: LedgerStore> {
    engine: TransactionEngine<S>,
}

impl<S: LedgerStore> Clone for BatchProcessor<S> {
    fn clone(&self) -> Self {
        Self {
            engine: self.engine.clone(),
        }
    }
}

/// Minimal union-find over record positions
struct Groups {
    parent: Vec<usize>,
}

impl Groups {
    fn new(size: usize) -> Self {
        Self {
            parent: (0..size).collect(),
        }
    }

    fn find(&mut self, mut node: usize) -> usize {
        while self.parent[node] != node {
            self.parent[node] = self.parent[self.parent[node]];
            node = self.parent[node];
        }
        node
    }

    fn union(&mut self, a: usize, b: usize) {
        let root_a = self.find(a);
        let root_b = self.find(b);
        if root_a != root_b {
            self.parent[root_a.max(root_b)] = root_a.min(root_b);
        }
    }
}

impl<S: LedgerStore + 'static> BatchProcessor<S> {
    /// Create a new BatchProcessor over a shared engine
    pub fn new(engine: TransactionEngine<S>) -> Self {
        Self { engine }
    }

    /// Partition a batch into groups with disjoint account sets
    ///
    /// # Guarantees
    ///
    /// - Each record appears in exactly one group
    /// - Records sharing an account number are in the same group
    /// - Records keep their original relative order within a group
    /// - Groups are returned ordered by their first record
    pub fn partition_by_accounts(
        &self,
        batch: Vec<OperationRecord>,
    ) -> Vec<Vec<(usize, OperationRecord)>> {
        let mut groups = Groups::new(batch.len());
        let mut last_seen: HashMap<&str, usize> = HashMap::new();

        for (position, record) in batch.iter().enumerate() {
            for account in record.touched_accounts() {
                if let Some(previous) = last_seen.insert(account, position) {
                    groups.union(previous, position);
                }
            }
        }
        drop(last_seen);

        let mut partitions: Vec<Vec<(usize, OperationRecord)>> = Vec::new();
        let mut slot_of_root: HashMap<usize, usize> = HashMap::new();

        for (position, record) in batch.into_iter().enumerate() {
            let root = groups.find(position);
            let slot = *slot_of_root.entry(root).or_insert_with(|| {
                partitions.push(Vec::new());
                partitions.len() - 1
            });
            partitions[slot].push((position, record));
        }

        partitions
    }

    /// Process one group sequentially, in order
    ///
    /// All records are processed even if some fail; errors are captured in
    /// the results.
    pub async fn process_group(
        &self,
        records: Vec<(usize, OperationRecord)>,
    ) -> Vec<ProcessingResult> {
        let mut results = Vec::with_capacity(records.len());

        for (position, record) in records {
            let result = self.engine.process(&record);
            results.push(ProcessingResult {
                position,
                record,
                result,
            });
        }

        results
    }

    /// Process a batch with account-based partitioning
    ///
    /// 1. Partition the batch into groups with disjoint account sets
    /// 2. Spawn a tokio task per group
    /// 3. Wait for all tasks and collect their results
    ///
    /// Results are returned in input order.
    pub async fn process_batch(&self, batch: Vec<OperationRecord>) -> Vec<ProcessingResult> {
        let partitions = self.partition_by_accounts(batch);

        let mut tasks = Vec::with_capacity(partitions.len());
        for records in partitions {
            let processor = self.clone();
            tasks.push(tokio::spawn(async move {
                processor.process_group(records).await
            }));
        }

        let mut results = Vec::new();
        for task in tasks {
            match task.await {
                Ok(group_results) => results.extend(group_results),
                Err(e) => error!(error = ?e, "batch task panicked"),
            }
        }

        results.sort_by_key(|result| result.position);
        results
    }
}
