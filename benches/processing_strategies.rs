//! Benchmark suite for comparing processing strategies
//!
//! Compares the synchronous and asynchronous strategies on generated
//! operation files using the divan benchmarking framework.
//!
//! ```bash
//! cargo bench
//! ```
//!
//! Each generated file mixes deposits, withdrawals, fees and transfers over a
//! fixed set of accounts, so the async strategy has independent groups to run
//! in parallel.

use ledger_core::cli::StrategyType;
use ledger_core::core::{InMemoryLedgerStore, TransactionEngine};
use ledger_core::strategy::{create_strategy, BatchConfig};
use ledger_core::types::{owner_id_for, AccountType, Money, OpenAccount};
use std::io::Write;
use std::sync::Arc;
use tempfile::NamedTempFile;

const ACCOUNTS: u64 = 64;

fn main() {
    divan::main();
}

fn operations_file(rows: usize) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    writeln!(file, "op,account,counterparty,amount").expect("Failed to write header");

    for row in 0..rows as u64 {
        let account = row % ACCOUNTS;
        let op = match row % 4 {
            0 => "deposit",
            1 => "withdrawal",
            2 => "fee",
            _ => "transfer",
        };
        writeln!(
            file,
            "{},ACC{:04},ACC{:04},{}.{:02}",
            op,
            account,
            (account + 1) % ACCOUNTS,
            row % 500 + 1,
            row % 100
        )
        .expect("Failed to write row");
    }

    file.flush().expect("Failed to flush temp file");
    file
}

fn seeded_engine() -> TransactionEngine<InMemoryLedgerStore> {
    let engine = TransactionEngine::new(Arc::new(InMemoryLedgerStore::new()));
    for i in 0..ACCOUNTS {
        engine
            .open_account(OpenAccount {
                owner: owner_id_for("bench@example.com"),
                account_number: format!("ACC{:04}", i),
                account_type: AccountType::Checking,
                currency: "KES".to_string(),
                opening_balance: Money::from_minor(1_000_000),
            })
            .expect("Failed to open account");
    }
    engine
}

#[divan::bench(args = [1_000, 100_000])]
fn sync_strategy(bencher: divan::Bencher, rows: usize) {
    let input = operations_file(rows);
    let strategy = create_strategy(StrategyType::Sync, None);

    bencher
        .with_inputs(seeded_engine)
        .bench_values(|engine| strategy.process(&engine, input.path()).expect("Processing failed"));
}

#[divan::bench(args = [1_000, 100_000])]
fn async_strategy(bencher: divan::Bencher, rows: usize) {
    let input = operations_file(rows);
    let strategy = create_strategy(StrategyType::Async, Some(BatchConfig::default()));

    bencher
        .with_inputs(seeded_engine)
        .bench_values(|engine| strategy.process(&engine, input.path()).expect("Processing failed"));
}
