//! Ledger Core CLI
//!
//! Seeds a ledger from an account file, applies an operation file and prints
//! the result as CSV on stdout.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- --accounts accounts.csv operations.csv > balances.csv
//! cargo run -- --accounts accounts.csv --strategy sync operations.csv
//! cargo run -- --accounts accounts.csv --owner mathew@example.com operations.csv
//! cargo run -- --accounts accounts.csv --history ACC001 operations.csv
//! ```
//!
//! # Exit Codes
//!
//! - 0: Success
//! - 1: Error (file not found, unreadable input, unknown history account, etc.)

use ledger_core::cli::{self, OutputSelection, StrategyType};
use ledger_core::core::{InMemoryLedgerStore, TransactionEngine};
use ledger_core::io::{write_accounts_csv, write_history_csv};
use ledger_core::types::{owner_id_for, LedgerError};
use ledger_core::{strategy, telemetry};
use std::process;
use std::sync::Arc;
use tracing::error;

fn run(args: &cli::CliArgs) -> Result<(), LedgerError> {
    let engine = TransactionEngine::new(Arc::new(InMemoryLedgerStore::new()));

    if let Some(accounts_file) = &args.accounts_file {
        strategy::seed_ledger(&engine, accounts_file, &args.currency)?;
    }

    let config = match args.strategy {
        StrategyType::Async => Some(args.to_batch_config()),
        StrategyType::Sync => None,
    };
    let strategy = strategy::create_strategy(args.strategy, config);
    strategy.process(&engine, &args.operations_file)?;

    let mut output = std::io::stdout();
    match args.output_selection() {
        OutputSelection::AllAccounts => {
            let accounts = engine.directory().list_all()?;
            write_accounts_csv(&accounts, &mut output)
        }
        OutputSelection::OwnerAccounts(owner) => {
            let accounts = engine
                .directory()
                .list_accounts_for_owner(owner_id_for(&owner))?;
            write_accounts_csv(&accounts, &mut output)
        }
        OutputSelection::History(number) => {
            let history = engine.history().get_history_by_number(&number)?;
            write_history_csv(&history, &mut output)
        }
    }
}

fn main() {
    let args = cli::parse_args();
    telemetry::init(args.verbose);

    if let Err(e) = run(&args) {
        error!(error = %e, "ledger run failed");
        process::exit(1);
    }
}
