use crate::strategy::BatchConfig;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Apply deposits, withdrawals, fees and transfers to a ledger
#[derive(Parser, Debug)]
#[command(name = "ledger-core")]
#[command(about = "Apply ledger operations from CSV and print the resulting accounts", long_about = None)]
pub struct CliArgs {
    /// Operation CSV file (op,account,counterparty,amount)
    #[arg(value_name = "OPERATIONS", help = "Path to the operation CSV file")]
    pub operations_file: PathBuf,

    /// Account seed CSV file (owner,account_number,type,currency,balance)
    #[arg(
        long = "accounts",
        value_name = "FILE",
        help = "Path to the account seed CSV file"
    )]
    pub accounts_file: Option<PathBuf>,

    /// Processing strategy to use for the operation file
    #[arg(
        long = "strategy",
        value_name = "STRATEGY",
        default_value = "async",
        help = "Processing strategy: 'sync' for sequential or 'async' for partitioned batches"
    )]
    pub strategy: StrategyType,

    /// Number of operations per batch (async mode only)
    #[arg(
        long = "batch-size",
        value_name = "SIZE",
        help = "Number of operations per batch (default: 1000)"
    )]
    pub batch_size: Option<usize>,

    /// Number of worker threads (async mode only)
    #[arg(
        long = "max-concurrent",
        value_name = "COUNT",
        help = "Number of worker threads processing account groups (default: CPU cores)"
    )]
    pub max_concurrent_batches: Option<usize>,

    /// Currency for seed rows that leave it blank
    #[arg(
        long = "currency",
        value_name = "CODE",
        env = "LEDGER_CURRENCY",
        default_value = "KES"
    )]
    pub currency: String,

    /// Only list accounts belonging to this owner key (e.g. an email address)
    #[arg(long = "owner", value_name = "KEY", conflicts_with = "history")]
    pub owner: Option<String>,

    /// Print this account's transaction history instead of the account list
    #[arg(long = "history", value_name = "ACCOUNT_NUMBER")]
    pub history: Option<String>,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

/// Available processing strategies
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum StrategyType {
    Sync,
    Async,
}

/// What to print once processing finishes
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OutputSelection {
    /// Every account, sorted by number
    AllAccounts,
    /// Accounts of one owner
    OwnerAccounts(String),
    /// History of one account
    History(String),
}

impl CliArgs {
    /// Create a BatchConfig from CLI arguments
    ///
    /// Missing values use defaults; zero values fall back to defaults with a
    /// warning.
    pub fn to_batch_config(&self) -> BatchConfig {
        if self.batch_size.is_some() || self.max_concurrent_batches.is_some() {
            let default = BatchConfig::default();
            BatchConfig::new(
                self.batch_size.unwrap_or(default.batch_size),
                self.max_concurrent_batches
                    .unwrap_or(default.max_concurrent_batches),
            )
        } else {
            BatchConfig::default()
        }
    }

    pub fn output_selection(&self) -> OutputSelection {
        match (&self.history, &self.owner) {
            (Some(number), _) => OutputSelection::History(number.clone()),
            (None, Some(owner)) => OutputSelection::OwnerAccounts(owner.clone()),
            (None, None) => OutputSelection::AllAccounts,
        }
    }
}
