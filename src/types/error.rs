//! Error types for the ledger
//!
//! This module defines all error types that can occur while operating on the
//! ledger. Every variant is recoverable: the core never panics on bad input
//! and never leaves a balance changed without its transaction.
//!
//! # Error Categories
//!
//! - **Operation Errors**: invalid amounts, insufficient funds, unknown accounts, etc.
//! - **Store Errors**: the persistence layer could not complete an atomic unit
//! - **File I/O Errors**: file not found, permission denied, etc.
//! - **CSV Parsing Errors**: malformed CSV, invalid data types, etc.

use super::money::Money;
use thiserror::Error;

/// Main error type for the ledger
///
/// Each variant includes the context needed for the presentation layer to
/// render a human-readable message.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LedgerError {
    /// Amount is non-positive or not a valid two-decimal number
    #[error("Invalid amount '{amount}'")]
    InvalidAmount {
        /// The rejected amount as given
        amount: String,
    },

    /// Debit would drive the balance negative
    ///
    /// The operation is rejected and the account is left unchanged.
    #[error("Insufficient funds in account {account}: balance {balance}, requested {requested}")]
    InsufficientFunds {
        /// Account number
        account: String,
        /// Balance at the time of the check
        balance: Money,
        /// Requested debit
        requested: Money,
    },

    /// Account identifier does not resolve
    #[error("Account {account} not found")]
    AccountNotFound {
        /// The identifier that was looked up (number or id)
        account: String,
    },

    /// Transfer names the same account on both sides
    #[error("Cannot transfer from account {account} to itself")]
    SameAccount {
        /// Account number
        account: String,
    },

    /// Transfer between accounts held in different currencies
    #[error("Currency mismatch: cannot transfer {from_currency} to {to_currency}")]
    CurrencyMismatch {
        /// Currency of the source account
        from_currency: String,
        /// Currency of the destination account
        to_currency: String,
    },

    /// Account number already taken
    #[error("Account number {account} already exists")]
    DuplicateAccountNumber {
        /// The duplicated account number
        account: String,
    },

    /// Account type outside {savings, checking, credit}
    #[error("Invalid account type '{value}'")]
    InvalidAccountType {
        /// The rejected input
        value: String,
    },

    /// Operation name outside {deposit, withdrawal, transfer, fee}
    #[error("Invalid operation '{value}'")]
    InvalidOperation {
        /// The rejected input
        value: String,
    },

    /// Arithmetic overflow would occur
    #[error("Arithmetic overflow in {operation} for account {account}")]
    ArithmeticOverflow {
        /// Operation that would overflow
        operation: String,
        /// Account number
        account: String,
    },

    /// Persistence-layer failure
    ///
    /// The atomic unit did not complete; no partial write is visible.
    #[error("Ledger store unavailable: {message}")]
    StoreUnavailable {
        /// Description of the failure
        message: String,
    },

    /// File not found at the specified path
    #[error("File not found: {path}")]
    FileNotFound {
        /// The path that was not found
        path: String,
    },

    /// I/O error occurred while reading or writing files
    #[error("I/O error: {message}")]
    IoError {
        /// Description of the I/O error
        message: String,
    },

    /// CSV parsing error occurred
    #[error("CSV parse error{}: {message}", line.map(|l| format!(" at line {}", l)).unwrap_or_default())]
    ParseError {
        /// Line number where the error occurred (if available)
        line: Option<u64>,
        /// Description of the parsing error
        message: String,
    },
}

impl From<std::io::Error> for LedgerError {
    fn from(error: std::io::Error) -> Self {
        LedgerError::IoError {
            message: error.to_string(),
        }
    }
}

impl From<csv::Error> for LedgerError {
    fn from(error: csv::Error) -> Self {
        if error.is_io_error() {
            return LedgerError::IoError {
                message: error.to_string(),
            };
        }

        LedgerError::ParseError {
            line: error.position().map(|pos| pos.line()),
            message: error.to_string(),
        }
    }
}

impl From<csv_async::Error> for LedgerError {
    fn from(error: csv_async::Error) -> Self {
        if matches!(error.kind(), csv_async::ErrorKind::Io(_)) {
            return LedgerError::IoError {
                message: error.to_string(),
            };
        }

        LedgerError::ParseError {
            line: error.position().map(|pos| pos.line()),
            message: error.to_string(),
        }
    }
}

// Helper functions for creating common errors

impl LedgerError {
    /// Create an InvalidAmount error
    pub fn invalid_amount(amount: impl ToString) -> Self {
        LedgerError::InvalidAmount {
            amount: amount.to_string(),
        }
    }

    /// Create an InsufficientFunds error
    pub fn insufficient_funds(account: &str, balance: Money, requested: Money) -> Self {
        LedgerError::InsufficientFunds {
            account: account.to_string(),
            balance,
            requested,
        }
    }

    /// Create an AccountNotFound error
    pub fn account_not_found(account: impl ToString) -> Self {
        LedgerError::AccountNotFound {
            account: account.to_string(),
        }
    }

    /// Create a SameAccount error
    pub fn same_account(account: &str) -> Self {
        LedgerError::SameAccount {
            account: account.to_string(),
        }
    }

    /// Create a CurrencyMismatch error
    pub fn currency_mismatch(from_currency: &str, to_currency: &str) -> Self {
        LedgerError::CurrencyMismatch {
            from_currency: from_currency.to_string(),
            to_currency: to_currency.to_string(),
        }
    }

    /// Create a DuplicateAccountNumber error
    pub fn duplicate_account_number(account: &str) -> Self {
        LedgerError::DuplicateAccountNumber {
            account: account.to_string(),
        }
    }

    /// Create an InvalidAccountType error
    pub fn invalid_account_type(value: &str) -> Self {
        LedgerError::InvalidAccountType {
            value: value.to_string(),
        }
    }

    /// Create an InvalidOperation error
    pub fn invalid_operation(value: &str) -> Self {
        LedgerError::InvalidOperation {
            value: value.to_string(),
        }
    }

    /// Create an ArithmeticOverflow error
    pub fn arithmetic_overflow(operation: &str, account: &str) -> Self {
        LedgerError::ArithmeticOverflow {
            operation: operation.to_string(),
            account: account.to_string(),
        }
    }

    /// Create a StoreUnavailable error
    pub fn store_unavailable(message: impl ToString) -> Self {
        LedgerError::StoreUnavailable {
            message: message.to_string(),
        }
    }

    /// Map a failure to open `path`, keeping "not found" distinct
    pub fn open_failed(path: &std::path::Path, error: std::io::Error) -> Self {
        match error.kind() {
            std::io::ErrorKind::NotFound => LedgerError::FileNotFound {
                path: path.display().to_string(),
            },
            _ => LedgerError::IoError {
                message: format!("Failed to open file '{}': {}", path.display(), error),
            },
        }
    }

    /// Attach a line number to an error raised while reading a CSV row
    ///
    /// Parse errors keep their variant and I/O errors pass through untouched;
    /// any other rejection of the row is reported as a parse error at that line.
    pub fn at_line(self, line: Option<u64>) -> Self {
        match self {
            LedgerError::ParseError { line: None, message } => LedgerError::ParseError { line, message },
            LedgerError::ParseError { .. } | LedgerError::IoError { .. } => self,
            other => LedgerError::ParseError {
                line,
                message: other.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::invalid_amount(
        LedgerError::InvalidAmount { amount: "-5".to_string() },
        "Invalid amount '-5'"
    )]
    #[case::insufficient_funds(
        LedgerError::InsufficientFunds {
            account: "ACC001".to_string(),
            balance: Money::from_minor(5000),
            requested: Money::from_minor(10000),
        },
        "Insufficient funds in account ACC001: balance 50.00, requested 100.00"
    )]
    #[case::account_not_found(
        LedgerError::AccountNotFound { account: "NOPE".to_string() },
        "Account NOPE not found"
    )]
    #[case::same_account(
        LedgerError::SameAccount { account: "ACC001".to_string() },
        "Cannot transfer from account ACC001 to itself"
    )]
    #[case::currency_mismatch(
        LedgerError::CurrencyMismatch { from_currency: "KES".to_string(), to_currency: "USD".to_string() },
        "Currency mismatch: cannot transfer KES to USD"
    )]
    #[case::duplicate_account_number(
        LedgerError::DuplicateAccountNumber { account: "ACC001".to_string() },
        "Account number ACC001 already exists"
    )]
    #[case::store_unavailable(
        LedgerError::StoreUnavailable { message: "lock poisoned".to_string() },
        "Ledger store unavailable: lock poisoned"
    )]
    #[case::parse_error_with_line(
        LedgerError::ParseError { line: Some(42), message: "Invalid field".to_string() },
        "CSV parse error at line 42: Invalid field"
    )]
    #[case::parse_error_without_line(
        LedgerError::ParseError { line: None, message: "Invalid field".to_string() },
        "CSV parse error: Invalid field"
    )]
    #[case::file_not_found(
        LedgerError::FileNotFound { path: "ops.csv".to_string() },
        "File not found: ops.csv"
    )]
    fn test_error_display(#[case] error: LedgerError, #[case] expected: &str) {
        assert_eq!(error.to_string(), expected);
    }

    #[rstest]
    #[case::insufficient_funds(
        LedgerError::insufficient_funds("ACC001", Money::from_minor(5000), Money::from_minor(10000)),
        LedgerError::InsufficientFunds {
            account: "ACC001".to_string(),
            balance: Money::from_minor(5000),
            requested: Money::from_minor(10000),
        }
    )]
    #[case::account_not_found(
        LedgerError::account_not_found("SAV001"),
        LedgerError::AccountNotFound { account: "SAV001".to_string() }
    )]
    #[case::same_account(
        LedgerError::same_account("ACC001"),
        LedgerError::SameAccount { account: "ACC001".to_string() }
    )]
    #[case::arithmetic_overflow(
        LedgerError::arithmetic_overflow("deposit", "ACC001"),
        LedgerError::ArithmeticOverflow { operation: "deposit".to_string(), account: "ACC001".to_string() }
    )]
    fn test_helper_functions(#[case] result: LedgerError, #[case] expected: LedgerError) {
        assert_eq!(result, expected);
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error =
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "Permission denied");
        let error: LedgerError = io_error.into();
        assert!(matches!(error, LedgerError::IoError { .. }));
        assert_eq!(error.to_string(), "I/O error: Permission denied");
    }

    #[test]
    fn test_open_failed_distinguishes_missing_files() {
        let path = std::path::Path::new("missing.csv");

        let missing = LedgerError::open_failed(
            path,
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        let denied = LedgerError::open_failed(
            path,
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );

        assert_eq!(missing, LedgerError::FileNotFound { path: "missing.csv".to_string() });
        assert!(matches!(denied, LedgerError::IoError { .. }));
    }

    #[rstest]
    #[case::fills_missing_line(
        LedgerError::ParseError { line: None, message: "bad".to_string() },
        LedgerError::ParseError { line: Some(3), message: "bad".to_string() }
    )]
    #[case::keeps_existing_line(
        LedgerError::ParseError { line: Some(7), message: "bad".to_string() },
        LedgerError::ParseError { line: Some(7), message: "bad".to_string() }
    )]
    #[case::wraps_row_rejection(
        LedgerError::invalid_operation("refund"),
        LedgerError::ParseError { line: Some(3), message: "Invalid operation 'refund'".to_string() }
    )]
    #[case::keeps_io_error(
        LedgerError::IoError { message: "disk gone".to_string() },
        LedgerError::IoError { message: "disk gone".to_string() }
    )]
    fn test_at_line(#[case] error: LedgerError, #[case] expected: LedgerError) {
        assert_eq!(error.at_line(Some(3)), expected);
    }
}
