//! CSV format handling for ledger input and output
//!
//! This module centralizes all CSV format concerns, providing:
//! - `OperationCsvRecord` and `AccountSeedCsvRecord` for deserialization
//! - Conversion from CSV records to domain types
//! - Account snapshot and history serialization
//!
//! All functions are pure (no file I/O) for easy testing.

use crate::types::{
    owner_id_for, Account, AccountType, LedgerError, Money, OpenAccount, OperationKind,
    OperationRecord, Transaction,
};
use chrono::SecondsFormat;
use csv::Writer;
use serde::Deserialize;
use std::io::Write;

/// Operation file row: `op,account,counterparty,amount`
///
/// `counterparty` is only read for transfers. `amount` is kept as text so a
/// malformed value can be reported verbatim.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct OperationCsvRecord {
    pub op: String,
    pub account: String,
    pub counterparty: Option<String>,
    pub amount: Option<String>,
}

/// Account seed file row: `owner,account_number,type,currency,balance`
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct AccountSeedCsvRecord {
    pub owner: String,
    pub account_number: String,
    #[serde(rename = "type")]
    pub account_type: Option<String>,
    pub currency: Option<String>,
    pub balance: Option<String>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_operation_kind(op: &str) -> Result<OperationKind, LedgerError> {
    match op.trim().to_lowercase().as_str() {
        "deposit" => Ok(OperationKind::Deposit),
        "withdrawal" | "withdraw" => Ok(OperationKind::Withdrawal),
        "transfer" => Ok(OperationKind::Transfer),
        "fee" => Ok(OperationKind::Fee),
        _ => Err(LedgerError::invalid_operation(op)),
    }
}

/// Convert an `OperationCsvRecord` to an `OperationRecord`
///
/// Validates the shape of the row only. Whether the amount is positive and
/// the accounts exist is decided by the engine, so those failures are
/// reported as rejected operations rather than malformed rows.
///
/// # Errors
///
/// - `InvalidOperation` for an unknown `op`
/// - `InvalidAmount` for a missing or non-numeric amount, or one with more
///   than two fractional digits
/// - `ParseError` for a blank account column
pub fn convert_operation_record(record: OperationCsvRecord) -> Result<OperationRecord, LedgerError> {
    let kind = parse_operation_kind(&record.op)?;

    let account = record.account.trim().to_string();
    if account.is_empty() {
        return Err(LedgerError::ParseError {
            line: None,
            message: format!("{} operation is missing an account", kind),
        });
    }

    let amount: Money = match non_blank(record.amount) {
        Some(text) => text.parse()?,
        None => return Err(LedgerError::invalid_amount("")),
    };

    let counterparty = match kind {
        OperationKind::Transfer => non_blank(record.counterparty),
        _ => None,
    };

    Ok(OperationRecord {
        kind,
        account,
        counterparty,
        amount,
    })
}

/// Convert an `AccountSeedCsvRecord` into an account opening request
///
/// A blank type opens a CHECKING account, a blank currency uses
/// `default_currency` and a blank balance opens at zero.
pub fn convert_account_seed(
    record: AccountSeedCsvRecord,
    default_currency: &str,
) -> Result<OpenAccount, LedgerError> {
    let owner = record.owner.trim();
    let account_number = record.account_number.trim();
    if owner.is_empty() || account_number.is_empty() {
        return Err(LedgerError::ParseError {
            line: None,
            message: "seed row requires both owner and account_number".to_string(),
        });
    }

    let account_type = AccountType::parse_or_default(record.account_type.as_deref())?;
    let currency = non_blank(record.currency)
        .unwrap_or_else(|| default_currency.to_string())
        .to_uppercase();
    let opening_balance = match non_blank(record.balance) {
        Some(text) => text.parse()?,
        None => Money::ZERO,
    };

    Ok(OpenAccount {
        owner: owner_id_for(owner),
        account_number: account_number.to_string(),
        account_type,
        currency,
        opening_balance,
    })
}

/// Write account snapshots to CSV format
///
/// Columns: account, type, currency, balance. Accounts are sorted by account
/// number for deterministic output.
pub fn write_accounts_csv(accounts: &[Account], output: &mut dyn Write) -> Result<(), LedgerError> {
    let mut writer = Writer::from_writer(output);

    writer.write_record(["account", "type", "currency", "balance"])?;

    let mut sorted: Vec<&Account> = accounts.iter().collect();
    sorted.sort_by(|a, b| a.account_number.cmp(&b.account_number));

    for account in sorted {
        let balance = account.balance.to_string();
        writer.write_record([
            account.account_number.as_str(),
            account.account_type.as_str(),
            account.currency.as_str(),
            balance.as_str(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

/// Write an account's history to CSV format
///
/// Columns: created_at, type, amount, reference. Rows are written in the
/// order given, which for `HistoryQuery` results is newest first.
pub fn write_history_csv(
    transactions: &[Transaction],
    output: &mut dyn Write,
) -> Result<(), LedgerError> {
    let mut writer = Writer::from_writer(output);

    writer.write_record(["created_at", "type", "amount", "reference"])?;

    for tx in transactions {
        let created_at = tx.created_at.to_rfc3339_opts(SecondsFormat::Micros, true);
        let amount = tx.amount.to_string();
        writer.write_record([
            created_at.as_str(),
            tx.tx_type.as_str(),
            amount.as_str(),
            tx.reference.as_str(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TransactionType;
    use chrono::{TimeZone, Utc};
    use rstest::rstest;
    use uuid::Uuid;

    fn op_row(op: &str, account: &str, counterparty: Option<&str>, amount: Option<&str>) -> OperationCsvRecord {
        OperationCsvRecord {
            op: op.to_string(),
            account: account.to_string(),
            counterparty: counterparty.map(str::to_string),
            amount: amount.map(str::to_string),
        }
    }

    fn seed_row(account_type: Option<&str>, currency: Option<&str>, balance: Option<&str>) -> AccountSeedCsvRecord {
        AccountSeedCsvRecord {
            owner: "mathew@example.com".to_string(),
            account_number: "ACC001".to_string(),
            account_type: account_type.map(str::to_string),
            currency: currency.map(str::to_string),
            balance: balance.map(str::to_string),
        }
    }

    fn account(number: &str, account_type: AccountType, minor: i64) -> Account {
        Account {
            id: Uuid::new_v4(),
            owner: owner_id_for("owner@example.com"),
            account_number: number.to_string(),
            account_type,
            balance: Money::from_minor(minor),
            currency: "KES".to_string(),
            created_at: Utc::now(),
        }
    }

    #[rstest]
    #[case("deposit", OperationKind::Deposit)]
    #[case("withdrawal", OperationKind::Withdrawal)]
    #[case("withdraw", OperationKind::Withdrawal)]
    #[case("FEE", OperationKind::Fee)]
    #[case("Transfer", OperationKind::Transfer)]
    fn test_convert_operation_kinds(#[case] op: &str, #[case] expected: OperationKind) {
        let record = convert_operation_record(op_row(op, "ACC001", Some("SAV001"), Some("10.00"))).unwrap();

        assert_eq!(record.kind, expected);
        assert_eq!(record.account, "ACC001");
        assert_eq!(record.amount, Money::from_minor(1000));
    }

    #[test]
    fn test_counterparty_only_kept_for_transfers() {
        let transfer = convert_operation_record(op_row("transfer", "ACC001", Some(" SAV001 "), Some("1"))).unwrap();
        let deposit = convert_operation_record(op_row("deposit", "ACC001", Some("SAV001"), Some("1"))).unwrap();

        assert_eq!(transfer.counterparty.as_deref(), Some("SAV001"));
        assert_eq!(deposit.counterparty, None);
    }

    #[test]
    fn test_non_positive_amounts_are_left_to_the_engine() {
        let record = convert_operation_record(op_row("deposit", "ACC001", None, Some("-5.00"))).unwrap();
        assert_eq!(record.amount, Money::from_minor(-500));
    }

    #[rstest]
    #[case::invalid_op("refund", "ACC001", Some("1.00"), "Invalid operation")]
    #[case::missing_amount("deposit", "ACC001", None, "Invalid amount")]
    #[case::blank_amount("deposit", "ACC001", Some("  "), "Invalid amount")]
    #[case::not_a_number("deposit", "ACC001", Some("ten"), "Invalid amount 'ten'")]
    #[case::three_decimals("withdrawal", "ACC001", Some("1.005"), "Invalid amount")]
    #[case::missing_account("fee", " ", Some("1.00"), "missing an account")]
    fn test_convert_operation_errors(
        #[case] op: &str,
        #[case] account: &str,
        #[case] amount: Option<&str>,
        #[case] expected_error: &str,
    ) {
        let err = convert_operation_record(op_row(op, account, None, amount)).unwrap_err();
        assert!(err.to_string().contains(expected_error), "got: {}", err);
    }

    #[rstest]
    #[case::all_blank(None, None, None, AccountType::Checking, "KES", 0)]
    #[case::explicit(Some("savings"), Some("usd"), Some("150000.00"), AccountType::Savings, "USD", 15000000)]
    #[case::blank_strings(Some(" "), Some(""), Some(""), AccountType::Checking, "KES", 0)]
    fn test_convert_account_seed(
        #[case] account_type: Option<&str>,
        #[case] currency: Option<&str>,
        #[case] balance: Option<&str>,
        #[case] expected_type: AccountType,
        #[case] expected_currency: &str,
        #[case] expected_minor: i64,
    ) {
        let request = convert_account_seed(seed_row(account_type, currency, balance), "KES").unwrap();

        assert_eq!(request.owner, owner_id_for("mathew@example.com"));
        assert_eq!(request.account_number, "ACC001");
        assert_eq!(request.account_type, expected_type);
        assert_eq!(request.currency, expected_currency);
        assert_eq!(request.opening_balance, Money::from_minor(expected_minor));
    }

    #[test]
    fn test_convert_account_seed_rejects_unknown_type() {
        let err = convert_account_seed(seed_row(Some("brokerage"), None, None), "KES").unwrap_err();
        assert_eq!(err, LedgerError::invalid_account_type("brokerage"));
    }

    #[test]
    fn test_convert_account_seed_requires_owner() {
        let mut row = seed_row(None, None, None);
        row.owner = String::new();

        assert!(matches!(
            convert_account_seed(row, "KES"),
            Err(LedgerError::ParseError { .. })
        ));
    }

    #[rstest]
    #[case::empty(vec![], "account,type,currency,balance\n")]
    #[case::single(
        vec![account("ACC001", AccountType::Checking, 4500000)],
        "account,type,currency,balance\nACC001,checking,KES,45000.00\n"
    )]
    #[case::sorted_by_number(
        vec![
            account("SAV001", AccountType::Savings, 15800000),
            account("ACC001", AccountType::Checking, 4500000),
            account("CRD001", AccountType::Credit, 0),
        ],
        "account,type,currency,balance\nACC001,checking,KES,45000.00\nCRD001,credit,KES,0.00\nSAV001,savings,KES,158000.00\n"
    )]
    fn test_write_accounts_csv(#[case] accounts: Vec<Account>, #[case] expected_output: &str) {
        let mut output = Vec::new();
        write_accounts_csv(&accounts, &mut output).unwrap();

        assert_eq!(String::from_utf8(output).unwrap(), expected_output);
    }

    #[test]
    fn test_write_history_csv() {
        let created_at = Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap();
        let transactions = vec![
            Transaction {
                id: Uuid::new_v4(),
                account_id: Uuid::new_v4(),
                amount: Money::from_minor(800000),
                tx_type: TransactionType::Transfer,
                reference: "transfer to SAV001".to_string(),
                created_at,
                sequence: 2,
            },
            Transaction {
                id: Uuid::new_v4(),
                account_id: Uuid::new_v4(),
                amount: Money::from_minor(500000),
                tx_type: TransactionType::Deposit,
                reference: "deposit".to_string(),
                created_at,
                sequence: 1,
            },
        ];

        let mut output = Vec::new();
        write_history_csv(&transactions, &mut output).unwrap();

        assert_eq!(
            String::from_utf8(output).unwrap(),
            "created_at,type,amount,reference\n\
             2024-03-01T09:30:00.000000Z,transfer,8000.00,transfer to SAV001\n\
             2024-03-01T09:30:00.000000Z,deposit,5000.00,deposit\n"
        );
    }
}
