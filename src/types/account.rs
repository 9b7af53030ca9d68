//! Account-related types for the ledger
//!
//! This module defines the Account structure, the closed set of account
//! types, and the requests used to open new accounts.

use super::error::LedgerError;
use super::money::Money;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Account identifier (opaque, immutable after creation)
pub type AccountId = Uuid;

/// Owner identifier, as handed out by the identity provider
pub type OwnerId = Uuid;

/// Namespace for deriving owner ids from external identity keys
const OWNER_NAMESPACE: Uuid = Uuid::NAMESPACE_URL;

/// Derive a stable owner id from an external identity key (e.g. an email address)
///
/// The same key always maps to the same id, so seed files and callers can name
/// owners without ever handling credential material.
pub fn owner_id_for(key: &str) -> OwnerId {
    Uuid::new_v5(&OWNER_NAMESPACE, key.trim().to_lowercase().as_bytes())
}

/// Kind of account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    Savings,
    Checking,
    Credit,
}

impl AccountType {
    /// Parse an account type at the input boundary
    ///
    /// A blank or absent value opens a CHECKING account. Any other value must
    /// name one of the three types; an unknown value is an error rather than a
    /// silent fallback.
    pub fn parse_or_default(input: Option<&str>) -> Result<Self, LedgerError> {
        match input.map(str::trim) {
            None | Some("") => Ok(AccountType::Checking),
            Some(value) => value.parse(),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AccountType::Savings => "savings",
            AccountType::Checking => "checking",
            AccountType::Credit => "credit",
        }
    }
}

impl FromStr for AccountType {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "savings" => Ok(AccountType::Savings),
            "checking" => Ok(AccountType::Checking),
            "credit" => Ok(AccountType::Credit),
            _ => Err(LedgerError::invalid_account_type(s)),
        }
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ledger account state
///
/// The balance always equals the signed sum of the account's transactions.
/// Only the ledger store mutates it, and only together with a transaction
/// insert.
#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    pub id: AccountId,

    /// Owner of the account (exactly one)
    pub owner: OwnerId,

    /// Globally unique, human-facing account number
    pub account_number: String,

    pub account_type: AccountType,

    /// Current balance; never negative
    pub balance: Money,

    /// Currency code fixed at creation
    pub currency: String,

    pub created_at: DateTime<Utc>,
}

/// Store-level insert request for a new account (always opens at zero)
#[derive(Debug, Clone, PartialEq)]
pub struct NewAccount {
    pub owner: OwnerId,
    pub account_number: String,
    pub account_type: AccountType,
    pub currency: String,
}

impl NewAccount {
    /// Build the zero-balance account row for this request
    pub fn into_account(self, id: AccountId, created_at: DateTime<Utc>) -> Account {
        Account {
            id,
            owner: self.owner,
            account_number: self.account_number,
            account_type: self.account_type,
            balance: Money::ZERO,
            currency: self.currency,
            created_at,
        }
    }
}

/// Engine-level request to open an account, optionally with an opening balance
#[derive(Debug, Clone, PartialEq)]
pub struct OpenAccount {
    pub owner: OwnerId,
    pub account_number: String,
    pub account_type: AccountType,
    pub currency: String,

    /// Posted as an "opening balance" deposit when non-zero
    pub opening_balance: Money,
}

impl OpenAccount {
    /// Split into the account fields and the opening balance
    pub fn split(self) -> (NewAccount, Money) {
        (
            NewAccount {
                owner: self.owner,
                account_number: self.account_number,
                account_type: self.account_type,
                currency: self.currency,
            },
            self.opening_balance,
        )
    }
}
