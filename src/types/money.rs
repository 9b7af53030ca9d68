//! Exact decimal money type
//!
//! Every balance and amount in the ledger is a [`Money`] value: a thin wrapper
//! around [`rust_decimal::Decimal`] fixed to two fractional digits. Floating
//! point never touches a balance.

use super::error::LedgerError;
use rust_decimal::Decimal;
use std::fmt;
use std::ops::Neg;
use std::str::FromStr;

/// Number of fractional digits carried by every amount (minor units).
pub const MONEY_SCALE: u32 = 2;

/// Exact monetary amount with two fractional digits
///
/// `Money` is signed so that it can express balance deltas; amounts stored on
/// transactions are always positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Money(Decimal);

impl Money {
    /// Zero amount (0.00)
    pub const ZERO: Money = Money(Decimal::ZERO);

    /// Build an amount from minor units, e.g. `Money::from_minor(500000)` is 5000.00
    pub fn from_minor(minor: i64) -> Self {
        Money(Decimal::new(minor, MONEY_SCALE))
    }

    /// Wrap a decimal value
    ///
    /// Returns `None` if the value carries more than two significant
    /// fractional digits. Trailing zeros beyond the scale are accepted.
    pub fn from_decimal(value: Decimal) -> Option<Self> {
        let normalized = value.normalize();
        if normalized.scale() > MONEY_SCALE {
            return None;
        }
        let mut scaled = normalized;
        scaled.rescale(MONEY_SCALE);
        Some(Money(scaled))
    }

    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Checked addition; `None` on overflow
    pub fn checked_add(self, other: Money) -> Option<Money> {
        self.0.checked_add(other.0).map(Money)
    }

    /// Checked subtraction; `None` on overflow
    pub fn checked_sub(self, other: Money) -> Option<Money> {
        self.0.checked_sub(other.0).map(Money)
    }

    /// Absolute value
    pub fn abs(self) -> Money {
        Money(self.0.abs())
    }
}

impl Neg for Money {
    type Output = Money;

    fn neg(self) -> Money {
        Money(-self.0)
    }
}

impl FromStr for Money {
    type Err = LedgerError;

    /// Parse an amount from text
    ///
    /// Surrounding whitespace is ignored. Non-numeric text and amounts with
    /// more than two fractional digits are rejected; nothing is rounded.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let value = Decimal::from_str(trimmed).map_err(|_| LedgerError::invalid_amount(trimmed))?;
        Money::from_decimal(value).ok_or_else(|| LedgerError::invalid_amount(trimmed))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}
