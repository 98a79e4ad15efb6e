//! Money types with precise decimal arithmetic
//!
//! Premiums and coverage amounts are carried as `rust_decimal::Decimal` so
//! that pricing formulas such as `coverage * 0.0005` stay exact until the
//! final rounding to the currency's minor unit.

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Currency codes following ISO 4217
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    USD,
    MXN,
    EUR,
    CAD,
}

impl Currency {
    /// Returns the number of decimal places for this currency
    pub fn decimal_places(&self) -> u32 {
        2
    }

    /// Returns the currency symbol
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::USD => "$",
            Currency::MXN => "MX$",
            Currency::EUR => "€",
            Currency::CAD => "C$",
        }
    }

    /// Returns the ISO 4217 code
    pub fn code(&self) -> &'static str {
        match self {
            Currency::USD => "USD",
            Currency::MXN => "MXN",
            Currency::EUR => "EUR",
            Currency::CAD => "CAD",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Errors that can occur during money operations
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MoneyError {
    #[error("Currency mismatch: cannot operate on {0} and {1}")]
    CurrencyMismatch(String, String),

    #[error("Amount overflowed computing {0}")]
    Overflow(String),
}

/// A monetary amount with associated currency
///
/// Amounts keep full precision internally; call [`Money::round_to_currency`]
/// before presenting or persisting a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Money {
    amount: Decimal,
    currency: Currency,
}

impl Money {
    /// Creates a new Money value
    pub fn new(amount: Decimal, currency: Currency) -> Self {
        Self { amount, currency }
    }

    /// Creates a zero amount in the specified currency
    pub fn zero(currency: Currency) -> Self {
        Self {
            amount: dec!(0),
            currency,
        }
    }

    /// Returns the amount
    pub fn amount(&self) -> Decimal {
        self.amount
    }

    /// Returns the currency
    pub fn currency(&self) -> Currency {
        self.currency
    }

    /// Returns true if the amount is strictly positive
    pub fn is_positive(&self) -> bool {
        self.amount > Decimal::ZERO
    }

    /// Rounds to the currency's minor unit, midpoints away from zero
    pub fn round_to_currency(&self) -> Self {
        Self {
            amount: self.amount.round_dp_with_strategy(
                self.currency.decimal_places(),
                RoundingStrategy::MidpointAwayFromZero,
            ),
            currency: self.currency,
        }
    }

    /// Adds two amounts of the same currency
    ///
    /// # Errors
    ///
    /// `CurrencyMismatch` for different currencies, `Overflow` when the sum
    /// leaves the decimal range.
    pub fn checked_add(&self, other: &Money) -> Result<Money, MoneyError> {
        self.ensure_same_currency(other)?;
        self.amount
            .checked_add(other.amount)
            .map(|amount| Self::new(amount, self.currency))
            .ok_or_else(|| MoneyError::Overflow(format!("{} + {}", self.amount, other.amount)))
    }

    /// Multiplies by a scalar (rates, frequency multipliers)
    pub fn checked_mul(&self, factor: Decimal) -> Result<Money, MoneyError> {
        self.amount
            .checked_mul(factor)
            .map(|amount| Self::new(amount, self.currency))
            .ok_or_else(|| MoneyError::Overflow(format!("{} * {}", self.amount, factor)))
    }

    /// Restricts the amount to `[min, max]`
    pub fn clamp(&self, min: Decimal, max: Decimal) -> Self {
        Self::new(self.amount.max(min).min(max), self.currency)
    }

    /// Sums a sequence of amounts in a single currency
    pub fn sum<'a>(
        currency: Currency,
        items: impl IntoIterator<Item = &'a Money>,
    ) -> Result<Money, MoneyError> {
        items
            .into_iter()
            .try_fold(Money::zero(currency), |acc, m| acc.checked_add(m))
    }

    fn ensure_same_currency(&self, other: &Money) -> Result<(), MoneyError> {
        if self.currency != other.currency {
            return Err(MoneyError::CurrencyMismatch(
                self.currency.to_string(),
                other.currency.to_string(),
            ));
        }
        Ok(())
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rounded = self.round_to_currency();
        write!(
            f,
            "{} {:.dp$}",
            self.currency.symbol(),
            rounded.amount,
            dp = self.currency.decimal_places() as usize
        )
    }
}
