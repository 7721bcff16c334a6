//! Monetary amounts in minor units.
//!
//! Storage-layer records carry prices as decimal floats; those are
//! converted to integer minor units (cents) on ingest and stay integers
//! from then on. All arithmetic is checked: a currency mismatch or an
//! overflow surfaces as `None` rather than a wrong total.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Supported settlement currencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Currency {
    #[default]
    USD,
    EUR,
    GBP,
    JPY,
    CNY,
    CAD,
    AUD,
}

impl Currency {
    /// The ISO 4217 code (e.g. "USD").
    pub fn code(&self) -> &'static str {
        match self {
            Currency::USD => "USD",
            Currency::EUR => "EUR",
            Currency::GBP => "GBP",
            Currency::JPY => "JPY",
            Currency::CNY => "CNY",
            Currency::CAD => "CAD",
            Currency::AUD => "AUD",
        }
    }

    /// The display symbol (e.g. "$").
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::USD => "$",
            Currency::EUR => "\u{20ac}",
            Currency::GBP => "\u{00a3}",
            Currency::JPY => "\u{00a5}",
            Currency::CNY => "\u{00a5}",
            Currency::CAD => "CA$",
            Currency::AUD => "A$",
        }
    }

    /// Number of decimal places in the major unit.
    pub fn decimal_places(&self) -> u32 {
        match self {
            Currency::JPY => 0,
            _ => 2,
        }
    }

    /// Parse a currency code, case-insensitive.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.to_uppercase().as_str() {
            "USD" => Some(Currency::USD),
            "EUR" => Some(Currency::EUR),
            "GBP" => Some(Currency::GBP),
            "JPY" => Some(Currency::JPY),
            "CNY" => Some(Currency::CNY),
            "CAD" => Some(Currency::CAD),
            "AUD" => Some(Currency::AUD),
            _ => None,
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A monetary amount with its currency.
///
/// `amount_minor` is in the smallest unit of the currency (cents for
/// USD, yen for JPY).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Money {
    /// Amount in minor units.
    pub amount_minor: i64,
    /// The currency.
    pub currency: Currency,
}

impl Money {
    /// Create an amount from minor units.
    pub fn new(amount_minor: i64, currency: Currency) -> Self {
        Self {
            amount_minor,
            currency,
        }
    }

    /// Convert a decimal wire amount to minor units.
    ///
    /// ```
    /// use souk_commerce::money::{Currency, Money};
    /// assert_eq!(Money::from_decimal(25.00, Currency::USD).amount_minor, 2500);
    /// ```
    pub fn from_decimal(amount: f64, currency: Currency) -> Self {
        let scale = 10_i64.pow(currency.decimal_places());
        Self::new((amount * scale as f64).round() as i64, currency)
    }

    /// Zero in the given currency.
    pub fn zero(currency: Currency) -> Self {
        Self::new(0, currency)
    }

    /// Whether the amount is zero.
    pub fn is_zero(&self) -> bool {
        self.amount_minor == 0
    }

    /// Whether the amount is strictly positive.
    pub fn is_positive(&self) -> bool {
        self.amount_minor > 0
    }

    /// Convert back to a decimal major-unit value.
    pub fn to_decimal(&self) -> f64 {
        let scale = 10_i64.pow(self.currency.decimal_places());
        self.amount_minor as f64 / scale as f64
    }

    /// Checked addition. `None` on currency mismatch or overflow.
    pub fn try_add(&self, other: &Money) -> Option<Money> {
        if self.currency != other.currency {
            return None;
        }
        self.amount_minor
            .checked_add(other.amount_minor)
            .map(|a| Money::new(a, self.currency))
    }

    /// Checked subtraction. `None` on currency mismatch or overflow.
    pub fn try_sub(&self, other: &Money) -> Option<Money> {
        if self.currency != other.currency {
            return None;
        }
        self.amount_minor
            .checked_sub(other.amount_minor)
            .map(|a| Money::new(a, self.currency))
    }

    /// Checked scalar multiplication (e.g. unit price times quantity).
    pub fn try_mul(&self, factor: i64) -> Option<Money> {
        self.amount_minor
            .checked_mul(factor)
            .map(|a| Money::new(a, self.currency))
    }

    /// Checked sum of an iterator of amounts.
    pub fn try_sum<'a>(iter: impl Iterator<Item = &'a Money>, currency: Currency) -> Option<Money> {
        let mut total = Money::zero(currency);
        for m in iter {
            total = total.try_add(m)?;
        }
        Some(total)
    }

    /// Absolute difference from another amount, in minor units.
    ///
    /// `None` when the currencies differ; callers comparing a cart-held
    /// price against a canonical one must treat that as drifted.
    pub fn drift_from(&self, other: &Money) -> Option<i64> {
        if self.currency != other.currency {
            return None;
        }
        Some((self.amount_minor - other.amount_minor).abs())
    }

    /// Format with the currency symbol (e.g. "$49.99").
    pub fn display(&self) -> String {
        let places = self.currency.decimal_places() as usize;
        format!("{}{:.places$}", self.currency.symbol(), self.to_decimal())
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}
