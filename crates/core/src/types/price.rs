//! Type-safe price representation using decimal arithmetic.
//!
//! Prices travel on the wire as plain JSON numbers (`"price": 999`) but are
//! held as [`Decimal`] so that cart totals never pick up binary float error.

use core::fmt;
use core::iter::Sum;
use core::ops::{Add, Mul};
use core::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Errors that can occur when parsing a [`Price`] from user input.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The input is not a decimal number.
    #[error("invalid price: {0}")]
    Invalid(String),
    /// The input is below zero.
    #[error("price cannot be negative")]
    Negative,
}

/// A shop price in the store's single currency (US dollars).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Price(Decimal);

impl Price {
    /// The zero price, used as the total of an empty cart.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a price from a decimal amount.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Create a price from whole currency units (e.g., `999` for $999).
    #[must_use]
    pub fn from_units(units: i64) -> Self {
        Self(Decimal::from(units))
    }

    /// Create a price from cents (e.g., `1999` for $19.99).
    #[must_use]
    pub fn from_cents(cents: i64) -> Self {
        Self(Decimal::new(cents, 2))
    }

    /// The underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Amount with exactly two decimals and no currency symbol (e.g., `"999.00"`).
    #[must_use]
    pub fn to_fixed(&self) -> String {
        format!("{:.2}", self.0.round_dp(2))
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${}", self.to_fixed())
    }
}

impl FromStr for Price {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim().trim_start_matches('$');
        let amount =
            Decimal::from_str(trimmed).map_err(|_| PriceError::Invalid(s.to_string()))?;
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative);
        }
        Ok(Self(amount))
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl Mul<u32> for Price {
    type Output = Self;

    fn mul(self, quantity: u32) -> Self::Output {
        Self(self.0.saturating_mul(Decimal::from(quantity)))
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl From<Decimal> for Price {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        rust_decimal::serde::float::serialize(&self.0, serializer)
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        rust_decimal::serde::float::deserialize(deserializer).map(Self)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_display_has_two_decimals() {
        assert_eq!(Price::from_units(999).to_string(), "$999.00");
        assert_eq!(Price::from_cents(1999).to_string(), "$19.99");
        assert_eq!(Price::ZERO.to_fixed(), "0.00");
    }

    #[test]
    fn test_line_arithmetic() {
        let total: Price = [Price::from_units(999) * 2, Price::from_cents(50) * 3]
            .into_iter()
            .sum();
        assert_eq!(total, Price::from_cents(199_950));
    }

    #[test]
    fn test_arithmetic_saturates_near_decimal_max() {
        let huge: Price = serde_json::from_str("5e28").unwrap();
        let line = huge * 2;
        assert_eq!(line.amount(), Decimal::MAX);
        assert_eq!(line + huge, Price::new(Decimal::MAX));
        let total: Price = [huge, huge, Price::from_units(1)].into_iter().sum();
        assert_eq!(total.amount(), Decimal::MAX);
        assert!(!total.to_fixed().is_empty());
    }

    #[test]
    fn test_deserializes_json_numbers() {
        let whole: Price = serde_json::from_str("899").unwrap();
        assert_eq!(whole, Price::from_units(899));
        let fractional: Price = serde_json::from_str("19.99").unwrap();
        assert_eq!(fractional, Price::from_cents(1999));
    }

    #[test]
    fn test_serializes_as_number() {
        let json = serde_json::to_value(Price::from_units(599)).unwrap();
        assert!(json.is_number());
        assert!((json.as_f64().unwrap() - 599.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_parse_user_input() {
        assert_eq!("$700".parse::<Price>().unwrap(), Price::from_units(700));
        assert_eq!(" 12.5 ".parse::<Price>().unwrap(), Price::from_cents(1250));
        assert_eq!("-1".parse::<Price>(), Err(PriceError::Negative));
        assert!(matches!("cheap".parse::<Price>(), Err(PriceError::Invalid(_))));
    }
}
