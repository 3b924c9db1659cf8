//! Fixed-point numeric types for prices and token quantities
//!
//! Uses rust_decimal for exact arithmetic (no binary floating-point
//! drift). Prices live in the closed interval [1, FACE_VALUE]; quantities
//! are whole tokens. Both serialize as strings to prevent JSON number
//! precision loss.

use crate::errors::ExchangeError;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};

/// Combined face value of a matched YES/NO pair, and the upper price bound.
pub const FACE_VALUE: Decimal = Decimal::TEN;

/// Lower bound of the tradable price range.
pub const MIN_PRICE: Decimal = Decimal::ONE;

/// Price of a single outcome token.
///
/// The public representation uses up to one fractional digit, but any
/// decimal literal that parses into [1, 10] is accepted and canonicalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Price(Decimal);

impl Price {
    /// Create a price without range validation.
    ///
    /// Exists for fixture data that predates the [1, 10] bound; validated
    /// input must go through [`Price::try_new`].
    ///
    /// # Panics
    /// Panics if the value is not positive.
    pub fn new(value: Decimal) -> Self {
        assert!(value > Decimal::ZERO, "Price must be positive");
        Self(value.normalize())
    }

    /// Create a price, enforcing the closed [1, 10] range.
    pub fn try_new(value: Decimal) -> Result<Self, ExchangeError> {
        if value >= MIN_PRICE && value <= FACE_VALUE {
            Ok(Self(value.normalize()))
        } else {
            Err(ExchangeError::InvalidInput(format!(
                "price {} outside [1, 10]",
                value
            )))
        }
    }

    /// Parse a validated price from a decimal literal.
    pub fn from_str(s: &str) -> Result<Self, ExchangeError> {
        let decimal = s
            .parse::<Decimal>()
            .map_err(|_| ExchangeError::InvalidInput(format!("invalid price literal: {}", s)))?;
        Self::try_new(decimal)
    }

    pub fn as_decimal(&self) -> Decimal {
        self.0
    }

    /// Whether this price sits inside the tradable [1, 10] range.
    ///
    /// Resting fixture prices outside the range never participate in the
    /// book-sweep.
    pub fn in_face_range(&self) -> bool {
        self.0 >= MIN_PRICE && self.0 <= FACE_VALUE
    }

    /// Midpoint of two prices, rounded half-even to 2 decimal places.
    ///
    /// This is the settlement price of a book-sweep cross.
    pub fn midpoint(self, other: Price) -> Decimal {
        ((self.0 + other.0) / Decimal::TWO)
            .round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven)
    }
}

// Custom serialization to preserve precision
impl Serialize for Price {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0.to_string())
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Price::from_str(&s).map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Whole-token quantity.
///
/// The interface may hand over decimal-typed quantities; anything with a
/// non-zero fractional part is rejected at the boundary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Quantity(u64);

impl Quantity {
    pub const ZERO: Quantity = Quantity(0);

    pub fn new(value: u64) -> Self {
        Self(value)
    }

    /// Accept a decimal quantity, rejecting fractional or negative input.
    pub fn try_from_decimal(value: Decimal) -> Result<Self, ExchangeError> {
        if value.is_sign_negative() || !value.fract().is_zero() {
            return Err(ExchangeError::InvalidInput(format!(
                "quantity must be a non-negative whole number, got {}",
                value
            )));
        }
        value
            .to_u64()
            .map(Self)
            .ok_or_else(|| ExchangeError::InvalidInput(format!("quantity {} out of range", value)))
    }

    pub fn get(&self) -> u64 {
        self.0
    }

    pub fn as_decimal(&self) -> Decimal {
        Decimal::from(self.0)
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn min(self, other: Quantity) -> Quantity {
        Self(self.0.min(other.0))
    }

    pub fn checked_sub(self, rhs: Quantity) -> Option<Quantity> {
        self.0.checked_sub(rhs.0).map(Self)
    }
}

impl Add for Quantity {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for Quantity {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sub for Quantity {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        assert!(self.0 >= rhs.0, "Quantity subtraction would result in negative");
        Self(self.0 - rhs.0)
    }
}

impl SubAssign for Quantity {
    fn sub_assign(&mut self, rhs: Self) {
        assert!(self.0 >= rhs.0, "Quantity subtraction would result in negative");
        self.0 -= rhs.0;
    }
}

impl Mul<Price> for Quantity {
    type Output = Decimal;

    /// Notional value of `self` tokens at `rhs`.
    fn mul(self, rhs: Price) -> Self::Output {
        Decimal::from(self.0) * rhs.as_decimal()
    }
}

// Custom serialization to preserve precision
impl Serialize for Quantity {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0.to_string())
    }
}

impl<'de> Deserialize<'de> for Quantity {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse::<u64>()
            .map(Self)
            .map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_price_range_enforced() {
        assert!(Price::try_new(dec!(1)).is_ok());
        assert!(Price::try_new(dec!(10)).is_ok());
        assert!(Price::try_new(dec!(0.99)).is_err());
        assert!(Price::try_new(dec!(10.01)).is_err());
    }

    #[test]
    fn test_price_canonicalization() {
        let a = Price::from_str("9.5").unwrap();
        let b = Price::from_str("9.50").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.to_string(), "9.5");
    }

    #[test]
    fn test_price_unchecked_allows_fixture_values() {
        let p = Price::new(dec!(10.5));
        assert!(!p.in_face_range());
    }

    #[test]
    #[should_panic(expected = "Price must be positive")]
    fn test_price_zero_panics() {
        Price::new(Decimal::ZERO);
    }

    #[test]
    fn test_price_midpoint_half_even() {
        let py = Price::from_str("6").unwrap();
        let pn = Price::from_str("5").unwrap();
        assert_eq!(py.midpoint(pn), dec!(5.5));

        // 2dp midpoint ties round to even
        let a = Price::from_str("1.01").unwrap();
        let b = Price::from_str("1.04").unwrap();
        assert_eq!(a.midpoint(b), dec!(1.02)); // 1.025 -> 1.02
    }

    #[test]
    fn test_price_serialization() {
        let price = Price::from_str("9.5").unwrap();
        let json = serde_json::to_string(&price).unwrap();
        assert_eq!(json, "\"9.5\"");

        let back: Price = serde_json::from_str(&json).unwrap();
        assert_eq!(price, back);
    }

    #[test]
    fn test_quantity_rejects_fractional() {
        assert!(Quantity::try_from_decimal(dec!(1.5)).is_err());
        assert!(Quantity::try_from_decimal(dec!(-1)).is_err());
        assert_eq!(
            Quantity::try_from_decimal(dec!(100)).unwrap(),
            Quantity::new(100)
        );
    }

    #[test]
    fn test_quantity_notional() {
        let qty = Quantity::new(100);
        let price = Price::from_str("9.5").unwrap();
        assert_eq!(qty * price, dec!(950));
    }

    #[test]
    fn test_quantity_arithmetic() {
        let a = Quantity::new(5);
        let b = Quantity::new(3);
        assert_eq!(a + b, Quantity::new(8));
        assert_eq!(a - b, Quantity::new(2));
        assert_eq!(a.min(b), b);
        assert_eq!(b.checked_sub(a), None);
    }

    #[test]
    fn test_quantity_serialization() {
        let qty = Quantity::new(1200);
        let json = serde_json::to_string(&qty).unwrap();
        assert_eq!(json, "\"1200\"");

        let back: Quantity = serde_json::from_str(&json).unwrap();
        assert_eq!(qty, back);
    }
}
