//! Fixed-point monetary amount with 4 decimal places precision.
//!
//! Uses `rust_decimal` internally with scale enforcement so payment
//! amounts never pass through floating point. On every wire surface
//! (CSV, payment claims) amounts travel as exact-precision strings.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::ops::{Add, AddAssign};
use std::str::FromStr;

/// A monetary amount that maintains exactly 4 decimal places of precision.
///
/// This type wraps `rust_decimal::Decimal` and ensures consistent scale
/// for all arithmetic, suitable for per-view payout amounts.
///
/// # Examples
///
/// ```
/// use std::str::FromStr;
/// use view_accounting::Amount;
///
/// let amount = Amount::from_str("2.5").unwrap();
/// assert_eq!(amount.to_string(), "2.5000");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Amount(Decimal);

impl Amount {
    /// The number of decimal places to maintain.
    pub const SCALE: u32 = 4;

    /// Zero value.
    pub const ZERO: Self = Amount(Decimal::ZERO);

    /// Creates a new `Amount` from a `Decimal`, normalizing to 4 decimal places.
    pub fn new(value: Decimal) -> Self {
        let mut normalized = value;
        normalized.rescale(Self::SCALE);
        Amount(normalized)
    }

    /// Returns `true` if this amount is zero.
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Returns `true` if this amount is strictly greater than zero.
    pub fn is_positive(&self) -> bool {
        self.0.is_sign_positive() && !self.0.is_zero()
    }
}

impl FromStr for Amount {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let trimmed = s.trim();
        let decimal = Decimal::from_str(trimmed)?;
        Ok(Amount::new(decimal))
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}", self.0)
    }
}

impl Add for Amount {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Amount::new(self.0 + rhs.0)
    }
}

impl AddAssign for Amount {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
        self.0.rescale(Self::SCALE);
    }
}

impl Serialize for Amount {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format!("{:.4}", self.0))
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Amount::from_str(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str_normalizes_scale() {
        let a = Amount::from_str("2.5").unwrap();
        assert_eq!(a.to_string(), "2.5000");

        let a = Amount::from_str("0.01").unwrap();
        assert_eq!(a.to_string(), "0.0100");

        let a = Amount::from_str("1.1234").unwrap();
        assert_eq!(a.to_string(), "1.1234");

        let a = Amount::from_str("  2.5  ").unwrap();
        assert_eq!(a.to_string(), "2.5000");
    }

    #[test]
    fn test_addition_preserves_scale() {
        let a = Amount::from_str("1.5").unwrap();
        let b = Amount::from_str("2.5").unwrap();

        assert_eq!((a + b).to_string(), "4.0000");

        let mut total = Amount::ZERO;
        total += a;
        total += a;
        assert_eq!(total.to_string(), "3.0000");
    }

    #[test]
    fn test_zero_constant() {
        assert!(Amount::ZERO.is_zero());
        assert!(!Amount::ZERO.is_positive());
    }

    #[test]
    fn test_is_positive() {
        assert!(Amount::from_str("0.0001").unwrap().is_positive());
        assert!(!Amount::from_str("-1.0").unwrap().is_positive());
    }
}
