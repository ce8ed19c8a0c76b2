//! Type-safe price representation using decimal arithmetic.
//!
//! Catalog prices are whole currency units (the catalog never carries
//! fractional amounts), but the arithmetic stays exact under `Decimal`
//! so line totals and order totals never drift.

use core::fmt;
use core::iter::Sum;
use core::ops::Add;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A price in whole currency units.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// The zero price.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a price from a number of whole currency units.
    #[must_use]
    pub fn from_units(units: i64) -> Self {
        Self(Decimal::from(units))
    }

    /// Get the underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// The price of `quantity` items at this unit price.
    #[must_use]
    pub fn times(&self, quantity: u32) -> Self {
        Self(self.0 * Decimal::from(quantity))
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_times_scales_unit_price() {
        let price = Price::from_units(1000);
        assert_eq!(price.times(2), Price::from_units(2000));
        assert_eq!(price.times(0), Price::ZERO);
    }

    #[test]
    fn test_sum_over_line_totals() {
        let total: Price = [Price::from_units(300), Price::from_units(450)]
            .into_iter()
            .sum();
        assert_eq!(total, Price::from_units(750));
    }

    #[test]
    fn test_display_whole_units() {
        assert_eq!(Price::from_units(2990).to_string(), "2990");
    }

    #[test]
    fn test_serde_as_decimal_string() {
        let json = serde_json::to_string(&Price::from_units(1000)).unwrap();
        assert_eq!(json, "\"1000\"");
        let back: Price = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Price::from_units(1000));
    }
}
