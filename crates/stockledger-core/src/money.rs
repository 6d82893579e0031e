//! # Money Module
//!
//! `Money` holds catalog prices in integer minor units (cents) and `Rate`
//! holds tax/discount percentages in basis points.
//!
//! ## Two Representations
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  CATALOG (stored)                 BILLING (computed)                    │
//! │                                                                         │
//! │  Money(i64 cents)  ── to_decimal() ──►  rust_decimal::Decimal           │
//! │  499 = $4.99                            4.99                            │
//! │                                                                         │
//! │  Prices are always whole cents, so the catalog never needs more.        │
//! │  Tax and discount on a subtotal produce fractions of a cent; those      │
//! │  stay exact as Decimal until the UI rounds for display.                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use rust_decimal::Decimal;
//! use stockledger_core::money::{Money, Rate};
//!
//! let price = Money::from_decimal(Decimal::new(1099, 2), "price").unwrap();
//! assert_eq!(price.cents(), 1099);
//!
//! let vat = Rate::from_percent(Decimal::from(19)).unwrap();
//! assert_eq!(vat.bps(), 1900);
//! ```

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::validation::ValidationResult;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (cents).
///
/// ## Design Decisions
/// - **i64 (signed)**: matches SQLite INTEGER; negative inputs are caught by validation
/// - **Single field tuple struct**: Zero-cost abstraction over i64
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents.
    ///
    /// ```rust
    /// use stockledger_core::money::Money;
    ///
    /// let price = Money::from_cents(1099); // $10.99
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Converts a decimal amount (e.g. `4.99`) to whole cents.
    ///
    /// Fails with `InvalidFormat` when the amount has more than two
    /// fractional digits, and `OutOfRange` when it does not fit in i64 cents.
    /// `field` names the input in the error message.
    pub fn from_decimal(amount: Decimal, field: &str) -> ValidationResult<Self> {
        let scaled = amount
            .checked_mul(Decimal::ONE_HUNDRED)
            .ok_or_else(|| out_of_range(field))?;

        if !scaled.fract().is_zero() {
            return Err(ValidationError::invalid_format(
                field,
                "must have at most 2 decimal places",
            ));
        }

        scaled
            .trunc()
            .to_i64()
            .map(Money)
            .ok_or_else(|| out_of_range(field))
    }

    /// Returns the value in cents (smallest currency unit).
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the value as an exact decimal amount.
    ///
    /// ```rust
    /// use rust_decimal::Decimal;
    /// use stockledger_core::money::Money;
    ///
    /// assert_eq!(Money::from_cents(500).to_decimal(), Decimal::new(500, 2));
    /// ```
    #[inline]
    pub fn to_decimal(&self) -> Decimal {
        Decimal::new(self.0, 2)
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }
}

fn out_of_range(field: &str) -> ValidationError {
    ValidationError::OutOfRange {
        field: field.to_string(),
        min: 0,
        max: i64::MAX,
    }
}

/// Debug-oriented display; the app formats currency for the UI.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02}", sign, (self.0 / 100).abs(), (self.0 % 100).abs())
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

// =============================================================================
// Rate
// =============================================================================

/// A percentage rate in basis points (bps).
///
/// 1 basis point = 0.01%, so 1900 bps = 19% and 825 bps = 8.25%.
/// Used for both the bill tax rate and the bill discount rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Rate(u32);

impl Rate {
    /// 100% in basis points.
    pub const MAX_BPS: u32 = 10_000;

    /// Creates a rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        Rate(bps)
    }

    /// Creates a rate from a percentage such as `19` or `8.25`.
    ///
    /// ## Rules
    /// - Must be between 0 and 100
    /// - Must be a whole number of basis points (at most 2 decimal places)
    pub fn from_percent(percent: Decimal) -> ValidationResult<Self> {
        if percent.is_sign_negative() && !percent.is_zero() {
            return Err(ValidationError::must_not_be_negative("rate"));
        }

        let bps = percent
            .checked_mul(Decimal::ONE_HUNDRED)
            .filter(|bps| bps.fract().is_zero())
            .and_then(|bps| bps.to_u32())
            .ok_or_else(|| {
                ValidationError::invalid_format("rate", "must have at most 2 decimal places")
            })?;

        let rate = Rate(bps);
        crate::validation::validate_rate(rate)?;
        Ok(rate)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (1900 bps → 19.00).
    #[inline]
    pub fn percent(&self) -> Decimal {
        Decimal::new(i64::from(self.0), 2)
    }

    /// Returns the rate as a multiplier (1900 bps → 0.1900).
    #[inline]
    pub fn fraction(&self) -> Decimal {
        Decimal::new(i64::from(self.0), 4)
    }

    /// Zero rate.
    #[inline]
    pub const fn zero() -> Self {
        Rate(0)
    }

    /// Checks if the rate is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Default for Rate {
    fn default() -> Self {
        Rate::zero()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_decimal() {
        let price = Money::from_decimal(Decimal::new(1099, 2), "price").unwrap();
        assert_eq!(price.cents(), 1099);

        let whole = Money::from_decimal(Decimal::from(5), "price").unwrap();
        assert_eq!(whole.cents(), 500);

        // Trailing zeros beyond two places are still whole cents.
        let padded = Money::from_decimal(Decimal::new(12_3000, 4), "price").unwrap();
        assert_eq!(padded.cents(), 1230);
    }

    #[test]
    fn test_from_decimal_rejects_sub_cent_amounts() {
        let err = Money::from_decimal(Decimal::new(10_999, 3), "price").unwrap_err();
        assert!(matches!(err, ValidationError::InvalidFormat { .. }));
    }

    #[test]
    fn test_to_decimal() {
        assert_eq!(Money::from_cents(1099).to_decimal(), Decimal::new(1099, 2));
        assert_eq!(Money::from_cents(0).to_decimal(), Decimal::ZERO);
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_cents(1099).to_string(), "10.99");
        assert_eq!(Money::from_cents(500).to_string(), "5.00");
        assert_eq!(Money::from_cents(-550).to_string(), "-5.50");
    }

    #[test]
    fn test_rate_from_percent() {
        assert_eq!(Rate::from_percent(Decimal::from(19)).unwrap().bps(), 1900);
        assert_eq!(Rate::from_percent(Decimal::new(825, 2)).unwrap().bps(), 825);
        assert_eq!(Rate::from_percent(Decimal::ZERO).unwrap(), Rate::zero());
        assert_eq!(Rate::from_percent(Decimal::from(100)).unwrap().bps(), Rate::MAX_BPS);
    }

    #[test]
    fn test_rate_from_percent_rejects_bad_input() {
        assert!(Rate::from_percent(Decimal::from(-1)).is_err());
        assert!(Rate::from_percent(Decimal::from(101)).is_err());
        assert!(Rate::from_percent(Decimal::new(12_345, 3)).is_err());
    }

    #[test]
    fn test_rate_views() {
        let rate = Rate::from_bps(1900);
        assert_eq!(rate.percent(), Decimal::from(19));
        assert_eq!(rate.fraction(), Decimal::new(19, 2));
        assert!(!rate.is_zero());
    }
}
