//! # Billing Calculator
//!
//! Computes invoice totals from a list of lines. Pure and stateless.
//!
//! ## Formulas
//! ```text
//! subtotal        = Σ unit_price × quantity
//! tax             = subtotal × tax_rate
//! discount_amount = subtotal × discount_rate
//! total           = subtotal + tax − discount_amount
//! ```
//!
//! ## Rounding
//! Nothing is rounded here. Decimal arithmetic keeps every intermediate
//! exact, and the totals are recomputed from the full line set on every
//! call. Rounding to cents happens once, at display time, via
//! [`InvoiceTotals::rounded`].

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Rate;
use crate::types::InvoiceLine;
use crate::validation::{validate_quantity, validate_rate, ValidationResult};

/// Output of the billing calculator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct InvoiceTotals {
    #[ts(as = "String")]
    pub subtotal: Decimal,
    #[ts(as = "String")]
    pub tax: Decimal,
    #[ts(as = "String")]
    pub discount_amount: Decimal,
    #[ts(as = "String")]
    pub total: Decimal,
}

impl InvoiceTotals {
    /// Totals of an empty bill.
    pub const fn zero() -> Self {
        InvoiceTotals {
            subtotal: Decimal::ZERO,
            tax: Decimal::ZERO,
            discount_amount: Decimal::ZERO,
            total: Decimal::ZERO,
        }
    }

    /// Rounds every amount to cents, half away from zero. Display only.
    pub fn rounded(&self) -> Self {
        let round = |d: Decimal| d.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        InvoiceTotals {
            subtotal: round(self.subtotal),
            tax: round(self.tax),
            discount_amount: round(self.discount_amount),
            total: round(self.total),
        }
    }
}

/// Computes subtotal, tax, discount and grand total for `lines`.
///
/// ## Errors
/// `ValidationError` when a line has `quantity <= 0` or a negative unit
/// price, when a rate exceeds 100%, or when an amount overflows.
///
/// ```rust
/// use rust_decimal::Decimal;
/// use stockledger_core::billing::{compute_totals, InvoiceTotals};
/// use stockledger_core::money::Rate;
///
/// let totals = compute_totals(&[], Rate::from_bps(1900), Rate::zero()).unwrap();
/// assert_eq!(totals, InvoiceTotals::zero());
/// ```
pub fn compute_totals(
    lines: &[InvoiceLine],
    tax_rate: Rate,
    discount_rate: Rate,
) -> ValidationResult<InvoiceTotals> {
    validate_rate(tax_rate)?;
    validate_rate(discount_rate)?;

    let mut subtotal = Decimal::ZERO;
    for line in lines {
        validate_quantity(line.quantity)?;
        if line.unit_price.is_sign_negative() && !line.unit_price.is_zero() {
            return Err(ValidationError::must_not_be_negative("unit_price"));
        }

        let line_total = line
            .unit_price
            .checked_mul(Decimal::from(line.quantity))
            .ok_or_else(overflow)?;
        subtotal = subtotal.checked_add(line_total).ok_or_else(overflow)?;
    }

    let tax = subtotal
        .checked_mul(tax_rate.fraction())
        .ok_or_else(overflow)?;
    let discount_amount = subtotal
        .checked_mul(discount_rate.fraction())
        .ok_or_else(overflow)?;
    let total = subtotal
        .checked_add(tax)
        .and_then(|t| t.checked_sub(discount_amount))
        .ok_or_else(overflow)?;

    Ok(InvoiceTotals {
        subtotal,
        tax,
        discount_amount,
        total,
    })
}

fn overflow() -> ValidationError {
    ValidationError::invalid_format("amount", "exceeds the representable range")
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn line(price_cents: i64, quantity: i64) -> InvoiceLine {
        InvoiceLine::new("Item", Decimal::new(price_cents, 2), quantity)
    }

    #[test]
    fn test_empty_bill_is_zero_for_any_rates() {
        for (tax, discount) in [(0, 0), (1900, 0), (1900, 1000), (10_000, 10_000)] {
            let totals = compute_totals(&[], Rate::from_bps(tax), Rate::from_bps(discount)).unwrap();
            assert_eq!(totals, InvoiceTotals::zero());
        }
    }

    #[test]
    fn test_tax_and_discount() {
        let totals =
            compute_totals(&[line(1000, 2)], Rate::from_bps(1900), Rate::from_bps(1000)).unwrap();

        assert_eq!(totals.subtotal, Decimal::new(2000, 2));
        assert_eq!(totals.tax, Decimal::new(380, 2));
        assert_eq!(totals.discount_amount, Decimal::new(200, 2));
        assert_eq!(totals.total, Decimal::new(2180, 2));
    }

    #[test]
    fn test_multiple_lines_sum() {
        let totals = compute_totals(
            &[line(500, 2), line(299, 3), line(1, 1)],
            Rate::zero(),
            Rate::zero(),
        )
        .unwrap();

        assert_eq!(totals.subtotal, Decimal::new(1898, 2));
        assert_eq!(totals.total, totals.subtotal);
    }

    #[test]
    fn test_no_internal_rounding() {
        // 10.99 × 19% = 2.0881, kept exact until display.
        let totals = compute_totals(&[line(1099, 1)], Rate::from_bps(1900), Rate::zero()).unwrap();
        assert_eq!(totals.tax, Decimal::new(20881, 4));
        assert_eq!(totals.total, Decimal::new(130781, 4));

        let shown = totals.rounded();
        assert_eq!(shown.tax, Decimal::new(209, 2));
        assert_eq!(shown.total, Decimal::new(1308, 2));
    }

    #[test]
    fn test_rejects_invalid_lines() {
        assert!(compute_totals(&[line(100, 0)], Rate::zero(), Rate::zero()).is_err());
        assert!(compute_totals(&[line(100, -1)], Rate::zero(), Rate::zero()).is_err());
        assert!(compute_totals(&[line(-100, 1)], Rate::zero(), Rate::zero()).is_err());
    }

    #[test]
    fn test_free_line_is_allowed() {
        let totals = compute_totals(&[line(0, 4)], Rate::from_bps(1900), Rate::zero()).unwrap();
        assert_eq!(totals, InvoiceTotals::zero());
    }

    #[test]
    fn test_rejects_rates_over_100_percent() {
        assert!(compute_totals(&[line(100, 1)], Rate::from_bps(10_001), Rate::zero()).is_err());
        assert!(compute_totals(&[line(100, 1)], Rate::zero(), Rate::from_bps(20_000)).is_err());
    }
}
