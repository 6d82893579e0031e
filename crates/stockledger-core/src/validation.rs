//! # Validation Module
//!
//! Input validation for catalog and billing operations.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: External UI                                                  │
//! │  └── Form feedback (out of scope for the engine)                       │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Inventory service / billing calculator (Rust)                │
//! │  └── THIS MODULE: Business rule validation                             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── CHECK (quantity >= 0), CHECK (price_cents > 0)                    │
//! │  └── Append-only triggers on the sales ledger                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::money::{Money, Rate};
use crate::MAX_PAGE_SIZE;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Maximum product name length in characters.
pub const MAX_PRODUCT_NAME_LEN: usize = 200;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a product name and returns it trimmed.
///
/// ## Rules
/// - Must not be empty after trimming
/// - At most 200 characters
///
/// ```rust
/// use stockledger_core::validation::validate_product_name;
///
/// assert_eq!(validate_product_name("  Widget ").unwrap(), "Widget");
/// assert!(validate_product_name("   ").is_err());
/// ```
pub fn validate_product_name(name: &str) -> ValidationResult<String> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::required("name"));
    }

    if name.chars().count() > MAX_PRODUCT_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: MAX_PRODUCT_NAME_LEN,
        });
    }

    Ok(name.to_string())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a catalog unit price. Catalog prices must be strictly positive.
pub fn validate_unit_price(price: Money) -> ValidationResult<()> {
    if !price.is_positive() {
        return Err(ValidationError::must_be_positive("price"));
    }

    Ok(())
}

/// Validates an initial stock level (zero allowed).
pub fn validate_stock_level(quantity: i64) -> ValidationResult<()> {
    if quantity < 0 {
        return Err(ValidationError::must_not_be_negative("quantity"));
    }

    Ok(())
}

/// Validates a removal/sale quantity (must be > 0).
pub fn validate_quantity(quantity: i64) -> ValidationResult<()> {
    if quantity <= 0 {
        return Err(ValidationError::must_be_positive("quantity"));
    }

    Ok(())
}

/// Validates a tax or discount rate (0% to 100%).
pub fn validate_rate(rate: Rate) -> ValidationResult<()> {
    if rate.bps() > Rate::MAX_BPS {
        return Err(ValidationError::OutOfRange {
            field: "rate".to_string(),
            min: 0,
            max: i64::from(Rate::MAX_BPS),
        });
    }

    Ok(())
}

/// Validates a page size for list views.
pub fn validate_page_size(page_size: u32) -> ValidationResult<()> {
    if page_size == 0 || page_size > MAX_PAGE_SIZE {
        return Err(ValidationError::OutOfRange {
            field: "page_size".to_string(),
            min: 1,
            max: i64::from(MAX_PAGE_SIZE),
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_product_name() {
        assert_eq!(validate_product_name("Widget").unwrap(), "Widget");
        assert_eq!(validate_product_name("  Gadget  ").unwrap(), "Gadget");
        assert!(validate_product_name("").is_err());
        assert!(validate_product_name("\t \n").is_err());
        assert!(validate_product_name(&"A".repeat(201)).is_err());
    }

    #[test]
    fn test_validate_unit_price() {
        assert!(validate_unit_price(Money::from_cents(1)).is_ok());
        assert!(validate_unit_price(Money::from_cents(0)).is_err());
        assert!(validate_unit_price(Money::from_cents(-100)).is_err());
    }

    #[test]
    fn test_validate_quantities() {
        assert!(validate_stock_level(0).is_ok());
        assert!(validate_stock_level(-1).is_err());

        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-3).is_err());
    }

    #[test]
    fn test_validate_rate() {
        assert!(validate_rate(Rate::from_bps(0)).is_ok());
        assert!(validate_rate(Rate::from_bps(1900)).is_ok());
        assert!(validate_rate(Rate::from_bps(10_000)).is_ok());
        assert!(validate_rate(Rate::from_bps(10_001)).is_err());
    }

    #[test]
    fn test_validate_page_size() {
        assert!(validate_page_size(10).is_ok());
        assert!(validate_page_size(0).is_err());
        assert!(validate_page_size(MAX_PAGE_SIZE + 1).is_err());
    }
}
