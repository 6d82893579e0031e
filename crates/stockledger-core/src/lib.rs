//! # stockledger-core: Pure Business Logic for StockLedger
//!
//! The domain half of the inventory/billing consistency engine. Everything
//! here is a pure function or a plain data type; persistence and
//! transactions live in `stockledger-db`.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      StockLedger Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │            External UI (forms, lists, pagination widgets)       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ typed commands                         │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    stockledger-app                              │   │
//! │  │    add_product, sell, delete_product, create_bill, ...          │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              ★ stockledger-core (THIS CRATE) ★                  │   │
//! │  │                                                                 │   │
//! │  │   ┌─────────┐ ┌─────────┐ ┌──────────┐ ┌──────────┐ ┌────────┐ │   │
//! │  │   │  types  │ │  money  │ │ billing  │ │validation│ │  page  │ │   │
//! │  │   │ Product │ │  Money  │ │ Totals   │ │  rules   │ │ slices │ │   │
//! │  │   │ Ledger  │ │  Rate   │ │          │ │          │ │        │ │   │
//! │  │   └─────────┘ └─────────┘ └──────────┘ └──────────┘ └────────┘ │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                stockledger-db (Database Layer)                  │   │
//! │  │     catalog store, sales ledger, inventory service, bills       │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, SalesLedgerEntry, InvoiceLine, Bill)
//! - [`money`] - Integer `Money` for catalog prices and the `Rate` type
//! - [`billing`] - The billing calculator (subtotal, tax, discount, total)
//! - [`pagination`] - Offset page slicing for list views
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Example Usage
//!
//! ```rust
//! use rust_decimal::Decimal;
//! use stockledger_core::billing::compute_totals;
//! use stockledger_core::money::Rate;
//! use stockledger_core::types::InvoiceLine;
//!
//! let lines = vec![InvoiceLine::new("Widget", Decimal::new(1000, 2), 2)];
//! let totals = compute_totals(&lines, Rate::from_bps(1900), Rate::from_bps(1000)).unwrap();
//!
//! assert_eq!(totals.subtotal, Decimal::new(2000, 2));
//! assert_eq!(totals.tax, Decimal::new(380, 2));
//! assert_eq!(totals.discount_amount, Decimal::new(200, 2));
//! assert_eq!(totals.total, Decimal::new(2180, 2));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod billing;
pub mod error;
pub mod money;
pub mod pagination;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use billing::{compute_totals, InvoiceTotals};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::{Money, Rate};
pub use pagination::{paginate, Page};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Default sales tax applied to bills, in basis points (19%).
pub const DEFAULT_TAX_RATE_BPS: u32 = 1900;

/// Default bill discount, in basis points (none).
pub const DEFAULT_DISCOUNT_RATE_BPS: u32 = 0;

/// Default number of rows per page in list views.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Upper bound on a requested page size.
pub const MAX_PAGE_SIZE: u32 = 500;
