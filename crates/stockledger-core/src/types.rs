//! # Domain Types
//!
//! Core domain types used throughout StockLedger.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌──────────────────┐   ┌─────────────────┐      │
//! │  │    Product      │   │ SalesLedgerEntry │   │   InvoiceLine   │      │
//! │  │  ─────────────  │   │  ──────────────  │   │  ─────────────  │      │
//! │  │  id (i64)       │   │  id (i64)        │   │  name           │      │
//! │  │  name           │──►│  product_id      │   │  unit_price     │      │
//! │  │  price_cents    │   │  name (frozen)   │   │  quantity       │      │
//! │  │  quantity       │   │  unit_price      │   └─────────────────┘      │
//! │  └─────────────────┘   │  quantity_removed│                            │
//! │     live catalog       │  removed_at      │   ┌─────────────────┐      │
//! │                        └──────────────────┘   │  Bill/BillItem  │      │
//! │                          append-only          │  persisted sale │      │
//! │                                               └─────────────────┘      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshot Pattern
//! Ledger entries and bill items copy the product's name and price at the
//! moment of removal. Nothing historical points back into the live catalog,
//! so renaming, repricing or deleting a product never rewrites history.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::billing::{compute_totals, InvoiceTotals};
use crate::error::CoreResult;
use crate::money::{Money, Rate};

/// Catalog product identity, assigned by the store.
pub type ProductId = i64;

/// Sales ledger entry identity, monotonically assigned.
pub type LedgerEntryId = i64;

/// Persisted bill identity.
pub type BillId = i64;

// =============================================================================
// Product
// =============================================================================

/// A product in the live catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Product {
    /// Unique identifier, immutable after creation.
    pub id: ProductId,

    /// Display name shown to the cashier and on bills.
    pub name: String,

    /// Unit price in cents.
    pub price_cents: i64,

    /// On-hand stock. Never negative.
    pub quantity: i64,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Returns the unit price as Money.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// Freezes this product into a ledger snapshot.
    pub fn snapshot(&self, quantity_removed: i64, kind: RemovalKind) -> LedgerSnapshot {
        LedgerSnapshot {
            product_id: self.id,
            name: self.name.clone(),
            unit_price_cents: self.price_cents,
            quantity_removed,
            kind,
        }
    }

    /// Builds the invoice line for `quantity` units of this product.
    pub fn invoice_line(&self, quantity: i64) -> InvoiceLine {
        InvoiceLine::new(self.name.clone(), self.price().to_decimal(), quantity)
    }
}

/// Partial update for a product. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub price: Option<Money>,
}

impl ProductPatch {
    /// True when the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.price.is_none()
    }
}

// =============================================================================
// Sales Ledger
// =============================================================================

/// Why units left inventory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum RemovalKind {
    /// The whole product was deleted from the catalog.
    ProductDeleted,
    /// A quantity was removed by an operator (the row stays).
    QuantityRemoved,
    /// Units were sold through the billing flow.
    Sold,
}

/// What the ledger is asked to record. Id and timestamp are assigned on
/// append.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerSnapshot {
    pub product_id: ProductId,
    pub name: String,
    pub unit_price_cents: i64,
    pub quantity_removed: i64,
    pub kind: RemovalKind,
}

/// One permanent record of inventory outflow. Never mutated once written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct SalesLedgerEntry {
    pub id: LedgerEntryId,
    pub product_id: ProductId,
    /// Product name at time of removal (frozen).
    pub name: String,
    /// Unit price in cents at time of removal (frozen).
    pub unit_price_cents: i64,
    pub quantity_removed: i64,
    pub kind: RemovalKind,
    #[ts(as = "String")]
    pub removed_at: DateTime<Utc>,
}

impl SalesLedgerEntry {
    /// Returns the frozen unit price as Money.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }
}

// =============================================================================
// Invoice Line
// =============================================================================

/// A line on a bill being composed. Owned by the caller, never persisted
/// as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct InvoiceLine {
    pub name: String,
    #[ts(as = "String")]
    pub unit_price: Decimal,
    pub quantity: i64,
}

impl InvoiceLine {
    pub fn new(name: impl Into<String>, unit_price: Decimal, quantity: i64) -> Self {
        InvoiceLine {
            name: name.into(),
            unit_price,
            quantity,
        }
    }
}

// =============================================================================
// Bill
// =============================================================================

/// A line of a `create_bill` request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BillItemRequest {
    pub product_id: ProductId,
    /// Must match the catalog name exactly; guards against id typos.
    pub product_name: String,
    pub quantity: i64,
    /// The price actually charged for one unit.
    pub price_per_item: Money,
}

/// A persisted bill line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct BillItem {
    pub id: i64,
    pub bill_id: BillId,
    pub product_id: ProductId,
    /// The ledger entry recording this line's stock removal.
    pub ledger_entry_id: LedgerEntryId,
    pub product_name: String,
    pub quantity: i64,
    pub price_per_item_cents: i64,
}

impl BillItem {
    pub fn invoice_line(&self) -> InvoiceLine {
        InvoiceLine::new(
            self.product_name.clone(),
            Money::from_cents(self.price_per_item_cents).to_decimal(),
            self.quantity,
        )
    }
}

/// A persisted bill. Totals are not stored; [`Bill::totals`] recomputes
/// them from the lines every time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Bill {
    pub id: BillId,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    pub tax_rate: Rate,
    pub discount_rate: Rate,
    pub items: Vec<BillItem>,
}

impl Bill {
    pub fn lines(&self) -> Vec<InvoiceLine> {
        self.items.iter().map(BillItem::invoice_line).collect()
    }

    pub fn totals(&self) -> CoreResult<InvoiceTotals> {
        Ok(compute_totals(&self.lines(), self.tax_rate, self.discount_rate)?)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
