//! # Bill Commands
//!
//! Composing, persisting and listing bills.
//!
//! ## Bill Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Cashier adds lines in the UI                                          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  compute_bill_totals(lines)   ← pure, re-run on every line change      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  create_bill(items)           ← one transaction: every line sold,      │
//! │       │                          ledgered and stored, or none          │
//! │       ▼                                                                 │
//! │  BillDto { items, totals }    ← totals recomputed from stored lines    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Amounts leave this module rounded to cents. Everything upstream is exact.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use stockledger_core::{
    compute_totals, Bill, BillId, BillItem, BillItemRequest, InvoiceLine, InvoiceTotals, Money,
    ProductId, Rate,
};

use crate::error::ApiError;
use crate::state::{ConfigState, DbState};

/// A line of a bill to create.
///
/// `product_id` is required: names are not unique, so each line is sold by
/// id and `product_name` must match the stored name (case-sensitive) or the
/// line fails with `NOT_FOUND`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillItemInput {
    pub product_id: ProductId,
    pub product_name: String,
    pub quantity: i64,
    /// Charged unit price; may differ from the catalog price.
    pub price_per_item: Decimal,
}

/// Totals rounded to cents for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TotalsDto {
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub discount_amount: Decimal,
    pub total: Decimal,
    pub formatted_total: String,
}

impl TotalsDto {
    fn present(totals: InvoiceTotals, config: &ConfigState) -> Self {
        let shown = totals.rounded();
        TotalsDto {
            subtotal: shown.subtotal,
            tax: shown.tax,
            discount_amount: shown.discount_amount,
            total: shown.total,
            formatted_total: config.format_currency(totals.total),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillItemDto {
    pub product_id: ProductId,
    pub product_name: String,
    pub quantity: i64,
    pub price_per_item: Decimal,
}

impl From<BillItem> for BillItemDto {
    fn from(item: BillItem) -> Self {
        BillItemDto {
            product_id: item.product_id,
            product_name: item.product_name,
            quantity: item.quantity,
            price_per_item: Money::from_cents(item.price_per_item_cents).to_decimal(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillDto {
    pub id: BillId,
    pub created_at: DateTime<Utc>,
    /// Percent, e.g. `19`.
    pub tax_rate: Decimal,
    pub discount_rate: Decimal,
    pub items: Vec<BillItemDto>,
    pub totals: TotalsDto,
}

impl BillDto {
    fn present(bill: Bill, config: &ConfigState) -> Result<Self, ApiError> {
        let totals = bill.totals()?;
        Ok(BillDto {
            id: bill.id,
            created_at: bill.created_at,
            tax_rate: bill.tax_rate.percent(),
            discount_rate: bill.discount_rate.percent(),
            items: bill.items.into_iter().map(BillItemDto::from).collect(),
            totals: TotalsDto::present(totals, config),
        })
    }
}

/// Sells every line and stores the bill with the configured rates.
///
/// If any line fails (unknown id, name mismatch, not enough stock) nothing
/// is sold and no bill is stored.
pub async fn create_bill(
    db: &DbState,
    config: &ConfigState,
    items: Vec<BillItemInput>,
) -> Result<BillDto, ApiError> {
    debug!(lines = items.len(), "create_bill command");

    let requests = items
        .into_iter()
        .map(|item| {
            Ok(BillItemRequest {
                product_id: item.product_id,
                product_name: item.product_name,
                quantity: item.quantity,
                price_per_item: Money::from_decimal(item.price_per_item, "price_per_item")?,
            })
        })
        .collect::<Result<Vec<_>, ApiError>>()?;

    let bill = db
        .inner()
        .inventory()
        .create_bill(&requests, config.tax_rate, config.discount_rate)
        .await?;

    BillDto::present(bill, config)
}

/// Every stored bill, newest first.
pub async fn get_bills(db: &DbState, config: &ConfigState) -> Result<Vec<BillDto>, ApiError> {
    let bills = db.inner().bills().list().await?;
    bills
        .into_iter()
        .map(|bill| BillDto::present(bill, config))
        .collect()
}

/// Totals for the lines of an open bill. Rates are percentages and default
/// to the configured ones.
pub fn compute_bill_totals(
    config: &ConfigState,
    lines: Vec<InvoiceLine>,
    tax_rate: Option<Decimal>,
    discount_rate: Option<Decimal>,
) -> Result<TotalsDto, ApiError> {
    let tax_rate = tax_rate
        .map(Rate::from_percent)
        .transpose()?
        .unwrap_or(config.tax_rate);
    let discount_rate = discount_rate
        .map(Rate::from_percent)
        .transpose()?
        .unwrap_or(config.discount_rate);

    let totals = compute_totals(&lines, tax_rate, discount_rate)?;
    Ok(TotalsDto::present(totals, config))
}
