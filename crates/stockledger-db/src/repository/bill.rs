//! # Bill Repository
//!
//! Persisted bills and their lines.
//!
//! A bill row stores only when it was made and which rates applied. Money
//! totals are never stored: [`Bill::totals`] recomputes them from the lines
//! on every read, so a stored total can never drift from its items.
//!
//! Bills are written by [`InventoryService::create_bill`] in the same
//! transaction as the stock decrements they record.
//!
//! [`InventoryService::create_bill`]: crate::inventory::InventoryService::create_bill

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sqlx::{FromRow, SqliteConnection, SqlitePool};
use tracing::debug;

use stockledger_core::{Bill, BillId, BillItem, LedgerEntryId, Money, ProductId, Rate};

use crate::error::{DbError, DbResult};

const BILL_ITEM_COLUMNS: &str =
    "id, bill_id, product_id, ledger_entry_id, product_name, quantity, price_per_item_cents";

#[derive(Debug, FromRow)]
struct BillRow {
    id: BillId,
    created_at: DateTime<Utc>,
    tax_rate_bps: i64,
    discount_rate_bps: i64,
}

impl BillRow {
    fn into_bill(self, items: Vec<BillItem>) -> DbResult<Bill> {
        Ok(Bill {
            id: self.id,
            created_at: self.created_at,
            tax_rate: stored_rate(self.tax_rate_bps)?,
            discount_rate: stored_rate(self.discount_rate_bps)?,
            items,
        })
    }
}

fn stored_rate(bps: i64) -> DbResult<Rate> {
    u32::try_from(bps)
        .map(Rate::from_bps)
        .map_err(|_| DbError::Internal(format!("stored rate out of range: {bps}")))
}

/// Repository for bill history.
#[derive(Debug, Clone)]
pub struct BillRepository {
    pool: SqlitePool,
}

impl BillRepository {
    pub fn new(pool: SqlitePool) -> Self {
        BillRepository { pool }
    }

    /// Lists every bill newest first, each with its lines.
    pub async fn list(&self) -> DbResult<Vec<Bill>> {
        debug!("Listing bills");

        let rows = sqlx::query_as::<_, BillRow>(
            "SELECT id, created_at, tax_rate_bps, discount_rate_bps
             FROM bills ORDER BY id DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        let items = sqlx::query_as::<_, BillItem>(&format!(
            "SELECT {BILL_ITEM_COLUMNS} FROM bill_items ORDER BY bill_id, id"
        ))
        .fetch_all(&self.pool)
        .await?;

        let mut by_bill: HashMap<BillId, Vec<BillItem>> = HashMap::new();
        for item in items {
            by_bill.entry(item.bill_id).or_default().push(item);
        }

        let bills = rows
            .into_iter()
            .map(|row| {
                let items = by_bill.remove(&row.id).unwrap_or_default();
                row.into_bill(items)
            })
            .collect::<DbResult<Vec<_>>>()?;

        debug!(count = bills.len(), "Listed bills");
        Ok(bills)
    }

    /// Gets one bill with its lines.
    pub async fn get(&self, id: BillId) -> DbResult<Bill> {
        let row = sqlx::query_as::<_, BillRow>(
            "SELECT id, created_at, tax_rate_bps, discount_rate_bps FROM bills WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DbError::not_found("Bill", id))?;

        let items = sqlx::query_as::<_, BillItem>(&format!(
            "SELECT {BILL_ITEM_COLUMNS} FROM bill_items WHERE bill_id = ?1 ORDER BY id"
        ))
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        row.into_bill(items)
    }
}

// =============================================================================
// Connection-level operations
// =============================================================================

/// One line to persist under a bill header.
#[derive(Debug, Clone)]
pub(crate) struct NewBillItem<'a> {
    pub product_id: ProductId,
    pub ledger_entry_id: LedgerEntryId,
    pub product_name: &'a str,
    pub quantity: i64,
    pub price_per_item: Money,
}

/// Inserts a bill header with its lines and returns the stored bill.
pub(crate) async fn insert(
    conn: &mut SqliteConnection,
    tax_rate: Rate,
    discount_rate: Rate,
    lines: &[NewBillItem<'_>],
) -> DbResult<Bill> {
    let row = sqlx::query_as::<_, BillRow>(
        "INSERT INTO bills (created_at, tax_rate_bps, discount_rate_bps)
         VALUES (?1, ?2, ?3)
         RETURNING id, created_at, tax_rate_bps, discount_rate_bps",
    )
    .bind(Utc::now())
    .bind(i64::from(tax_rate.bps()))
    .bind(i64::from(discount_rate.bps()))
    .fetch_one(&mut *conn)
    .await?;

    debug!(bill_id = row.id, lines = lines.len(), "Inserting bill items");

    let mut items = Vec::with_capacity(lines.len());
    for line in lines {
        let item = sqlx::query_as::<_, BillItem>(&format!(
            "INSERT INTO bill_items
                (bill_id, product_id, ledger_entry_id, product_name, quantity, price_per_item_cents)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             RETURNING {BILL_ITEM_COLUMNS}"
        ))
        .bind(row.id)
        .bind(line.product_id)
        .bind(line.ledger_entry_id)
        .bind(line.product_name)
        .bind(line.quantity)
        .bind(line.price_per_item.cents())
        .fetch_one(&mut *conn)
        .await?;
        items.push(item);
    }

    row.into_bill(items)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};

    #[tokio::test]
    async fn test_list_empty() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        assert!(db.bills().list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_get_missing_bill() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        assert!(matches!(
            db.bills().get(7).await,
            Err(DbError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_item_must_reference_ledger_entry() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let mut conn = db.pool().acquire().await.unwrap();

        let dangling = NewBillItem {
            product_id: 1,
            ledger_entry_id: 404,
            product_name: "Widget",
            quantity: 1,
            price_per_item: Money::from_cents(500),
        };
        let err = insert(&mut conn, Rate::from_bps(1900), Rate::zero(), &[dangling])
            .await
            .unwrap_err();

        assert!(matches!(err, DbError::ForeignKeyViolation { .. }));
    }

    #[test]
    fn test_stored_rate_bounds() {
        assert_eq!(stored_rate(1900).unwrap(), Rate::from_bps(1900));
        assert!(stored_rate(-1).is_err());
    }
}
