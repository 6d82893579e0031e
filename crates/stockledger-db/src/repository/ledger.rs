//! # Ledger Repository (Sales Ledger)
//!
//! Append-only record of every unit that left inventory.
//!
//! Entries are written only through [`append`], always inside the same
//! transaction as the catalog change they describe. The table itself
//! rejects UPDATE and DELETE with triggers.
//!
//! ## Timestamps
//! `removed_at` is `max(now, previous removed_at)`, so ordering by
//! `(removed_at, id)` matches insertion order even if the wall clock steps
//! backwards between two removals.

use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use stockledger_core::{LedgerSnapshot, SalesLedgerEntry};

use crate::error::DbResult;

const LEDGER_COLUMNS: &str =
    "id, product_id, name, unit_price_cents, quantity_removed, kind, removed_at";

/// Read access to the Sales Ledger.
#[derive(Debug, Clone)]
pub struct LedgerRepository {
    pool: SqlitePool,
}

impl LedgerRepository {
    pub fn new(pool: SqlitePool) -> Self {
        LedgerRepository { pool }
    }

    /// Lists every entry ordered by `removed_at`, ties by id.
    pub async fn list(&self) -> DbResult<Vec<SalesLedgerEntry>> {
        debug!("Listing sales ledger");

        let entries = sqlx::query_as::<_, SalesLedgerEntry>(&format!(
            "SELECT {LEDGER_COLUMNS} FROM sales_ledger ORDER BY removed_at ASC, id ASC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }

    /// Entries recorded for one product id, oldest first.
    pub async fn for_product(&self, product_id: i64) -> DbResult<Vec<SalesLedgerEntry>> {
        let entries = sqlx::query_as::<_, SalesLedgerEntry>(&format!(
            "SELECT {LEDGER_COLUMNS} FROM sales_ledger
             WHERE product_id = ?1
             ORDER BY removed_at ASC, id ASC"
        ))
        .bind(product_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }

    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sales_ledger")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

/// Stores `snapshot` permanently, assigning id and timestamp.
///
/// Fails only on a storage fault.
pub(crate) async fn append(
    conn: &mut SqliteConnection,
    snapshot: &LedgerSnapshot,
) -> DbResult<SalesLedgerEntry> {
    let last: Option<chrono::DateTime<Utc>> =
        sqlx::query_scalar("SELECT removed_at FROM sales_ledger ORDER BY id DESC LIMIT 1")
            .fetch_optional(&mut *conn)
            .await?;

    let now = Utc::now();
    let removed_at = last.map_or(now, |last| last.max(now));

    debug!(
        product_id = snapshot.product_id,
        quantity_removed = snapshot.quantity_removed,
        kind = ?snapshot.kind,
        "Appending ledger entry"
    );

    let entry = sqlx::query_as::<_, SalesLedgerEntry>(&format!(
        "INSERT INTO sales_ledger
            (product_id, name, unit_price_cents, quantity_removed, kind, removed_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)
         RETURNING {LEDGER_COLUMNS}"
    ))
    .bind(snapshot.product_id)
    .bind(&snapshot.name)
    .bind(snapshot.unit_price_cents)
    .bind(snapshot.quantity_removed)
    .bind(snapshot.kind)
    .bind(removed_at)
    .fetch_one(&mut *conn)
    .await?;

    Ok(entry)
}

// =============================================================================
// Unit Tests
// =============================================================================
