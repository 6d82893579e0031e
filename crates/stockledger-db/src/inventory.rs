//! # Inventory Service
//!
//! The only component that writes to both the Catalog Store and the Sales
//! Ledger.
//!
//! ## Atomic Removal
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  sell(id=7, quantity=2)                                                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  write_gate.lock()           one stock mutation at a time              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  BEGIN                                                                  │
//! │   ├── UPDATE products ... WHERE quantity - 2 >= 0 RETURNING *          │
//! │   │        └── no row → InsufficientStock / ProductNotFound ──┐        │
//! │   └── INSERT INTO sales_ledger (snapshot of returned row)     │        │
//! │            └── storage fault ─────────────────────────────────┤        │
//! │  COMMIT                                                       │        │
//! │       │                                                       ▼        │
//! │       ▼                                         transaction dropped    │
//! │  InvoiceLine { "Widget", 5.00, 2 }              = ROLLBACK, no change  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The stock check and the decrement are one conditional statement, and the
//! ledger append shares its transaction. A caller can never observe stock
//! decremented without an audit record, or an audit record without the
//! decrement.

use std::sync::Arc;

use sqlx::{Sqlite, SqliteConnection, SqlitePool, Transaction};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use stockledger_core::validation::{validate_quantity, validate_rate};
use stockledger_core::{
    Bill, BillItemRequest, CoreError, InvoiceLine, Money, Product, ProductId, ProductPatch, Rate,
    RemovalKind, SalesLedgerEntry, ValidationError,
};

use crate::error::{DbError, DbResult};
use crate::repository::bill::{self, NewBillItem};
use crate::repository::{ledger, product};

/// Orchestrates catalog mutations and their ledger entries.
///
/// Cheap to clone; every clone obtained from the same [`Database`] shares
/// one write gate.
///
/// [`Database`]: crate::Database
#[derive(Debug, Clone)]
pub struct InventoryService {
    pool: SqlitePool,
    write_gate: Arc<Mutex<()>>,
}

impl InventoryService {
    pub fn new(pool: SqlitePool, write_gate: Arc<Mutex<()>>) -> Self {
        InventoryService { pool, write_gate }
    }

    // =========================================================================
    // Catalog
    // =========================================================================

    /// Adds a product. Creation is not a removal, so no ledger entry.
    pub async fn add_product(&self, name: &str, price: Money, quantity: i64) -> DbResult<Product> {
        let mut conn = self.pool.acquire().await?;
        let product = product::create(&mut conn, name, price, quantity).await?;

        info!(
            id = product.id,
            name = %product.name,
            quantity = product.quantity,
            "Product added"
        );
        Ok(product)
    }

    /// Renames and/or reprices a product. Quantity and ledger are untouched.
    pub async fn update_product(&self, id: ProductId, patch: ProductPatch) -> DbResult<Product> {
        let mut conn = self.pool.acquire().await?;
        let product = product::update(&mut conn, id, &patch).await?;

        info!(id, "Product updated");
        Ok(product)
    }

    pub async fn get_product(&self, id: ProductId) -> DbResult<Product> {
        let mut conn = self.pool.acquire().await?;
        product::find(&mut conn, id)
            .await?
            .ok_or_else(|| CoreError::ProductNotFound(id).into())
    }

    /// Like [`get_product`](Self::get_product), but a stored name that differs
    /// (case-sensitive) is also `ProductNotFound`.
    pub async fn get_product_by_id_and_name(&self, id: ProductId, name: &str) -> DbResult<Product> {
        let product = self.get_product(id).await?;
        if product.name != name {
            debug!(id, requested = %name, stored = %product.name, "Product name mismatch");
            return Err(CoreError::ProductNotFound(id).into());
        }
        Ok(product)
    }

    // =========================================================================
    // Removals
    // =========================================================================

    /// Removes the product row regardless of stock and records the full
    /// remaining quantity in the ledger.
    pub async fn delete_product_full(&self, id: ProductId) -> DbResult<SalesLedgerEntry> {
        let _gate = self.write_gate.lock().await;
        let mut tx = self.begin().await?;

        let removed = product::remove(&mut tx, id).await?;
        let entry = ledger::append(
            &mut tx,
            &removed.snapshot(removed.quantity, RemovalKind::ProductDeleted),
        )
        .await?;

        commit(tx).await?;

        info!(
            id,
            name = %removed.name,
            quantity_removed = entry.quantity_removed,
            ledger_entry = entry.id,
            "Product deleted"
        );
        Ok(entry)
    }

    /// Removes `quantity` units. A product reaching zero stays in the
    /// catalog.
    pub async fn delete_product_quantity(
        &self,
        id: ProductId,
        quantity: i64,
    ) -> DbResult<SalesLedgerEntry> {
        validate_quantity(quantity)?;

        let _gate = self.write_gate.lock().await;
        let mut tx = self.begin().await?;

        let (_, entry) = take_stock(&mut tx, id, None, quantity, RemovalKind::QuantityRemoved).await?;

        commit(tx).await?;

        info!(id, quantity, ledger_entry = entry.id, "Product quantity removed");
        Ok(entry)
    }

    /// Sells `quantity` units and returns the invoice line for them.
    ///
    /// The line carries the name and price captured by the decrement itself,
    /// so no re-read is needed after the mutation.
    pub async fn sell(&self, id: ProductId, quantity: i64) -> DbResult<InvoiceLine> {
        validate_quantity(quantity)?;

        let _gate = self.write_gate.lock().await;
        let mut tx = self.begin().await?;

        let (product, entry) = take_stock(&mut tx, id, None, quantity, RemovalKind::Sold).await?;

        commit(tx).await?;

        info!(id, quantity, remaining = product.quantity, ledger_entry = entry.id, "Sold");
        Ok(product.invoice_line(quantity))
    }

    /// Sells every line and persists the bill, all in one transaction.
    ///
    /// Each line is name-guarded like
    /// [`get_product_by_id_and_name`](Self::get_product_by_id_and_name). If
    /// any line fails, no stock moves and no bill is stored.
    pub async fn create_bill(
        &self,
        items: &[BillItemRequest],
        tax_rate: Rate,
        discount_rate: Rate,
    ) -> DbResult<Bill> {
        if items.is_empty() {
            return Err(ValidationError::Required {
                field: "items".to_string(),
            }
            .into());
        }
        validate_rate(tax_rate)?;
        validate_rate(discount_rate)?;
        for item in items {
            validate_quantity(item.quantity)?;
            if item.price_per_item.is_negative() {
                return Err(ValidationError::MustNotBeNegative {
                    field: "price_per_item".to_string(),
                }
                .into());
            }
        }

        let _gate = self.write_gate.lock().await;
        let mut tx = self.begin().await?;

        let mut lines = Vec::with_capacity(items.len());
        for item in items {
            let (_, entry) = take_stock(
                &mut tx,
                item.product_id,
                Some(item.product_name.as_str()),
                item.quantity,
                RemovalKind::Sold,
            )
            .await?;

            lines.push(NewBillItem {
                product_id: item.product_id,
                ledger_entry_id: entry.id,
                product_name: &item.product_name,
                quantity: item.quantity,
                price_per_item: item.price_per_item,
            });
        }

        let bill = bill::insert(&mut tx, tax_rate, discount_rate, &lines).await?;

        commit(tx).await?;

        info!(bill_id = bill.id, lines = bill.items.len(), "Bill created");
        Ok(bill)
    }

    async fn begin(&self) -> DbResult<Transaction<'static, Sqlite>> {
        self.pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))
    }
}

async fn commit(tx: Transaction<'static, Sqlite>) -> DbResult<()> {
    tx.commit()
        .await
        .map_err(|e| DbError::TransactionFailed(e.to_string()))
}

/// Conditional decrement followed by the matching ledger append.
async fn take_stock(
    conn: &mut SqliteConnection,
    id: ProductId,
    expected_name: Option<&str>,
    quantity: i64,
    kind: RemovalKind,
) -> DbResult<(Product, SalesLedgerEntry)> {
    let product = match product::adjust_quantity(conn, id, -quantity, expected_name).await {
        Ok(product) => product,
        Err(err) => {
            if let DbError::Domain(CoreError::InsufficientStock { available, .. }) = &err {
                warn!(id, available, requested = quantity, "Stock request rejected");
            }
            return Err(err);
        }
    };

    let entry = ledger::append(conn, &product.snapshot(quantity, kind)).await?;
    Ok((product, entry))
}

// =============================================================================
// Unit Tests
// =============================================================================
