//! # Ledger Commands
//!
//! Read-only views of the sales ledger: every unit that ever left the
//! catalog, with the name and price it had at that moment.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use stockledger_core::{LedgerEntryId, Page, ProductId, RemovalKind, SalesLedgerEntry};

use crate::commands::page_size_or_default;
use crate::error::ApiError;
use crate::state::{ConfigState, DbState};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerEntryDto {
    pub id: LedgerEntryId,
    pub product_id: ProductId,
    pub name: String,
    pub unit_price: Decimal,
    pub quantity_removed: i64,
    pub kind: RemovalKind,
    pub removed_at: DateTime<Utc>,
}

impl From<SalesLedgerEntry> for LedgerEntryDto {
    fn from(e: SalesLedgerEntry) -> Self {
        LedgerEntryDto {
            id: e.id,
            product_id: e.product_id,
            unit_price: e.unit_price().to_decimal(),
            name: e.name,
            quantity_removed: e.quantity_removed,
            kind: e.kind,
            removed_at: e.removed_at,
        }
    }
}

/// The whole ledger, oldest removal first.
pub async fn get_deleted_products(db: &DbState) -> Result<Vec<LedgerEntryDto>, ApiError> {
    let entries = db.inner().ledger().list().await?;
    Ok(entries.into_iter().map(LedgerEntryDto::from).collect())
}

/// One page of the ledger. `page_size` defaults to the configured size.
pub async fn list_sales_ledger(
    db: &DbState,
    config: &ConfigState,
    page: u32,
    page_size: Option<u32>,
) -> Result<Page<LedgerEntryDto>, ApiError> {
    let page_size = page_size_or_default(page_size, config);
    let page = db.inner().queries().list_sales_ledger(page, page_size).await?;
    Ok(page.map(LedgerEntryDto::from))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::product::{add_product, sell};
    use crate::error::ErrorCode;

    #[tokio::test]
    async fn test_ledger_pages() {
        let db = DbState::in_memory().await.unwrap();
        let widget = add_product(&db, "Widget".into(), Decimal::new(250, 2), 30)
            .await
            .unwrap();
        for _ in 0..15 {
            sell(&db, widget.id, 1).await.unwrap();
        }
        let config = ConfigState::default();

        let second = list_sales_ledger(&db, &config, 2, None).await.unwrap();
        assert_eq!(second.items.len(), 5);
        assert_eq!(second.total_pages, 2);
        assert_eq!(second.items[0].unit_price, Decimal::new(250, 2));
        assert_eq!(second.items[0].kind, RemovalKind::Sold);

        let beyond = list_sales_ledger(&db, &config, 3, None).await.unwrap();
        assert!(beyond.items.is_empty());
    }

    #[tokio::test]
    async fn test_invalid_page_size() {
        let db = DbState::in_memory().await.unwrap();
        let config = ConfigState::default();

        let err = list_sales_ledger(&db, &config, 1, Some(0)).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }
}
