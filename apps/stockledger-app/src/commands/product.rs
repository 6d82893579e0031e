//! # Product Commands
//!
//! Catalog maintenance and stock removal.
//!
//! ## Removal Commands
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Command                    Catalog row          Ledger entry           │
//! │  ──────────────────────     ───────────────      ─────────────────      │
//! │  delete_product(id)         deleted              full stock,            │
//! │                                                  product_deleted        │
//! │  delete_product_quantity    quantity -= q        q, quantity_removed    │
//! │    (id, q)                  (row kept at 0)                             │
//! │  sell(id, q)                quantity -= q        q, sold                │
//! │                             returns InvoiceLine                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use stockledger_core::{CoreError, InvoiceLine, Money, Page, Product, ProductId, ProductPatch};
use stockledger_db::DbError;

use crate::commands::page_size_or_default;
use crate::error::ApiError;
use crate::state::{ConfigState, DbState};

/// Product as the UI sees it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDto {
    pub id: ProductId,
    pub name: String,
    pub price: Decimal,
    pub quantity: i64,
}

impl From<Product> for ProductDto {
    fn from(p: Product) -> Self {
        ProductDto {
            id: p.id,
            price: p.price().to_decimal(),
            name: p.name,
            quantity: p.quantity,
        }
    }
}

/// Adds a product to the catalog.
///
/// `price` must be positive with at most two decimal places.
pub async fn add_product(
    db: &DbState,
    name: String,
    price: Decimal,
    quantity: i64,
) -> Result<ProductDto, ApiError> {
    debug!(name = %name, %price, quantity, "add_product command");

    let price = Money::from_decimal(price, "price")?;
    let product = db.inner().inventory().add_product(&name, price, quantity).await?;
    Ok(product.into())
}

/// Renames and/or reprices a product. `None` leaves a field unchanged.
pub async fn update_product(
    db: &DbState,
    id: ProductId,
    name: Option<String>,
    price: Option<Decimal>,
) -> Result<ProductDto, ApiError> {
    debug!(id, "update_product command");

    let patch = ProductPatch {
        name,
        price: price.map(|p| Money::from_decimal(p, "price")).transpose()?,
    };
    let product = db.inner().inventory().update_product(id, patch).await?;
    Ok(product.into())
}

/// Deletes the product and records its remaining stock in the ledger.
pub async fn delete_product(db: &DbState, id: ProductId) -> Result<(), ApiError> {
    debug!(id, "delete_product command");
    db.inner().inventory().delete_product_full(id).await?;
    Ok(())
}

/// Removes `quantity` units, keeping the product even at zero stock.
pub async fn delete_product_quantity(
    db: &DbState,
    id: ProductId,
    quantity: i64,
) -> Result<(), ApiError> {
    debug!(id, quantity, "delete_product_quantity command");
    db.inner()
        .inventory()
        .delete_product_quantity(id, quantity)
        .await?;
    Ok(())
}

/// Sells `quantity` units and returns the line to add to the open bill.
pub async fn sell(db: &DbState, id: ProductId, quantity: i64) -> Result<InvoiceLine, ApiError> {
    debug!(id, quantity, "sell command");
    Ok(db.inner().inventory().sell(id, quantity).await?)
}

/// Every product, by id.
pub async fn get_products(db: &DbState) -> Result<Vec<ProductDto>, ApiError> {
    let products = db.inner().products().list().await?;
    Ok(products.into_iter().map(ProductDto::from).collect())
}

/// One page of the catalog. `page_size` defaults to the configured size.
pub async fn list_products(
    db: &DbState,
    config: &ConfigState,
    page: u32,
    page_size: Option<u32>,
) -> Result<Page<ProductDto>, ApiError> {
    let page_size = page_size_or_default(page_size, config);
    let page = db.inner().queries().list_products(page, page_size).await?;
    Ok(page.map(ProductDto::from))
}

/// The product, or `None` when the id is not in the catalog.
pub async fn get_product_by_id(
    db: &DbState,
    id: ProductId,
) -> Result<Option<ProductDto>, ApiError> {
    debug!(id, "get_product_by_id command");
    let product = db.inner().products().find(id).await?;
    Ok(product.map(ProductDto::from))
}

/// The product, or `None` when the id is absent or its name differs.
pub async fn get_product_by_id_and_name(
    db: &DbState,
    id: ProductId,
    name: String,
) -> Result<Option<ProductDto>, ApiError> {
    debug!(id, name = %name, "get_product_by_id_and_name command");
    match db
        .inner()
        .inventory()
        .get_product_by_id_and_name(id, &name)
        .await
    {
        Ok(product) => Ok(Some(product.into())),
        Err(DbError::Domain(CoreError::ProductNotFound(_))) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::ledger::get_deleted_products;
    use crate::error::ErrorCode;

    async fn state() -> DbState {
        DbState::in_memory().await.unwrap()
    }

    #[tokio::test]
    async fn test_add_and_fetch() {
        let db = state().await;

        let added = add_product(&db, "Widget".into(), Decimal::new(500, 2), 3)
            .await
            .unwrap();

        assert_eq!(added.price, Decimal::new(5, 0));
        assert_eq!(get_product_by_id(&db, added.id).await.unwrap(), Some(added.clone()));
        assert_eq!(get_products(&db).await.unwrap(), vec![added]);
    }

    #[tokio::test]
    async fn test_add_rejects_bad_input() {
        let db = state().await;

        for (name, price, quantity) in [
            ("", Decimal::ONE, 1),
            ("Widget", Decimal::ZERO, 1),
            ("Widget", Decimal::new(1999, 3), 1),
            ("Widget", Decimal::ONE, -1),
        ] {
            let err = add_product(&db, name.into(), price, quantity).await.unwrap_err();
            assert_eq!(err.code, ErrorCode::ValidationError, "{name} {price} {quantity}");
        }
    }

    #[tokio::test]
    async fn test_update_product() {
        let db = state().await;
        let added = add_product(&db, "Widget".into(), Decimal::new(500, 2), 3)
            .await
            .unwrap();

        let updated = update_product(&db, added.id, None, Some(Decimal::new(725, 2)))
            .await
            .unwrap();
        assert_eq!(updated.name, "Widget");
        assert_eq!(updated.price, Decimal::new(725, 2));
        assert_eq!(updated.quantity, 3);

        let err = update_product(&db, 99, Some("Gadget".into()), None)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_lookups_return_none() {
        let db = state().await;
        let added = add_product(&db, "Widget".into(), Decimal::ONE, 3)
            .await
            .unwrap();

        assert_eq!(get_product_by_id(&db, 99).await.unwrap(), None);
        assert_eq!(
            get_product_by_id_and_name(&db, added.id, "Gadget".into())
                .await
                .unwrap(),
            None
        );
        assert!(get_product_by_id_and_name(&db, added.id, "Widget".into())
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn test_removal_commands() {
        let db = state().await;
        let widget = add_product(&db, "Widget".into(), Decimal::new(500, 2), 3)
            .await
            .unwrap();

        let err = delete_product_quantity(&db, widget.id, 4).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::InsufficientStock);

        delete_product_quantity(&db, widget.id, 1).await.unwrap();
        let line = sell(&db, widget.id, 2).await.unwrap();
        assert_eq!(line.unit_price, Decimal::new(500, 2));

        let zero = get_product_by_id(&db, widget.id).await.unwrap().unwrap();
        assert_eq!(zero.quantity, 0);

        delete_product(&db, widget.id).await.unwrap();
        assert!(get_products(&db).await.unwrap().is_empty());

        let ledger = get_deleted_products(&db).await.unwrap();
        let removed: Vec<_> = ledger.iter().map(|e| e.quantity_removed).collect();
        assert_eq!(removed, vec![1, 2, 0]);

        let err = delete_product(&db, widget.id).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_list_products_uses_configured_page_size() {
        let db = state().await;
        for i in 1..=12 {
            add_product(&db, format!("Item {i}"), Decimal::ONE, 1)
                .await
                .unwrap();
        }
        let config = ConfigState::default();

        let page = list_products(&db, &config, 2, None).await.unwrap();
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.total_pages, 2);

        let page = list_products(&db, &config, 1, Some(5)).await.unwrap();
        assert_eq!(page.items.len(), 5);
        assert_eq!(page.total_pages, 3);
    }

    #[test]
    fn test_dto_serializes_camel_case() {
        let dto = ProductDto {
            id: 1,
            name: "Widget".into(),
            price: Decimal::new(500, 2),
            quantity: 3,
        };
        let json = serde_json::to_value(&dto).unwrap();
        assert_eq!(json["price"], "5.00");
        assert_eq!(json["quantity"], 3);
    }
}
