//! # Product Repository (Catalog Store)
//!
//! Durable mapping of product id to name, price and on-hand quantity.
//!
//! ## Conditional Writes
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │              Quantity changes are one statement each                    │
//! │                                                                         │
//! │  adjust_quantity(id=7, delta=-2)                                       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  UPDATE products SET quantity = quantity + (-2)                        │
//! │   WHERE id = 7 AND quantity + (-2) >= 0                                │
//! │   RETURNING *                                                          │
//! │       │                                                                 │
//! │       ├── row returned  → Ok(product)      check + write in one step   │
//! │       │                                                                 │
//! │       └── no row        → SELECT quantity WHERE id = 7                 │
//! │                             ├── none  → ProductNotFound                │
//! │                             └── q     → InsufficientStock(q)           │
//! │                                                                         │
//! │  There is no read-then-write window for a concurrent seller to slip    │
//! │  into: the guard and the decrement are the same statement.             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The connection-level functions in this module take `&mut SqliteConnection`
//! so the Inventory Service can run them inside its own transaction. The
//! [`ProductRepository`] methods run them on a pooled connection.

use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use stockledger_core::validation::{
    validate_product_name, validate_stock_level, validate_unit_price,
};
use stockledger_core::{CoreError, Money, Product, ProductId, ProductPatch, ValidationError};

use crate::error::DbResult;

const PRODUCT_COLUMNS: &str = "id, name, price_cents, quantity, created_at, updated_at";

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = db.products();
///
/// let product = repo.create("Widget", Money::from_cents(500), 3).await?;
/// let fetched = repo.get(product.id).await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Inserts a new product and returns it with its assigned id.
    ///
    /// ## Errors
    /// `ValidationError` when the trimmed name is empty or too long, the
    /// price is not positive, or the quantity is negative.
    pub async fn create(&self, name: &str, price: Money, quantity: i64) -> DbResult<Product> {
        let mut conn = self.pool.acquire().await?;
        create(&mut conn, name, price, quantity).await
    }

    /// Gets a product by id, failing with `ProductNotFound` when absent.
    pub async fn get(&self, id: ProductId) -> DbResult<Product> {
        self.find(id)
            .await?
            .ok_or_else(|| CoreError::ProductNotFound(id).into())
    }

    /// Gets a product by id.
    ///
    /// ## Returns
    /// * `Ok(Some(Product))` - Product found
    /// * `Ok(None)` - Product not found
    pub async fn find(&self, id: ProductId) -> DbResult<Option<Product>> {
        let mut conn = self.pool.acquire().await?;
        find(&mut conn, id).await
    }

    /// Applies a name and/or price change. Quantity is never touched.
    pub async fn update(&self, id: ProductId, patch: ProductPatch) -> DbResult<Product> {
        let mut conn = self.pool.acquire().await?;
        update(&mut conn, id, &patch).await
    }

    /// Adds `delta` (possibly negative) to the on-hand quantity.
    ///
    /// ## Errors
    /// * `ProductNotFound` - no such id
    /// * `InsufficientStock` - the result would be negative; nothing changes
    /// * `ValidationError` - the result would not fit in an i64; nothing changes
    pub async fn adjust_quantity(&self, id: ProductId, delta: i64) -> DbResult<Product> {
        let mut conn = self.pool.acquire().await?;
        adjust_quantity(&mut conn, id, delta, None).await
    }

    /// Deletes the live record and returns its pre-deletion snapshot.
    pub async fn remove(&self, id: ProductId) -> DbResult<Product> {
        let mut conn = self.pool.acquire().await?;
        remove(&mut conn, id).await
    }

    /// Lists every product by id ascending.
    ///
    /// Offsets into this list are stable between calls absent mutation.
    pub async fn list(&self) -> DbResult<Vec<Product>> {
        debug!("Listing products");

        let products = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products ORDER BY id ASC"
        ))
        .fetch_all(&self.pool)
        .await?;

        debug!(count = products.len(), "Listed products");
        Ok(products)
    }

    /// Counts products in the catalog.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Connection-level operations
// =============================================================================

pub(crate) async fn create(
    conn: &mut SqliteConnection,
    name: &str,
    price: Money,
    quantity: i64,
) -> DbResult<Product> {
    let name = validate_product_name(name)?;
    validate_unit_price(price)?;
    validate_stock_level(quantity)?;

    debug!(name = %name, price_cents = price.cents(), quantity, "Creating product");

    let now = Utc::now();
    let product = sqlx::query_as::<_, Product>(&format!(
        "INSERT INTO products (name, price_cents, quantity, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?4)
         RETURNING {PRODUCT_COLUMNS}"
    ))
    .bind(&name)
    .bind(price.cents())
    .bind(quantity)
    .bind(now)
    .fetch_one(&mut *conn)
    .await?;

    Ok(product)
}

pub(crate) async fn find(conn: &mut SqliteConnection, id: ProductId) -> DbResult<Option<Product>> {
    debug!(id, "Getting product");

    let product = sqlx::query_as::<_, Product>(&format!(
        "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?1"
    ))
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(product)
}

pub(crate) async fn update(
    conn: &mut SqliteConnection,
    id: ProductId,
    patch: &ProductPatch,
) -> DbResult<Product> {
    let name = patch.name.as_deref().map(validate_product_name).transpose()?;
    if let Some(price) = patch.price {
        validate_unit_price(price)?;
    }

    if patch.is_empty() {
        return find(conn, id)
            .await?
            .ok_or_else(|| CoreError::ProductNotFound(id).into());
    }

    debug!(id, name = ?name, price = ?patch.price, "Updating product");

    let product = sqlx::query_as::<_, Product>(&format!(
        "UPDATE products
         SET name = COALESCE(?1, name),
             price_cents = COALESCE(?2, price_cents),
             updated_at = ?3
         WHERE id = ?4
         RETURNING {PRODUCT_COLUMNS}"
    ))
    .bind(name)
    .bind(patch.price.map(|p| p.cents()))
    .bind(Utc::now())
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?;

    product.ok_or_else(|| CoreError::ProductNotFound(id).into())
}

/// Conditional quantity change. With `expected_name`, a row whose name
/// differs (case-sensitive) is reported as not found.
pub(crate) async fn adjust_quantity(
    conn: &mut SqliteConnection,
    id: ProductId,
    delta: i64,
    expected_name: Option<&str>,
) -> DbResult<Product> {
    debug!(id, delta, "Adjusting product quantity");

    let updated = sqlx::query_as::<_, Product>(&format!(
        "UPDATE products
         SET quantity = quantity + ?1, updated_at = ?2
         WHERE id = ?3
           AND quantity + ?1 >= 0
           AND (?1 <= 0 OR quantity <= 9223372036854775807 - ?1)
           AND (?4 IS NULL OR name = ?4)
         RETURNING {PRODUCT_COLUMNS}"
    ))
    .bind(delta)
    .bind(Utc::now())
    .bind(id)
    .bind(expected_name)
    .fetch_optional(&mut *conn)
    .await?;

    if let Some(product) = updated {
        return Ok(product);
    }

    // Nothing matched: work out which guard failed.
    let current: Option<(String, i64)> =
        sqlx::query_as("SELECT name, quantity FROM products WHERE id = ?1")
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?;

    let err = match current {
        Some((name, _)) if expected_name.is_some_and(|expected| expected != name) => {
            CoreError::ProductNotFound(id)
        }
        Some((_, available)) if delta > 0 => {
            return Err(ValidationError::OutOfRange {
                field: "quantity".to_string(),
                min: 0,
                max: i64::MAX - available,
            }
            .into());
        }
        Some((_, available)) => CoreError::InsufficientStock {
            product_id: id,
            available,
            requested: delta.saturating_neg(),
        },
        None => CoreError::ProductNotFound(id),
    };
    Err(err.into())
}

pub(crate) async fn remove(conn: &mut SqliteConnection, id: ProductId) -> DbResult<Product> {
    debug!(id, "Removing product");

    let removed = sqlx::query_as::<_, Product>(&format!(
        "DELETE FROM products WHERE id = ?1 RETURNING {PRODUCT_COLUMNS}"
    ))
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?;

    removed.ok_or_else(|| CoreError::ProductNotFound(id).into())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DbError;
    use crate::{Database, DbConfig};

    async fn repo() -> ProductRepository {
        Database::new(DbConfig::in_memory()).await.unwrap().products()
    }

    #[tokio::test]
    async fn test_create_assigns_increasing_ids() {
        let repo = repo().await;

        let a = repo.create("Widget", Money::from_cents(500), 3).await.unwrap();
        let b = repo.create("  Gadget  ", Money::from_cents(250), 0).await.unwrap();

        assert!(b.id > a.id);
        assert_eq!(b.name, "Gadget");
        assert_eq!(b.quantity, 0);
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_input() {
        let repo = repo().await;

        for (name, price, quantity) in [
            ("", 500, 1),
            ("   ", 500, 1),
            ("Widget", 0, 1),
            ("Widget", -1, 1),
            ("Widget", 500, -1),
        ] {
            let err = repo
                .create(name, Money::from_cents(price), quantity)
                .await
                .unwrap_err();
            assert!(
                matches!(err, DbError::Domain(CoreError::Validation(_))),
                "{name:?} {price} {quantity} gave {err:?}"
            );
        }
        assert_eq!(repo.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_get_missing_is_not_found() {
        let repo = repo().await;

        assert!(repo.find(42).await.unwrap().is_none());
        assert!(matches!(
            repo.get(42).await,
            Err(DbError::Domain(CoreError::ProductNotFound(42)))
        ));
    }

    #[tokio::test]
    async fn test_update_name_and_price_only() {
        let repo = repo().await;
        let product = repo.create("Widget", Money::from_cents(500), 3).await.unwrap();

        let renamed = repo
            .update(
                product.id,
                ProductPatch {
                    name: Some("Widget XL".to_string()),
                    price: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(renamed.name, "Widget XL");
        assert_eq!(renamed.price_cents, 500);
        assert_eq!(renamed.quantity, 3);

        let repriced = repo
            .update(
                product.id,
                ProductPatch {
                    name: None,
                    price: Some(Money::from_cents(650)),
                },
            )
            .await
            .unwrap();
        assert_eq!(repriced.name, "Widget XL");
        assert_eq!(repriced.price_cents, 650);
    }

    #[tokio::test]
    async fn test_update_rejects_invalid_price_and_missing_id() {
        let repo = repo().await;
        let product = repo.create("Widget", Money::from_cents(500), 3).await.unwrap();

        let bad_price = ProductPatch {
            name: None,
            price: Some(Money::zero()),
        };
        assert!(matches!(
            repo.update(product.id, bad_price).await,
            Err(DbError::Domain(CoreError::Validation(_)))
        ));

        let rename = ProductPatch {
            name: Some("Gadget".to_string()),
            price: None,
        };
        assert!(matches!(
            repo.update(999, rename).await,
            Err(DbError::Domain(CoreError::ProductNotFound(999)))
        ));
    }

    #[tokio::test]
    async fn test_adjust_quantity() {
        let repo = repo().await;
        let product = repo.create("Widget", Money::from_cents(500), 3).await.unwrap();

        assert_eq!(repo.adjust_quantity(product.id, 4).await.unwrap().quantity, 7);
        assert_eq!(repo.adjust_quantity(product.id, -7).await.unwrap().quantity, 0);

        let err = repo.adjust_quantity(product.id, -1).await.unwrap_err();
        assert!(matches!(
            err,
            DbError::Domain(CoreError::InsufficientStock {
                available: 0,
                requested: 1,
                ..
            })
        ));
        assert_eq!(repo.get(product.id).await.unwrap().quantity, 0);
    }

    #[tokio::test]
    async fn test_adjust_quantity_rejects_overflow() {
        let repo = repo().await;
        let product = repo.create("Widget", Money::from_cents(500), 3).await.unwrap();

        let err = repo.adjust_quantity(product.id, i64::MAX).await.unwrap_err();
        assert!(
            matches!(
                err,
                DbError::Domain(CoreError::Validation(ValidationError::OutOfRange { .. }))
            ),
            "got {err:?}"
        );

        // The row is untouched and the catalog still reads.
        assert_eq!(repo.get(product.id).await.unwrap().quantity, 3);
        assert_eq!(repo.list().await.unwrap().len(), 1);

        let topped = repo.adjust_quantity(product.id, i64::MAX - 3).await.unwrap();
        assert_eq!(topped.quantity, i64::MAX);
    }

    #[tokio::test]
    async fn test_schema_rejects_non_integer_quantity() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let product = db
            .products()
            .create("Widget", Money::from_cents(500), 3)
            .await
            .unwrap();

        let result = sqlx::query("UPDATE products SET quantity = 1.5 WHERE id = ?1")
            .bind(product.id)
            .execute(db.pool())
            .await;
        assert!(result.is_err());
        assert_eq!(db.products().get(product.id).await.unwrap().quantity, 3);
    }

    #[tokio::test]
    async fn test_adjust_quantity_missing_product() {
        let repo = repo().await;

        assert!(matches!(
            repo.adjust_quantity(5, -1).await,
            Err(DbError::Domain(CoreError::ProductNotFound(5)))
        ));
    }

    #[tokio::test]
    async fn test_adjust_quantity_name_guard() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let product = db
            .products()
            .create("Widget", Money::from_cents(500), 3)
            .await
            .unwrap();
        let mut conn = db.pool().acquire().await.unwrap();

        let err = adjust_quantity(&mut conn, product.id, -1, Some("widget"))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Domain(CoreError::ProductNotFound(_))));

        let ok = adjust_quantity(&mut conn, product.id, -1, Some("Widget"))
            .await
            .unwrap();
        assert_eq!(ok.quantity, 2);
    }

    #[tokio::test]
    async fn test_remove_returns_snapshot() {
        let repo = repo().await;
        let product = repo.create("Widget", Money::from_cents(500), 3).await.unwrap();

        let removed = repo.remove(product.id).await.unwrap();
        assert_eq!(removed, product);
        assert!(repo.find(product.id).await.unwrap().is_none());

        assert!(matches!(
            repo.remove(product.id).await,
            Err(DbError::Domain(CoreError::ProductNotFound(_)))
        ));
    }

    #[tokio::test]
    async fn test_ids_are_not_reused() {
        let repo = repo().await;
        let first = repo.create("Widget", Money::from_cents(500), 1).await.unwrap();
        repo.remove(first.id).await.unwrap();

        let second = repo.create("Widget", Money::from_cents(500), 1).await.unwrap();
        assert!(second.id > first.id);
    }

    #[tokio::test]
    async fn test_list_orders_by_id() {
        let repo = repo().await;
        for name in ["Cherry", "Apple", "Banana"] {
            repo.create(name, Money::from_cents(100), 1).await.unwrap();
        }

        let names: Vec<_> = repo.list().await.unwrap().into_iter().map(|p| p.name).collect();
        assert_eq!(names, ["Cherry", "Apple", "Banana"]);
    }
}
