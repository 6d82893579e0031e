//! # Query Facade
//!
//! Read-only paged listings of the catalog and the sales ledger.
//!
//! Both listings page over the full ordered `list()` of their store, so a
//! page is exactly the slice `[(page-1)*page_size, page*page_size)` of what
//! an unpaged read would return. Out-of-range pages come back empty.

use tracing::debug;

use stockledger_core::{paginate, Page, Product, SalesLedgerEntry};

use crate::error::DbResult;
use crate::repository::{LedgerRepository, ProductRepository};

#[derive(Debug, Clone)]
pub struct QueryFacade {
    products: ProductRepository,
    ledger: LedgerRepository,
}

impl QueryFacade {
    pub fn new(products: ProductRepository, ledger: LedgerRepository) -> Self {
        QueryFacade { products, ledger }
    }

    /// One page of the catalog, by id ascending.
    pub async fn list_products(&self, page: u32, page_size: u32) -> DbResult<Page<Product>> {
        debug!(page, page_size, "Paging products");
        let products = self.products.list().await?;
        Ok(paginate(products, page, page_size)?)
    }

    /// One page of the ledger, oldest removal first.
    pub async fn list_sales_ledger(
        &self,
        page: u32,
        page_size: u32,
    ) -> DbResult<Page<SalesLedgerEntry>> {
        debug!(page, page_size, "Paging sales ledger");
        let entries = self.ledger.list().await?;
        Ok(paginate(entries, page, page_size)?)
    }
}
