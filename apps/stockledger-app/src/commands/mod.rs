//! # Commands Module
//!
//! The typed command surface consumed by the UI. One async function per
//! operation, explicit parameters, `Result<T, ApiError>` out.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs      ◄─── You are here (exports)
//! ├── product.rs  ◄─── Catalog CRUD, removals, sell, paged catalog
//! ├── ledger.rs   ◄─── Sales ledger listings
//! └── bill.rs     ◄─── Bill creation, history, totals
//! ```
//!
//! ## How Commands Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Command Flow                                         │
//! │                                                                         │
//! │  UI                                                                     │
//! │  ──                                                                     │
//! │  sell(&db, 7, 2)                                                        │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  async fn sell(                                                         │
//! │      db: &DbState,        ◄── only the state it needs                  │
//! │      id: i64,                                                           │
//! │      quantity: i64,                                                     │
//! │  ) -> Result<InvoiceLine, ApiError>                                     │
//! │         │                                                               │
//! │         │ (camelCase JSON via serde)                                    │
//! │         ▼                                                               │
//! │  UI receives: { name, unitPrice, quantity }                             │
//! │                                                                         │
//! │  After any successful write the UI re-reads the listing it shows.      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod bill;
pub mod ledger;
pub mod product;

pub use bill::{BillDto, BillItemDto, BillItemInput, TotalsDto};
pub use ledger::LedgerEntryDto;
pub use product::ProductDto;

/// Resolves an optional page size against the configured default.
pub(crate) fn page_size_or_default(
    page_size: Option<u32>,
    config: &crate::state::ConfigState,
) -> u32 {
    page_size.unwrap_or(config.page_size)
}
