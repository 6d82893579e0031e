//! # stockledger-db: Database Layer for StockLedger
//!
//! SQLite persistence for the catalog, the sales ledger and bill history,
//! plus the Inventory Service that keeps them consistent.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        StockLedger Data Flow                            │
//! │                                                                         │
//! │  App command (sell, delete_product, create_bill, ...)                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  stockledger-db (THIS CRATE)                    │   │
//! │  │                                                                 │   │
//! │  │   ┌────────────────┐   ┌────────────────┐   ┌──────────────┐   │   │
//! │  │   │InventoryService│   │  Repositories  │   │  Migrations  │   │   │
//! │  │   │ (inventory.rs) │──►│ product.rs     │   │  (embedded)  │   │   │
//! │  │   │ write gate +   │   │ ledger.rs      │   │              │   │   │
//! │  │   │ transactions   │   │ bill.rs        │   │ 001_init.sql │   │   │
//! │  │   └────────────────┘   └────────────────┘   └──────────────┘   │   │
//! │  │   ┌────────────────┐          ▲                                 │   │
//! │  │   │  QueryFacade   │──────────┘  paged reads                    │   │
//! │  │   └────────────────┘                                            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite (WAL) in the platform data dir                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Catalog Store, Sales Ledger, bills
//! - [`inventory`] - Atomic catalog + ledger mutations
//! - [`query`] - Paged listings
//!
//! ## Usage
//!
//! ```rust,ignore
//! use stockledger_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("path/to/stockledger.db")).await?;
//!
//! let widget = db.inventory().add_product("Widget", Money::from_cents(500), 3).await?;
//! let line = db.inventory().sell(widget.id, 2).await?;
//! let page = db.queries().list_sales_ledger(1, 10).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod inventory;
pub mod migrations;
pub mod pool;
pub mod query;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use inventory::InventoryService;
pub use pool::{Database, DbConfig};
pub use query::QueryFacade;

// Repository re-exports for convenience
pub use repository::{BillRepository, LedgerRepository, ProductRepository};
