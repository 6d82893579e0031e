//! # Repository Module
//!
//! Table-level access for StockLedger.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Two ways into each table                             │
//! │                                                                         │
//! │  Repository methods (own a pool)        Connection functions            │
//! │  ───────────────────────────────        ────────────────────────        │
//! │  db.products().list()                   product::adjust_quantity(       │
//! │  db.ledger().list()                         &mut tx, id, delta, ..)     │
//! │  db.bills().list()                      ledger::append(&mut tx, ..)     │
//! │       │                                 bill::insert(&mut tx, ..)       │
//! │       │                                      │                          │
//! │       ▼                                      ▼                          │
//! │  one pooled connection per call         caller's transaction           │
//! │                                         (InventoryService)              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`ProductRepository`] - Catalog Store
//! - [`LedgerRepository`] - Sales Ledger (append-only)
//! - [`BillRepository`] - Bill history

pub mod bill;
pub mod ledger;
pub mod product;

pub use bill::BillRepository;
pub use ledger::LedgerRepository;
pub use product::ProductRepository;
