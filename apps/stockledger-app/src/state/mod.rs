//! # State Module
//!
//! Application state handed to commands.
//!
//! Commands take only the state they need, as plain references:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │          ┌──────────────────────┬──────────────────────┐               │
//! │          ▼                      ▼                      │               │
//! │  ┌──────────────────┐   ┌──────────────────┐           │               │
//! │  │     DbState      │   │   ConfigState    │           │               │
//! │  │                  │   │                  │    bootstrap()             │
//! │  │  Database        │   │  store_name      │                           │
//! │  │  (SQLite pool +  │   │  tax_rate        │                           │
//! │  │   write gate)    │   │  discount_rate   │                           │
//! │  │                  │   │  page_size       │                           │
//! │  └──────────────────┘   └──────────────────┘                           │
//! │                                                                         │
//! │  THREAD SAFETY:                                                        │
//! │  • DbState: pool is thread-safe, stock writes share one async gate    │
//! │  • ConfigState: read-only after initialization                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod db;

pub use config::ConfigState;
pub use db::DbState;
