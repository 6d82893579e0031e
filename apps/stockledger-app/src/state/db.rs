//! # Database State
//!
//! Wraps the `Database` handle for use in commands.
//!
//! The pool inside is thread-safe, and every `inventory()` service obtained
//! from it shares the same write gate, so concurrent commands need no extra
//! locking here.

use stockledger_db::{Database, DbConfig, DbResult};

/// Wrapper around `Database` for command state.
#[derive(Debug, Clone)]
pub struct DbState {
    db: Database,
}

impl DbState {
    /// Creates a new DbState wrapping the database connection.
    pub fn new(db: Database) -> Self {
        DbState { db }
    }

    /// Opens an isolated in-memory database with migrations applied.
    pub async fn in_memory() -> DbResult<Self> {
        Ok(DbState::new(Database::new(DbConfig::in_memory()).await?))
    }

    /// Returns a reference to the inner Database.
    pub fn inner(&self) -> &Database {
        &self.db
    }
}
