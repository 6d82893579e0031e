//! # StockLedger App Library
//!
//! The command surface a UI drives: state bootstrap, logging, and one typed
//! async function per operation.
//!
//! ## Module Organization
//! ```text
//! stockledger_app/
//! ├── lib.rs          ◄─── You are here (bootstrap & logging)
//! ├── state/
//! │   ├── mod.rs      ◄─── State type exports
//! │   ├── db.rs       ◄─── Database state wrapper
//! │   └── config.rs   ◄─── Configuration state
//! ├── commands/
//! │   ├── mod.rs      ◄─── Command exports
//! │   ├── product.rs  ◄─── Catalog, removals, sell
//! │   ├── ledger.rs   ◄─── Sales ledger listings
//! │   └── bill.rs     ◄─── Bills and totals
//! └── error.rs        ◄─── API error type for commands
//! ```
//!
//! ## Usage
//! ```rust,ignore
//! stockledger_app::init_tracing();
//! let (db, config) = stockledger_app::bootstrap().await?;
//!
//! let widget = commands::product::add_product(&db, "Widget".into(), dec!(5.00), 3).await?;
//! let line = commands::product::sell(&db, widget.id, 2).await?;
//! let totals = commands::bill::compute_bill_totals(&config, vec![line], None, None)?;
//! ```

pub mod commands;
pub mod error;
pub mod state;

use directories::ProjectDirs;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use error::ApiError;
use state::{ConfigState, DbState};
use stockledger_db::{Database, DbConfig};

/// Opens the database and loads configuration.
///
/// ## Startup Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                       Application Startup                               │
/// │                                                                         │
/// │  1. Load Configuration ───────────────────────────────────────────────► │
/// │     • STOCKLEDGER_* environment overrides on top of defaults            │
/// │                                                                         │
/// │  2. Determine Database Path ──────────────────────────────────────────► │
/// │     • STOCKLEDGER_DB_PATH, else the platform data directory             │
/// │                                                                         │
/// │  3. Connect to Database ──────────────────────────────────────────────► │
/// │     • SQLite with WAL mode                                              │
/// │     • Run pending migrations                                            │
/// │     • Health check (SELECT 1)                                           │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub async fn bootstrap() -> Result<(DbState, ConfigState), ApiError> {
    info!("Starting StockLedger");

    let config = ConfigState::from_env();
    info!(store = %config.store_name, tax_bps = config.tax_rate.bps(), "Configuration loaded");

    let db_path = database_path()?;
    info!(?db_path, "Database path determined");

    let db = Database::new(DbConfig::new(db_path)).await?;
    if !db.health_check().await {
        return Err(ApiError::storage("Database is not responding"));
    }
    info!("Database connected and migrations applied");

    Ok((DbState::new(db), config))
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=stockledger=trace` - Show trace for stockledger crates only
/// - Default: INFO, DEBUG for stockledger crates, WARN for sqlx
///
/// Safe to call more than once; later calls are no-ops.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,stockledger=debug,sqlx=warn"));

    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Determines the database file path.
///
/// ## Platform-Specific Paths
/// - **macOS**: `~/Library/Application Support/com.StockLedger.StockLedger/stockledger.db`
/// - **Windows**: `%APPDATA%\StockLedger\StockLedger\data\stockledger.db`
/// - **Linux**: `~/.local/share/stockledger/stockledger.db`
///
/// ## Development Override
/// Set `STOCKLEDGER_DB_PATH` to use a custom path.
pub fn database_path() -> Result<PathBuf, ApiError> {
    if let Ok(path) = std::env::var("STOCKLEDGER_DB_PATH") {
        return Ok(PathBuf::from(path));
    }

    let proj_dirs = ProjectDirs::from("com", "StockLedger", "StockLedger")
        .ok_or_else(|| ApiError::storage("Could not determine app data directory"))?;

    let data_dir = proj_dirs.data_dir();

    std::fs::create_dir_all(data_dir).map_err(|e| {
        tracing::error!(dir = %data_dir.display(), "Cannot create data directory: {}", e);
        ApiError::storage("Could not create app data directory")
    })?;

    Ok(data_dir.join("stockledger.db"))
}
