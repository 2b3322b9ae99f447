//! TenantMux Storage Layer
//!
//! SQLite-backed implementations of the core repository traits.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │                     Gateway                          │
//! ├──────────────────────────────────────────────────────┤
//! │               Repository Traits                      │
//! │   (TenantDirectory, UserProvider, AnalyticsProvider) │
//! ├──────────────────────────────────────────────────────┤
//! │            SQLite Implementations                    │
//! │  (SqliteTenantDirectory, SqliteUserRepository, ...)  │
//! ├──────────────────────────────────────────────────────┤
//! │                   Database                           │
//! │            (SQLite + seed migrations)                │
//! └──────────────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use tenantmux_storage::{Database, SqliteTenantDirectory};
//! use std::sync::Arc;
//! use tokio::sync::Mutex;
//!
//! let db = Arc::new(Mutex::new(Database::open(&path)?));
//! let directory = SqliteTenantDirectory::new(db.clone());
//! ```

mod database;
mod repositories;

pub use database::Database;
pub use repositories::*;

/// Default database file name.
pub const DATABASE_FILE: &str = "tenantmux.db";

/// Get the default database path for the current platform.
pub fn default_database_path() -> Option<std::path::PathBuf> {
    dirs::data_local_dir().map(|p| {
        p.join(tenantmux_core::branding::APP_IDENTIFIER)
            .join(DATABASE_FILE)
    })
}
