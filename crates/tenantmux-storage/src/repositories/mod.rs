//! Repository implementations using SQLite.

mod analytics_repository;
mod tenant_directory;
mod user_repository;

pub use analytics_repository::SqliteAnalyticsRepository;
pub use tenant_directory::SqliteTenantDirectory;
pub use user_repository::SqliteUserRepository;
