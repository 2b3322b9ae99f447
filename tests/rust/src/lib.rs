//! Shared test utilities and fixtures for TenantMux integration tests.

pub use tenantmux_core::{AnalyticsReport, Tenant, TenantId, User, UserRole};

/// Mock repository implementations
pub mod mocks;
pub use mocks::{MockAnalyticsProvider, MockTenantDirectory, MockUserProvider, RecordingSink};

/// Test fixture utilities
pub mod fixtures {
    use super::*;
    use tenantmux_core::{features, HexColor, Theme};

    fn color(hex: &str) -> HexColor {
        HexColor::parse(hex).expect("fixture color is valid")
    }

    /// Tenant 1: every feature enabled
    pub fn acme() -> Tenant {
        Tenant::new(1, "ACME Corporation", "acme.example.com")
            .with_logo("🏢")
            .with_theme(Theme::Light)
            .with_primary_color(color("#3b82f6"))
            .with_feature(features::ANALYTICS, true)
            .with_feature(features::USER_MANAGEMENT, true)
            .with_feature(features::CHAT, true)
            .with_feature(features::NOTIFICATIONS, true)
    }

    /// Tenant 2: chat and notifications disabled
    pub fn startx() -> Tenant {
        Tenant::new(2, "StartX Ventures", "startx.example.com")
            .with_logo("🚀")
            .with_theme(Theme::Dark)
            .with_primary_color(color("#10b981"))
            .with_feature(features::ANALYTICS, true)
            .with_feature(features::USER_MANAGEMENT, true)
            .with_feature(features::CHAT, false)
            .with_feature(features::NOTIFICATIONS, false)
    }

    /// Tenant 3: analytics disabled, `chat` key absent
    pub fn quantum() -> Tenant {
        Tenant::new(3, "Quantum Industries", "quantum.example.com")
            .with_logo("⚛️")
            .with_theme(Theme::Dark)
            .with_primary_color(color("#8b5cf6"))
            .with_feature(features::ANALYTICS, false)
            .with_feature(features::USER_MANAGEMENT, true)
            .with_feature(features::NOTIFICATIONS, true)
    }

    /// Users for a tenant: one admin, one member, one inactive viewer
    pub fn users_for(tenant_id: TenantId) -> Vec<User> {
        let base = tenant_id * 100;
        vec![
            User::new(base + 1, tenant_id, "Admin", "admin@example.com", UserRole::Admin),
            User::new(base + 2, tenant_id, "Member", "member@example.com", UserRole::Member),
            User::new(base + 3, tenant_id, "Viewer", "viewer@example.com", UserRole::Viewer)
                .inactive(),
        ]
    }
}

/// Gateway test helpers
pub mod gateway {
    use std::sync::Arc;
    use std::time::Duration;

    use tenantmux_gateway::{DependenciesBuilder, GatewayConfig, GatewayServer};

    use crate::fixtures;
    use crate::mocks::{MockAnalyticsProvider, MockTenantDirectory, MockUserProvider, RecordingSink};

    /// Server plus handles on every mock it was built from
    pub struct TestGateway {
        pub server: GatewayServer,
        pub directory: Arc<MockTenantDirectory>,
        pub users: Arc<MockUserProvider>,
        pub analytics: Arc<MockAnalyticsProvider>,
        pub sink: Arc<RecordingSink>,
    }

    impl TestGateway {
        /// Gateway over the three fixture tenants
        pub fn new() -> Self {
            Self::with_directory(MockTenantDirectory::with_fixtures())
        }

        pub fn with_directory(directory: MockTenantDirectory) -> Self {
            let directory = Arc::new(directory);
            let users = Arc::new(MockUserProvider::new());
            let analytics = Arc::new(MockAnalyticsProvider::new());
            let sink = Arc::new(RecordingSink::default());

            let deps = DependenciesBuilder::new()
                .with_tenant_directory(directory.clone())
                .with_user_provider(users.clone())
                .with_analytics_provider(analytics.clone())
                .with_observability(sink.clone())
                .build()
                .expect("mocks cover every dependency");

            let config = GatewayConfig {
                cache_ttl: Duration::from_secs(60),
                ..GatewayConfig::default()
            };

            Self {
                server: GatewayServer::new(config, deps),
                directory,
                users,
                analytics,
                sink,
            }
        }
    }

    impl Default for TestGateway {
        fn default() -> Self {
            Self::new()
        }
    }

    /// Seed the user provider with fixture users for every fixture tenant
    pub fn seed_users(users: &MockUserProvider) {
        for id in 1..=3 {
            users.set_users(id, fixtures::users_for(id));
        }
    }
}

/// Database test helpers
pub mod db {
    use std::path::{Path, PathBuf};
    use std::sync::Arc;
    use tempfile::TempDir;
    use tenantmux_storage::{Database, DATABASE_FILE};
    use tokio::sync::Mutex;

    /// Create a temporary database for testing
    pub struct TestDatabase {
        pub db: Database,
        _temp_dir: TempDir,
        db_path: PathBuf,
    }

    impl TestDatabase {
        /// Create a new test database in a temporary directory
        pub fn new() -> Self {
            let temp_dir = TempDir::new().expect("Failed to create temp dir");
            let db_path = temp_dir.path().join(DATABASE_FILE);
            let db = Database::open(&db_path).expect("Failed to open test database");
            Self {
                db,
                db_path,
                _temp_dir: temp_dir,
            }
        }

        /// Create an in-memory database for fast tests
        pub fn in_memory() -> Self {
            let temp_dir = TempDir::new().expect("Failed to create temp dir");
            let db = Database::open_in_memory().expect("Failed to open in-memory database");
            Self {
                db,
                db_path: PathBuf::new(),
                _temp_dir: temp_dir,
            }
        }

        /// Get the database file path
        pub fn db_path(&self) -> &Path {
            &self.db_path
        }

        /// Shared handle as the repositories expect it
        pub fn shared(self) -> Arc<Mutex<Database>> {
            Arc::new(Mutex::new(self.db))
        }
    }

    impl Default for TestDatabase {
        fn default() -> Self {
            Self::new()
        }
    }
}

/// Async test helpers
pub mod async_helpers {
    use std::future::Future;
    use std::time::Duration;
    use tokio::time::timeout;

    /// Run an async operation with a timeout
    pub async fn with_timeout<F, T>(duration: Duration, f: F) -> T
    where
        F: Future<Output = T>,
    {
        timeout(duration, f).await.expect("Operation timed out")
    }

    /// Poll `condition` until it holds or `duration` passes
    pub async fn wait_until<F>(duration: Duration, mut condition: F) -> bool
    where
        F: FnMut() -> bool,
    {
        let deadline = tokio::time::Instant::now() + duration;
        while tokio::time::Instant::now() < deadline {
            if condition() {
                return true;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        condition()
    }

    /// Default test timeout (5 seconds)
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);
}
