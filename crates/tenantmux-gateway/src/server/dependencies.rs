//! Dependency Injection Container
//!
//! Provides a clean DI pattern for Gateway dependencies.
//! Makes testing easier and dependencies explicit.

use std::sync::Arc;

use tenantmux_core::{AnalyticsProvider, TenantDirectory, UserProvider};
use tenantmux_storage::{
    Database, SqliteAnalyticsRepository, SqliteTenantDirectory, SqliteUserRepository,
};
use tokio::sync::Mutex;

use crate::logging::{ObservabilitySink, TracingSink};

/// Dependency container for Gateway
///
/// All data access goes through these trait objects, so tests can swap in
/// in-memory implementations.
#[derive(Clone)]
pub struct GatewayDependencies {
    // Repositories (Data Layer)
    pub tenant_directory: Arc<dyn TenantDirectory>,
    pub user_provider: Arc<dyn UserProvider>,
    pub analytics_provider: Arc<dyn AnalyticsProvider>,

    /// Receives per-request timings
    pub observability: Arc<dyn ObservabilitySink>,
}

impl GatewayDependencies {
    pub fn new(
        tenant_directory: Arc<dyn TenantDirectory>,
        user_provider: Arc<dyn UserProvider>,
        analytics_provider: Arc<dyn AnalyticsProvider>,
        observability: Arc<dyn ObservabilitySink>,
    ) -> Self {
        Self {
            tenant_directory,
            user_provider,
            analytics_provider,
            observability,
        }
    }
}

/// Builder for GatewayDependencies
///
/// Anything not set explicitly is created from the database, if one is given.
#[derive(Default)]
pub struct DependenciesBuilder {
    tenant_directory: Option<Arc<dyn TenantDirectory>>,
    user_provider: Option<Arc<dyn UserProvider>>,
    analytics_provider: Option<Arc<dyn AnalyticsProvider>>,
    observability: Option<Arc<dyn ObservabilitySink>>,
    database: Option<Arc<Mutex<Database>>>,
}

impl DependenciesBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tenant_directory(mut self, directory: Arc<dyn TenantDirectory>) -> Self {
        self.tenant_directory = Some(directory);
        self
    }

    pub fn with_user_provider(mut self, provider: Arc<dyn UserProvider>) -> Self {
        self.user_provider = Some(provider);
        self
    }

    pub fn with_analytics_provider(mut self, provider: Arc<dyn AnalyticsProvider>) -> Self {
        self.analytics_provider = Some(provider);
        self
    }

    pub fn with_observability(mut self, sink: Arc<dyn ObservabilitySink>) -> Self {
        self.observability = Some(sink);
        self
    }

    pub fn with_database(mut self, db: Arc<Mutex<Database>>) -> Self {
        self.database = Some(db);
        self
    }

    pub fn build(self) -> Result<GatewayDependencies, String> {
        let database = self.database;

        let tenant_directory: Arc<dyn TenantDirectory> = match (self.tenant_directory, &database) {
            (Some(directory), _) => directory,
            (None, Some(db)) => Arc::new(SqliteTenantDirectory::new(db.clone())),
            (None, None) => return Err("tenant_directory or database is required".to_string()),
        };

        let user_provider: Arc<dyn UserProvider> = match (self.user_provider, &database) {
            (Some(provider), _) => provider,
            (None, Some(db)) => Arc::new(SqliteUserRepository::new(db.clone())),
            (None, None) => return Err("user_provider or database is required".to_string()),
        };

        let analytics_provider: Arc<dyn AnalyticsProvider> = match (self.analytics_provider, &database) {
            (Some(provider), _) => provider,
            (None, Some(db)) => Arc::new(SqliteAnalyticsRepository::new(
                SqliteUserRepository::new(db.clone()),
            )),
            (None, None) => {
                return Err("analytics_provider or database is required".to_string())
            }
        };

        let observability = self
            .observability
            .unwrap_or_else(|| Arc::new(TracingSink));

        Ok(GatewayDependencies {
            tenant_directory,
            user_provider,
            analytics_provider,
            observability,
        })
    }
}
