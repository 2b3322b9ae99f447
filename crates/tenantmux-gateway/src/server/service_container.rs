//! Service Container - holds all initialized services
//!
//! Services are created once from the dependencies and shared by every
//! request for the lifetime of the server.

use std::sync::Arc;
use std::time::Duration;

use tenantmux_core::{AnalyticsReport, Sweep, User};

use super::dependencies::GatewayDependencies;
use crate::logging::ObservabilitySink;
use crate::notifications::NotificationBus;
use crate::pipeline::RequestPipeline;
use crate::services::{CacheSweeper, ResourceCache, TenantResolver};

/// Container for all Gateway services
#[derive(Clone)]
pub struct ServiceContainer {
    pub tenant_resolver: Arc<TenantResolver>,
    pub pipeline: Arc<RequestPipeline>,

    /// `analytics_{tenantId}` → report
    pub analytics_cache: Arc<ResourceCache<AnalyticsReport>>,

    /// `users_{tenantId}` → user list
    pub users_cache: Arc<ResourceCache<Vec<User>>>,

    /// Periodic cleanup for all three caches
    pub cache_sweeper: Arc<CacheSweeper>,

    pub notification_bus: Arc<NotificationBus>,
    pub observability: Arc<dyn ObservabilitySink>,

    /// Gateway dependencies (for accessing repositories)
    pub dependencies: GatewayDependencies,
}

impl ServiceContainer {
    /// Initialize all services from dependencies.
    ///
    /// `cache_ttl` is both the entry lifetime and the sweep period.
    pub fn initialize(deps: &GatewayDependencies, cache_ttl: Duration) -> Self {
        let tenant_resolver = Arc::new(TenantResolver::new(
            deps.tenant_directory.clone(),
            cache_ttl,
        ));
        let pipeline = Arc::new(RequestPipeline::new(tenant_resolver.clone()));

        let analytics_cache = Arc::new(ResourceCache::new("analytics", cache_ttl));
        let users_cache = Arc::new(ResourceCache::new("users", cache_ttl));

        let caches: Vec<Arc<dyn Sweep>> = vec![
            tenant_resolver.cache(),
            analytics_cache.cache(),
            users_cache.cache(),
        ];
        let cache_sweeper = Arc::new(CacheSweeper::new(cache_ttl, caches));

        Self {
            tenant_resolver,
            pipeline,
            analytics_cache,
            users_cache,
            cache_sweeper,
            notification_bus: Arc::new(NotificationBus::new()),
            observability: deps.observability.clone(),
            dependencies: deps.clone(),
        }
    }
}
