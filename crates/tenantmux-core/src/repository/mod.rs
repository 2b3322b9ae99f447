//! Repository traits for data access
//!
//! These traits define the interface between the gateway and the data it
//! serves. Implementations live in tenantmux-storage (SQLite) and in the test
//! crate (in-memory mocks).

use async_trait::async_trait;

use crate::domain::{AnalyticsReport, Tenant, TenantId, User};

/// Result type for repository operations
pub type RepoResult<T> = anyhow::Result<T>;

/// Source of truth for tenant records
#[async_trait]
pub trait TenantDirectory: Send + Sync {
    /// Look up a tenant by id. `Ok(None)` means no such tenant.
    async fn lookup(&self, id: TenantId) -> RepoResult<Option<Tenant>>;
}

/// Lists users for a tenant
#[async_trait]
pub trait UserProvider: Send + Sync {
    async fn list_for_tenant(&self, tenant: &Tenant) -> RepoResult<Vec<User>>;
}

/// Produces the analytics summary for a tenant
#[async_trait]
pub trait AnalyticsProvider: Send + Sync {
    async fn report_for(&self, tenant: &Tenant) -> RepoResult<AnalyticsReport>;
}
