//! Analytics summaries computed from the users table.

use anyhow::Result;
use async_trait::async_trait;
use tenantmux_core::{AnalyticsProvider, AnalyticsReport, Tenant};

use super::SqliteUserRepository;

/// Builds `AnalyticsReport`s from stored users.
pub struct SqliteAnalyticsRepository {
    users: SqliteUserRepository,
}

impl SqliteAnalyticsRepository {
    pub fn new(users: SqliteUserRepository) -> Self {
        Self { users }
    }
}

#[async_trait]
impl AnalyticsProvider for SqliteAnalyticsRepository {
    async fn report_for(&self, tenant: &Tenant) -> Result<AnalyticsReport> {
        let users = self.users.list_by_tenant_id(tenant.id).await?;
        Ok(AnalyticsReport::from_users(tenant.id, &users))
    }
}
