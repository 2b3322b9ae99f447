//! SQLite implementation of UserProvider.

use std::sync::Arc;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use rusqlite::params;
use tenantmux_core::{Tenant, TenantId, User, UserProvider, UserRole};
use tokio::sync::Mutex;

use crate::Database;

/// SQLite-backed user listing.
pub struct SqliteUserRepository {
    db: Arc<Mutex<Database>>,
}

impl SqliteUserRepository {
    pub fn new(db: Arc<Mutex<Database>>) -> Self {
        Self { db }
    }

    /// Users of one tenant, ordered by id.
    pub async fn list_by_tenant_id(&self, tenant_id: TenantId) -> Result<Vec<User>> {
        let db = self.db.lock().await;
        let mut stmt = db.connection().prepare(
            "SELECT id, tenant_id, name, email, role, active
             FROM users
             WHERE tenant_id = ?1
             ORDER BY id ASC",
        )?;

        let rows = stmt
            .query_map(params![tenant_id], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, TenantId>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, String>(4)?,
                    row.get::<_, i32>(5)? != 0,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|(id, tenant_id, name, email, role, active)| {
                let role = UserRole::parse(&role)
                    .ok_or_else(|| anyhow!("User {} has unknown role '{}'", id, role))?;
                Ok(User {
                    id,
                    tenant_id,
                    name,
                    email,
                    role,
                    active,
                })
            })
            .collect()
    }

    /// Insert a user.
    pub async fn create(&self, user: &User) -> Result<()> {
        let db = self.db.lock().await;
        db.connection().execute(
            "INSERT INTO users (id, tenant_id, name, email, role, active) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                user.id,
                user.tenant_id,
                user.name,
                user.email,
                user.role.as_str(),
                user.active as i32,
            ],
        )?;
        Ok(())
    }
}

#[async_trait]
impl UserProvider for SqliteUserRepository {
    async fn list_for_tenant(&self, tenant: &Tenant) -> Result<Vec<User>> {
        let users = self.list_by_tenant_id(tenant.id).await?;
        tracing::debug!(
            "[UserRepository] Loaded {} users for tenant {}",
            users.len(),
            tenant.id
        );
        Ok(users)
    }
}
