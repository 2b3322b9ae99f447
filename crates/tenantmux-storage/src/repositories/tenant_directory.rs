//! SQLite implementation of TenantDirectory.

use std::collections::BTreeMap;
use std::sync::Arc;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use tenantmux_core::{HexColor, Tenant, TenantConfig, TenantDirectory, TenantId, Theme};
use tokio::sync::Mutex;

use crate::Database;

/// Columns of a `tenants` row before validation
struct TenantRow {
    id: TenantId,
    name: String,
    domain: String,
    logo: Option<String>,
    theme: String,
    primary_color: String,
}

/// SQLite-backed tenant directory.
pub struct SqliteTenantDirectory {
    db: Arc<Mutex<Database>>,
}

impl SqliteTenantDirectory {
    pub fn new(db: Arc<Mutex<Database>>) -> Self {
        Self { db }
    }

    fn load_features(conn: &Connection, id: TenantId) -> Result<BTreeMap<String, bool>> {
        let mut stmt =
            conn.prepare("SELECT feature, enabled FROM tenant_features WHERE tenant_id = ?1")?;
        let features = stmt
            .query_map(params![id], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, i32>(1)? != 0))
            })?
            .collect::<Result<BTreeMap<_, _>, _>>()?;
        Ok(features)
    }

    fn build_tenant(row: TenantRow, features: BTreeMap<String, bool>) -> Result<Tenant> {
        let theme = Theme::parse(&row.theme)
            .ok_or_else(|| anyhow!("Tenant {} has unknown theme '{}'", row.id, row.theme))?;
        let primary_color = HexColor::parse(row.primary_color)?;

        Ok(Tenant {
            id: row.id,
            name: row.name,
            domain: row.domain,
            logo: row.logo,
            config: TenantConfig {
                theme,
                primary_color,
                features,
            },
        })
    }

    /// Insert or replace a tenant together with its feature map.
    pub async fn upsert(&self, tenant: &Tenant) -> Result<()> {
        let db = self.db.lock().await;
        db.transaction(|conn| {
            conn.execute(
                "INSERT INTO tenants (id, name, domain, logo, theme, primary_color)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                 ON CONFLICT(id) DO UPDATE SET
                    name = excluded.name,
                    domain = excluded.domain,
                    logo = excluded.logo,
                    theme = excluded.theme,
                    primary_color = excluded.primary_color",
                params![
                    tenant.id,
                    tenant.name,
                    tenant.domain,
                    tenant.logo,
                    tenant.config.theme.as_str(),
                    tenant.config.primary_color.as_str(),
                ],
            )?;
            conn.execute(
                "DELETE FROM tenant_features WHERE tenant_id = ?1",
                params![tenant.id],
            )?;
            for (feature, enabled) in &tenant.config.features {
                conn.execute(
                    "INSERT INTO tenant_features (tenant_id, feature, enabled) VALUES (?1, ?2, ?3)",
                    params![tenant.id, feature, *enabled as i32],
                )?;
            }
            Ok(())
        })?;

        tracing::info!("[TenantDirectory] Saved tenant {} ({})", tenant.id, tenant.name);
        Ok(())
    }

    /// Remove a tenant. Returns whether a row was deleted.
    pub async fn delete(&self, id: TenantId) -> Result<bool> {
        let db = self.db.lock().await;
        let affected = db
            .connection()
            .execute("DELETE FROM tenants WHERE id = ?1", params![id])?;
        Ok(affected > 0)
    }
}

#[async_trait]
impl TenantDirectory for SqliteTenantDirectory {
    async fn lookup(&self, id: TenantId) -> Result<Option<Tenant>> {
        let db = self.db.lock().await;
        let conn = db.connection();

        let row = conn
            .query_row(
                "SELECT id, name, domain, logo, theme, primary_color FROM tenants WHERE id = ?1",
                params![id],
                |row| {
                    Ok(TenantRow {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        domain: row.get(2)?,
                        logo: row.get(3)?,
                        theme: row.get(4)?,
                        primary_color: row.get(5)?,
                    })
                },
            )
            .optional()?;

        let Some(row) = row else {
            tracing::debug!("[TenantDirectory::lookup] No tenant with id {}", id);
            return Ok(None);
        };

        let features = Self::load_features(conn, id)?;
        Self::build_tenant(row, features).map(Some)
    }
}
