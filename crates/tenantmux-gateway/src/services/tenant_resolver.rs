//! Tenant Resolution Service
//!
//! Cache-aware wrapper over a `TenantDirectory`.
//!
//! Key principles:
//! - Cache key is `tenant_{id}` using the id exactly as received
//! - Only successful lookups are cached; unknown ids always hit the directory
//! - Concurrent misses for the same key share one directory lookup

use dashmap::DashMap;
use std::sync::Arc;
use std::time::Duration;
use tenantmux_core::{
    parse_tenant_id, Tenant, TenantDirectory, TenantError, TenantId, TenantResult, TtlCache,
};
use tokio::sync::Mutex;
use tracing::{debug, info};

/// Resolves tenant ids to tenant records
pub struct TenantResolver {
    directory: Arc<dyn TenantDirectory>,
    cache: Arc<TtlCache<String, Arc<Tenant>>>,
    /// Per-key gates so only one task fetches a missing tenant at a time
    in_flight: DashMap<String, Arc<Mutex<()>>>,
}

impl TenantResolver {
    pub fn new(directory: Arc<dyn TenantDirectory>, ttl: Duration) -> Self {
        Self {
            directory,
            cache: Arc::new(TtlCache::new("tenants", ttl)),
            in_flight: DashMap::new(),
        }
    }

    pub fn cache_key(tenant_id: &str) -> String {
        format!("tenant_{}", tenant_id)
    }

    /// Backing cache (registered with the sweeper)
    pub fn cache(&self) -> Arc<TtlCache<String, Arc<Tenant>>> {
        self.cache.clone()
    }

    /// Resolve a tenant id from its string form
    pub async fn resolve(&self, tenant_id: &str) -> TenantResult<Arc<Tenant>> {
        let id = parse_tenant_id(tenant_id)?;
        let key = Self::cache_key(tenant_id);

        if let Some(tenant) = self.cache.get(&key) {
            debug!("[TenantResolver] Using cached tenant data for {}", tenant_id);
            return Ok(tenant);
        }

        let gate = self
            .in_flight
            .entry(key.clone())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        let flight = InFlight {
            in_flight: &self.in_flight,
            key: &key,
            gate,
        };

        let _guard = flight.gate.lock().await;
        // Another task may have filled the cache while we waited
        match self.cache.get(&key) {
            Some(tenant) => Ok(tenant),
            None => self.fetch(id, key.clone()).await,
        }
    }

    /// Number of keys with a lookup in progress or queued
    pub fn in_flight_count(&self) -> usize {
        self.in_flight.len()
    }

    async fn fetch(&self, id: TenantId, key: String) -> TenantResult<Arc<Tenant>> {
        let tenant = self
            .directory
            .lookup(id)
            .await
            .map_err(|e| TenantError::Internal(e.context("Tenant directory lookup failed")))?
            .ok_or(TenantError::NotFound)?;

        info!("[TenantResolver] Loaded tenant {} ({})", tenant.id, tenant.name);

        let tenant = Arc::new(tenant);
        self.cache.set(key, tenant.clone());
        Ok(tenant)
    }

    /// Drop a cached tenant so the next request reads the directory
    pub fn invalidate(&self, tenant_id: &str) -> bool {
        self.cache.remove(&Self::cache_key(tenant_id)).is_some()
    }
}

/// One waiter's share of a key's gate.
///
/// Dropping it, including when the resolve future is cancelled, removes the
/// gate from the map once no other waiter holds it.
struct InFlight<'a> {
    in_flight: &'a DashMap<String, Arc<Mutex<()>>>,
    key: &'a str,
    gate: Arc<Mutex<()>>,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        // Map plus this waiter; shares are only cloned under the shard lock
        self.in_flight
            .remove_if(self.key, |_, gate| Arc::strong_count(gate) == 2);
    }
}
