//! Cache for tenant-scoped handler output, keyed `{resource}_{tenantId}`

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tenantmux_core::TtlCache;
use tracing::debug;

pub struct ResourceCache<T> {
    resource: &'static str,
    cache: Arc<TtlCache<String, Arc<T>>>,
}

impl<T> ResourceCache<T>
where
    T: Send + Sync + 'static,
{
    pub fn new(resource: &'static str, ttl: Duration) -> Self {
        Self {
            resource,
            cache: Arc::new(TtlCache::new(resource, ttl)),
        }
    }

    pub fn resource(&self) -> &'static str {
        self.resource
    }

    pub fn key(&self, tenant_id: &str) -> String {
        format!("{}_{}", self.resource, tenant_id)
    }

    pub fn cache(&self) -> Arc<TtlCache<String, Arc<T>>> {
        self.cache.clone()
    }

    /// Return the cached value, or run `load` and cache its result.
    ///
    /// Failed loads are not cached.
    pub async fn get_or_load<F, Fut>(&self, tenant_id: &str, load: F) -> anyhow::Result<Arc<T>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = anyhow::Result<T>>,
    {
        let key = self.key(tenant_id);
        if let Some(value) = self.cache.get(&key) {
            debug!("[ResourceCache] Using cached {} data for {}", self.resource, tenant_id);
            return Ok(value);
        }

        let value = Arc::new(load().await?);
        self.cache.set(key, value.clone());
        Ok(value)
    }
}
