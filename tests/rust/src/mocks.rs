//! Mock repository implementations for testing
//!
//! In-memory implementations of the data traits plus a recording
//! observability sink, for fast, isolated gateway tests.

use anyhow::anyhow;
use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use tenantmux_core::{
    repository::{AnalyticsProvider, RepoResult, TenantDirectory, UserProvider},
    AnalyticsReport, Tenant, TenantId, User,
};
use tenantmux_gateway::{ObservabilitySink, RequestTiming};

use crate::fixtures;

// ============================================================================
// MockTenantDirectory
// ============================================================================

/// Tenant directory that counts lookups and can be slowed down or broken
#[derive(Default)]
pub struct MockTenantDirectory {
    tenants: RwLock<HashMap<TenantId, Tenant>>,
    lookups: AtomicUsize,
    delay: Option<Duration>,
    fail: AtomicBool,
}

impl MockTenantDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Directory holding ACME, StartX and Quantum
    pub fn with_fixtures() -> Self {
        Self::new()
            .with_tenant(fixtures::acme())
            .with_tenant(fixtures::startx())
            .with_tenant(fixtures::quantum())
    }

    pub fn with_tenant(self, tenant: Tenant) -> Self {
        self.insert(tenant);
        self
    }

    /// Sleep this long inside every lookup
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn insert(&self, tenant: Tenant) {
        self.tenants.write().insert(tenant.id, tenant);
    }

    pub fn remove(&self, id: TenantId) {
        self.tenants.write().remove(&id);
    }

    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    /// Number of `lookup` calls so far
    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TenantDirectory for MockTenantDirectory {
    async fn lookup(&self, id: TenantId) -> RepoResult<Option<Tenant>> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail.load(Ordering::SeqCst) {
            return Err(anyhow!("directory unavailable"));
        }
        Ok(self.tenants.read().get(&id).cloned())
    }
}

// ============================================================================
// MockUserProvider
// ============================================================================

#[derive(Default)]
pub struct MockUserProvider {
    users: RwLock<HashMap<TenantId, Vec<User>>>,
    calls: AtomicUsize,
    fail: AtomicBool,
}

impl MockUserProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_users(&self, tenant_id: TenantId, users: Vec<User>) {
        self.users.write().insert(tenant_id, users);
    }

    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl UserProvider for MockUserProvider {
    async fn list_for_tenant(&self, tenant: &Tenant) -> RepoResult<Vec<User>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            return Err(anyhow!("user store unavailable"));
        }
        Ok(self
            .users
            .read()
            .get(&tenant.id)
            .cloned()
            .unwrap_or_default())
    }
}

// ============================================================================
// MockAnalyticsProvider
// ============================================================================

/// Builds reports from the fixture users
#[derive(Default)]
pub struct MockAnalyticsProvider {
    calls: AtomicUsize,
    fail: AtomicBool,
}

impl MockAnalyticsProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AnalyticsProvider for MockAnalyticsProvider {
    async fn report_for(&self, tenant: &Tenant) -> RepoResult<AnalyticsReport> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            return Err(anyhow!("analytics backend unavailable"));
        }
        Ok(AnalyticsReport::from_users(
            tenant.id,
            &fixtures::users_for(tenant.id),
        ))
    }
}

// ============================================================================
// RecordingSink
// ============================================================================

/// Observability sink that keeps every timing it receives
#[derive(Default)]
pub struct RecordingSink {
    timings: Mutex<Vec<RequestTiming>>,
}

impl RecordingSink {
    pub fn timings(&self) -> Vec<RequestTiming> {
        self.timings.lock().clone()
    }
}

impl ObservabilitySink for RecordingSink {
    fn record_request(&self, timing: &RequestTiming) {
        self.timings.lock().push(timing.clone());
    }
}
