//! TenantResolver integration tests
//!
//! Cache lifetime, single-flight lookups and the absence of a resolution
//! timeout, all on a paused clock.

use futures::future::join_all;
use std::sync::Arc;
use std::time::Duration;
use tenantmux_core::TenantError;
use tenantmux_gateway::TenantResolver;
use tests::fixtures;
use tests::mocks::MockTenantDirectory;
use tokio::time::{advance, Instant};

const TTL: Duration = Duration::from_secs(300);

fn resolver(directory: &Arc<MockTenantDirectory>) -> Arc<TenantResolver> {
    Arc::new(TenantResolver::new(directory.clone(), TTL))
}

#[tokio::test(start_paused = true)]
async fn entry_is_live_until_ttl_boundary() {
    let directory = Arc::new(MockTenantDirectory::with_fixtures());
    let resolver = resolver(&directory);

    resolver.resolve("1").await.unwrap();

    advance(TTL - Duration::from_millis(1)).await;
    resolver.resolve("1").await.unwrap();
    assert_eq!(directory.lookups(), 1);

    advance(Duration::from_millis(2)).await;
    resolver.resolve("1").await.unwrap();
    assert_eq!(directory.lookups(), 2);
}

#[tokio::test(start_paused = true)]
async fn concurrent_misses_share_one_lookup() {
    let directory =
        Arc::new(MockTenantDirectory::with_fixtures().with_delay(Duration::from_millis(50)));
    let resolver = resolver(&directory);

    let tasks = (0..32).map(|_| {
        let resolver = resolver.clone();
        tokio::spawn(async move { resolver.resolve("1").await })
    });

    for result in join_all(tasks).await {
        let tenant = result.unwrap().unwrap();
        assert_eq!(tenant.name, "ACME Corporation");
    }
    assert_eq!(directory.lookups(), 1);
}

#[tokio::test(start_paused = true)]
async fn different_tenants_resolve_in_parallel() {
    let delay = Duration::from_millis(100);
    let directory = Arc::new(MockTenantDirectory::with_fixtures().with_delay(delay));
    let resolver = resolver(&directory);

    let start = Instant::now();
    let (acme, startx) = tokio::join!(resolver.resolve("1"), resolver.resolve("2"));

    assert_eq!(acme.unwrap().id, 1);
    assert_eq!(startx.unwrap().id, 2);
    assert_eq!(directory.lookups(), 2);
    assert!(start.elapsed() < delay * 2);
}

#[tokio::test]
async fn unknown_tenant_is_looked_up_every_time() {
    let directory = Arc::new(MockTenantDirectory::with_fixtures());
    let resolver = resolver(&directory);

    for _ in 0..3 {
        assert!(matches!(
            resolver.resolve("999").await,
            Err(TenantError::NotFound)
        ));
    }
    assert_eq!(directory.lookups(), 3);
}

#[tokio::test]
async fn tenant_added_after_miss_is_found() {
    let directory = Arc::new(MockTenantDirectory::new());
    let resolver = resolver(&directory);

    assert!(resolver.resolve("1").await.is_err());
    directory.insert(fixtures::acme());
    assert_eq!(resolver.resolve("1").await.unwrap().name, "ACME Corporation");
}

#[tokio::test]
async fn invalidate_forces_fresh_lookup() {
    let directory = Arc::new(MockTenantDirectory::with_fixtures());
    let resolver = resolver(&directory);

    resolver.resolve("1").await.unwrap();

    let mut renamed = fixtures::acme();
    renamed.name = "ACME Holdings".to_string();
    directory.insert(renamed);

    assert_eq!(resolver.resolve("1").await.unwrap().name, "ACME Corporation");
    assert!(resolver.invalidate("1"));
    assert_eq!(resolver.resolve("1").await.unwrap().name, "ACME Holdings");
}

#[tokio::test]
async fn raw_ids_are_cached_separately() {
    let directory = Arc::new(MockTenantDirectory::with_fixtures());
    let resolver = resolver(&directory);

    resolver.resolve("1").await.unwrap();
    resolver.resolve("01").await.unwrap();

    assert_eq!(directory.lookups(), 2);
    assert!(resolver.cache().contains_entry("tenant_1"));
    assert!(resolver.cache().contains_entry("tenant_01"));
}

#[tokio::test(start_paused = true)]
async fn resolution_has_no_internal_timeout() {
    let delay = Duration::from_secs(3600);
    let directory = Arc::new(MockTenantDirectory::with_fixtures().with_delay(delay));
    let resolver = resolver(&directory);

    // Only a caller-imposed deadline cuts a slow lookup short
    let bounded = tokio::time::timeout(Duration::from_secs(600), resolver.resolve("1")).await;
    assert!(bounded.is_err());
    assert_eq!(resolver.in_flight_count(), 0);

    let start = Instant::now();
    let tenant = resolver.resolve("1").await.unwrap();
    assert_eq!(tenant.id, 1);
    assert!(start.elapsed() >= delay);
}

#[tokio::test(start_paused = true)]
async fn abandoned_resolves_leave_no_gates_behind() {
    let directory =
        Arc::new(MockTenantDirectory::with_fixtures().with_delay(Duration::from_secs(10)));
    let resolver = resolver(&directory);

    for id in 1..=200 {
        let abandoned =
            tokio::time::timeout(Duration::from_millis(1), resolver.resolve(&id.to_string()))
                .await;
        assert!(abandoned.is_err());
    }

    assert_eq!(directory.lookups(), 200);
    assert_eq!(resolver.in_flight_count(), 0);
}
