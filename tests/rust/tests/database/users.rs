//! SqliteUserRepository and SqliteAnalyticsRepository tests

use pretty_assertions::assert_eq;
use tenantmux_core::{AnalyticsProvider, User, UserProvider, UserRole};
use tenantmux_storage::{SqliteAnalyticsRepository, SqliteUserRepository};
use tests::db::TestDatabase;
use tests::fixtures;

#[tokio::test]
async fn seeded_users_are_listed_per_tenant() {
    let repo = SqliteUserRepository::new(TestDatabase::in_memory().shared());

    let acme = repo.list_for_tenant(&fixtures::acme()).await.unwrap();
    let names: Vec<&str> = acme.iter().map(|u| u.name.as_str()).collect();
    assert_eq!(names, vec!["Alice Johnson", "Bob Smith", "Carol White"]);
    assert!(!acme[2].active);

    let quantum = repo.list_for_tenant(&fixtures::quantum()).await.unwrap();
    assert_eq!(quantum.len(), 1);
    assert_eq!(quantum[0].role, UserRole::Admin);
}

#[tokio::test]
async fn created_user_is_listed() {
    let repo = SqliteUserRepository::new(TestDatabase::in_memory().shared());

    let user = User::new(50, 3, "Grace Hopper", "grace@quantum.example.com", UserRole::Member);
    repo.create(&user).await.unwrap();

    let users = repo.list_by_tenant_id(3).await.unwrap();
    assert_eq!(users.len(), 2);
    assert_eq!(users[1], user);
}

#[tokio::test]
async fn user_for_unknown_tenant_is_rejected() {
    let repo = SqliteUserRepository::new(TestDatabase::in_memory().shared());

    let user = User::new(51, 999, "Nobody", "nobody@example.com", UserRole::Viewer);
    assert!(repo.create(&user).await.is_err());
}

#[tokio::test]
async fn analytics_summarize_seeded_users() {
    let db = TestDatabase::in_memory().shared();
    let analytics = SqliteAnalyticsRepository::new(SqliteUserRepository::new(db));

    let report = analytics.report_for(&fixtures::startx()).await.unwrap();
    assert_eq!(report.tenant_id, 2);
    assert_eq!(report.total_users, 2);
    assert_eq!(report.active_users, 2);
    assert_eq!(report.users_by_role.get("admin"), Some(&1));
    assert_eq!(report.users_by_role.get("member"), Some(&1));
}
