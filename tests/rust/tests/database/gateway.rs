//! Gateway over the seeded SQLite database

use axum::{body::Body, http::Request, http::StatusCode};
use http_body_util::BodyExt;
use serde_json::Value;
use tenantmux_gateway::{DependenciesBuilder, GatewayConfig, GatewayServer};
use tests::db::TestDatabase;
use tower::ServiceExt;

fn server() -> GatewayServer {
    let deps = DependenciesBuilder::new()
        .with_database(TestDatabase::in_memory().shared())
        .build()
        .unwrap();
    GatewayServer::new(GatewayConfig::default(), deps)
}

async fn get_json(server: &GatewayServer, uri: &str, tenant_id: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .uri(uri)
        .header("x-tenant-id", tenant_id)
        .body(Body::empty())
        .unwrap();
    let response = server.router().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn tenant_from_database() {
    let server = server();
    let (status, body) = get_json(&server, "/api/tenant", "2").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "StartX Ventures");
    assert_eq!(body["config"]["features"]["chat"], false);
}

#[tokio::test]
async fn users_from_database() {
    let server = server();
    let (status, body) = get_json(&server, "/api/users", "1").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 3);
    assert_eq!(body[0]["email"], "alice@acme.example.com");
}

#[tokio::test]
async fn analytics_gate_from_database() {
    let server = server();

    let (status, body) = get_json(&server, "/api/analytics", "1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["activeUsers"], 2);

    let (status, _) = get_json(&server, "/api/analytics", "3").await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}
