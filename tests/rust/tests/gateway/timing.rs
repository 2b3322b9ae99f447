//! Request timing tests
//!
//! Every response, including errors, reaches the observability sink once.

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use tests::gateway::TestGateway;

use super::{get, send_text};

#[tokio::test]
async fn successful_request_is_recorded() {
    let gw = TestGateway::new();
    let (status, _) = send_text(gw.server.router(), get("/api/tenant", Some("1"))).await;
    assert_eq!(status, StatusCode::OK);

    let timings = gw.sink.timings();
    assert_eq!(timings.len(), 1);

    let timing = &timings[0];
    assert_eq!(timing.method, "GET");
    assert_eq!(timing.path, "/api/tenant");
    assert_eq!(timing.status, 200);
    assert_eq!(timing.tenant_id.as_deref(), Some("1"));
    assert_eq!(timing.trace_id.len(), 6);
}

#[tokio::test]
async fn rejected_requests_are_recorded() {
    let gw = TestGateway::new();

    send_text(gw.server.router(), get("/api/tenant", None)).await;
    send_text(gw.server.router(), get("/api/analytics", Some("3"))).await;
    send_text(gw.server.router(), get("/missing", None)).await;

    let statuses: Vec<u16> = gw.sink.timings().iter().map(|t| t.status).collect();
    assert_eq!(statuses, vec![400, 403, 404]);
    assert_eq!(gw.sink.timings()[0].tenant_id, None);
}

#[tokio::test]
async fn elapsed_covers_slow_lookups() {
    use std::time::Duration;
    use tests::mocks::MockTenantDirectory;

    let delay = Duration::from_millis(30);
    let gw = TestGateway::with_directory(MockTenantDirectory::with_fixtures().with_delay(delay));

    send_text(gw.server.router(), get("/api/tenant", Some("2"))).await;

    let timings = gw.sink.timings();
    assert_eq!(timings.len(), 1);
    assert!(timings[0].elapsed >= delay);
}
