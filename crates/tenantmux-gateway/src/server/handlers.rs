//! HTTP handlers for the gateway server

use axum::{
    body::Bytes,
    extract::{FromRef, State},
    http::StatusCode,
    response::Json,
};
use serde_json::Value;
use std::sync::Arc;
use tenantmux_core::{AnalyticsReport, Tenant, User};
use tracing::{debug, info};

use super::ServiceContainer;
use crate::error::ApiError;
use crate::notifications::{is_truthy, topic_from_value, NotificationBus};
use crate::pipeline::ResolvedTenant;

/// Message for a notification request without a usable tenant id or message
pub const NOTIFICATION_FIELDS_REQUIRED: &str = "Tenant ID and message are required";

/// Router state
#[derive(Clone)]
pub struct AppState {
    pub services: Arc<ServiceContainer>,
}

impl FromRef<AppState> for Arc<NotificationBus> {
    fn from_ref(state: &AppState) -> Self {
        state.services.notification_bus.clone()
    }
}

/// Liveness check
pub async fn healthz() -> &'static str {
    "OK"
}

/// `GET /api/tenant`
pub async fn get_tenant(resolved: ResolvedTenant) -> Json<Tenant> {
    Json(resolved.tenant.as_ref().clone())
}

/// `GET /api/analytics` (feature `analytics`)
pub async fn get_analytics(
    State(state): State<AppState>,
    resolved: ResolvedTenant,
) -> Result<Json<AnalyticsReport>, ApiError> {
    let provider = state.services.dependencies.analytics_provider.clone();
    let tenant = resolved.tenant.clone();
    let report = state
        .services
        .analytics_cache
        .get_or_load(&resolved.raw_id, || async move { provider.report_for(&tenant).await })
        .await
        .map_err(|e| ApiError::internal("Failed to retrieve analytics data", e))?;

    Ok(Json(report.as_ref().clone()))
}

/// `GET /api/users` (feature `userManagement`)
pub async fn get_users(
    State(state): State<AppState>,
    resolved: ResolvedTenant,
) -> Result<Json<Vec<User>>, ApiError> {
    let provider = state.services.dependencies.user_provider.clone();
    let tenant = resolved.tenant.clone();
    let users = state
        .services
        .users_cache
        .get_or_load(&resolved.raw_id, || async move {
            provider.list_for_tenant(&tenant).await
        })
        .await
        .map_err(|e| ApiError::internal("Failed to retrieve users data", e))?;

    Ok(Json(users.as_ref().clone()))
}

/// `POST /api/notifications/send` with `{tenantId, message}`
///
/// Both fields must be truthy. Unparseable bodies count as missing fields.
/// The room is [`topic_from_value`] of `tenantId`, so `1`, `1.0` and `"1"`
/// reach the same members.
pub async fn send_notification(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, &'static str), ApiError> {
    let request: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);

    let tenant_id = request.get("tenantId").unwrap_or(&Value::Null);
    let message = request.get("message").unwrap_or(&Value::Null);

    let topic = match topic_from_value(tenant_id) {
        Some(topic) if is_truthy(message) => topic,
        _ => {
            debug!("[Gateway] Rejected notification without tenant id or message");
            return Err(ApiError::bad_request(NOTIFICATION_FIELDS_REQUIRED));
        }
    };

    let delivered = state
        .services
        .notification_bus
        .publish(&topic, message.clone());
    info!(
        "[Gateway] Notification sent to tenant room {} ({} connections)",
        topic, delivered
    );

    Ok((StatusCode::OK, "Notification sent"))
}

/// Fallback for unknown routes
pub async fn not_found() -> ApiError {
    ApiError::route_not_found()
}
