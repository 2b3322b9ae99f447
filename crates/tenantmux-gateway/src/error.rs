//! HTTP error responses
//!
//! Every error leaves the gateway as `{"error": "..."}` with the matching
//! status code. Server errors also carry `"message"` with the underlying cause.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::any::Any;
use tenantmux_core::TenantError;
use tracing::error;

/// Body sent for tenant-pipeline internal failures
pub const INTERNAL_SERVER_ERROR: &str = "Internal server error";

/// Body sent when a handler panics
pub const UNEXPECTED_ERROR: &str = "An unexpected error occurred";

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

/// Error returned by handlers and middleware
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    error: String,
    message: Option<String>,
}

impl ApiError {
    pub fn new(status: StatusCode, error: impl Into<String>) -> Self {
        Self {
            status,
            error: error.into(),
            message: None,
        }
    }

    pub fn bad_request(error: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, error)
    }

    /// 500 with a public summary and the diagnostic cause
    pub fn internal(error: impl Into<String>, cause: impl std::fmt::Display) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            error: error.into(),
            message: Some(format!("{:#}", cause)),
        }
    }

    /// Unknown route
    pub fn route_not_found() -> Self {
        Self::new(StatusCode::NOT_FOUND, "Not found")
    }

    /// Response for a panic caught by `CatchPanicLayer`
    pub fn from_panic(payload: Box<dyn Any + Send + 'static>) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else if let Some(s) = payload.downcast_ref::<&str>() {
            s.to_string()
        } else {
            "Unknown panic".to_string()
        };
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            error: UNEXPECTED_ERROR.to_string(),
            message: Some(message),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn error(&self) -> &str {
        &self.error
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}

impl From<TenantError> for ApiError {
    fn from(err: TenantError) -> Self {
        match err {
            TenantError::Validation(msg) => Self::new(StatusCode::BAD_REQUEST, msg),
            TenantError::NotFound => Self::new(StatusCode::NOT_FOUND, err.to_string()),
            TenantError::FeatureDisabled { .. } => {
                Self::new(StatusCode::FORBIDDEN, err.to_string())
            }
            TenantError::Internal(cause) => Self::internal(INTERNAL_SERVER_ERROR, cause),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!(
                status = self.status.as_u16(),
                message = self.message.as_deref().unwrap_or("-"),
                "[Gateway] {}",
                self.error
            );
        }

        let body = ErrorBody {
            error: self.error,
            message: self.message,
        };
        (self.status, Json(body)).into_response()
    }
}
