//! HTTP request timing and logging middleware
//!
//! Wraps every request in a trace span, measures wall-clock time until the
//! response is ready and reports it to the injected `ObservabilitySink`.
//! Error response bodies are logged at DEBUG.

use axum::{
    body::Body,
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use http_body_util::BodyExt;
use std::sync::Arc;
use tenantmux_core::branding::TENANT_HEADER;
use tracing::{debug, warn, Instrument};

use crate::logging::{ObservabilitySink, RequestSpan, RequestTiming, TraceContext};

/// Error bodies larger than this are not logged
const MAX_BODY_LOG_SIZE: usize = 1000;

/// Compact body text for logs
pub fn format_body(bytes: &[u8]) -> String {
    if bytes.is_empty() {
        return "[empty]".to_string();
    }
    if bytes.len() > MAX_BODY_LOG_SIZE {
        return format!("[{} bytes]", bytes.len());
    }
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => format!("[binary: {} bytes]", bytes.len()),
    }
}

/// Timing middleware
pub async fn request_timing_middleware(
    State(sink): State<Arc<dyn ObservabilitySink>>,
    request: Request,
    next: Next,
) -> Response {
    let tenant_id = request
        .headers()
        .get(TENANT_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let ctx = TraceContext::new(request.method().as_str(), request.uri().path())
        .with_tenant(tenant_id);
    let span = RequestSpan::enter(&ctx);

    async move {
        RequestSpan::log_entry(&ctx);

        let response = next.run(request).await;
        let status = response.status();

        let response = if status.is_client_error() || status.is_server_error() {
            let (parts, body) = response.into_parts();
            match body.collect().await {
                Ok(collected) => {
                    let bytes = collected.to_bytes();
                    debug!(
                        trace_id = %ctx.trace_id,
                        body = %format_body(&bytes),
                        "Error response body"
                    );
                    Response::from_parts(parts, Body::from(bytes))
                }
                Err(e) => {
                    warn!(trace_id = %ctx.trace_id, "Failed to read response body: {}", e);
                    Response::from_parts(parts, Body::empty())
                }
            }
        } else {
            response
        };

        sink.record_request(&RequestTiming {
            trace_id: ctx.trace_id.clone(),
            method: ctx.method.clone(),
            path: ctx.path.clone(),
            status: status.as_u16(),
            tenant_id: ctx.tenant_id.clone(),
            elapsed: ctx.elapsed(),
        });

        response
    }
    .instrument(span)
    .await
}
