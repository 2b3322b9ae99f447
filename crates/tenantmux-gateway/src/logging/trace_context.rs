//! Trace Context - Request correlation and structured logging
//!
//! Generates short trace IDs and provides structured spans for request tracing.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};
use tracing::{debug, info_span, Span};

use tenantmux_core::branding::TENANT_HEADER;

/// Global request counter for trace ID generation
static REQUEST_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Generate a short, unique trace ID for this request
/// Format: 6 hex characters (e.g., "a1b2c3")
pub fn generate_trace_id() -> String {
    let counter = REQUEST_COUNTER.fetch_add(1, Ordering::Relaxed);
    let timestamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_micros() as u64)
        .unwrap_or(0);

    let mixed = counter.wrapping_add(timestamp);
    format!("{:06x}", mixed & 0xFFFFFF)
}

/// Correlation data for a single request
#[derive(Debug, Clone)]
pub struct TraceContext {
    /// Unique trace ID (6 hex chars)
    pub trace_id: String,
    /// HTTP method (GET, POST, etc.)
    pub method: String,
    /// Request path (e.g., /api/tenant)
    pub path: String,
    /// Raw `x-tenant-id` header, when present
    pub tenant_id: Option<String>,
    /// Request start time
    pub started_at: Instant,
}

impl TraceContext {
    /// Create a new trace context for an incoming request
    pub fn new(method: &str, path: &str) -> Self {
        Self {
            trace_id: generate_trace_id(),
            method: method.to_string(),
            path: path.to_string(),
            tenant_id: None,
            started_at: Instant::now(),
        }
    }

    /// Attach the tenant header value
    pub fn with_tenant(mut self, tenant_id: Option<String>) -> Self {
        self.tenant_id = tenant_id;
        self
    }

    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }

    /// Tenant for logging ("-" when absent)
    pub fn tenant(&self) -> &str {
        self.tenant_id.as_deref().unwrap_or("-")
    }
}

/// Request span builder for structured logging
pub struct RequestSpan;

impl RequestSpan {
    /// Create a tracing span for an incoming request
    ///
    /// This span will automatically include trace_id in all child logs.
    pub fn enter(ctx: &TraceContext) -> Span {
        info_span!(
            "request",
            trace_id = %ctx.trace_id,
            method = %ctx.method,
            path = %ctx.path,
        )
    }

    /// Log request entry (single consolidated line)
    pub fn log_entry(ctx: &TraceContext) {
        debug!(
            trace_id = %ctx.trace_id,
            "→ {} {} {}={}",
            ctx.method,
            ctx.path,
            TENANT_HEADER,
            ctx.tenant()
        );
    }
}
