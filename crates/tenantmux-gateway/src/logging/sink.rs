//! Observability sink for request timings

use std::time::Duration;
use tracing::info;

/// Wall-clock timing of one request, from arrival to response
#[derive(Debug, Clone)]
pub struct RequestTiming {
    pub trace_id: String,
    pub method: String,
    pub path: String,
    pub status: u16,
    pub tenant_id: Option<String>,
    pub elapsed: Duration,
}

impl RequestTiming {
    pub fn elapsed_ms(&self) -> u128 {
        self.elapsed.as_millis()
    }
}

/// Receives one `RequestTiming` per completed request
pub trait ObservabilitySink: Send + Sync {
    fn record_request(&self, timing: &RequestTiming);
}

/// Default sink: one `[METHOD] path - Nms` line per request
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl ObservabilitySink for TracingSink {
    fn record_request(&self, timing: &RequestTiming) {
        info!(
            trace_id = %timing.trace_id,
            status = timing.status,
            tenant = timing.tenant_id.as_deref().unwrap_or("-"),
            "[{}] {} - {}ms",
            timing.method,
            timing.path,
            timing.elapsed_ms()
        );
    }
}
