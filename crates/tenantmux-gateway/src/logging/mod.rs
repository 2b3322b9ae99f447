//! Centralized Logging Infrastructure
//!
//! Provides structured logging with:
//! - Trace IDs for request correlation
//! - Per-request timing reported through an `ObservabilitySink`

mod sink;
mod trace_context;

pub use sink::{ObservabilitySink, RequestTiming, TracingSink};
pub use trace_context::{generate_trace_id, RequestSpan, TraceContext};
