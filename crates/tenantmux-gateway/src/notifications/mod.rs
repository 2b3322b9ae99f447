//! Real-time tenant notifications
//!
//! - `bus` - transport-independent topic registry and fan-out
//! - `ws` - WebSocket adapter speaking `{"event": ..., "data": ...}` frames

mod bus;
pub mod ws;

pub use bus::{ConnectionId, NotificationBus, NotificationSubscriber, DEFAULT_QUEUE_CAPACITY};

use serde_json::Value;

/// Topic name for a tenant id given as JSON.
///
/// Falsy values (`null`, `false`, `0`, `""`) yield `None`. Strings are used
/// as-is, numbers in their shortest form (`1.0` and `1` are both `"1"`), and
/// any other truthy value as its compact JSON text.
pub fn topic_from_value(value: &Value) -> Option<String> {
    if !is_truthy(value) {
        return None;
    }
    Some(match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => number_topic(n),
        other => other.to_string(),
    })
}

fn number_topic(n: &serde_json::Number) -> String {
    if n.is_i64() || n.is_u64() {
        return n.to_string();
    }
    match n.as_f64() {
        Some(f) if f.fract() == 0.0 && f.abs() < 9_007_199_254_740_992.0 => {
            format!("{}", f as i64)
        }
        Some(f) => f.to_string(),
        None => n.to_string(),
    }
}

/// JavaScript-style truthiness for a JSON value
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
