use serde::{Deserialize, Serialize};

/// A message addressed to one tenant topic. Not stored after delivery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationMessage {
    /// Tenant id in string form
    pub topic: String,
    pub payload: serde_json::Value,
}

impl NotificationMessage {
    pub fn new(topic: impl Into<String>, payload: serde_json::Value) -> Self {
        Self {
            topic: topic.into(),
            payload,
        }
    }
}
