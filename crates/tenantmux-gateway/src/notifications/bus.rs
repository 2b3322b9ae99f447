//! Tenant-scoped pub/sub
//!
//! Connections register with `connect`, join topics (tenant ids) and receive
//! every message published to those topics while they are members.
//!
//! - Topic membership and the connection table live behind one lock, so
//!   join/leave/disconnect/publish never observe each other half-done
//! - Each connection has a bounded queue; a full queue drops the message for
//!   that connection only
//! - No replay: a message reaches the members at the moment of `publish`

use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};
use tenantmux_core::NotificationMessage;
use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Opaque connection handle
pub type ConnectionId = Uuid;

/// Default per-connection queue size
pub const DEFAULT_QUEUE_CAPACITY: usize = 256;

struct Connection {
    tx: mpsc::Sender<NotificationMessage>,
    topics: HashSet<String>,
}

#[derive(Default)]
struct Registry {
    topics: HashMap<String, HashSet<ConnectionId>>,
    connections: HashMap<ConnectionId, Connection>,
}

/// Receiving half of a registered connection
pub struct NotificationSubscriber {
    id: ConnectionId,
    rx: mpsc::Receiver<NotificationMessage>,
}

impl NotificationSubscriber {
    pub fn id(&self) -> ConnectionId {
        self.id
    }

    /// Wait for the next message. `None` once the bus has dropped the connection.
    pub async fn recv(&mut self) -> Option<NotificationMessage> {
        self.rx.recv().await
    }

    pub fn try_recv(&mut self) -> Option<NotificationMessage> {
        self.rx.try_recv().ok()
    }
}

pub struct NotificationBus {
    registry: RwLock<Registry>,
    queue_capacity: usize,
}

impl NotificationBus {
    pub fn new() -> Self {
        Self::with_queue_capacity(DEFAULT_QUEUE_CAPACITY)
    }

    pub fn with_queue_capacity(queue_capacity: usize) -> Self {
        Self {
            registry: RwLock::new(Registry::default()),
            queue_capacity: queue_capacity.max(1),
        }
    }

    /// Register a new connection with no topics
    pub fn connect(&self) -> NotificationSubscriber {
        let id = Uuid::new_v4();
        let (tx, rx) = mpsc::channel(self.queue_capacity);
        self.registry.write().connections.insert(
            id,
            Connection {
                tx,
                topics: HashSet::new(),
            },
        );
        debug!("[NotificationBus] Connection {} registered", id);
        NotificationSubscriber { id, rx }
    }

    /// Add `connection` to `topic`.
    ///
    /// Returns `false` if it was already a member or is not registered.
    pub fn join(&self, connection: ConnectionId, topic: &str) -> bool {
        let mut registry = self.registry.write();
        let Some(conn) = registry.connections.get_mut(&connection) else {
            warn!("[NotificationBus] Join from unknown connection {}", connection);
            return false;
        };
        if !conn.topics.insert(topic.to_string()) {
            return false;
        }
        registry
            .topics
            .entry(topic.to_string())
            .or_default()
            .insert(connection);

        info!("[NotificationBus] Connection {} joined tenant room {}", connection, topic);
        true
    }

    /// Remove `connection` from `topic`. Returns whether it was a member.
    pub fn leave(&self, connection: ConnectionId, topic: &str) -> bool {
        let mut registry = self.registry.write();
        let was_member = registry
            .connections
            .get_mut(&connection)
            .map(|conn| conn.topics.remove(topic))
            .unwrap_or(false);
        if was_member {
            Self::remove_member(&mut registry.topics, topic, &connection);
            info!("[NotificationBus] Connection {} left tenant room {}", connection, topic);
        }
        was_member
    }

    /// Drop a connection and all of its memberships.
    ///
    /// Returns the number of topics it was removed from.
    pub fn disconnect(&self, connection: ConnectionId) -> usize {
        let mut registry = self.registry.write();
        let Some(conn) = registry.connections.remove(&connection) else {
            return 0;
        };
        for topic in &conn.topics {
            Self::remove_member(&mut registry.topics, topic, &connection);
        }
        debug!(
            "[NotificationBus] Connection {} disconnected ({} rooms)",
            connection,
            conn.topics.len()
        );
        conn.topics.len()
    }

    fn remove_member(
        topics: &mut HashMap<String, HashSet<ConnectionId>>,
        topic: &str,
        connection: &ConnectionId,
    ) {
        if let Some(members) = topics.get_mut(topic) {
            members.remove(connection);
            if members.is_empty() {
                topics.remove(topic);
            }
        }
    }

    /// Deliver `payload` to every current member of `topic`.
    ///
    /// Returns how many connections accepted the message.
    pub fn publish(&self, topic: &str, payload: serde_json::Value) -> usize {
        let registry = self.registry.read();
        let Some(members) = registry.topics.get(topic) else {
            debug!("[NotificationBus] No members in tenant room {}", topic);
            return 0;
        };

        let message = NotificationMessage::new(topic, payload);
        let mut delivered = 0;
        for id in members {
            let Some(conn) = registry.connections.get(id) else {
                continue;
            };
            match conn.tx.try_send(message.clone()) {
                Ok(()) => delivered += 1,
                Err(TrySendError::Full(_)) => {
                    warn!("[NotificationBus] Queue full for connection {}, dropping message", id);
                }
                Err(TrySendError::Closed(_)) => {
                    debug!("[NotificationBus] Connection {} closed before delivery", id);
                }
            }
        }

        debug!(
            "[NotificationBus] Published to tenant room {}: {}/{} delivered",
            topic,
            delivered,
            members.len()
        );
        delivered
    }

    /// Number of connections currently joined to `topic`
    pub fn topic_size(&self, topic: &str) -> usize {
        self.registry
            .read()
            .topics
            .get(topic)
            .map(|members| members.len())
            .unwrap_or(0)
    }

    /// Topics a connection belongs to, sorted
    pub fn topics_for(&self, connection: ConnectionId) -> Vec<String> {
        let mut topics: Vec<String> = self
            .registry
            .read()
            .connections
            .get(&connection)
            .map(|conn| conn.topics.iter().cloned().collect())
            .unwrap_or_default();
        topics.sort();
        topics
    }

    pub fn connection_count(&self) -> usize {
        self.registry.read().connections.len()
    }
}

impl Default for NotificationBus {
    fn default() -> Self {
        Self::new()
    }
}
