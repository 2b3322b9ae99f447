//! WebSocket adapter for the notification bus
//!
//! ## Protocol
//!
//! JSON text frames shaped `{"event": <name>, "data": <payload>}`.
//!
//! Client → server:
//! - `joinTenantRoom` with a tenant id (any truthy JSON value, see [`topic_from_value`])
//! - `leaveTenantRoom` with a tenant id
//!
//! Server → client:
//! - `notification` with the published message
//!
//! Closing the socket removes the connection from every room. Room joins are
//! not checked against the caller's tenant.

use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::Response,
};
use futures::{stream::SplitSink, SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use super::{topic_from_value, ConnectionId, NotificationBus};

/// Frames sent by clients
#[derive(Debug, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ClientEvent {
    JoinTenantRoom(Value),
    LeaveTenantRoom(Value),
}

/// Frames sent to clients
#[derive(Debug, Serialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ServerEvent {
    Notification(Value),
}

/// `GET /ws` upgrade handler
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(bus): State<Arc<NotificationBus>>,
) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, bus))
}

async fn handle_socket(socket: WebSocket, bus: Arc<NotificationBus>) {
    let mut subscriber = bus.connect();
    let connection = subscriber.id();
    info!(connection = %connection, "WebSocket connected");

    let (mut sender, mut receiver) = socket.split();

    loop {
        tokio::select! {
            outbound = subscriber.recv() => {
                let Some(message) = outbound else { break };
                if let Err(e) = send_event(&mut sender, ServerEvent::Notification(message.payload)).await {
                    warn!(connection = %connection, error = %e, "Failed to send notification, closing connection");
                    break;
                }
            }
            inbound = receiver.next() => {
                match inbound {
                    Some(Ok(Message::Text(text))) => handle_client_frame(&bus, connection, text.as_str()),
                    Some(Ok(Message::Close(_))) | None => {
                        debug!(connection = %connection, "Client closed connection");
                        break;
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        warn!(connection = %connection, error = %e, "WebSocket receive error");
                        break;
                    }
                }
            }
        }
    }

    let rooms = bus.disconnect(connection);
    info!(connection = %connection, rooms, "WebSocket disconnected");
}

fn handle_client_frame(bus: &NotificationBus, connection: ConnectionId, text: &str) {
    let event = match serde_json::from_str::<ClientEvent>(text) {
        Ok(event) => event,
        Err(e) => {
            debug!(connection = %connection, error = %e, "Ignoring unrecognized frame");
            return;
        }
    };

    match event {
        ClientEvent::JoinTenantRoom(tenant_id) => match topic_from_value(&tenant_id) {
            Some(topic) => {
                bus.join(connection, &topic);
            }
            None => debug!(connection = %connection, "joinTenantRoom without a tenant id"),
        },
        ClientEvent::LeaveTenantRoom(tenant_id) => {
            if let Some(topic) = topic_from_value(&tenant_id) {
                bus.leave(connection, &topic);
            }
        }
    }
}

async fn send_event(
    sender: &mut SplitSink<WebSocket, Message>,
    event: ServerEvent,
) -> Result<(), axum::Error> {
    let json = serde_json::to_string(&event).map_err(|e| {
        error!(error = %e, "Failed to serialize event");
        axum::Error::new(e)
    })?;

    sender.send(Message::Text(json.into())).await
}
