//! Wire protocol between the server and live-update clients.
//!
//! Server → Client: a hello on connect, then one frame per broadcast event.
//! Client → Server: keepalive pings only; everything else is ignored.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::{Event, Timestamp};

use super::registry::{ClientId, Frame};

/// All message types that can be sent from server to client.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Connection established successfully.
    Connected(ConnectedMessage),

    /// One broadcast event.
    Event(EventMessage),
}

/// Sent once when a client connects.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectedMessage {
    pub client_id: String,
    pub timestamp: String,
}

/// Wire form of a broadcast [`Event`].
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventMessage {
    pub id: String,
    pub attributes: BTreeMap<String, String>,
    pub timestamp: String,
}

impl ServerMessage {
    /// Builds the hello message for a freshly registered client.
    pub fn connected(client_id: &ClientId) -> Self {
        ServerMessage::Connected(ConnectedMessage {
            client_id: client_id.to_string(),
            timestamp: Timestamp::now().to_rfc3339(),
        })
    }

    /// Builds the wire message for a broadcast event.
    pub fn event(event: &Event) -> Self {
        ServerMessage::Event(EventMessage {
            id: event.id().to_string(),
            attributes: event.attributes().clone(),
            timestamp: Timestamp::now().to_rfc3339(),
        })
    }

    /// Serializes into the shared frame sent to every connection.
    pub fn to_frame(&self) -> Frame {
        serde_json::to_string(self)
            .expect("ServerMessage serialization should not fail")
            .into()
    }
}

/// All message types accepted from clients.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Keepalive request.
    Ping,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connected_serializes_with_type_tag() {
        let msg = ServerMessage::connected(&ClientId::new());
        let json = msg.to_frame();

        assert!(json.contains(r#""type":"connected""#));
        assert!(json.contains(r#""clientId":"#));
    }

    #[test]
    fn event_frame_carries_id_and_attributes() {
        let event = Event::new("sim-1")
            .with_attribute("author", "someone")
            .with_attribute("text", "hello");
        let json = ServerMessage::event(&event).to_frame();

        assert!(json.contains(r#""type":"event""#));
        assert!(json.contains(r#""id":"sim-1""#));
        assert!(json.contains(r#""author":"someone""#));
        assert!(json.contains(r#""text":"hello""#));
    }

    #[test]
    fn event_frame_parses_back_as_json() {
        let event = Event::new("sim-2").with_attribute("sentiment", "positive");
        let frame = ServerMessage::event(&event).to_frame();

        let value: serde_json::Value = serde_json::from_str(&frame).unwrap();
        assert_eq!(value["type"], "event");
        assert_eq!(value["id"], "sim-2");
        assert_eq!(value["attributes"]["sentiment"], "positive");
    }

    #[test]
    fn client_message_deserializes_ping() {
        let msg: ClientMessage = serde_json::from_str(r#"{"type": "ping"}"#).unwrap();
        assert!(matches!(msg, ClientMessage::Ping));
    }

    #[test]
    fn client_message_rejects_unknown_types() {
        assert!(serde_json::from_str::<ClientMessage>(r#"{"type": "shout"}"#).is_err());
    }
}
