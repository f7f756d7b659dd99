//! Connection registry for live-update clients.
//!
//! Tracks the set of currently connected WebSocket clients. Membership is the
//! only structure in the crate mutated from several tasks at once (connection
//! handlers adding and removing, the broadcaster removing on send failure),
//! so it lives behind an `RwLock` and fan-out works from a point-in-time
//! snapshot rather than iterating under the lock.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{mpsc, RwLock};
use uuid::Uuid;

/// Unique identifier for a WebSocket client connection.
///
/// Generated server-side when a client connects; a reconnecting client gets
/// a fresh id and an empty delivery channel (no backfill).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClientId(Uuid);

impl ClientId {
    /// Create a new random client ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ClientId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ClientId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A pre-serialized wire frame, shared across all connections of one
/// broadcast so serialization happens once per event.
pub type Frame = Arc<str>;

/// Registry of currently connected live-update clients.
///
/// `add`, `remove`, and `snapshot` are linearizable with respect to one
/// another; `remove` is idempotent.
pub struct ConnectionRegistry {
    connections: RwLock<HashMap<ClientId, mpsc::UnboundedSender<Frame>>>,
}

impl ConnectionRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            connections: RwLock::new(HashMap::new()),
        }
    }

    /// Registers a new connection and returns its frame receiver.
    ///
    /// The connection handler drains the receiver and writes frames to the
    /// socket; dropping the receiver is how a dead connection surfaces to
    /// the broadcaster as a send failure.
    pub async fn add(&self, client_id: ClientId) -> mpsc::UnboundedReceiver<Frame> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.connections.write().await.insert(client_id, tx);
        rx
    }

    /// Removes a connection. Removing an absent connection is a no-op.
    pub async fn remove(&self, client_id: &ClientId) {
        self.connections.write().await.remove(client_id);
    }

    /// Point-in-time snapshot of current members for one fan-out cycle.
    ///
    /// Senders are cheap clones; concurrent add/remove during the fan-out
    /// affects later snapshots, not this one.
    pub async fn snapshot(&self) -> Vec<(ClientId, mpsc::UnboundedSender<Frame>)> {
        self.connections
            .read()
            .await
            .iter()
            .map(|(id, tx)| (*id, tx.clone()))
            .collect()
    }

    /// Number of currently connected clients.
    pub async fn connection_count(&self) -> usize {
        self.connections.read().await.len()
    }

    /// Drops every connection. Per-connection send loops observe their
    /// channel closing and terminate; used during shutdown.
    pub async fn close_all(&self) {
        self.connections.write().await.clear();
    }
}

impl Default for ConnectionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn add_registers_connection() {
        let registry = ConnectionRegistry::new();
        let _rx = registry.add(ClientId::new()).await;

        assert_eq!(registry.connection_count().await, 1);
    }

    #[tokio::test]
    async fn snapshot_sender_reaches_receiver() {
        let registry = ConnectionRegistry::new();
        let client_id = ClientId::new();
        let mut rx = registry.add(client_id).await;

        let snapshot = registry.snapshot().await;
        assert_eq!(snapshot.len(), 1);
        snapshot[0].1.send(Frame::from("frame")).unwrap();

        assert_eq!(rx.recv().await.unwrap().as_ref(), "frame");
    }

    #[tokio::test]
    async fn remove_is_idempotent() {
        let registry = ConnectionRegistry::new();
        let client_id = ClientId::new();
        let _rx = registry.add(client_id).await;

        registry.remove(&client_id).await;
        registry.remove(&client_id).await;

        assert_eq!(registry.connection_count().await, 0);
    }

    #[tokio::test]
    async fn remove_of_unknown_client_is_noop() {
        let registry = ConnectionRegistry::new();
        let _rx = registry.add(ClientId::new()).await;

        registry.remove(&ClientId::new()).await;

        assert_eq!(registry.connection_count().await, 1);
    }

    #[tokio::test]
    async fn snapshot_is_point_in_time() {
        let registry = ConnectionRegistry::new();
        let client_id = ClientId::new();
        let _rx = registry.add(client_id).await;

        let snapshot = registry.snapshot().await;
        registry.remove(&client_id).await;

        // The earlier snapshot still holds the member it saw.
        assert_eq!(snapshot.len(), 1);
        assert_eq!(registry.snapshot().await.len(), 0);
    }

    #[tokio::test]
    async fn send_fails_after_receiver_dropped() {
        let registry = ConnectionRegistry::new();
        let client_id = ClientId::new();
        let rx = registry.add(client_id).await;
        drop(rx);

        let snapshot = registry.snapshot().await;
        assert!(snapshot[0].1.send(Frame::from("frame")).is_err());
    }

    #[tokio::test]
    async fn close_all_terminates_receivers() {
        let registry = ConnectionRegistry::new();
        let mut rx1 = registry.add(ClientId::new()).await;
        let mut rx2 = registry.add(ClientId::new()).await;

        registry.close_all().await;

        assert_eq!(registry.connection_count().await, 0);
        assert!(rx1.recv().await.is_none());
        assert!(rx2.recv().await.is_none());
    }
}
