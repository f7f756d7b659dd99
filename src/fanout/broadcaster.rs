//! Broadcaster task: drains the ingestion queue and fans events out.

use std::sync::Arc;

use tokio::sync::watch;

use crate::domain::Event;

use super::messages::ServerMessage;
use super::queue::IngestQueue;
use super::registry::ConnectionRegistry;

/// Long-running task that delivers each queued event to every connected
/// client, in enqueue order, at most once per client.
///
/// Runs until the shutdown signal flips or the queue closes; an in-flight
/// fan-out always completes before the loop exits.
pub struct Broadcaster {
    queue: IngestQueue,
    registry: Arc<ConnectionRegistry>,
    shutdown: watch::Receiver<bool>,
}

impl Broadcaster {
    pub fn new(
        queue: IngestQueue,
        registry: Arc<ConnectionRegistry>,
        shutdown: watch::Receiver<bool>,
    ) -> Self {
        Self {
            queue,
            registry,
            shutdown,
        }
    }

    /// Consumes the broadcaster and runs the dequeue/fan-out loop.
    pub async fn run(self) {
        let Broadcaster {
            mut queue,
            registry,
            mut shutdown,
        } = self;

        loop {
            tokio::select! {
                _ = shutdown.changed() => {
                    tracing::info!("broadcaster received shutdown signal");
                    break;
                }
                maybe_event = queue.dequeue() => match maybe_event {
                    Some(event) => fan_out(&registry, &event).await,
                    None => {
                        tracing::info!("ingestion queue closed, broadcaster stopping");
                        break;
                    }
                },
            }
        }
    }
}

/// Delivers one event to every client in the current registry snapshot.
///
/// The wire frame is serialized once and shared. A send failure on one
/// connection removes that connection and never blocks delivery to the rest;
/// with no clients connected the event is simply dropped.
async fn fan_out(registry: &ConnectionRegistry, event: &Event) {
    let members = registry.snapshot().await;
    if members.is_empty() {
        tracing::trace!(event_id = event.id(), "no clients connected, dropping event");
        return;
    }

    let frame = ServerMessage::event(event).to_frame();

    let mut failed = Vec::new();
    for (client_id, tx) in members {
        if tx.send(frame.clone()).is_err() {
            failed.push(client_id);
        }
    }

    for client_id in failed {
        tracing::debug!(
            client_id = %client_id,
            event_id = event.id(),
            "send failed, removing connection"
        );
        registry.remove(&client_id).await;
    }
}
