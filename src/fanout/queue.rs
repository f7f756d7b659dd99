//! Ingestion queue between event producers and the broadcaster.
//!
//! The only hand-off point from producer contexts (including the live
//! adapter's dedicated thread) into the async world. Unbounded so that
//! `enqueue` never stalls a producer behind a slow consumer; the broadcaster
//! is a trivial consumer so depth stays shallow in practice.

use thiserror::Error;
use tokio::sync::mpsc;

use crate::domain::Event;

/// Enqueue failed because the broadcaster side has shut down.
#[derive(Debug, Error)]
#[error("ingestion queue closed")]
pub struct QueueClosed;

/// Producer handle. Cloneable and safe to use from any thread; calling
/// [`IngestSender::enqueue`] never blocks.
#[derive(Clone)]
pub struct IngestSender {
    tx: mpsc::UnboundedSender<Event>,
}

impl IngestSender {
    /// Queues an event for broadcast, preserving enqueue order.
    pub fn enqueue(&self, event: Event) -> Result<(), QueueClosed> {
        self.tx.send(event).map_err(|_| QueueClosed)
    }
}

/// Consumer end, held exclusively by the broadcaster.
pub struct IngestQueue {
    rx: mpsc::UnboundedReceiver<Event>,
}

impl IngestQueue {
    /// Suspends until an event is available. Returns `None` once every
    /// sender has been dropped and the queue is drained.
    pub async fn dequeue(&mut self) -> Option<Event> {
        self.rx.recv().await
    }
}

/// Creates a connected sender/queue pair.
pub fn ingest_channel() -> (IngestSender, IngestQueue) {
    let (tx, rx) = mpsc::unbounded_channel();
    (IngestSender { tx }, IngestQueue { rx })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn dequeue_returns_events_in_enqueue_order() {
        let (sender, mut queue) = ingest_channel();

        sender.enqueue(Event::new("e-1")).unwrap();
        sender.enqueue(Event::new("e-2")).unwrap();
        sender.enqueue(Event::new("e-3")).unwrap();

        assert_eq!(queue.dequeue().await.unwrap().id(), "e-1");
        assert_eq!(queue.dequeue().await.unwrap().id(), "e-2");
        assert_eq!(queue.dequeue().await.unwrap().id(), "e-3");
    }

    #[tokio::test]
    async fn order_is_preserved_across_sender_clones() {
        let (sender, mut queue) = ingest_channel();
        let clone = sender.clone();

        sender.enqueue(Event::new("e-1")).unwrap();
        clone.enqueue(Event::new("e-2")).unwrap();

        assert_eq!(queue.dequeue().await.unwrap().id(), "e-1");
        assert_eq!(queue.dequeue().await.unwrap().id(), "e-2");
    }

    #[tokio::test]
    async fn enqueue_fails_once_consumer_is_gone() {
        let (sender, queue) = ingest_channel();
        drop(queue);

        assert!(sender.enqueue(Event::new("e-1")).is_err());
    }

    #[tokio::test]
    async fn dequeue_ends_once_all_senders_are_gone() {
        let (sender, mut queue) = ingest_channel();
        sender.enqueue(Event::new("e-1")).unwrap();
        drop(sender);

        assert_eq!(queue.dequeue().await.unwrap().id(), "e-1");
        assert!(queue.dequeue().await.is_none());
    }

    #[tokio::test]
    async fn enqueue_is_usable_from_a_foreign_thread() {
        let (sender, mut queue) = ingest_channel();

        let handle = std::thread::spawn(move || {
            for n in 1..=3 {
                sender.enqueue(Event::new(format!("t-{}", n))).unwrap();
            }
        });
        handle.join().unwrap();

        assert_eq!(queue.dequeue().await.unwrap().id(), "t-1");
        assert_eq!(queue.dequeue().await.unwrap().id(), "t-2");
        assert_eq!(queue.dequeue().await.unwrap().id(), "t-3");
    }
}
