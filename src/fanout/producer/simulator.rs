//! Simulated event producer.
//!
//! Synthesizes one event per tick with a deterministic incrementing id.
//! Active whenever no live-source credentials are configured.

use std::time::Duration;

use tokio::sync::watch;
use tokio::time::{interval, MissedTickBehavior};

use crate::domain::Event;
use crate::fanout::queue::IngestSender;

const SENTIMENTS: [&str; 3] = ["positive", "neutral", "negative"];

/// Periodic producer of synthetic events.
pub struct Simulator {
    period: Duration,
    sender: IngestSender,
}

impl Simulator {
    pub fn new(period: Duration, sender: IngestSender) -> Self {
        Self { period, sender }
    }

    /// Emits `sim-1`, `sim-2`, ... until shutdown or queue closure.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        let mut ticker = interval(self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut sequence: u64 = 0;

        loop {
            tokio::select! {
                _ = shutdown.changed() => {
                    tracing::info!("simulator received shutdown signal");
                    break;
                }
                _ = ticker.tick() => {
                    sequence += 1;
                    if self.sender.enqueue(synthesize(sequence)).is_err() {
                        tracing::debug!("ingestion queue closed, simulator stopping");
                        break;
                    }
                }
            }
        }
    }
}

/// Builds the synthetic event for one sequence number.
fn synthesize(sequence: u64) -> Event {
    Event::new(format!("sim-{}", sequence))
        .with_attribute("author", "pulsefeed-simulator")
        .with_attribute("text", format!("Simulated post #{}", sequence))
        .with_attribute(
            "sentiment",
            SENTIMENTS[(sequence % SENTIMENTS.len() as u64) as usize],
        )
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::time::timeout;

    use super::*;
    use crate::fanout::queue::ingest_channel;

    #[test]
    fn synthesize_uses_incrementing_ids() {
        assert_eq!(synthesize(1).id(), "sim-1");
        assert_eq!(synthesize(2).id(), "sim-2");
        assert_eq!(synthesize(42).id(), "sim-42");
    }

    #[test]
    fn synthesize_fills_placeholder_attributes() {
        let event = synthesize(7);
        assert_eq!(event.attribute("author"), Some("pulsefeed-simulator"));
        assert_eq!(event.attribute("text"), Some("Simulated post #7"));
        assert!(SENTIMENTS.contains(&event.attribute("sentiment").unwrap()));
    }

    #[tokio::test]
    async fn run_enqueues_events_in_sequence() {
        let (sender, mut queue) = ingest_channel();
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let task = tokio::spawn(
            Simulator::new(Duration::from_millis(5), sender).run(shutdown_rx),
        );

        let first = timeout(Duration::from_secs(1), queue.dequeue())
            .await
            .unwrap()
            .unwrap();
        let second = timeout(Duration::from_secs(1), queue.dequeue())
            .await
            .unwrap()
            .unwrap();

        assert_eq!(first.id(), "sim-1");
        assert_eq!(second.id(), "sim-2");

        shutdown_tx.send(true).unwrap();
        timeout(Duration::from_secs(1), task).await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn run_stops_when_queue_closes() {
        let (sender, queue) = ingest_channel();
        let (_shutdown_tx, shutdown_rx) = watch::channel(false);
        drop(queue);

        let task = tokio::spawn(
            Simulator::new(Duration::from_millis(1), sender).run(shutdown_rx),
        );

        timeout(Duration::from_secs(1), task).await.unwrap().unwrap();
    }
}
