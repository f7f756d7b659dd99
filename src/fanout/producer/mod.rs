//! Event producer variants.
//!
//! Exactly one variant runs per process, selected at startup: the live
//! adapter when stream credentials are configured, the simulator otherwise.

mod live;
mod simulator;

pub use live::{drain_source, HttpStreamSource, LiveSource, ProducerError};
pub use simulator::Simulator;

use tokio::sync::watch;

use crate::config::ProducerConfig;

use super::queue::IngestSender;

/// Starts the producer selected by configuration.
///
/// The simulator runs as a task on the runtime and honors the shutdown
/// signal; the live adapter runs on a detached thread and stops on its own
/// when the queue closes or the stream fails.
pub fn spawn(
    config: &ProducerConfig,
    sender: IngestSender,
    shutdown: watch::Receiver<bool>,
) -> std::io::Result<()> {
    match config.live_settings() {
        Some((url, token)) => {
            tracing::info!(url, "starting live event producer");
            live::spawn_stream_thread(url, token, sender)
        }
        None => {
            tracing::info!(
                period_secs = config.simulator_interval_secs,
                "no live credentials configured, starting simulator"
            );
            tokio::spawn(Simulator::new(config.simulator_interval(), sender).run(shutdown));
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::time::timeout;

    use super::*;
    use crate::fanout::queue::ingest_channel;

    #[tokio::test]
    async fn spawn_without_credentials_runs_the_simulator() {
        let config = ProducerConfig {
            simulator_interval_secs: 1,
            ..Default::default()
        };
        let (sender, mut queue) = ingest_channel();
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        spawn(&config, sender, shutdown_rx).unwrap();

        // First simulator tick fires immediately.
        let event = timeout(Duration::from_secs(2), queue.dequeue())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(event.id(), "sim-1");

        shutdown_tx.send(true).unwrap();
    }
}
