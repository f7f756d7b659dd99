//! Live event source adapter.
//!
//! The upstream streaming client blocks on network I/O, so it runs on its
//! own OS thread. That thread touches nothing owned by the async world
//! except the queue's [`IngestSender`], and it is detached: shutdown never
//! waits for the upstream stream to close.

use std::io::{BufRead, BufReader};
use std::time::Duration;

use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use thiserror::Error;

use crate::domain::Event;
use crate::fanout::queue::IngestSender;

/// Upstream live-source failures. Logged; the adapter terminates on them
/// (no runtime failover to the simulator).
#[derive(Debug, Error)]
pub enum ProducerError {
    #[error("live stream connection failed: {0}")]
    Connect(String),

    #[error("live stream read failed: {0}")]
    Read(String),
}

/// A blocking source of live events.
///
/// `next_event` blocks the calling thread until an event arrives, the stream
/// ends (`Ok(None)`), or the source fails.
pub trait LiveSource: Send + 'static {
    fn next_event(&mut self) -> Result<Option<Event>, ProducerError>;
}

/// Line-delimited JSON over a long-lived HTTP response.
///
/// Each non-empty line is one post; empty lines are keepalives. Lines that
/// fail to parse are logged and skipped rather than tearing the stream down.
pub struct HttpStreamSource {
    lines: std::io::Lines<BufReader<reqwest::blocking::Response>>,
}

impl HttpStreamSource {
    /// Opens the stream. Blocks; call from the producer thread only.
    pub fn connect(url: &str, token: &Secret<String>) -> Result<Self, ProducerError> {
        let client = reqwest::blocking::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            // The response body is an endless stream, so no overall timeout.
            .timeout(None::<Duration>)
            .build()
            .map_err(|e| ProducerError::Connect(e.to_string()))?;

        let response = client
            .get(url)
            .bearer_auth(token.expose_secret())
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(|e| ProducerError::Connect(e.to_string()))?;

        Ok(Self {
            lines: BufReader::new(response).lines(),
        })
    }
}

impl LiveSource for HttpStreamSource {
    fn next_event(&mut self) -> Result<Option<Event>, ProducerError> {
        loop {
            match self.lines.next() {
                None => return Ok(None),
                Some(Err(e)) => return Err(ProducerError::Read(e.to_string())),
                Some(Ok(line)) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue; // keepalive
                    }
                    match parse_line(line) {
                        Some(event) => return Ok(Some(event)),
                        None => {
                            tracing::warn!(line, "skipping malformed stream line");
                        }
                    }
                }
            }
        }
    }
}

/// Parses one stream line into an event. Returns `None` for lines that are
/// not valid posts.
fn parse_line(line: &str) -> Option<Event> {
    #[derive(Deserialize)]
    struct LivePost {
        id: String,
        #[serde(default)]
        author: Option<String>,
        #[serde(default)]
        text: Option<String>,
        #[serde(default)]
        sentiment: Option<String>,
    }

    let post: LivePost = serde_json::from_str(line).ok()?;

    let mut event = Event::new(post.id);
    if let Some(author) = post.author {
        event = event.with_attribute("author", author);
    }
    if let Some(text) = post.text {
        event = event.with_attribute("text", text);
    }
    if let Some(sentiment) = post.sentiment {
        event = event.with_attribute("sentiment", sentiment);
    }
    Some(event)
}

/// Spawns the detached producer thread for the live stream.
pub fn spawn_stream_thread(
    url: &str,
    token: &Secret<String>,
    sender: IngestSender,
) -> std::io::Result<()> {
    let url = url.to_string();
    let token = token.clone();

    std::thread::Builder::new()
        .name("live-producer".to_string())
        .spawn(move || match HttpStreamSource::connect(&url, &token) {
            Ok(source) => drain_source(source, sender),
            Err(e) => tracing::error!(error = %e, "live producer failed to connect"),
        })
        .map(|_| ())
}

/// Pumps a source into the ingestion queue until it ends, fails, or the
/// queue closes.
pub fn drain_source(mut source: impl LiveSource, sender: IngestSender) {
    loop {
        match source.next_event() {
            Ok(Some(event)) => {
                if sender.enqueue(event).is_err() {
                    tracing::debug!("ingestion queue closed, live producer stopping");
                    break;
                }
            }
            Ok(None) => {
                tracing::info!("live stream ended");
                break;
            }
            Err(e) => {
                tracing::error!(error = %e, "live stream failed");
                break;
            }
        }
    }
}
