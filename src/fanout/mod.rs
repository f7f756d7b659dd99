//! Live fan-out subsystem.
//!
//! Control flow: producer → [`queue`] → [`broadcaster`] → [`registry`] →
//! each connected client. The queue is the only boundary a foreign thread
//! crosses; everything else runs on the async runtime.

pub mod broadcaster;
pub mod messages;
pub mod producer;
pub mod queue;
pub mod registry;

pub use broadcaster::Broadcaster;
pub use messages::{ClientMessage, ServerMessage};
pub use queue::{ingest_channel, IngestQueue, IngestSender, QueueClosed};
pub use registry::{ClientId, ConnectionRegistry, Frame};
