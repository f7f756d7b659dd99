//! WebSocket surface for live-update clients.

mod handler;

pub use handler::ws_handler;
