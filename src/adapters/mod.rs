//! Adapters - concrete implementations of the ports plus the HTTP and
//! WebSocket surfaces.

pub mod email;
pub mod http;
pub mod memory;
pub mod postgres;
pub mod websocket;
