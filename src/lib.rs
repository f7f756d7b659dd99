//! Pulsefeed - email subscriptions with a live event fan-out channel.
//!
//! The crate accepts email subscriptions into Postgres, sends a welcome
//! notification asynchronously, and pushes live events (real or simulated
//! posts) to connected WebSocket clients through the fan-out subsystem.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod fanout;
pub mod ports;
