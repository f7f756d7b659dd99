//! Application layer - use-case handlers over the ports.

mod subscribe;

pub use subscribe::{SubscribeCommand, SubscribeHandler};
