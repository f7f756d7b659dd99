//! Domain layer - the types the rest of the crate is built around.
//!
//! Contains the transient [`Event`] pushed to live clients, the persisted
//! [`Subscriber`] aggregate with its validated [`EmailAddress`], and the
//! error taxonomy shared by the request and background paths.

mod errors;
mod event;
mod subscriber;
mod timestamp;

pub use errors::{MailError, RepositoryError, SubscribeError, ValidationError};
pub use event::Event;
pub use subscriber::{EmailAddress, Subscriber, SubscriberId};
pub use timestamp::Timestamp;
