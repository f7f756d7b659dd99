//! Ports - narrow interfaces to external collaborators.
//!
//! The core depends on persistence and mail delivery only through these
//! traits; adapters provide the Postgres, Resend, and in-memory
//! implementations.

mod mailer;
mod subscriber_repository;

pub use mailer::Mailer;
pub use subscriber_repository::SubscriberRepository;
