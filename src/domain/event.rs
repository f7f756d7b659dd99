//! Event value object for live fan-out.

use std::collections::BTreeMap;

use serde::Serialize;

/// One broadcastable unit of live content.
///
/// Events are immutable once created and transient: they exist only long
/// enough to be pushed to the clients connected at broadcast time. The id is
/// assigned by the producer and unique within that producer's stream; the
/// core does not enforce global uniqueness.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Event {
    id: String,
    attributes: BTreeMap<String, String>,
}

impl Event {
    /// Creates an event with no attributes.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            attributes: BTreeMap::new(),
        }
    }

    /// Adds one attribute, consuming and returning the event.
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Producer-assigned identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Looks up a single attribute value.
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    /// All attributes, in key order.
    pub fn attributes(&self) -> &BTreeMap<String, String> {
        &self.attributes
    }
}
