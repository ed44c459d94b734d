//! Command and event message inputs.
//!
//! These are the read-only inputs the dispatch framework hands to the audit
//! core at each outcome call site. The core never constructs or mutates them
//! beyond reading their fields.

use serde_json::{json, Value};

/// A dispatched command, as seen by the audit core.
///
/// Carries the command name and the unique identifier the dispatch framework
/// assigned to this dispatch. The identifier doubles as the correlation id in
/// the resulting audit record.
///
/// # Examples
///
/// ```
/// use message_audit::CommandMessage;
///
/// let command = CommandMessage::new("OpenAccount", "cmd-1");
/// assert_eq!(command.name(), "OpenAccount");
/// assert_eq!(command.identifier(), "cmd-1");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandMessage {
    name: String,
    identifier: String,
}

impl CommandMessage {
    /// Creates a command message from its name and unique identifier.
    pub fn new(name: impl Into<String>, identifier: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            identifier: identifier.into(),
        }
    }

    /// Returns the command name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the unique identifier of this dispatch.
    pub fn identifier(&self) -> &str {
        &self.identifier
    }
}

/// An applied event, as seen by the audit core.
///
/// Carries the name of the event's payload type and the unique identifier of
/// the event message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventMessage {
    payload_type: String,
    identifier: String,
}

impl EventMessage {
    /// Creates an event message from its payload type name and identifier.
    pub fn new(payload_type: impl Into<String>, identifier: impl Into<String>) -> Self {
        Self {
            payload_type: payload_type.into(),
            identifier: identifier.into(),
        }
    }

    /// Returns the payload type name.
    pub fn payload_type(&self) -> &str {
        &self.payload_type
    }

    /// Returns the unique identifier of the event message.
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Returns a compact JSON summary of this event, used as one element of
    /// a record's `command-events` array.
    pub(crate) fn summary(&self) -> Value {
        json!({
            "event-name": self.payload_type,
            "event-identifier": self.identifier,
        })
    }
}

/// A borrowed view over either message kind.
///
/// Providers receive this tagged variant rather than two overloads, so a
/// single [`AuditDataProvider::provide`](crate::AuditDataProvider::provide)
/// implementation can serve both call sites.
#[derive(Debug, Clone, Copy)]
pub enum MessageRef<'a> {
    /// A command dispatch.
    Command(&'a CommandMessage),
    /// An applied event.
    Event(&'a EventMessage),
}

impl MessageRef<'_> {
    /// Returns the unique identifier of the underlying message.
    pub fn identifier(&self) -> &str {
        match self {
            MessageRef::Command(c) => c.identifier(),
            MessageRef::Event(e) => e.identifier(),
        }
    }
}
