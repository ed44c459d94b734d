//! Base audit data providers.
//!
//! A provider supplies the baseline contextual key/values (correlation
//! metadata, tenant ids, and the like) that a record starts from, before the
//! derived fields are layered on top.

use serde_json::Value;

use crate::message::MessageRef;

/// Supplies contextual audit data for a message.
///
/// Invoked once per record build, before any derived field is added. The
/// returned pairs are inserted in order through the same insert-or-fail
/// primitive as the derived fields, so a provider that emits one of the
/// reserved derived key names (or [`CORRELATION_KEY`](crate::CORRELATION_KEY))
/// makes the build fail with a
/// [`DuplicateKeyError`](crate::DuplicateKeyError).
///
/// Implementations must not fail for well-formed input and must be safe for
/// concurrent invocation; the audit core treats the provider as a stateless,
/// side-effect-free lookup.
pub trait AuditDataProvider {
    /// Returns the ordered contextual key/values for `message`.
    fn provide(&self, message: MessageRef<'_>) -> Vec<(String, Value)>;
}

/// Provider that supplies no contextual data.
///
/// Records built with it contain only the derived fields.
///
/// # Examples
///
/// ```
/// use message_audit::{AuditDataProvider, CommandMessage, EmptyAuditDataProvider, MessageRef};
///
/// let command = CommandMessage::new("OpenAccount", "cmd-1");
/// let data = EmptyAuditDataProvider.provide(MessageRef::Command(&command));
/// assert!(data.is_empty());
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyAuditDataProvider;

impl AuditDataProvider for EmptyAuditDataProvider {
    fn provide(&self, _message: MessageRef<'_>) -> Vec<(String, Value)> {
        Vec::new()
    }
}

/// Provider that emits the message identifier under a configurable key.
///
/// Mirrors the correlation-data convention of the upstream framework: the
/// default key is [`CORRELATION_KEY`](crate::CORRELATION_KEY) itself, which
/// deliberately collides with the derived correlation field. Use
/// [`with_key`](Self::with_key) to emit under a different name when the
/// record should carry both.
#[derive(Debug, Clone)]
pub struct CorrelationDataProvider {
    key: String,
}

impl CorrelationDataProvider {
    /// Creates a provider emitting under the well-known correlation key.
    pub fn new() -> Self {
        Self::with_key(crate::CORRELATION_KEY)
    }

    /// Creates a provider emitting under `key`.
    pub fn with_key(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    /// Returns the key this provider emits under.
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl Default for CorrelationDataProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl AuditDataProvider for CorrelationDataProvider {
    fn provide(&self, message: MessageRef<'_>) -> Vec<(String, Value)> {
        vec![(self.key.clone(), Value::from(message.identifier()))]
    }
}
