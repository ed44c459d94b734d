//! Publication surface for finished audit records.
//!
//! The builder only returns records; wrapping one into a notification and
//! forwarding it to the application's event bus is the caller's job. This
//! module models that bus seam as a single [`AuditPublisher`] capability,
//! with an in-memory implementation for tests and a `tracing`-backed one
//! for wiring without a bus.

use std::cell::RefCell;
use std::fmt;

use serde::Serialize;

use crate::record::AuditRecord;

/// Category label distinguishing command and event audit notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AuditCategory {
    /// Outcome of a dispatched command.
    Command,
    /// Outcome of event processing.
    Event,
}

impl AuditCategory {
    /// Returns the fixed label downstream consumers key on.
    pub fn label(&self) -> &'static str {
        match self {
            AuditCategory::Command => "command-audit",
            AuditCategory::Event => "event-audit",
        }
    }
}

impl fmt::Display for AuditCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A finished audit record tagged with its category, ready for the bus.
///
/// # Examples
///
/// ```
/// use message_audit::{AuditCategory, AuditNotification, AuditRecord};
/// use serde_json::json;
///
/// let mut record = AuditRecord::new();
/// record.try_insert("event-success", json!(true)).unwrap();
///
/// let notification = AuditNotification::new(AuditCategory::Event, record);
/// assert_eq!(notification.category().label(), "event-audit");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuditNotification {
    category: AuditCategory,
    record: AuditRecord,
}

impl AuditNotification {
    /// Wraps a finished record under the given category.
    pub fn new(category: AuditCategory, record: AuditRecord) -> Self {
        Self { category, record }
    }

    /// Returns the category label variant.
    pub fn category(&self) -> AuditCategory {
        self.category
    }

    /// Returns the wrapped record.
    pub fn record(&self) -> &AuditRecord {
        &self.record
    }
}

/// Capability to forward an audit notification to the application event bus.
///
/// The audit core never publishes on its own; implementations of this trait
/// are the bus. Publishing must not fail back into the caller: transport
/// errors are the implementation's problem to report.
pub trait AuditPublisher {
    /// Forwards one notification.
    fn publish(&self, notification: AuditNotification);
}

/// In-memory publisher collecting notifications for inspection.
///
/// A test and demonstration collaborator; a production deployment would
/// implement [`AuditPublisher`] over its actual event bus.
///
/// # Examples
///
/// ```
/// use message_audit::{
///     AuditCategory, AuditNotification, AuditPublisher, AuditRecord, RecordingPublisher,
/// };
///
/// let publisher = RecordingPublisher::new();
/// publisher.publish(AuditNotification::new(
///     AuditCategory::Command,
///     AuditRecord::new(),
/// ));
///
/// assert_eq!(publisher.len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct RecordingPublisher {
    notifications: RefCell<Vec<AuditNotification>>,
}

impl RecordingPublisher {
    /// Creates a new empty publisher.
    pub fn new() -> Self {
        Self {
            notifications: RefCell::new(Vec::new()),
        }
    }

    /// Returns a snapshot of the notifications published so far.
    pub fn notifications(&self) -> Vec<AuditNotification> {
        self.notifications.borrow().clone()
    }

    /// Returns the number of published notifications.
    pub fn len(&self) -> usize {
        self.notifications.borrow().len()
    }

    /// Returns `true` if nothing has been published.
    pub fn is_empty(&self) -> bool {
        self.notifications.borrow().is_empty()
    }

    /// Consumes the publisher and returns the collected notifications.
    pub fn into_vec(self) -> Vec<AuditNotification> {
        self.notifications.into_inner()
    }
}

impl AuditPublisher for RecordingPublisher {
    fn publish(&self, notification: AuditNotification) {
        self.notifications.borrow_mut().push(notification);
    }
}

/// Publisher that emits notifications as structured `tracing` events.
///
/// Each notification becomes one `info` event under the `message_audit`
/// target, with the category label and the record rendered as a JSON object.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingPublisher;

impl AuditPublisher for TracingPublisher {
    fn publish(&self, notification: AuditNotification) {
        tracing::info!(
            target: "message_audit",
            category = %notification.category(),
            record = %notification.record(),
            "audit notification"
        );
    }
}
