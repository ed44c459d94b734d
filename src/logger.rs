//! Outcome-to-bus wiring.
//!
//! [`AuditLogger`] is the piece the dispatch framework calls at its four
//! outcome call sites. It runs the builder and forwards each finished record
//! to the publisher; a failed build is reported through `tracing` and
//! swallowed, because audit logging must never fail the business operation
//! it is observing.

use serde_json::Value;

use crate::builder::AuditRecordBuilder;
use crate::error::DuplicateKeyError;
use crate::message::{CommandMessage, EventMessage};
use crate::notify::{AuditCategory, AuditNotification, AuditPublisher};
use crate::provider::AuditDataProvider;
use crate::record::AuditRecord;

/// Builds and publishes one audit notification per outcome.
///
/// Owns the record builder (and through it the base-data provider) plus the
/// publisher. All methods take `&self`; independent outcomes can be logged
/// concurrently as long as provider and publisher tolerate it.
///
/// # Examples
///
/// ```
/// use message_audit::{
///     AuditLogger, CommandMessage, EmptyAuditDataProvider, EventMessage, RecordingPublisher,
/// };
/// use serde_json::json;
///
/// let logger = AuditLogger::new(EmptyAuditDataProvider, RecordingPublisher::new());
///
/// let command = CommandMessage::new("OpenAccount", "cmd-1");
/// let produced = [EventMessage::new("AccountOpened", "evt-1")];
/// logger.command_succeeded(&command, Some(json!("account-7")), &produced);
///
/// assert_eq!(logger.publisher().len(), 1);
/// ```
#[derive(Debug)]
pub struct AuditLogger<P, S> {
    builder: AuditRecordBuilder<P>,
    publisher: S,
}

impl<P: AuditDataProvider, S: AuditPublisher> AuditLogger<P, S> {
    /// Creates a logger over the given provider and publisher.
    pub fn new(provider: P, publisher: S) -> Self {
        Self {
            builder: AuditRecordBuilder::new(provider),
            publisher,
        }
    }

    /// Returns the underlying record builder.
    pub fn builder(&self) -> &AuditRecordBuilder<P> {
        &self.builder
    }

    /// Returns the publisher.
    pub fn publisher(&self) -> &S {
        &self.publisher
    }

    /// Logs a successfully executed command.
    pub fn command_succeeded(
        &self,
        command: &CommandMessage,
        return_value: Option<Value>,
        produced_events: &[EventMessage],
    ) {
        let result =
            self.builder
                .build_for_command_success(command, return_value, produced_events);
        self.forward(AuditCategory::Command, result);
    }

    /// Logs a failed command.
    pub fn command_failed(
        &self,
        command: &CommandMessage,
        failure_cause: Value,
        produced_events: &[EventMessage],
    ) {
        let result =
            self.builder
                .build_for_command_failure(command, failure_cause, produced_events);
        self.forward(AuditCategory::Command, result);
    }

    /// Logs a batch of events that was processed successfully.
    ///
    /// One notification per event; a failed build drops only that event's
    /// notification.
    pub fn events_processed(&self, events: &[EventMessage]) {
        for result in self.builder.build_for_event_batch_success(events) {
            self.forward(AuditCategory::Event, result);
        }
    }

    /// Logs a batch of events whose processing failed with one shared cause.
    pub fn events_failed(&self, events: &[EventMessage], failure_cause: &Value) {
        for result in self.builder.build_for_event_batch_failure(events, failure_cause) {
            self.forward(AuditCategory::Event, result);
        }
    }

    /// Publishes a finished record, or reports the failed build and moves on.
    fn forward(
        &self,
        category: AuditCategory,
        result: Result<AuditRecord, DuplicateKeyError>,
    ) {
        match result {
            Ok(record) => self
                .publisher
                .publish(AuditNotification::new(category, record)),
            Err(err) => {
                tracing::error!(
                    target: "message_audit",
                    category = %category,
                    key = err.key(),
                    "audit record build failed, outcome not audited"
                );
            }
        }
    }
}
