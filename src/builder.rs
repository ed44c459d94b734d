//! Audit record construction for command and event outcomes.
//!
//! The builder merges provider-supplied contextual data with the derived
//! fields of one outcome, in a fixed order, through a single insert-or-fail
//! primitive. A key collision anywhere aborts that build; nothing partial
//! ever escapes.

use serde_json::Value;

use crate::error::DuplicateKeyError;
use crate::message::{CommandMessage, EventMessage, MessageRef};
use crate::provider::AuditDataProvider;
use crate::record::AuditRecord;

/// Well-known key binding a message's unique identifier to its audit record.
///
/// Shared with the provider layer's correlation-data convention. A provider
/// that already emitted this exact key makes the build fail; that is a
/// genuine collision, not a refresh.
pub const CORRELATION_KEY: &str = "correlation-id";

/// Derived key for the dispatched command's name.
pub const COMMAND_NAME_KEY: &str = "command-name";
/// Derived key flagging whether the command succeeded.
pub const COMMAND_SUCCESS_KEY: &str = "command-success";
/// Derived key for a successful command's return value.
pub const COMMAND_RETURN_VALUE_KEY: &str = "command-return-value";
/// Derived key for the cause of a failed command.
pub const COMMAND_FAILURE_CAUSE_KEY: &str = "command-failure-cause";
/// Derived key for the events a command produced.
pub const COMMAND_EVENTS_KEY: &str = "command-events";
/// Derived key for an event's payload type name.
pub const EVENT_NAME_KEY: &str = "event-name";
/// Derived key flagging whether event processing succeeded.
pub const EVENT_SUCCESS_KEY: &str = "event-success";
/// Derived key for the cause of failed event processing.
pub const EVENT_FAILURE_CAUSE_KEY: &str = "event-failure-cause";

/// Assembles one [`AuditRecord`] per command or event outcome.
///
/// Holds the base-data provider, supplied once at construction and invoked
/// read-only per build. Every build is a pure synchronous computation:
/// provider keys first, derived keys after, each through
/// [`AuditRecord::try_insert`]. Builds on independent threads share nothing
/// but the provider, which must tolerate concurrent invocation.
///
/// # Examples
///
/// ```
/// use message_audit::{AuditRecordBuilder, CommandMessage, EmptyAuditDataProvider};
/// use serde_json::json;
///
/// let builder = AuditRecordBuilder::new(EmptyAuditDataProvider);
/// let command = CommandMessage::new("OpenAccount", "cmd-1");
///
/// let record = builder
///     .build_for_command_success(&command, Some(json!("account-7")), &[])
///     .unwrap();
///
/// assert_eq!(record.get("command-name"), Some(&json!("OpenAccount")));
/// assert_eq!(record.get("correlation-id"), Some(&json!("cmd-1")));
/// assert_eq!(record.get("command-success"), Some(&json!(true)));
/// ```
#[derive(Debug, Clone)]
pub struct AuditRecordBuilder<P> {
    provider: P,
}

impl<P: AuditDataProvider> AuditRecordBuilder<P> {
    /// Creates a builder over the given base-data provider.
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    /// Returns a reference to the provider.
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Builds the record for a successfully executed command.
    ///
    /// A command with no result passes `None`; the record then carries
    /// `command-return-value` as an explicit null rather than omitting the
    /// key, so the key set of a success record is always the same five keys.
    ///
    /// # Errors
    ///
    /// Returns [`DuplicateKeyError`] the instant any insert targets an
    /// already-bound key. The partial record is discarded.
    pub fn build_for_command_success(
        &self,
        command: &CommandMessage,
        return_value: Option<Value>,
        produced_events: &[EventMessage],
    ) -> Result<AuditRecord, DuplicateKeyError> {
        let mut record = self.base_record(MessageRef::Command(command))?;
        record.try_insert(COMMAND_NAME_KEY, Value::from(command.name()))?;
        record.try_insert(CORRELATION_KEY, Value::from(command.identifier()))?;
        record.try_insert(COMMAND_SUCCESS_KEY, Value::Bool(true))?;
        record.try_insert(COMMAND_RETURN_VALUE_KEY, return_value.unwrap_or(Value::Null))?;
        record.try_insert(COMMAND_EVENTS_KEY, event_summaries(produced_events))?;
        Ok(record)
    }

    /// Builds the record for a failed command.
    ///
    /// The cause is opaque: stored as given, never interpreted. Failure
    /// records never carry `command-return-value`.
    ///
    /// # Errors
    ///
    /// Returns [`DuplicateKeyError`] on any key collision.
    pub fn build_for_command_failure(
        &self,
        command: &CommandMessage,
        failure_cause: Value,
        produced_events: &[EventMessage],
    ) -> Result<AuditRecord, DuplicateKeyError> {
        let mut record = self.base_record(MessageRef::Command(command))?;
        record.try_insert(COMMAND_NAME_KEY, Value::from(command.name()))?;
        record.try_insert(CORRELATION_KEY, Value::from(command.identifier()))?;
        record.try_insert(COMMAND_SUCCESS_KEY, Value::Bool(false))?;
        record.try_insert(COMMAND_FAILURE_CAUSE_KEY, failure_cause)?;
        record.try_insert(COMMAND_EVENTS_KEY, event_summaries(produced_events))?;
        Ok(record)
    }

    /// Builds the record for a successfully processed event.
    ///
    /// # Errors
    ///
    /// Returns [`DuplicateKeyError`] on any key collision.
    pub fn build_for_event_success(
        &self,
        event: &EventMessage,
    ) -> Result<AuditRecord, DuplicateKeyError> {
        let mut record = self.base_record(MessageRef::Event(event))?;
        record.try_insert(EVENT_NAME_KEY, Value::from(event.payload_type()))?;
        record.try_insert(CORRELATION_KEY, Value::from(event.identifier()))?;
        record.try_insert(EVENT_SUCCESS_KEY, Value::Bool(true))?;
        Ok(record)
    }

    /// Builds the record for an event whose processing failed.
    ///
    /// # Errors
    ///
    /// Returns [`DuplicateKeyError`] on any key collision.
    pub fn build_for_event_failure(
        &self,
        event: &EventMessage,
        failure_cause: Value,
    ) -> Result<AuditRecord, DuplicateKeyError> {
        let mut record = self.base_record(MessageRef::Event(event))?;
        record.try_insert(EVENT_NAME_KEY, Value::from(event.payload_type()))?;
        record.try_insert(CORRELATION_KEY, Value::from(event.identifier()))?;
        record.try_insert(EVENT_SUCCESS_KEY, Value::Bool(false))?;
        record.try_insert(EVENT_FAILURE_CAUSE_KEY, failure_cause)?;
        Ok(record)
    }

    /// Builds one record per event for a batch that was processed together.
    ///
    /// Each build is an isolated attempt: a [`DuplicateKeyError`] in one
    /// does not abort the others. Results come back in input order.
    pub fn build_for_event_batch_success(
        &self,
        events: &[EventMessage],
    ) -> Vec<Result<AuditRecord, DuplicateKeyError>> {
        events
            .iter()
            .map(|event| self.build_for_event_success(event))
            .collect()
    }

    /// Builds one record per event for a batch that failed together with one
    /// shared cause.
    ///
    /// Same isolation as [`build_for_event_batch_success`](Self::build_for_event_batch_success).
    pub fn build_for_event_batch_failure(
        &self,
        events: &[EventMessage],
        failure_cause: &Value,
    ) -> Vec<Result<AuditRecord, DuplicateKeyError>> {
        events
            .iter()
            .map(|event| self.build_for_event_failure(event, failure_cause.clone()))
            .collect()
    }

    /// Starts a record from the provider's contextual data for `message`.
    fn base_record(&self, message: MessageRef<'_>) -> Result<AuditRecord, DuplicateKeyError> {
        let mut record = AuditRecord::new();
        for (key, value) in self.provider.provide(message) {
            record.try_insert(key, value)?;
        }
        Ok(record)
    }
}

/// Summarizes produced events as an ordered JSON array.
fn event_summaries(events: &[EventMessage]) -> Value {
    Value::Array(events.iter().map(EventMessage::summary).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::{CorrelationDataProvider, EmptyAuditDataProvider};
    use serde_json::json;

    fn builder() -> AuditRecordBuilder<EmptyAuditDataProvider> {
        AuditRecordBuilder::new(EmptyAuditDataProvider)
    }

    #[test]
    fn command_success_has_exact_keys_in_order() {
        let command = CommandMessage::new("OpenAccount", "cmd-1");
        let record = builder()
            .build_for_command_success(&command, Some(json!(42)), &[])
            .unwrap();

        let keys: Vec<_> = record.keys().collect();
        assert_eq!(
            keys,
            [
                "command-name",
                "correlation-id",
                "command-success",
                "command-return-value",
                "command-events",
            ]
        );
        assert_eq!(record.get("command-name"), Some(&json!("OpenAccount")));
        assert_eq!(record.get("correlation-id"), Some(&json!("cmd-1")));
        assert_eq!(record.get("command-success"), Some(&json!(true)));
        assert_eq!(record.get("command-return-value"), Some(&json!(42)));
        assert_eq!(record.get("command-events"), Some(&json!([])));
    }

    #[test]
    fn command_success_without_result_stores_null_return_value() {
        let command = CommandMessage::new("Ping", "cmd-2");
        let record = builder()
            .build_for_command_success(&command, None, &[])
            .unwrap();

        assert!(record.contains_key("command-return-value"));
        assert_eq!(record.get("command-return-value"), Some(&Value::Null));
    }

    #[test]
    fn command_success_lists_produced_events_in_order() {
        let command = CommandMessage::new("OpenAccount", "cmd-3");
        let events = [
            EventMessage::new("AccountOpened", "evt-1"),
            EventMessage::new("WelcomeMailQueued", "evt-2"),
        ];
        let record = builder()
            .build_for_command_success(&command, None, &events)
            .unwrap();

        let listed = record.get("command-events").unwrap();
        assert_eq!(listed[0]["event-name"], "AccountOpened");
        assert_eq!(listed[1]["event-name"], "WelcomeMailQueued");
        assert_eq!(listed[1]["event-identifier"], "evt-2");
    }

    #[test]
    fn command_failure_stores_cause_and_no_return_value() {
        let command = CommandMessage::new("OpenAccount", "cmd-4");
        let cause = json!("insufficient funds");
        let record = builder()
            .build_for_command_failure(&command, cause.clone(), &[])
            .unwrap();

        let keys: Vec<_> = record.keys().collect();
        assert_eq!(
            keys,
            [
                "command-name",
                "correlation-id",
                "command-success",
                "command-failure-cause",
                "command-events",
            ]
        );
        assert_eq!(record.get("command-success"), Some(&json!(false)));
        assert_eq!(record.get("command-failure-cause"), Some(&cause));
        assert!(!record.contains_key("command-return-value"));
    }

    #[test]
    fn event_success_has_exact_keys_in_order() {
        let event = EventMessage::new("AccountOpened", "evt-1");
        let record = builder().build_for_event_success(&event).unwrap();

        let keys: Vec<_> = record.keys().collect();
        assert_eq!(keys, ["event-name", "correlation-id", "event-success"]);
        assert_eq!(record.get("event-name"), Some(&json!("AccountOpened")));
        assert_eq!(record.get("correlation-id"), Some(&json!("evt-1")));
        assert_eq!(record.get("event-success"), Some(&json!(true)));
    }

    #[test]
    fn event_failure_appends_cause() {
        let event = EventMessage::new("AccountOpened", "evt-2");
        let record = builder()
            .build_for_event_failure(&event, json!("projection offline"))
            .unwrap();

        let keys: Vec<_> = record.keys().collect();
        assert_eq!(
            keys,
            [
                "event-name",
                "correlation-id",
                "event-success",
                "event-failure-cause",
            ]
        );
        assert_eq!(record.get("event-success"), Some(&json!(false)));
        assert_eq!(
            record.get("event-failure-cause"),
            Some(&json!("projection offline"))
        );
    }

    #[test]
    fn provider_data_comes_first() {
        let builder = AuditRecordBuilder::new(CorrelationDataProvider::with_key("origin-id"));
        let event = EventMessage::new("AccountOpened", "evt-3");

        let record = builder.build_for_event_success(&event).unwrap();
        let keys: Vec<_> = record.keys().collect();
        assert_eq!(
            keys,
            ["origin-id", "event-name", "correlation-id", "event-success"]
        );
        assert_eq!(record.get("origin-id"), Some(&json!("evt-3")));
    }

    #[test]
    fn provider_emitting_correlation_key_fails_both_command_paths() {
        let builder = AuditRecordBuilder::new(CorrelationDataProvider::new());
        let command = CommandMessage::new("OpenAccount", "cmd-5");

        let err = builder
            .build_for_command_success(&command, None, &[])
            .unwrap_err();
        assert_eq!(err.key(), CORRELATION_KEY);

        let err = builder
            .build_for_command_failure(&command, json!("boom"), &[])
            .unwrap_err();
        assert_eq!(err.key(), CORRELATION_KEY);
    }

    #[test]
    fn provider_pre_binding_command_name_fails_before_derived_fields() {
        struct NamePoisoningProvider;
        impl AuditDataProvider for NamePoisoningProvider {
            fn provide(&self, _message: MessageRef<'_>) -> Vec<(String, Value)> {
                vec![(COMMAND_NAME_KEY.to_string(), json!("X"))]
            }
        }

        let builder = AuditRecordBuilder::new(NamePoisoningProvider);
        let command = CommandMessage::new("Y", "cmd-6");

        let err = builder
            .build_for_command_success(&command, None, &[])
            .unwrap_err();
        assert_eq!(err.key(), "command-name");
    }

    #[test]
    fn batch_success_yields_one_record_per_event() {
        let events = [
            EventMessage::new("AccountOpened", "evt-1"),
            EventMessage::new("AccountClosed", "evt-2"),
            EventMessage::new("AccountOpened", "evt-3"),
        ];

        let results = builder().build_for_event_batch_success(&events);
        assert_eq!(results.len(), 3);
        for (result, event) in results.iter().zip(&events) {
            let record = result.as_ref().unwrap();
            assert_eq!(record.get("event-success"), Some(&json!(true)));
            assert_eq!(
                record.get("correlation-id"),
                Some(&json!(event.identifier()))
            );
        }
    }

    #[test]
    fn batch_failure_shares_one_cause_across_records() {
        let events = [
            EventMessage::new("AccountOpened", "evt-1"),
            EventMessage::new("AccountClosed", "evt-2"),
        ];
        let cause = json!({"error": "store unreachable"});

        let results = builder().build_for_event_batch_failure(&events, &cause);
        assert_eq!(results.len(), 2);
        for result in &results {
            let record = result.as_ref().unwrap();
            assert_eq!(record.get("event-success"), Some(&json!(false)));
            assert_eq!(record.get("event-failure-cause"), Some(&cause));
        }
    }

    #[test]
    fn batch_collision_does_not_abort_other_builds() {
        // Poisons only one event's base data, by payload type.
        struct SelectiveProvider;
        impl AuditDataProvider for SelectiveProvider {
            fn provide(&self, message: MessageRef<'_>) -> Vec<(String, Value)> {
                match message {
                    MessageRef::Event(e) if e.payload_type() == "Poisoned" => {
                        vec![(EVENT_SUCCESS_KEY.to_string(), json!("tainted"))]
                    }
                    _ => Vec::new(),
                }
            }
        }

        let builder = AuditRecordBuilder::new(SelectiveProvider);
        let events = [
            EventMessage::new("AccountOpened", "evt-1"),
            EventMessage::new("Poisoned", "evt-2"),
            EventMessage::new("AccountClosed", "evt-3"),
        ];

        let results = builder.build_for_event_batch_success(&events);
        assert!(results[0].is_ok());
        assert_eq!(results[1].as_ref().unwrap_err().key(), "event-success");
        assert!(results[2].is_ok());
    }

    #[test]
    fn event_success_build_is_idempotent() {
        let event = EventMessage::new("AccountOpened", "evt-9");
        let first = builder().build_for_event_success(&event).unwrap();
        let second = builder().build_for_event_success(&event).unwrap();
        assert_eq!(first, second);
    }
}
