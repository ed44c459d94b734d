//! Audit record construction for command and event outcomes.
//!
//! This crate turns the outcomes of a message-driven application (a command
//! succeeded or failed, a batch of events was processed or not) into ordered,
//! immutable audit records, and hands them to a publication collaborator.
//!
//! # Core Types
//!
//! - [`AuditRecord`]: ordered key/value record where every key is bound at
//!   most once
//! - [`AuditRecordBuilder`]: assembles one record per outcome, provider data
//!   first, derived fields after
//! - [`DuplicateKeyError`]: the one failure mode, raised on any key collision
//! - [`AuditLogger`]: wires builder and publisher at the framework's four
//!   outcome call sites
//!
//! The central invariant is no silent overwrite: if a derived key collides
//! with a provider-supplied key (or any earlier key), the build fails loudly
//! instead of masking one value with another. Silently dropping audit data
//! is worse than failing the audit write.
//!
//! # Examples
//!
//! ```
//! use message_audit::{
//!     AuditLogger, CommandMessage, EmptyAuditDataProvider, EventMessage, RecordingPublisher,
//! };
//! use serde_json::json;
//!
//! let logger = AuditLogger::new(EmptyAuditDataProvider, RecordingPublisher::new());
//!
//! let command = CommandMessage::new("OpenAccount", "cmd-1");
//! let produced = [EventMessage::new("AccountOpened", "evt-1")];
//! logger.command_succeeded(&command, Some(json!("account-7")), &produced);
//!
//! let published = logger.publisher().notifications();
//! assert_eq!(published[0].record().get("command-name"), Some(&json!("OpenAccount")));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod builder;
mod error;
mod logger;
mod message;
mod notify;
mod provider;
mod record;

pub use builder::{
    AuditRecordBuilder, COMMAND_EVENTS_KEY, COMMAND_FAILURE_CAUSE_KEY, COMMAND_NAME_KEY,
    COMMAND_RETURN_VALUE_KEY, COMMAND_SUCCESS_KEY, CORRELATION_KEY, EVENT_FAILURE_CAUSE_KEY,
    EVENT_NAME_KEY, EVENT_SUCCESS_KEY,
};
pub use error::DuplicateKeyError;
pub use logger::AuditLogger;
pub use message::{CommandMessage, EventMessage, MessageRef};
pub use notify::{
    AuditCategory, AuditNotification, AuditPublisher, RecordingPublisher, TracingPublisher,
};
pub use provider::{AuditDataProvider, CorrelationDataProvider, EmptyAuditDataProvider};
pub use record::AuditRecord;
