//! End-to-end audit flow demonstration.
//!
//! This example shows the full path from outcome to notification:
//! 1. Wire a base-data provider and a publisher into an AuditLogger
//! 2. Log a command success, a command failure, and an event batch
//! 3. Inspect the published notifications
//! 4. Trigger a key collision and see it reported, not propagated
//!
//! Run with: `cargo run --example audit_flow`

use message_audit::{
    AuditDataProvider, AuditLogger, CommandMessage, CorrelationDataProvider, EventMessage,
    MessageRef, RecordingPublisher,
};
use serde_json::{json, Value};

/// A provider supplying deployment context, as a real application would.
struct TenantProvider;

impl AuditDataProvider for TenantProvider {
    fn provide(&self, _message: MessageRef<'_>) -> Vec<(String, Value)> {
        vec![("tenant".to_string(), json!("acme"))]
    }
}

fn main() {
    tracing_subscriber::fmt().init();

    println!("=== Audit Flow Example ===\n");

    let logger = AuditLogger::new(TenantProvider, RecordingPublisher::new());

    // Scenario 1: a command succeeds and produces events
    println!("--- Scenario 1: Command Success ---");
    let command = CommandMessage::new("OpenAccount", "cmd-1");
    let produced = [EventMessage::new("AccountOpened", "evt-1")];
    logger.command_succeeded(&command, Some(json!("account-7")), &produced);
    println!("✓ Logged command success");

    // Scenario 2: a command fails
    println!("\n--- Scenario 2: Command Failure ---");
    let command = CommandMessage::new("CloseAccount", "cmd-2");
    logger.command_failed(&command, json!("account not empty"), &[]);
    println!("✓ Logged command failure");

    // Scenario 3: an event batch is processed
    println!("\n--- Scenario 3: Event Batch ---");
    let events = [
        EventMessage::new("AccountOpened", "evt-1"),
        EventMessage::new("WelcomeMailQueued", "evt-2"),
    ];
    logger.events_processed(&events);
    println!("✓ Logged {} event outcomes", events.len());

    println!("\n--- Published Notifications ---");
    for notification in logger.publisher().notifications() {
        println!("[{}] {}", notification.category(), notification.record());
    }

    // Scenario 4: a provider colliding with the correlation convention.
    // The build fails, the error is reported through tracing, and the
    // call site continues untouched.
    println!("\n--- Scenario 4: Key Collision ---");
    let colliding = AuditLogger::new(CorrelationDataProvider::new(), RecordingPublisher::new());
    colliding.command_succeeded(&CommandMessage::new("OpenAccount", "cmd-3"), None, &[]);
    println!(
        "✓ Collision swallowed; {} notifications published",
        colliding.publisher().len()
    );
}
