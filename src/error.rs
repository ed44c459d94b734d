use std::fmt;

/// Error raised when an audit-record insert targets a key that is already
/// bound.
///
/// This is the only error this crate raises. It carries the offending key
/// name and is fatal to the single record build that triggered it: the
/// partial record is discarded and never published. Retrying is pointless,
/// since the same inputs reproduce the same collision.
///
/// Callers are expected to report the failed build (e.g. through `tracing`)
/// and continue; audit logging must never fail the business operation it
/// is observing.
///
/// # Examples
///
/// ```
/// use message_audit::{AuditRecord, DuplicateKeyError};
/// use serde_json::json;
///
/// let mut record = AuditRecord::new();
/// record.try_insert("command-name", json!("OpenAccount")).unwrap();
///
/// let err = record
///     .try_insert("command-name", json!("Other"))
///     .unwrap_err();
/// assert_eq!(err.key(), "command-name");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateKeyError {
    key: String,
}

impl DuplicateKeyError {
    /// Creates a new error for the given colliding key.
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    /// Returns the name of the colliding key.
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl fmt::Display for DuplicateKeyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "duplicate audit key '{}'", self.key)
    }
}

impl std::error::Error for DuplicateKeyError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_key_error_carries_key() {
        let err = DuplicateKeyError::new("command-name");
        assert_eq!(err.key(), "command-name");
    }

    #[test]
    fn duplicate_key_error_display() {
        let err = DuplicateKeyError::new("event-success");
        assert_eq!(err.to_string(), "duplicate audit key 'event-success'");
    }

    #[test]
    fn duplicate_key_error_is_std_error() {
        fn assert_error<E: std::error::Error>(_e: &E) {}
        assert_error(&DuplicateKeyError::new("k"));
    }
}
