//! Ordered, collision-checked audit record.
//!
//! An [`AuditRecord`] is the key/value structure produced for one command or
//! event outcome. Insertion order is significant: provider-supplied keys come
//! first, derived keys after, so two records for the same outcome shape are
//! directly diffable in logs.

use std::fmt;

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;

use crate::error::DuplicateKeyError;

/// An ordered mapping from string key to JSON value, where every key is
/// bound at most once.
///
/// The single write primitive is [`try_insert`](Self::try_insert): it appends
/// the pair if the key is unbound, and fails with [`DuplicateKeyError`] if
/// the key is already present. There is no overwrite path. Silently dropping
/// audit data is worse than failing the audit write, so collisions are loud.
///
/// Records are created fresh per outcome, fully populated before being
/// handed off, and treated as immutable afterwards.
///
/// # Examples
///
/// ```
/// use message_audit::AuditRecord;
/// use serde_json::json;
///
/// let mut record = AuditRecord::new();
/// record.try_insert("command-name", json!("OpenAccount")).unwrap();
/// record.try_insert("command-success", json!(true)).unwrap();
///
/// assert_eq!(record.get("command-name"), Some(&json!("OpenAccount")));
/// let keys: Vec<_> = record.keys().collect();
/// assert_eq!(keys, ["command-name", "command-success"]);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AuditRecord {
    entries: Vec<(String, Value)>,
}

impl AuditRecord {
    /// Creates a new empty record.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Appends `key` bound to `value`, failing if `key` is already bound.
    ///
    /// This is the insert-or-fail primitive every field of a record goes
    /// through, provider-supplied and derived alike.
    ///
    /// # Errors
    ///
    /// Returns [`DuplicateKeyError`] naming the key if it is already
    /// present. The record is left untouched in that case, but callers
    /// building a record should discard it: a partial record must never
    /// be published.
    pub fn try_insert(
        &mut self,
        key: impl Into<String>,
        value: Value,
    ) -> Result<(), DuplicateKeyError> {
        let key = key.into();
        if self.contains_key(&key) {
            return Err(DuplicateKeyError::new(key));
        }
        self.entries.push((key, value));
        Ok(())
    }

    /// Returns the value bound to `key`, if any.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// Returns `true` if `key` is bound.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    /// Returns the keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Returns the entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the record holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> IntoIterator for &'a AuditRecord {
    type Item = (&'a str, &'a Value);
    type IntoIter = std::vec::IntoIter<(&'a str, &'a Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries
            .iter()
            .map(|(k, v)| (k.as_str(), v))
            .collect::<Vec<_>>()
            .into_iter()
    }
}

/// Serializes as a JSON object with keys in insertion order.
impl Serialize for AuditRecord {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

/// Renders the record as a JSON object, keys in insertion order.
impl fmt::Display for AuditRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (k, v)) in self.entries.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {}", Value::from(k.as_str()), v)?;
        }
        write!(f, "}}")
    }
}
