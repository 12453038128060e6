//! Host-supplied configuration.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Read-only configuration record sourced from the host environment.
///
/// Opaque to the sync core: it is handed through to the picker and to
/// disabled-state evaluation, never interpreted or mutated. Keys and their
/// meaning are a contract between the host and its collaborators.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldConfig(Map<String, Value>);

impl FieldConfig {
    /// Creates an empty configuration.
    #[must_use]
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Builds a configuration from a raw host value.
    ///
    /// Non-object values yield the empty configuration; hosts sometimes hand
    /// over whatever their environment stored.
    #[must_use]
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(entries) => Self(entries),
            _ => Self::new(),
        }
    }

    /// Sets an entry, replacing any previous value.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Returns the raw entry for `key`, if present.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Returns the entry for `key` as a string.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    /// Returns the entry for `key` as an unsigned integer.
    pub fn get_u64(&self, key: &str) -> Option<u64> {
        self.get(key).and_then(Value::as_u64)
    }

    /// Returns the entry for `key` as a boolean.
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(Value::as_bool)
    }

    /// Whether the configuration holds no entries.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
