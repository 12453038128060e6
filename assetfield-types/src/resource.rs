//! Resource records.
//!
//! The sync core is generic over the resource type. `AssetRecord` is the
//! concrete type hosts reach for when they have no typed model of their own:
//! an opaque record of named fields, kept exactly as the remote store
//! delivered it.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Bound for types that can serve as one resource in a field value.
///
/// Blanket-implemented: host resource types opt in by being serde-complete,
/// cloneable and thread-safe. The core never looks past this bound; record
/// identity and meaning are the host's business.
pub trait Resource: Clone + Send + Sync + Serialize + DeserializeOwned + 'static {}

impl<T> Resource for T where T: Clone + Send + Sync + Serialize + DeserializeOwned + 'static {}

/// An opaque keyed record representing one selected asset.
///
/// Serialized transparently as a JSON object, so a record survives the
/// round trip through the remote store byte-for-byte in content. Accessors
/// are conveniences for hosts that key their lists by a record field (a
/// public id, a delivery URL); the core itself never reads them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetRecord(Map<String, Value>);

impl AssetRecord {
    /// Creates an empty record.
    #[must_use]
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Builds a record from raw named fields.
    #[must_use]
    pub fn from_fields(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Sets a named field, replacing any previous value.
    #[must_use]
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Returns the raw value of a top-level field, if present.
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Extracts a string via JSON pointer (e.g. `/context/alt`).
    pub fn get_str(&self, pointer: &str) -> Option<&str> {
        self.pointer(pointer).and_then(Value::as_str)
    }

    /// Extracts a boolean via JSON pointer.
    pub fn get_bool(&self, pointer: &str) -> Option<bool> {
        self.pointer(pointer).and_then(Value::as_bool)
    }

    /// Extracts a number via JSON pointer.
    pub fn get_number(&self, pointer: &str) -> Option<f64> {
        self.pointer(pointer).and_then(Value::as_f64)
    }

    /// Resolves a JSON pointer (RFC 6901) against the record fields.
    ///
    /// Pointer tokens escape `/` as `~1` and `~` as `~0`.
    pub fn pointer(&self, pointer: &str) -> Option<&Value> {
        let rest = pointer.strip_prefix('/')?;
        match rest.split_once('/') {
            Some((head, tail)) => self.0.get(&unescape(head))?.pointer(&format!("/{tail}")),
            None => self.0.get(&unescape(rest)),
        }
    }

    /// All named fields of the record.
    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }
}

fn unescape(token: &str) -> String {
    token.replace("~1", "/").replace("~0", "~")
}
