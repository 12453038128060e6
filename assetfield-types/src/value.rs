//! Field values: the ordered resource sequence a field holds.
//!
//! A field value is replace-only state. Collaborators hand the core whole
//! sequences, never element-level deltas, and coercion is total: any raw
//! remote value that does not deserialize as a sequence of the resource type
//! becomes the empty sequence.

use crate::resource::Resource;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// An ordered sequence of resources, as last known locally.
///
/// Ordering is user-controlled and meaningful; it drives render order. The
/// empty sequence is a real domain state with its own remote semantics:
/// empty values are removed at the store, non-empty values are written
/// whole.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldValue<R>(Vec<R>);

impl<R> Default for FieldValue<R> {
    fn default() -> Self {
        Self(Vec::new())
    }
}

impl<R: Resource> FieldValue<R> {
    /// Creates an empty value.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Coerces a raw remote value into a well-formed sequence.
    ///
    /// Total: an absent value, a non-array value, or an array whose items do
    /// not deserialize as `R` all coerce to the empty sequence. Hosts that
    /// must keep arbitrary items pick `R = serde_json::Value`.
    #[must_use]
    pub fn coerce(raw: Option<Value>) -> Self {
        match raw {
            Some(value) => serde_json::from_value(value).map(Self).unwrap_or_default(),
            None => Self::default(),
        }
    }

    /// Serializes the full sequence for the remote store.
    pub fn to_remote(&self) -> serde_json::Result<Value> {
        serde_json::to_value(&self.0)
    }

    /// Number of resources in the sequence.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the sequence holds no resources.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates the resources in order.
    pub fn iter(&self) -> std::slice::Iter<'_, R> {
        self.0.iter()
    }

    /// Appends one resource at the end.
    pub fn push(&mut self, resource: R) {
        self.0.push(resource);
    }

    /// Appends resources at the end, preserving their order.
    pub fn extend(&mut self, resources: impl IntoIterator<Item = R>) {
        self.0.extend(resources);
    }

    /// Moves the resource at `from` so it ends up at index `to`.
    ///
    /// Returns false and leaves the sequence untouched when either index is
    /// out of bounds.
    pub fn move_item(&mut self, from: usize, to: usize) -> bool {
        if from >= self.0.len() || to >= self.0.len() {
            return false;
        }
        let resource = self.0.remove(from);
        self.0.insert(to, resource);
        true
    }

    /// Removes and returns the resource at `index`, if in bounds.
    pub fn remove_item(&mut self, index: usize) -> Option<R> {
        if index < self.0.len() {
            Some(self.0.remove(index))
        } else {
            None
        }
    }

    /// The sequence as a slice.
    pub fn as_slice(&self) -> &[R] {
        &self.0
    }

    /// Consumes the value, yielding the underlying sequence.
    #[must_use]
    pub fn into_vec(self) -> Vec<R> {
        self.0
    }
}

impl<R> From<Vec<R>> for FieldValue<R> {
    fn from(resources: Vec<R>) -> Self {
        Self(resources)
    }
}

impl<R> From<FieldValue<R>> for Vec<R> {
    fn from(value: FieldValue<R>) -> Self {
        value.0
    }
}

impl<R> FromIterator<R> for FieldValue<R> {
    fn from_iter<I: IntoIterator<Item = R>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn move_item_reorders_to_target_index() {
        let mut value = FieldValue::from(vec![1u32, 2, 3]);
        assert!(value.move_item(0, 2));
        assert_eq!(value.as_slice(), &[2, 3, 1]);
        assert!(value.move_item(2, 0));
        assert_eq!(value.as_slice(), &[1, 2, 3]);
    }

    #[test]
    fn move_item_rejects_out_of_bounds() {
        let mut value = FieldValue::from(vec![1u32, 2]);
        assert!(!value.move_item(2, 0));
        assert!(!value.move_item(0, 2));
        assert_eq!(value.as_slice(), &[1, 2]);
    }

    #[test]
    fn remove_item_returns_removed_resource() {
        let mut value = FieldValue::from(vec![1u32, 2, 3]);
        assert_eq!(value.remove_item(1), Some(2));
        assert_eq!(value.as_slice(), &[1, 3]);
        assert_eq!(value.remove_item(5), None);
    }
}
