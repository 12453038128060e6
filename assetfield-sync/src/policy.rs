//! Interaction gating.
//!
//! The disabled-state predicate is pure: a function of the current value and
//! the host configuration, evaluated whenever the host renders the append
//! action. Policies must not consult anything else, so evaluation stays
//! cheap and repeatable.

use assetfield_types::{FieldConfig, FieldValue, Resource};

/// Item limit applied when the configuration does not carry one.
pub const DEFAULT_MAX_ITEMS: usize = 10;

/// Predicate gating the append action.
pub trait InteractionPolicy<R: Resource>: Send + Sync {
    /// Returns true when appending should be disabled for this value and
    /// configuration.
    fn is_disabled(&self, value: &FieldValue<R>, config: &FieldConfig) -> bool;
}

/// Policy that never disables interaction.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysEnabled;

impl<R: Resource> InteractionPolicy<R> for AlwaysEnabled {
    fn is_disabled(&self, _value: &FieldValue<R>, _config: &FieldConfig) -> bool {
        false
    }
}

/// Policy that disables appending once the value reaches an item limit.
///
/// The limit comes from the `maxItems` configuration entry when present and
/// numeric; otherwise the fallback this policy was built with.
#[derive(Debug, Clone, Copy)]
pub struct MaxItemsPolicy {
    fallback: usize,
}

impl MaxItemsPolicy {
    /// Configuration entry consulted for the limit.
    pub const CONFIG_KEY: &'static str = "maxItems";

    /// Creates a policy with the given fallback limit.
    #[must_use]
    pub fn new(fallback: usize) -> Self {
        Self { fallback }
    }
}

impl Default for MaxItemsPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ITEMS)
    }
}

impl<R: Resource> InteractionPolicy<R> for MaxItemsPolicy {
    fn is_disabled(&self, value: &FieldValue<R>, config: &FieldConfig) -> bool {
        let limit = config
            .get_u64(Self::CONFIG_KEY)
            .map(|limit| limit as usize)
            .unwrap_or(self.fallback);
        value.len() >= limit
    }
}
