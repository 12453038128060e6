//! Shared helpers for sync tests.

#![allow(dead_code)]

use assetfield_types::{AssetRecord, FieldValue};
use serde_json::{Value, json};
use std::time::Duration;

/// Initializes tracing for tests, honoring `RUST_LOG`. Safe to call from
/// every test; only the first call installs a subscriber.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// A record with a single numeric `id` field.
pub fn record(id: u64) -> AssetRecord {
    AssetRecord::new().with_field("id", id)
}

/// Raw JSON array of `id` records, the shape the remote store holds.
pub fn raw_ids(ids: &[u64]) -> Value {
    Value::Array(ids.iter().map(|id| json!({ "id": id })).collect())
}

/// Ids of the records in a field value, in order.
pub fn ids(value: &FieldValue<AssetRecord>) -> Vec<u64> {
    value
        .iter()
        .filter_map(|record| record.field("id").and_then(Value::as_u64))
        .collect()
}

/// Polls `condition` until it holds, panicking after a bounded deadline.
///
/// Used where an effect crosses a spawned task and needs a few scheduler
/// turns to land.
pub async fn wait_until(mut condition: impl FnMut() -> bool) {
    for _ in 0..200 {
        if condition() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(2)).await;
    }
    panic!("condition not reached within deadline");
}
