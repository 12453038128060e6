//! Tests for the in-memory store and the subscription channel.

mod common;

use assetfield_sync::store::mock::MockFieldStore;
use assetfield_sync::{RemoteFieldStore, ValueChanges};
use assetfield_types::FieldConfig;
use common::{init_tracing, raw_ids, wait_until};
use futures::StreamExt;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::Arc;

// ─── Writes ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn writes_update_the_stored_value_and_are_recorded() {
    init_tracing();
    let store = MockFieldStore::new();

    store.set_value(raw_ids(&[1])).await.unwrap();
    assert_eq!(store.stored_value(), Some(raw_ids(&[1])));
    assert_eq!(store.current_value().await.unwrap(), Some(raw_ids(&[1])));

    store.remove_value().await.unwrap();
    assert_eq!(store.stored_value(), None);
    assert_eq!(store.set_calls(), vec![raw_ids(&[1])]);
    assert_eq!(store.remove_calls(), 1);
}

#[tokio::test]
async fn fail_next_write_fails_exactly_once() {
    init_tracing();
    let store = MockFieldStore::new();
    store.fail_next_write();

    assert!(store.set_value(raw_ids(&[1])).await.is_err());
    assert_eq!(store.stored_value(), None);

    store.set_value(raw_ids(&[2])).await.unwrap();
    assert_eq!(store.stored_value(), Some(raw_ids(&[2])));
}

#[tokio::test]
async fn held_writes_park_until_released() {
    init_tracing();
    let store = Arc::new(MockFieldStore::new());
    store.hold_writes();

    let writer = {
        let store = Arc::clone(&store);
        tokio::spawn(async move { store.set_value(raw_ids(&[1])).await })
    };

    tokio::task::yield_now().await;
    assert!(store.set_calls().is_empty());

    store.release_writes();
    writer.await.unwrap().unwrap();
    assert_eq!(store.set_calls(), vec![raw_ids(&[1])]);
}

// ─── Subscriptions ───────────────────────────────────────────────────────────

#[tokio::test]
async fn subscription_delivers_changes_in_write_order() {
    init_tracing();
    let store = MockFieldStore::new();
    let mut changes = store.subscribe();

    store.emit_external(Some(raw_ids(&[1])));
    store.emit_external(None);
    store.emit_external(Some(raw_ids(&[3])));

    assert_eq!(changes.next_change().await, Some(Some(raw_ids(&[1]))));
    assert_eq!(changes.next_change().await, Some(None));
    assert_eq!(changes.next_change().await, Some(Some(raw_ids(&[3]))));
    assert_eq!(store.stored_value(), Some(raw_ids(&[3])));
}

#[tokio::test]
async fn every_subscriber_receives_every_change() {
    init_tracing();
    let store = MockFieldStore::new();
    let mut first = store.subscribe();
    let mut second = store.subscribe();
    assert_eq!(store.subscriber_count(), 2);

    store.emit_external(Some(json!([])));

    assert_eq!(first.next_change().await, Some(Some(json!([]))));
    assert_eq!(second.next_change().await, Some(Some(json!([]))));
}

#[tokio::test]
async fn dropped_subscriptions_are_pruned() {
    init_tracing();
    let store = MockFieldStore::new();
    let changes = store.subscribe();
    assert_eq!(store.subscriber_count(), 1);

    drop(changes);
    wait_until(|| store.subscriber_count() == 0).await;
}

#[tokio::test]
async fn subscription_is_a_stream_and_ends_with_the_store() {
    init_tracing();
    let store = MockFieldStore::new();
    let mut changes = store.subscribe();

    store.emit_external(Some(raw_ids(&[1])));
    assert_eq!(changes.next().await, Some(Some(raw_ids(&[1]))));

    drop(store);
    assert_eq!(changes.next().await, None);
}

#[tokio::test]
async fn channel_close_ends_the_subscription() {
    init_tracing();
    let (tx, mut changes) = ValueChanges::channel();
    tx.send(Some(json!(1))).unwrap();
    drop(tx);

    assert_eq!(changes.next_change().await, Some(Some(json!(1))));
    assert_eq!(changes.next_change().await, None);
}

// ─── Configuration ───────────────────────────────────────────────────────────

#[tokio::test]
async fn configuration_reports_what_the_store_was_built_with() {
    init_tracing();
    let config = FieldConfig::new().with("cloudName", "demo");
    let store = MockFieldStore::new().with_config(config.clone());
    assert_eq!(store.configuration(), config);

    let bare = MockFieldStore::new();
    assert!(bare.configuration().is_empty());
}
