//! Remote field store abstraction.
//!
//! The store holds the authoritative field value as raw JSON. Reads yield
//! whatever is remotely persisted, possibly absent or malformed (coercion is
//! the controller's job). Writes always carry a full replacement sequence.
//! Subscriptions deliver externally-originated changes in order.

use crate::error::FieldResult;
use assetfield_types::FieldConfig;
use async_trait::async_trait;
use futures::Stream;
use serde_json::Value;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::mpsc;

/// Authoritative remote store for a single field value.
#[async_trait]
pub trait RemoteFieldStore: Send + Sync {
    /// Returns the currently persisted raw value, or `None` when the field
    /// is unset.
    async fn current_value(&self) -> FieldResult<Option<Value>>;

    /// Persists a full replacement value.
    ///
    /// Never called with an empty sequence; empty local values are removed
    /// through [`remove_value`](RemoteFieldStore::remove_value) instead.
    async fn set_value(&self, value: Value) -> FieldResult<()>;

    /// Removes the persisted value entirely.
    async fn remove_value(&self) -> FieldResult<()>;

    /// Opens a subscription to externally-originated changes.
    ///
    /// Dropping the returned handle detaches the subscription at the store.
    fn subscribe(&self) -> ValueChanges;

    /// Returns the host-supplied configuration record.
    fn configuration(&self) -> FieldConfig;
}

/// A live subscription to external changes of the remote value.
///
/// Notifications carry the raw value exactly as another actor persisted it,
/// `None` when the field was remotely removed. Delivery order matches write
/// order at the store.
pub struct ValueChanges {
    rx: mpsc::UnboundedReceiver<Option<Value>>,
}

impl ValueChanges {
    /// Creates a notification sender and the subscription reading from it.
    ///
    /// Store implementations keep the sender and hand out the subscription;
    /// a closed sender tells the store the subscriber detached.
    #[must_use]
    pub fn channel() -> (mpsc::UnboundedSender<Option<Value>>, ValueChanges) {
        let (tx, rx) = mpsc::unbounded_channel();
        (tx, ValueChanges { rx })
    }

    /// Receives the next external change.
    ///
    /// Returns `None` once the store side has gone away.
    pub async fn next_change(&mut self) -> Option<Option<Value>> {
        self.rx.recv().await
    }
}

impl Stream for ValueChanges {
    type Item = Option<Value>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.rx.poll_recv(cx)
    }
}

/// In-memory store for tests and single-process embedding.
pub mod mock {
    use super::*;
    use crate::error::FieldError;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::time::Duration;

    /// In-memory [`RemoteFieldStore`] with scriptable failures and
    /// observable write traffic.
    ///
    /// `emit_external` plays the part of another actor writing remotely: it
    /// updates the stored value and notifies every live subscriber in order.
    pub struct MockFieldStore {
        value: Mutex<Option<Value>>,
        config: FieldConfig,
        subscribers: Mutex<Vec<mpsc::UnboundedSender<Option<Value>>>>,
        set_calls: Mutex<Vec<Value>>,
        remove_calls: AtomicUsize,
        fail_next_write: AtomicBool,
        writes_held: AtomicBool,
    }

    impl MockFieldStore {
        /// Creates a store with no persisted value and empty configuration.
        #[must_use]
        pub fn new() -> Self {
            Self {
                value: Mutex::new(None),
                config: FieldConfig::new(),
                subscribers: Mutex::new(Vec::new()),
                set_calls: Mutex::new(Vec::new()),
                remove_calls: AtomicUsize::new(0),
                fail_next_write: AtomicBool::new(false),
                writes_held: AtomicBool::new(false),
            }
        }

        /// Creates a store already holding a persisted value.
        #[must_use]
        pub fn with_value(value: Value) -> Self {
            let store = Self::new();
            *store.value.lock().unwrap() = Some(value);
            store
        }

        /// Sets the configuration the store reports.
        #[must_use]
        pub fn with_config(mut self, config: FieldConfig) -> Self {
            self.config = config;
            self
        }

        /// Writes `value` as another actor and notifies live subscribers.
        pub fn emit_external(&self, value: Option<Value>) {
            *self.value.lock().unwrap() = value.clone();
            let mut subscribers = self.subscribers.lock().unwrap();
            subscribers.retain(|tx| tx.send(value.clone()).is_ok());
        }

        /// The value currently persisted, as a read of the backing cell.
        pub fn stored_value(&self) -> Option<Value> {
            self.value.lock().unwrap().clone()
        }

        /// Every value passed to [`set_value`](RemoteFieldStore::set_value),
        /// in call order.
        pub fn set_calls(&self) -> Vec<Value> {
            self.set_calls.lock().unwrap().clone()
        }

        /// Number of [`remove_value`](RemoteFieldStore::remove_value) calls.
        pub fn remove_calls(&self) -> usize {
            self.remove_calls.load(Ordering::SeqCst)
        }

        /// Number of subscriptions still attached.
        pub fn subscriber_count(&self) -> usize {
            let mut subscribers = self.subscribers.lock().unwrap();
            subscribers.retain(|tx| !tx.is_closed());
            subscribers.len()
        }

        /// Makes the next write call fail with a store error.
        pub fn fail_next_write(&self) {
            self.fail_next_write.store(true, Ordering::SeqCst);
        }

        /// Parks write calls until [`release_writes`](Self::release_writes).
        pub fn hold_writes(&self) {
            self.writes_held.store(true, Ordering::SeqCst);
        }

        /// Lets parked and future write calls proceed.
        pub fn release_writes(&self) {
            self.writes_held.store(false, Ordering::SeqCst);
        }

        async fn write_gate(&self) -> FieldResult<()> {
            while self.writes_held.load(Ordering::SeqCst) {
                tokio::time::sleep(Duration::from_millis(2)).await;
            }
            if self.fail_next_write.swap(false, Ordering::SeqCst) {
                return Err(FieldError::Store("simulated write failure".into()));
            }
            Ok(())
        }
    }

    impl Default for MockFieldStore {
        fn default() -> Self {
            Self::new()
        }
    }

    #[async_trait]
    impl RemoteFieldStore for MockFieldStore {
        async fn current_value(&self) -> FieldResult<Option<Value>> {
            Ok(self.value.lock().unwrap().clone())
        }

        async fn set_value(&self, value: Value) -> FieldResult<()> {
            self.write_gate().await?;
            *self.value.lock().unwrap() = Some(value.clone());
            self.set_calls.lock().unwrap().push(value);
            Ok(())
        }

        async fn remove_value(&self) -> FieldResult<()> {
            self.write_gate().await?;
            *self.value.lock().unwrap() = None;
            self.remove_calls.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        fn subscribe(&self) -> ValueChanges {
            let (tx, changes) = ValueChanges::channel();
            self.subscribers.lock().unwrap().push(tx);
            changes
        }

        fn configuration(&self) -> FieldConfig {
            self.config.clone()
        }
    }
}
