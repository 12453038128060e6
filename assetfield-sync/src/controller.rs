//! Field synchronization controller.
//!
//! The controller is the single authority translating between the remote
//! store's field semantics and the host's list and picker semantics. It owns
//! one piece of mutable state, the snapshot: the field value as last known
//! locally, held in a replace-only watch cell.
//!
//! - Activation pulls the remote value and starts forwarding external-change
//!   notifications into the snapshot, in delivery order.
//! - Local mutations replace the snapshot first and persist afterwards, so
//!   the host never renders stale ordering while a write is in flight.
//! - The picker flow appends onto the snapshot as of pick resolution, not as
//!   of pick open, so reorders and external changes that land while the
//!   picker is open are never silently dropped.
//!
//! There is no merging anywhere. Every writer replaces the snapshot whole,
//! and the freshest replacement wins.

use crate::error::FieldResult;
use crate::picker::ResourcePicker;
use crate::policy::{AlwaysEnabled, InteractionPolicy};
use crate::store::{RemoteFieldStore, ValueChanges};
use assetfield_types::{FieldValue, Resource};
use serde_json::Value;
use std::sync::{Arc, Mutex};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// RAII handle over the external-change subscription.
///
/// Dropping it aborts the forwarding task, which in turn drops the
/// store-side subscription handle.
struct SubscriptionGuard {
    task: JoinHandle<()>,
}

impl Drop for SubscriptionGuard {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// The synchronization core for one field.
///
/// Two lifecycle states: inactive (constructed, or after
/// [`deactivate`](Self::deactivate)) and active (after
/// [`activate`](Self::activate)). Mutation and picker operations are meant
/// for the active state; calling them while inactive operates on whatever
/// snapshot is current, without remote notifications flowing in.
pub struct FieldSyncController<R: Resource> {
    store: Arc<dyn RemoteFieldStore>,
    picker: Arc<dyn ResourcePicker<R>>,
    policy: Arc<dyn InteractionPolicy<R>>,
    snapshot: Arc<watch::Sender<FieldValue<R>>>,
    subscription: Mutex<Option<SubscriptionGuard>>,
}

impl<R: Resource> FieldSyncController<R> {
    /// Creates a controller that never disables interaction.
    pub fn new(store: Arc<dyn RemoteFieldStore>, picker: Arc<dyn ResourcePicker<R>>) -> Self {
        Self::with_policy(store, picker, Arc::new(AlwaysEnabled))
    }

    /// Creates a controller with an explicit interaction policy.
    pub fn with_policy(
        store: Arc<dyn RemoteFieldStore>,
        picker: Arc<dyn ResourcePicker<R>>,
        policy: Arc<dyn InteractionPolicy<R>>,
    ) -> Self {
        let (snapshot, _) = watch::channel(FieldValue::new());
        Self {
            store,
            picker,
            policy,
            snapshot: Arc::new(snapshot),
            subscription: Mutex::new(None),
        }
    }

    // ── Lifecycle ────────────────────────────────────────────────────────────

    /// Pulls the current remote value into the snapshot and starts listening
    /// for external changes.
    ///
    /// The subscription opens before the read, so a change landing during
    /// the read is queued and applied after the initial install rather than
    /// lost. Holds exactly one subscription: activating an already active
    /// controller replaces the previous subscription.
    pub async fn activate(&self) -> FieldResult<()> {
        let changes = self.store.subscribe();
        let raw = self.store.current_value().await?;
        install(&self.snapshot, raw);

        let snapshot = Arc::clone(&self.snapshot);
        let task = tokio::spawn(forward_changes(changes, snapshot));
        *self.subscription.lock().unwrap() = Some(SubscriptionGuard { task });
        debug!("activated; listening for external changes");
        Ok(())
    }

    /// Releases the external-change subscription.
    ///
    /// No-op when none is held. The subscription is also released when the
    /// controller drops, so every exit path detaches.
    pub fn deactivate(&self) {
        if self.subscription.lock().unwrap().take().is_some() {
            debug!("deactivated; external-change subscription released");
        }
    }

    /// Whether an external-change subscription is currently held.
    pub fn is_active(&self) -> bool {
        self.subscription.lock().unwrap().is_some()
    }

    // ── Snapshot replacement ─────────────────────────────────────────────────

    /// Installs an externally-originated raw value as the new snapshot.
    ///
    /// Unconditional replace: no merge, no comparison against the prior
    /// snapshot. Activation wires store notifications into this same path;
    /// hosts that deliver notifications by hand call it directly.
    pub fn on_external_change(&self, raw: Option<Value>) {
        install(&self.snapshot, raw);
    }

    /// Replaces the snapshot with `new_value` and persists it remotely.
    ///
    /// The local replacement happens before the remote write starts, so the
    /// host renders the new sequence immediately. A failed write leaves the
    /// snapshot at its optimistic value, is not retried, and surfaces to the
    /// caller.
    pub async fn apply_local_mutation(&self, new_value: FieldValue<R>) -> FieldResult<()> {
        self.snapshot.send_replace(new_value.clone());
        debug!(items = new_value.len(), "local mutation replaced snapshot");
        self.persist(&new_value).await
    }

    /// Single write path to the remote store. Retry or rollback for failed
    /// writes would hook in here; today the error surfaces unchanged.
    async fn persist(&self, value: &FieldValue<R>) -> FieldResult<()> {
        let outcome = if value.is_empty() {
            self.store.remove_value().await
        } else {
            self.store.set_value(value.to_remote()?).await
        };
        if let Err(err) = &outcome {
            warn!(%err, "remote write failed; snapshot keeps the optimistic value");
        }
        outcome
    }

    // ── Picker flow ──────────────────────────────────────────────────────────

    /// Opens the picker and appends whatever it resolves with.
    ///
    /// The baseline handed to the picker is the snapshot as of this call.
    /// The append target is the snapshot as of pick resolution, so changes
    /// that landed in between stay. An empty resolution mutates nothing.
    ///
    /// The await is not tied to the lifecycle: a pick resolving after
    /// [`deactivate`](Self::deactivate) still appends and persists.
    pub async fn open_picker(&self) -> FieldResult<()> {
        let baseline = self.snapshot.borrow().clone();
        let config = self.store.configuration();
        let picked = self.picker.pick(baseline, &config).await?;
        if picked.is_empty() {
            debug!("picker resolved empty; no mutation");
            return Ok(());
        }
        debug!(picked = picked.len(), "picker resolved; appending");

        let mut next = self.snapshot.borrow().clone();
        next.extend(picked);
        self.apply_local_mutation(next).await
    }

    // ── Introspection ────────────────────────────────────────────────────────

    /// Whether the append action should currently be disabled.
    ///
    /// Pure: delegates to the interaction policy over the current snapshot
    /// and configuration, with no side effects.
    pub fn is_interaction_disabled(&self) -> bool {
        let config = self.store.configuration();
        let snapshot = self.snapshot.borrow();
        self.policy.is_disabled(&snapshot, &config)
    }

    /// The field value as last known locally.
    pub fn snapshot(&self) -> FieldValue<R> {
        self.snapshot.borrow().clone()
    }

    /// Opens an observation handle that wakes on every snapshot replacement.
    pub fn updates(&self) -> SnapshotUpdates<R> {
        SnapshotUpdates { rx: self.snapshot.subscribe() }
    }
}

/// Observation handle over snapshot replacements.
///
/// Hosts drive re-rendering from this: [`changed`](Self::changed) wakes
/// after every replacement, [`current`](Self::current) reads the freshest
/// value. Rapid replacements may coalesce; `current` always yields the
/// latest.
pub struct SnapshotUpdates<R> {
    rx: watch::Receiver<FieldValue<R>>,
}

impl<R: Resource> SnapshotUpdates<R> {
    /// The current snapshot.
    #[must_use]
    pub fn current(&self) -> FieldValue<R> {
        self.rx.borrow().clone()
    }

    /// Waits for the next replacement.
    ///
    /// Returns false once the controller has been dropped.
    pub async fn changed(&mut self) -> bool {
        self.rx.changed().await.is_ok()
    }
}

/// Forwards store notifications into the snapshot until the store side
/// closes or the guard aborts the task.
async fn forward_changes<R: Resource>(
    mut changes: ValueChanges,
    snapshot: Arc<watch::Sender<FieldValue<R>>>,
) {
    while let Some(raw) = changes.next_change().await {
        install(&snapshot, raw);
    }
    debug!("external-change stream ended");
}

/// Coerces a raw remote value and replaces the snapshot with it.
fn install<R: Resource>(snapshot: &watch::Sender<FieldValue<R>>, raw: Option<Value>) {
    let value = FieldValue::coerce(raw);
    debug!(items = value.len(), "remote value installed as snapshot");
    snapshot.send_replace(value);
}
