//! Field synchronization core for AssetField.
//!
//! Keeps a locally rendered, ordered list of asset resources synchronized
//! with a remotely persisted field value, and sequences appends from an
//! asynchronous picker against concurrent external updates.
//!
//! # Architecture
//!
//! [`FieldSyncController`] owns a single snapshot of the field value and
//! mediates every read and write between three collaborators:
//!
//! - [`RemoteFieldStore`]: the remote authority, with reads, full-sequence
//!   writes, removal, and a subscription delivering externally-originated
//!   changes in order
//! - [`ResourcePicker`]: the asynchronous selection flow producing resources
//!   to append
//! - [`InteractionPolicy`]: the pure predicate gating the append action
//!
//! # Update flow
//!
//! 1. Activate: pull the remote value, coerced to a well-formed sequence,
//!    and subscribe to external changes
//! 2. External change: unconditionally replace the snapshot; last writer
//!    wins, nothing merges
//! 3. Local mutation: replace the snapshot first, then persist the full
//!    sequence (set when non-empty, remove when empty)
//! 4. Append: open the picker against the call-time baseline, then
//!    concatenate its resolution onto the snapshot as of resolution time
//! 5. Deactivate: release the subscription, also released on drop
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use assetfield_sync::{FieldSyncController, StaticPicker};
//! use assetfield_sync::store::mock::MockFieldStore;
//! use assetfield_types::AssetRecord;
//!
//! let store = Arc::new(MockFieldStore::new());
//! let picker = Arc::new(StaticPicker::<AssetRecord>::new(Vec::new()));
//! let controller = FieldSyncController::new(store, picker);
//! assert!(controller.snapshot().is_empty());
//! assert!(!controller.is_active());
//! ```

mod controller;
mod error;
pub mod picker;
pub mod policy;
pub mod store;

pub use controller::{FieldSyncController, SnapshotUpdates};
pub use error::{FieldError, FieldResult};
pub use picker::{ResourcePicker, StaticPicker};
pub use policy::{AlwaysEnabled, DEFAULT_MAX_ITEMS, InteractionPolicy, MaxItemsPolicy};
pub use store::{RemoteFieldStore, ValueChanges};
