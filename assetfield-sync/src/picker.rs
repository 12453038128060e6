//! Resource picker abstraction.
//!
//! The picker is the externally supplied asynchronous selection flow. Given
//! the field value as of the moment it opens and the host configuration, it
//! eventually resolves with zero or more resources to append. An empty
//! resolution covers both "picked nothing" and "dismissed".

use crate::error::FieldResult;
use assetfield_types::{FieldConfig, FieldValue, Resource};
use async_trait::async_trait;

/// Asynchronous selection flow producing resources to append.
#[async_trait]
pub trait ResourcePicker<R: Resource>: Send + Sync {
    /// Opens the picker against the baseline value and configuration,
    /// resolving with the picked resources, possibly none.
    async fn pick(&self, baseline: FieldValue<R>, config: &FieldConfig) -> FieldResult<Vec<R>>;
}

/// Picker that resolves with the same fixed list on every open.
pub struct StaticPicker<R> {
    resources: Vec<R>,
}

impl<R: Resource> StaticPicker<R> {
    /// Creates a picker resolving with `resources` on every open.
    #[must_use]
    pub fn new(resources: Vec<R>) -> Self {
        Self { resources }
    }
}

#[async_trait]
impl<R: Resource> ResourcePicker<R> for StaticPicker<R> {
    async fn pick(&self, _baseline: FieldValue<R>, _config: &FieldConfig) -> FieldResult<Vec<R>> {
        Ok(self.resources.clone())
    }
}

/// Scripted picker for tests driving the selection flow by hand.
pub mod mock {
    use super::*;
    use crate::error::FieldError;
    use tokio::sync::{mpsc, oneshot};

    /// One in-flight pick call, surfaced to the holder of [`PickRequests`].
    pub struct PickRequest<R> {
        /// Field value as of the moment the pick opened.
        pub baseline: FieldValue<R>,
        /// Configuration as of the moment the pick opened.
        pub config: FieldConfig,
        responder: oneshot::Sender<Vec<R>>,
    }

    impl<R: Resource> PickRequest<R> {
        /// Resolves the pick with the given resources.
        pub fn resolve(self, resources: Vec<R>) {
            let _ = self.responder.send(resources);
        }

        /// Dismisses the pick without selecting anything.
        pub fn cancel(self) {
            self.resolve(Vec::new());
        }
    }

    /// Picker end of [`channel_picker`]: forwards every `pick` call as a
    /// [`PickRequest`] and awaits its resolution.
    pub struct ChannelPicker<R> {
        tx: mpsc::UnboundedSender<PickRequest<R>>,
    }

    /// Test end of [`channel_picker`]: yields one request per `pick` call.
    pub struct PickRequests<R> {
        rx: mpsc::UnboundedReceiver<PickRequest<R>>,
    }

    impl<R> PickRequests<R> {
        /// Receives the next in-flight pick call.
        ///
        /// Returns `None` once the picker has been dropped.
        pub async fn next_request(&mut self) -> Option<PickRequest<R>> {
            self.rx.recv().await
        }
    }

    /// Creates a scripted picker pair.
    #[must_use]
    pub fn channel_picker<R: Resource>() -> (ChannelPicker<R>, PickRequests<R>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (ChannelPicker { tx }, PickRequests { rx })
    }

    #[async_trait]
    impl<R: Resource> ResourcePicker<R> for ChannelPicker<R> {
        async fn pick(&self, baseline: FieldValue<R>, config: &FieldConfig) -> FieldResult<Vec<R>> {
            let (responder, resolution) = oneshot::channel();
            let request = PickRequest { baseline, config: config.clone(), responder };
            self.tx
                .send(request)
                .map_err(|_| FieldError::Picker("pick request receiver dropped".into()))?;
            // A dropped responder means the driver tore the flow down.
            // Treat it as a dismissal.
            Ok(resolution.await.unwrap_or_default())
        }
    }
}
