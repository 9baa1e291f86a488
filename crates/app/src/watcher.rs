//! Event bridge — forwards device events onto the broadcast sink.
//!
//! Each device kind has zero or one active registration at any time. The
//! registry tracks registrations explicitly, so repeated start calls cannot
//! duplicate subscriptions and stop is a no-op when nothing is active.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use skyhub_domain::event::DeviceEvent;
use skyhub_domain::kind::DeviceKind;

use crate::ports::{DeviceMediator, EventSink};

struct WatcherHandle {
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

/// Process-wide registry bridging device events to an [`EventSink`].
///
/// Started once per device kind at application activation and stopped at
/// deactivation. A publish failure can never propagate back into the
/// driver's event-firing path: publication is infallible by construction.
pub struct DeviceWatcher<S> {
    sink: Arc<S>,
    active: Mutex<HashMap<DeviceKind, WatcherHandle>>,
}

impl<S: EventSink + 'static> DeviceWatcher<S> {
    /// Create a registry that publishes into `sink`.
    #[must_use]
    pub fn new(sink: Arc<S>) -> Self {
        Self {
            sink,
            active: Mutex::new(HashMap::new()),
        }
    }

    /// Begin forwarding `mediator`'s events to the sink.
    ///
    /// No-op if this kind is already being watched: starting twice without
    /// an intervening stop must not produce duplicate deliveries.
    pub fn start_watching<M: DeviceMediator>(&self, mediator: &M) {
        let kind = mediator.kind();
        let mut active = self.lock_active();
        if active.contains_key(&kind) {
            tracing::debug!(%kind, "watcher already active");
            return;
        }
        let cancel = CancellationToken::new();
        let task = tokio::spawn(forward_events(
            kind,
            mediator.subscribe(),
            Arc::clone(&self.sink),
            cancel.clone(),
        ));
        active.insert(kind, WatcherHandle { cancel, task });
        tracing::info!(%kind, "watcher started");
    }

    /// Stop forwarding events for `kind` and wait for the forwarding task
    /// to wind down. No-op if not currently watching.
    pub async fn stop_watching(&self, kind: DeviceKind) {
        let handle = self.lock_active().remove(&kind);
        let Some(handle) = handle else { return };
        handle.cancel.cancel();
        let _ = handle.task.await;
        tracing::info!(%kind, "watcher stopped");
    }

    /// Whether events for `kind` are currently bridged.
    #[must_use]
    pub fn is_watching(&self, kind: DeviceKind) -> bool {
        self.lock_active().contains_key(&kind)
    }

    fn lock_active(&self) -> MutexGuard<'_, HashMap<DeviceKind, WatcherHandle>> {
        self.active.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

async fn forward_events<S: EventSink>(
    kind: DeviceKind,
    mut events: broadcast::Receiver<DeviceEvent>,
    sink: Arc<S>,
    cancel: CancellationToken,
) {
    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            received = events.recv() => match received {
                Ok(event) => sink.publish(&event.broadcast_name(kind)),
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(%kind, skipped, "event subscriber lagged, transitions dropped");
                }
                Err(RecvError::Closed) => break,
            },
        }
    }
}
