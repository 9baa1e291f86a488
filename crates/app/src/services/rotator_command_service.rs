//! Rotator command supersession — at most one in-flight move per device.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::runtime::Handle;
use tokio_util::sync::CancellationToken;

use skyhub_domain::error::{ConflictError, InternalError, SkyHubError};

use crate::ports::{MoveTarget, RotatorMediator};

/// Slot holding the cancellation handle of the most recently issued move.
#[derive(Default)]
struct MoveSlot {
    next_generation: u64,
    current: Option<ActiveMove>,
}

struct ActiveMove {
    generation: u64,
    token: CancellationToken,
}

/// Launches rotator moves, cancelling any still-running predecessor.
///
/// Issuing a move returns as soon as the command is launched; completion and
/// cancellation are observable only through info polling or device events.
/// Superseding a move is silent: the cancelled predecessor is an expected
/// outcome, never an error.
pub struct RotatorCommandService<M> {
    mediator: Arc<M>,
    slot: Arc<Mutex<MoveSlot>>,
}

impl<M: RotatorMediator + 'static> RotatorCommandService<M> {
    /// Create a controller for the given rotator mediator.
    pub fn new(mediator: Arc<M>) -> Self {
        Self {
            mediator,
            slot: Arc::new(Mutex::new(MoveSlot::default())),
        }
    }

    /// Launch a move to a sky angle, superseding any in-flight move.
    ///
    /// # Errors
    ///
    /// Returns [`SkyHubError::Conflict`] when the rotator is not connected
    /// (nothing is launched), or [`SkyHubError::Internal`] when no async
    /// runtime is available to carry the move.
    pub fn move_sky(&self, position: f32) -> Result<(), SkyHubError> {
        self.issue(MoveTarget::Sky(position))
    }

    /// Launch a move to a raw mechanical angle, superseding any in-flight
    /// move.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`move_sky`](Self::move_sky).
    pub fn move_mechanical(&self, position: f32) -> Result<(), SkyHubError> {
        self.issue(MoveTarget::Mechanical(position))
    }

    /// Whether a launched move has neither completed nor been superseded.
    #[must_use]
    pub fn has_active_move(&self) -> bool {
        self.lock_slot().current.is_some()
    }

    fn issue(&self, target: MoveTarget) -> Result<(), SkyHubError> {
        if !self.mediator.connected() {
            return Err(ConflictError::NotConnected {
                kind: self.mediator.kind(),
            }
            .into());
        }
        let runtime = Handle::try_current().map_err(|_| InternalError {
            message: "no async runtime available to launch a rotator move".to_string(),
        })?;

        let (generation, token) = self.replace_token();
        let mediator = Arc::clone(&self.mediator);
        let slot = Arc::clone(&self.slot);
        let kind = self.mediator.kind();
        tracing::debug!(%kind, ?target, "rotator move launched");
        runtime.spawn(async move {
            if let Err(err) = mediator.move_to(target, token).await {
                tracing::warn!(%kind, %err, "rotator move failed");
            }
            release(&slot, generation);
        });
        Ok(())
    }

    /// Cancel the previous token (if live) and install a fresh one, as one
    /// atomic step under the slot lock.
    fn replace_token(&self) -> (u64, CancellationToken) {
        let mut slot = self.lock_slot();
        if let Some(previous) = slot.current.take() {
            previous.token.cancel();
        }
        let generation = slot.next_generation;
        slot.next_generation += 1;
        let token = CancellationToken::new();
        slot.current = Some(ActiveMove {
            generation,
            token: token.clone(),
        });
        (generation, token)
    }

    fn lock_slot(&self) -> MutexGuard<'_, MoveSlot> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Clear the slot when the move that owns `generation` finishes naturally.
/// A superseded move finds a newer generation installed and leaves it alone.
fn release(slot: &Mutex<MoveSlot>, generation: u64) {
    let mut slot = slot.lock().unwrap_or_else(PoisonError::into_inner);
    if slot
        .current
        .as_ref()
        .is_some_and(|active| active.generation == generation)
    {
        slot.current = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex as StdMutex;
    use std::sync::atomic::{AtomicBool, Ordering};

    use tokio::sync::Notify;
    use tokio::sync::broadcast;

    use crate::ports::DeviceMediator;
    use skyhub_domain::event::DeviceEvent;
    use skyhub_domain::info::RotatorInfo;
    use skyhub_domain::kind::DeviceKind;

    struct FakeRotator {
        connected: AtomicBool,
        issued: StdMutex<Vec<(MoveTarget, CancellationToken)>>,
        complete: Notify,
    }

    impl Default for FakeRotator {
        fn default() -> Self {
            Self {
                connected: AtomicBool::new(true),
                issued: StdMutex::new(Vec::new()),
                complete: Notify::new(),
            }
        }
    }

    impl FakeRotator {
        fn issued(&self) -> Vec<(MoveTarget, CancellationToken)> {
            self.issued.lock().unwrap().clone()
        }
    }

    impl DeviceMediator for FakeRotator {
        type Info = RotatorInfo;

        fn kind(&self) -> DeviceKind {
            DeviceKind::Rotator
        }
        fn info(&self) -> RotatorInfo {
            RotatorInfo::default()
        }
        fn connected(&self) -> bool {
            self.connected.load(Ordering::SeqCst)
        }
        async fn connect(&self) -> Result<(), SkyHubError> {
            Ok(())
        }
        async fn disconnect(&self) -> Result<(), SkyHubError> {
            Ok(())
        }
        async fn rescan(&self) -> Result<(), SkyHubError> {
            Ok(())
        }
        fn subscribe(&self) -> broadcast::Receiver<DeviceEvent> {
            broadcast::channel(1).1
        }
    }

    impl RotatorMediator for FakeRotator {
        async fn move_to(
            &self,
            target: MoveTarget,
            cancel: CancellationToken,
        ) -> Result<(), SkyHubError> {
            self.issued.lock().unwrap().push((target, cancel.clone()));
            tokio::select! {
                () = cancel.cancelled() => {}
                () = self.complete.notified() => {}
            }
            Ok(())
        }
    }

    async fn wait_for_issued(rotator: &FakeRotator, expected: usize) {
        for _ in 0..100 {
            if rotator.issued().len() >= expected {
                return;
            }
            tokio::task::yield_now().await;
        }
        panic!("move was never launched");
    }

    fn service() -> (RotatorCommandService<FakeRotator>, Arc<FakeRotator>) {
        let rotator = Arc::new(FakeRotator::default());
        (
            RotatorCommandService::new(Arc::clone(&rotator)),
            rotator,
        )
    }

    #[tokio::test]
    async fn should_cancel_previous_move_when_new_one_is_issued() {
        let (service, rotator) = service();

        service.move_sky(120.0).unwrap();
        wait_for_issued(&rotator, 1).await;
        service.move_sky(45.0).unwrap();
        wait_for_issued(&rotator, 2).await;

        let issued = rotator.issued();
        assert!(issued[0].1.is_cancelled());
        assert!(!issued[1].1.is_cancelled());
        assert_eq!(issued[1].0, MoveTarget::Sky(45.0));
    }

    #[tokio::test]
    async fn should_reject_move_when_not_connected() {
        let (service, rotator) = service();
        rotator.connected.store(false, Ordering::SeqCst);

        let result = service.move_sky(90.0);

        assert!(matches!(result, Err(SkyHubError::Conflict(_))));
        assert!(rotator.issued().is_empty());
        assert!(!service.has_active_move());
    }

    #[tokio::test]
    async fn should_clear_slot_when_move_completes_naturally() {
        let (service, rotator) = service();

        service.move_mechanical(30.0).unwrap();
        wait_for_issued(&rotator, 1).await;
        assert!(service.has_active_move());

        rotator.complete.notify_waiters();
        for _ in 0..100 {
            if !service.has_active_move() {
                break;
            }
            tokio::task::yield_now().await;
        }
        assert!(!service.has_active_move());
    }

    #[tokio::test]
    async fn should_keep_new_token_when_superseded_move_finishes() {
        let (service, rotator) = service();

        service.move_sky(120.0).unwrap();
        wait_for_issued(&rotator, 1).await;
        service.move_sky(45.0).unwrap();
        wait_for_issued(&rotator, 2).await;

        // the first task observes its cancellation and returns; its release
        // must not evict the second move's token
        for _ in 0..20 {
            tokio::task::yield_now().await;
        }
        assert!(service.has_active_move());
    }

    #[tokio::test]
    async fn should_treat_moves_for_other_kinds_independently() {
        let (first_service, first) = service();
        let (second_service, second) = service();

        first_service.move_sky(10.0).unwrap();
        second_service.move_sky(20.0).unwrap();
        wait_for_issued(&first, 1).await;
        wait_for_issued(&second, 1).await;

        assert!(!first.issued()[0].1.is_cancelled());
        assert!(!second.issued()[0].1.is_cancelled());
    }
}
