//! Simulated rotator driver.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

use skyhub_app::ports::{DeviceMediator, MoveTarget, RotatorMediator};
use skyhub_domain::error::{DriverError, SkyHubError};
use skyhub_domain::event::DeviceEvent;
use skyhub_domain::info::RotatorInfo;
use skyhub_domain::kind::DeviceKind;

/// Degrees moved per simulation tick.
const STEP_DEGREES: f32 = 1.0;
/// Simulated time between movement ticks.
const TICK: Duration = Duration::from_millis(20);

/// A simulated rotator that steps toward its target position.
pub struct VirtualRotator {
    state: Mutex<RotatorInfo>,
    reachable: AtomicBool,
    events: broadcast::Sender<DeviceEvent>,
}

impl Default for VirtualRotator {
    fn default() -> Self {
        let (events, _) = broadcast::channel(16);
        Self {
            state: Mutex::new(RotatorInfo {
                name: "Virtual Rotator".to_string(),
                step_size: STEP_DEGREES,
                ..RotatorInfo::default()
            }),
            reachable: AtomicBool::new(true),
            events,
        }
    }
}

impl VirtualRotator {
    /// Make the simulated hardware unreachable (or reachable again). An
    /// unreachable driver fails connect, disconnect, and rescan.
    pub fn set_reachable(&self, reachable: bool) {
        self.reachable.store(reachable, Ordering::SeqCst);
    }

    fn check_reachable(&self, operation: &'static str) -> Result<(), SkyHubError> {
        if self.reachable.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(DriverError {
                kind: DeviceKind::Rotator,
                operation,
                message: "simulated hardware is unreachable".to_string(),
            }
            .into())
        }
    }

    fn fire(&self, event: DeviceEvent) {
        // No subscribers is fine; the watcher may not be active.
        let _ = self.events.send(event);
    }

    fn lock_state(&self) -> MutexGuard<'_, RotatorInfo> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl DeviceMediator for VirtualRotator {
    type Info = RotatorInfo;

    fn kind(&self) -> DeviceKind {
        DeviceKind::Rotator
    }

    fn info(&self) -> RotatorInfo {
        self.lock_state().clone()
    }

    fn connected(&self) -> bool {
        self.lock_state().connected
    }

    async fn connect(&self) -> Result<(), SkyHubError> {
        self.check_reachable("connect")?;
        let transitioned = {
            let mut state = self.lock_state();
            let changed = !state.connected;
            state.connected = true;
            changed
        };
        if transitioned {
            self.fire(DeviceEvent::Connected);
        }
        Ok(())
    }

    async fn disconnect(&self) -> Result<(), SkyHubError> {
        self.check_reachable("disconnect")?;
        let transitioned = {
            let mut state = self.lock_state();
            let changed = state.connected;
            state.connected = false;
            state.is_moving = false;
            changed
        };
        if transitioned {
            self.fire(DeviceEvent::Disconnected);
        }
        Ok(())
    }

    async fn rescan(&self) -> Result<(), SkyHubError> {
        self.check_reachable("rescan")
    }

    fn subscribe(&self) -> broadcast::Receiver<DeviceEvent> {
        self.events.subscribe()
    }
}

impl RotatorMediator for VirtualRotator {
    async fn move_to(
        &self,
        target: MoveTarget,
        cancel: CancellationToken,
    ) -> Result<(), SkyHubError> {
        let goal = normalize(target.degrees());
        let mechanical = matches!(target, MoveTarget::Mechanical(_));
        self.lock_state().is_moving = true;

        loop {
            if cancel.is_cancelled() {
                break;
            }
            let arrived = {
                let mut state = self.lock_state();
                let current = if mechanical {
                    state.mechanical_position
                } else {
                    state.position
                };
                let remaining = shortest_arc(current, goal);
                let delta = remaining.clamp(-STEP_DEGREES, STEP_DEGREES);
                state.position = normalize(state.position + delta);
                state.mechanical_position = normalize(state.mechanical_position + delta);
                remaining.abs() <= STEP_DEGREES
            };
            if arrived {
                break;
            }
            tokio::select! {
                () = cancel.cancelled() => break,
                () = tokio::time::sleep(TICK) => {}
            }
        }

        self.lock_state().is_moving = false;
        Ok(())
    }
}

/// Signed shortest arc from `from` to `to` on the 0–360° circle.
fn shortest_arc(from: f32, to: f32) -> f32 {
    let mut diff = (to - from) % 360.0;
    if diff > 180.0 {
        diff -= 360.0;
    }
    if diff < -180.0 {
        diff += 360.0;
    }
    diff
}

fn normalize(angle: f32) -> f32 {
    let wrapped = angle % 360.0;
    if wrapped < 0.0 { wrapped + 360.0 } else { wrapped }
}
