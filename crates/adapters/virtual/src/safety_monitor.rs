//! Simulated safety monitor driver.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use tokio::sync::broadcast;

use skyhub_app::ports::DeviceMediator;
use skyhub_domain::error::{DriverError, SkyHubError};
use skyhub_domain::event::DeviceEvent;
use skyhub_domain::info::SafetyMonitorInfo;
use skyhub_domain::kind::DeviceKind;

/// A simulated safety monitor with a togglable `is_safe` flag.
pub struct VirtualSafetyMonitor {
    state: Mutex<SafetyMonitorInfo>,
    reachable: AtomicBool,
    events: broadcast::Sender<DeviceEvent>,
}

impl Default for VirtualSafetyMonitor {
    fn default() -> Self {
        let (events, _) = broadcast::channel(16);
        Self {
            state: Mutex::new(SafetyMonitorInfo {
                name: "Virtual Safety Monitor".to_string(),
                ..SafetyMonitorInfo::default()
            }),
            reachable: AtomicBool::new(true),
            events,
        }
    }
}

impl VirtualSafetyMonitor {
    /// Make the simulated hardware unreachable (or reachable again).
    pub fn set_reachable(&self, reachable: bool) {
        self.reachable.store(reachable, Ordering::SeqCst);
    }

    /// Flip the safety flag, firing `IsSafeChanged` on an actual change.
    pub fn set_is_safe(&self, is_safe: bool) {
        let changed = {
            let mut state = self.lock_state();
            let changed = state.is_safe != is_safe;
            state.is_safe = is_safe;
            changed
        };
        if changed {
            let _ = self.events.send(DeviceEvent::IsSafeChanged);
        }
    }

    fn check_reachable(&self, operation: &'static str) -> Result<(), SkyHubError> {
        if self.reachable.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(DriverError {
                kind: DeviceKind::SafetyMonitor,
                operation,
                message: "simulated hardware is unreachable".to_string(),
            }
            .into())
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, SafetyMonitorInfo> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl DeviceMediator for VirtualSafetyMonitor {
    type Info = SafetyMonitorInfo;

    fn kind(&self) -> DeviceKind {
        DeviceKind::SafetyMonitor
    }

    fn info(&self) -> SafetyMonitorInfo {
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
            let _ = self.events.send(DeviceEvent::Connected);
        }
        Ok(())
    }

    async fn disconnect(&self) -> Result<(), SkyHubError> {
        self.check_reachable("disconnect")?;
        let transitioned = {
            let mut state = self.lock_state();
            let changed = state.connected;
            state.connected = false;
            changed
        };
        if transitioned {
            let _ = self.events.send(DeviceEvent::Disconnected);
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

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn should_fire_is_safe_changed_on_actual_change_only() {
        let monitor = VirtualSafetyMonitor::default();
        let mut events = monitor.subscribe();

        monitor.set_is_safe(true);
        monitor.set_is_safe(true);
        monitor.set_is_safe(false);

        assert_eq!(events.recv().await.unwrap(), DeviceEvent::IsSafeChanged);
        assert_eq!(events.recv().await.unwrap(), DeviceEvent::IsSafeChanged);
        assert!(events.try_recv().is_err());
    }

    #[tokio::test]
    async fn should_reflect_safety_flag_in_info() {
        let monitor = VirtualSafetyMonitor::default();
        assert!(!monitor.info().is_safe);

        monitor.set_is_safe(true);
        assert!(monitor.info().is_safe);
    }

    #[tokio::test]
    async fn should_connect_and_disconnect_with_single_events() {
        let monitor = VirtualSafetyMonitor::default();
        let mut events = monitor.subscribe();

        monitor.connect().await.unwrap();
        monitor.connect().await.unwrap();
        monitor.disconnect().await.unwrap();

        assert_eq!(events.recv().await.unwrap(), DeviceEvent::Connected);
        assert_eq!(events.recv().await.unwrap(), DeviceEvent::Disconnected);
        assert!(events.try_recv().is_err());
    }

    #[tokio::test]
    async fn should_fail_connect_when_unreachable() {
        let monitor = VirtualSafetyMonitor::default();
        monitor.set_reachable(false);

        assert!(matches!(
            monitor.connect().await,
            Err(SkyHubError::Driver(_))
        ));
    }
}
