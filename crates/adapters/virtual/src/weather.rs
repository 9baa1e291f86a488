//! Simulated weather station driver.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use tokio::sync::broadcast;

use skyhub_app::ports::DeviceMediator;
use skyhub_domain::error::{DriverError, SkyHubError};
use skyhub_domain::event::DeviceEvent;
use skyhub_domain::info::WeatherInfo;
use skyhub_domain::kind::DeviceKind;

const STATION_NAME: &str = "Virtual Weather Station";

/// A simulated weather station with fixed, plausible sensor readings.
pub struct VirtualWeather {
    state: Mutex<WeatherInfo>,
    reachable: AtomicBool,
    events: broadcast::Sender<DeviceEvent>,
}

impl Default for VirtualWeather {
    fn default() -> Self {
        let (events, _) = broadcast::channel(16);
        Self {
            state: Mutex::new(WeatherInfo {
                name: STATION_NAME.to_string(),
                ..WeatherInfo::default()
            }),
            reachable: AtomicBool::new(true),
            events,
        }
    }
}

impl VirtualWeather {
    /// Make the simulated hardware unreachable (or reachable again).
    pub fn set_reachable(&self, reachable: bool) {
        self.reachable.store(reachable, Ordering::SeqCst);
    }

    fn check_reachable(&self, operation: &'static str) -> Result<(), SkyHubError> {
        if self.reachable.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(DriverError {
                kind: DeviceKind::Weather,
                operation,
                message: "simulated hardware is unreachable".to_string(),
            }
            .into())
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, WeatherInfo> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl DeviceMediator for VirtualWeather {
    type Info = WeatherInfo;

    fn kind(&self) -> DeviceKind {
        DeviceKind::Weather
    }

    fn info(&self) -> WeatherInfo {
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
            if changed {
                *state = WeatherInfo {
                    connected: true,
                    name: STATION_NAME.to_string(),
                    temperature: Some(4.5),
                    humidity: Some(62.0),
                    pressure: Some(1013.2),
                    dew_point: Some(-2.1),
                    wind_speed: Some(3.4),
                    cloud_cover: Some(12.0),
                };
            }
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
            if changed {
                // readings are stale once the station is gone
                *state = WeatherInfo {
                    name: STATION_NAME.to_string(),
                    ..WeatherInfo::default()
                };
            }
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
