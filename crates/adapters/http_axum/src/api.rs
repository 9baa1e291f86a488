//! JSON API handler modules.

#[allow(clippy::missing_errors_doc)]
pub mod events;
#[allow(clippy::missing_errors_doc)]
pub mod rotator;
#[allow(clippy::missing_errors_doc)]
pub mod safety_monitor;
#[allow(clippy::missing_errors_doc)]
pub mod weather;

use axum::Router;
use axum::routing::{get, post};
use serde::{Deserialize, Serialize};

use skyhub_app::ports::{DeviceMediator, RotatorMediator};
use skyhub_domain::info::{SafetyMonitorInfo, WeatherInfo};

use crate::state::AppState;

/// Standard success payload for lifecycle and command endpoints.
#[derive(Debug, Serialize)]
pub struct StatusMessage {
    pub message: String,
}

/// Query parameters accepted by connect endpoints.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ConnectQuery {
    /// Skip the rescan that normally precedes a connect.
    pub skip_rescan: bool,
}

/// Build the `/api` sub-router.
pub fn routes<R, S, W>() -> Router<AppState<R, S, W>>
where
    R: RotatorMediator + 'static,
    S: DeviceMediator<Info = SafetyMonitorInfo> + 'static,
    W: DeviceMediator<Info = WeatherInfo> + 'static,
{
    Router::new()
        // Rotator
        .route("/equipment/rotator/info", get(rotator::info::<R, S, W>))
        .route(
            "/equipment/rotator/connect",
            post(rotator::connect::<R, S, W>),
        )
        .route(
            "/equipment/rotator/disconnect",
            post(rotator::disconnect::<R, S, W>),
        )
        .route("/equipment/rotator/move", post(rotator::move_sky::<R, S, W>))
        .route(
            "/equipment/rotator/move-mechanical",
            post(rotator::move_mechanical::<R, S, W>),
        )
        // Safety monitor
        .route(
            "/equipment/safetymonitor/info",
            get(safety_monitor::info::<R, S, W>),
        )
        .route(
            "/equipment/safetymonitor/connect",
            post(safety_monitor::connect::<R, S, W>),
        )
        .route(
            "/equipment/safetymonitor/disconnect",
            post(safety_monitor::disconnect::<R, S, W>),
        )
        // Weather station
        .route("/equipment/weather/info", get(weather::info::<R, S, W>))
        .route(
            "/equipment/weather/connect",
            post(weather::connect::<R, S, W>),
        )
        .route(
            "/equipment/weather/disconnect",
            post(weather::disconnect::<R, S, W>),
        )
        // Broadcast events
        .route("/events/history", get(events::history::<R, S, W>))
        .route("/events/stream", get(events::stream::<R, S, W>))
}
